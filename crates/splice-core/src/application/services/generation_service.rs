//! Generation Service - main application orchestrator.
//!
//! Coordinates one generation run:
//! 1. Look up each invoked snippet
//! 2. Resolve its parameters and run it once per pass
//! 3. Commit the contributions into a build session
//! 4. Merge and render the package

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use crate::{
    application::{
        ApplicationError,
        ports::{PackageRenderer, SnippetRegistry},
    },
    domain::{
        ArtifactKind, BuildSession, Contribution, DomainValidator as validator, GeneratedPackage,
        ModuleIdentity, RawParams,
    },
    error::{SpliceError, SpliceResult},
};

/// One snippet call with raw parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invocation {
    pub snippet: String,
    #[serde(default)]
    pub params: RawParams,
}

impl Invocation {
    pub fn new(snippet: impl Into<String>, params: RawParams) -> Self {
        Self {
            snippet: snippet.into(),
            params,
        }
    }
}

/// An invocation skipped by [`GenerationService::generate_lenient`].
#[derive(Debug, Clone)]
pub struct RejectedInvocation {
    pub index: usize,
    pub snippet: String,
    pub error: SpliceError,
}

/// Package plus the invocations that did not make it in.
#[derive(Debug, Clone)]
pub struct GenerationOutcome {
    pub package: GeneratedPackage,
    pub rejected: Vec<RejectedInvocation>,
}

/// Main generation service.
pub struct GenerationService {
    registry: Arc<dyn SnippetRegistry>,
    renderer: Box<dyn PackageRenderer>,
}

impl GenerationService {
    /// Create a new generation service with the given adapters.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let service = GenerationService::new(
    ///     registry, // Arc<dyn SnippetRegistry>
    ///     renderer, // Box<dyn PackageRenderer>
    /// );
    /// ```
    pub fn new(registry: Arc<dyn SnippetRegistry>, renderer: Box<dyn PackageRenderer>) -> Self {
        Self { registry, renderer }
    }

    /// Run every invocation in order and render the result.
    ///
    /// All-or-nothing: the first rejected invocation aborts the run.
    #[instrument(skip_all, fields(module = %module, invocations = invocations.len()))]
    pub fn generate(
        &self,
        module: ModuleIdentity,
        invocations: &[Invocation],
    ) -> SpliceResult<GeneratedPackage> {
        info!("Generating {}", module.module_name());

        let mut session = BuildSession::new(module);
        for (index, invocation) in invocations.iter().enumerate() {
            let contributions = self.run_invocation(index, invocation, session.module())?;
            session.commit(contributions);
        }

        self.render(session)
    }

    /// Like [`Self::generate`], but rejected invocations are skipped and
    /// reported instead of aborting the run.
    ///
    /// Merge conflicts and rendering failures still abort.
    #[instrument(skip_all, fields(module = %module, invocations = invocations.len()))]
    pub fn generate_lenient(
        &self,
        module: ModuleIdentity,
        invocations: &[Invocation],
    ) -> SpliceResult<GenerationOutcome> {
        info!("Generating {} (lenient)", module.module_name());

        let mut session = BuildSession::new(module);
        let mut rejected = Vec::new();

        for (index, invocation) in invocations.iter().enumerate() {
            match self.run_invocation(index, invocation, session.module()) {
                Ok(contributions) => session.commit(contributions),
                Err(error) if is_rejection(&error) => {
                    warn!(index, snippet = %invocation.snippet, error = %error, "Invocation rejected");
                    rejected.push(RejectedInvocation {
                        index,
                        snippet: invocation.snippet.clone(),
                        error,
                    });
                }
                Err(error) => return Err(error),
            }
        }

        let package = self.render(session)?;
        Ok(GenerationOutcome { package, rejected })
    }

    // -------------------------------------------------------------------------
    // Internal Helpers
    // -------------------------------------------------------------------------

    fn run_invocation(
        &self,
        index: usize,
        invocation: &Invocation,
        module: &ModuleIdentity,
    ) -> SpliceResult<Vec<Contribution>> {
        let snippet = self.registry.get(&invocation.snippet)?;
        debug!(index, snippet = %invocation.snippet, "Invoking snippet");

        snippet.invoke(&invocation.params, module).map_err(|source| {
            ApplicationError::InvocationFailed {
                index,
                snippet: invocation.snippet.clone(),
                source,
            }
            .into()
        })
    }

    fn render(&self, mut session: BuildSession) -> SpliceResult<GeneratedPackage> {
        session.reserve(self.renderer.summary_path()?, ArtifactKind::Summary);
        let merged = session.finish()?;
        let package = self.renderer.render(&merged)?;
        validator::validate_package(&package)?;

        info!(
            run_id = %package.run_id(),
            entries = package.entry_count(),
            warnings = package.warnings().len(),
            "Generation completed"
        );
        Ok(package)
    }
}

/// Errors confined to a single invocation.
fn is_rejection(error: &SpliceError) -> bool {
    matches!(
        error,
        SpliceError::Application(
            ApplicationError::SnippetNotFound { .. } | ApplicationError::InvocationFailed { .. }
        )
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{MockPackageRenderer, MockSnippetRegistry};
    use crate::domain::{
        ClassModel, DocContribution, DomainError, DynSnippet, MergedBuild, MethodModel,
        PackageBuilder, ParamKey, ParameterSet, ParameterSpec, PassParams, RelativePath, Snippet,
        SnippetMetadata,
    };

    // ========================================================================
    // Fixtures
    // ========================================================================

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum HelperParam {
        Method,
    }

    impl ParamKey for HelperParam {
        fn name(self) -> &'static str {
            "method"
        }
    }

    /// Adds one method per value to `Helper\Data`.
    struct Helper;

    impl Snippet for Helper {
        type Param = HelperParam;

        fn metadata(&self) -> SnippetMetadata {
            SnippetMetadata::new("helper", "Helper")
        }

        fn params(&self) -> ParameterSet<HelperParam> {
            ParameterSet::new(vec![
                ParameterSpec::text(HelperParam::Method)
                    .required()
                    .repeatable()
                    .matching("[a-z][A-Za-z]*")
                    .unwrap(),
            ])
        }

        fn add(
            &self,
            params: &PassParams<HelperParam>,
            out: &mut Contribution,
        ) -> Result<(), DomainError> {
            let name = params.require_text(HelperParam::Method)?;
            out.add_class(
                ClassModel::new("Helper\\Data")
                    .extends("\\Magento\\Framework\\App\\Helper\\AbstractHelper")
                    .with_method(MethodModel::builder(name).body("return null;").build()?),
            )?;
            out.describe(DocContribution::new().specifications(format!(" - Helper\n\t- {name}")));
            Ok(())
        }
    }

    fn module() -> ModuleIdentity {
        ModuleIdentity::new("Vendor", "Module").unwrap()
    }

    /// Registry answering with [`Helper`] for `helper` and nothing else.
    fn registry() -> Arc<dyn SnippetRegistry> {
        let mut registry = MockSnippetRegistry::new();
        registry.expect_get().returning(|name| {
            if name == "helper" {
                Ok(Arc::new(Helper) as Arc<dyn DynSnippet>)
            } else {
                Err(ApplicationError::SnippetNotFound {
                    name: name.to_string(),
                }
                .into())
            }
        });
        Arc::new(registry)
    }

    /// Renders one listing line per class method, plus a summary.
    fn renderer() -> Box<dyn PackageRenderer> {
        let mut renderer = MockPackageRenderer::new();
        renderer
            .expect_summary_path()
            .returning(|| Ok(RelativePath::try_new("README.md")?));
        renderer.expect_render().returning(|build: &MergedBuild| {
            let mut builder = PackageBuilder::new(build.module().module_name(), build.run_id());
            for class in build.classes() {
                let methods: Vec<_> = class.methods().iter().map(|m| m.name()).collect();
                builder.add_file(
                    RelativePath::try_new(format!("{}.txt", class.namespace().replace('\\', "/")))?,
                    methods.join(","),
                );
            }
            builder.add_summary(RelativePath::try_new("README.md")?, String::new());
            Ok(builder.finish()?)
        });
        Box::new(renderer)
    }

    fn helper(methods: Vec<&str>) -> Invocation {
        Invocation::new("helper", RawParams::new().with("method", methods))
    }

    // ========================================================================
    // Strict generation
    // ========================================================================

    #[test]
    fn generate_merges_all_invocations() {
        let service = GenerationService::new(registry(), renderer());
        let package = service
            .generate(module(), &[helper(vec!["getName", "getCode"]), helper(vec!["getName"])])
            .unwrap();

        assert_eq!(package.root(), "Vendor_Module");
        assert_eq!(package.file("Helper/Data.txt").unwrap().content, "getName,getCode");
    }

    #[test]
    fn unknown_snippet_aborts_strict_run() {
        let service = GenerationService::new(registry(), renderer());
        let err = service
            .generate(module(), &[helper(vec!["getName"]), Invocation::new("menu", RawParams::new())])
            .unwrap_err();

        assert!(matches!(
            err,
            SpliceError::Application(ApplicationError::SnippetNotFound { .. })
        ));
    }

    #[test]
    fn invalid_parameters_report_invocation_index() {
        let service = GenerationService::new(registry(), renderer());
        let err = service
            .generate(module(), &[helper(vec!["getName"]), helper(vec!["Bad Name"])])
            .unwrap_err();

        match err {
            SpliceError::Application(ApplicationError::InvocationFailed { index, snippet, source }) => {
                assert_eq!(index, 1);
                assert_eq!(snippet, "helper");
                assert!(matches!(source, DomainError::Validation { .. }));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    // ========================================================================
    // Lenient generation
    // ========================================================================

    #[test]
    fn lenient_run_skips_rejected_invocations() {
        let service = GenerationService::new(registry(), renderer());
        let outcome = service
            .generate_lenient(
                module(),
                &[
                    helper(vec!["getName"]),
                    helper(Vec::new()),
                    Invocation::new("menu", RawParams::new()),
                    helper(vec!["getCode"]),
                ],
            )
            .unwrap();

        let indices: Vec<_> = outcome.rejected.iter().map(|r| r.index).collect();
        assert_eq!(indices, [1, 2]);
        assert_eq!(
            outcome.package.file("Helper/Data.txt").unwrap().content,
            "getName,getCode"
        );
    }

    #[test]
    fn renderer_failure_aborts_lenient_run() {
        let mut failing = MockPackageRenderer::new();
        failing
            .expect_summary_path()
            .returning(|| Ok(RelativePath::try_new("README.md")?));
        failing.expect_render().returning(|_| {
            Err(ApplicationError::RenderingFailed {
                reason: "boom".into(),
            }
            .into())
        });
        let service = GenerationService::new(registry(), Box::new(failing));

        assert!(service.generate_lenient(module(), &[helper(vec!["getName"])]).is_err());
    }

    #[test]
    fn invocation_deserializes_from_json() {
        let json = r#"{ "snippet": "helper", "params": { "method": ["a", "b"] } }"#;
        let invocation: Invocation = serde_json::from_str(json).unwrap();
        assert_eq!(invocation, helper(vec!["a", "b"]));

        let bare: Invocation = serde_json::from_str(r#"{ "snippet": "helper" }"#).unwrap();
        assert!(bare.params.is_empty());
    }
}
