//! The snippet contract.
//!
//! Snippet authors implement the typed [`Snippet`] trait. Registries store
//! `Arc<dyn DynSnippet>`, which every `Snippet` gets for free; it turns raw
//! caller input into one [`Contribution`] per generation pass.

use serde::Serialize;
use tracing::debug;

use crate::domain::{
    entities::{
        ClassModel, DocumentFragment, DocumentNode, ModuleIdentity, RelativePath, StaticFile,
    },
    error::DomainError,
    validation::DomainValidator,
    parameters::{ParamKey, ParameterDescriptor, ParameterSet, PassParams, RawParams},
};

/// Static information about a snippet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SnippetMetadata {
    /// Registry key, e.g. `controller`.
    pub name: String,
    pub label: String,
    pub description: String,
}

impl SnippetMetadata {
    pub fn new(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            description: String::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// Metadata plus parameter listing, as shown to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SnippetInfo {
    #[serde(flatten)]
    pub metadata: SnippetMetadata,
    pub parameters: Vec<ParameterDescriptor>,
}

/// Documentation a snippet contributes to the package summary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DocContribution {
    pub summary: Option<String>,
    pub specifications: Option<String>,
    pub configuration: Option<String>,
}

impl DocContribution {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn summary(mut self, text: impl Into<String>) -> Self {
        self.summary = Some(text.into());
        self
    }

    pub fn specifications(mut self, text: impl Into<String>) -> Self {
        self.specifications = Some(text.into());
        self
    }

    pub fn configuration(mut self, text: impl Into<String>) -> Self {
        self.configuration = Some(text.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        [&self.summary, &self.specifications, &self.configuration]
            .iter()
            .all(|s| s.as_deref().is_none_or(|t| t.trim().is_empty()))
    }
}

/// Everything one generation pass produced.
///
/// Inputs are validated as they arrive, so a contribution that exists is
/// always safe to hand to the merge engine.
#[derive(Debug, Clone, PartialEq)]
pub struct Contribution {
    module: ModuleIdentity,
    classes: Vec<ClassModel>,
    documents: Vec<DocumentFragment>,
    static_files: Vec<StaticFile>,
    docs: Vec<DocContribution>,
}

impl Contribution {
    pub fn new(module: ModuleIdentity) -> Self {
        Self {
            module,
            classes: Vec::new(),
            documents: Vec::new(),
            static_files: Vec::new(),
            docs: Vec::new(),
        }
    }

    /// Identity of the module being generated.
    pub fn module(&self) -> &ModuleIdentity {
        &self.module
    }

    /// # Errors
    ///
    /// `InvalidIdentifier` when the namespace is not a `\`-separated sequence
    /// of identifiers.
    pub fn add_class(&mut self, class: ClassModel) -> Result<(), DomainError> {
        DomainValidator::validate_class(&class)?;
        self.classes.push(class);
        Ok(())
    }

    /// # Errors
    ///
    /// `AbsolutePathNotAllowed` or `InvalidPath` for a path leaving the package.
    pub fn add_document(&mut self, path: &str, root: DocumentNode) -> Result<(), DomainError> {
        let path = RelativePath::try_new(path)?;
        self.documents.push(DocumentFragment { path, root });
        Ok(())
    }

    /// # Errors
    ///
    /// `AbsolutePathNotAllowed` or `InvalidPath` for a path leaving the package.
    pub fn add_static_file(
        &mut self,
        path: &str,
        body: impl Into<String>,
    ) -> Result<(), DomainError> {
        let path = RelativePath::try_new(path)?;
        self.static_files.push(StaticFile::new(path, body));
        Ok(())
    }

    pub fn describe(&mut self, doc: DocContribution) {
        if !doc.is_empty() {
            self.docs.push(doc);
        }
    }

    pub fn classes(&self) -> &[ClassModel] {
        &self.classes
    }

    pub fn documents(&self) -> &[DocumentFragment] {
        &self.documents
    }

    pub fn static_files(&self) -> &[StaticFile] {
        &self.static_files
    }

    pub fn docs(&self) -> &[DocContribution] {
        &self.docs
    }

    pub(crate) fn into_parts(
        self,
    ) -> (
        Vec<ClassModel>,
        Vec<DocumentFragment>,
        Vec<StaticFile>,
        Vec<DocContribution>,
    ) {
        (self.classes, self.documents, self.static_files, self.docs)
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
            && self.documents.is_empty()
            && self.static_files.is_empty()
            && self.docs.is_empty()
    }
}

/// A feature generator with typed parameters.
pub trait Snippet: Send + Sync + 'static {
    type Param: ParamKey;

    fn metadata(&self) -> SnippetMetadata;

    /// Parameter declarations, in display order.
    fn params(&self) -> ParameterSet<Self::Param>;

    /// Emit fragments for one pass.
    fn add(
        &self,
        params: &PassParams<Self::Param>,
        out: &mut Contribution,
    ) -> Result<(), DomainError>;
}

/// Object-safe view of a [`Snippet`], as stored by registries.
pub trait DynSnippet: Send + Sync {
    fn info(&self) -> SnippetInfo;

    /// Registry key.
    fn key(&self) -> String;

    /// Check the snippet's own declarations.
    fn check(&self) -> Result<(), DomainError>;

    /// Resolve `raw`, expand passes and run the snippet once per pass.
    ///
    /// Nothing is returned unless every pass succeeds.
    fn invoke(
        &self,
        raw: &RawParams,
        module: &ModuleIdentity,
    ) -> Result<Vec<Contribution>, DomainError>;
}

impl<S: Snippet> DynSnippet for S {
    fn info(&self) -> SnippetInfo {
        SnippetInfo {
            metadata: self.metadata(),
            parameters: self.params().descriptors(),
        }
    }

    fn key(&self) -> String {
        self.metadata().name
    }

    fn check(&self) -> Result<(), DomainError> {
        let name = self.metadata().name;
        if name.trim().is_empty() {
            return Err(DomainError::MissingRequiredField {
                field: "snippet name",
            });
        }
        let params = self.params();
        if let Some(dup) = params.duplicate_name() {
            return Err(DomainError::validation(dup, "declared more than once"));
        }
        params.check_defaults()
    }

    fn invoke(
        &self,
        raw: &RawParams,
        module: &ModuleIdentity,
    ) -> Result<Vec<Contribution>, DomainError> {
        let passes = self.params().resolve(raw)?.passes()?;
        let snippet = self.metadata().name;

        let mut contributions = Vec::with_capacity(passes.len());
        for pass in &passes {
            debug!(snippet = %snippet, pass = pass.index(), "running pass");
            let mut out = Contribution::new(module.clone());
            self.add(pass, &mut out)?;
            contributions.push(out);
        }
        Ok(contributions)
    }
}
