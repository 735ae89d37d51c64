//! Snippet Service - snippet catalogue operations.
//!
//! Registration, removal and listing. Separated from GenerationService for
//! single responsibility.

use std::sync::Arc;
use tracing::{info, instrument};

use crate::{
    application::ports::SnippetRegistry,
    domain::{DomainValidator as validator, DynSnippet, SnippetInfo},
    error::SpliceResult,
};

/// Service for snippet operations.
pub struct SnippetService {
    registry: Arc<dyn SnippetRegistry>,
}

impl SnippetService {
    pub fn new(registry: Arc<dyn SnippetRegistry>) -> Self {
        Self { registry }
    }

    /// Validate and register a snippet.
    #[instrument(skip_all, fields(snippet = %snippet.key()))]
    pub fn register(&self, snippet: Arc<dyn DynSnippet>) -> SpliceResult<()> {
        validator::validate_snippet(snippet.as_ref())?;
        self.registry.insert(snippet)?;
        info!("Snippet registered");
        Ok(())
    }

    /// Remove a snippet.
    pub fn remove(&self, name: &str) -> SpliceResult<()> {
        self.registry.remove(name)
    }

    /// Metadata and parameters of one snippet.
    pub fn describe(&self, name: &str) -> SpliceResult<SnippetInfo> {
        Ok(self.registry.get(name)?.info())
    }

    /// All snippets, ordered by name.
    pub fn list(&self) -> SpliceResult<Vec<SnippetInfo>> {
        Ok(self.registry.list()?.iter().map(|s| s.info()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::{ApplicationError, ports::MockSnippetRegistry};
    use crate::domain::{
        Contribution, DomainError, ParamKey, ParameterSet, ParameterSpec, PassParams, Snippet,
        SnippetMetadata,
    };
    use crate::error::SpliceError;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum Key {
        Label,
    }

    impl ParamKey for Key {
        fn name(self) -> &'static str {
            "label"
        }
    }

    struct Labelled {
        declare_twice: bool,
    }

    impl Snippet for Labelled {
        type Param = Key;

        fn metadata(&self) -> SnippetMetadata {
            SnippetMetadata::new("labelled", "Labelled").with_description("Test snippet")
        }

        fn params(&self) -> ParameterSet<Key> {
            let mut specs = vec![ParameterSpec::text(Key::Label).describe("Shown in the menu")];
            if self.declare_twice {
                specs.push(ParameterSpec::flag(Key::Label));
            }
            ParameterSet::new(specs)
        }

        fn add(&self, _: &PassParams<Key>, _: &mut Contribution) -> Result<(), DomainError> {
            Ok(())
        }
    }

    #[test]
    fn register_validates_before_insert() {
        let mut registry = MockSnippetRegistry::new();
        registry.expect_insert().times(1).returning(|_| Ok(()));
        let service = SnippetService::new(Arc::new(registry));

        service
            .register(Arc::new(Labelled { declare_twice: false }))
            .unwrap();
        let err = service
            .register(Arc::new(Labelled { declare_twice: true }))
            .unwrap_err();
        assert!(matches!(err, SpliceError::Domain(DomainError::Validation { .. })));
    }

    #[test]
    fn describe_reports_parameters() {
        let mut registry = MockSnippetRegistry::new();
        registry
            .expect_get()
            .returning(|_| Ok(Arc::new(Labelled { declare_twice: false }) as Arc<dyn DynSnippet>));
        let service = SnippetService::new(Arc::new(registry));

        let info = service.describe("labelled").unwrap();
        assert_eq!(info.metadata.label, "Labelled");
        assert_eq!(info.parameters[0].description, "Shown in the menu");
    }

    #[test]
    fn missing_snippet_propagates() {
        let mut registry = MockSnippetRegistry::new();
        registry.expect_get().returning(|name| {
            Err(ApplicationError::SnippetNotFound {
                name: name.to_string(),
            }
            .into())
        });
        let service = SnippetService::new(Arc::new(registry));

        assert!(service.describe("nope").is_err());
    }
}
