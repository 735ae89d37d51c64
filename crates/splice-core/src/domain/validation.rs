use crate::domain::{
    entities::{ClassModel, GeneratedPackage, common::is_namespace},
    error::DomainError,
    snippet::DynSnippet,
};

/// Centralized domain validation.
///
/// Checks that belong to no single entity live here.
pub struct DomainValidator;

impl DomainValidator {
    /// A snippet must have a name and declare each parameter once, with
    /// defaults that pass their own rule.
    pub fn validate_snippet(snippet: &dyn DynSnippet) -> Result<(), DomainError> {
        snippet.check()
    }

    pub fn validate_class(class: &ClassModel) -> Result<(), DomainError> {
        if !is_namespace(class.namespace()) {
            return Err(DomainError::InvalidIdentifier {
                kind: "class namespace",
                value: class.namespace().to_string(),
            });
        }
        Ok(())
    }

    /// Every package carries at least its summary file.
    pub fn validate_package(package: &GeneratedPackage) -> Result<(), DomainError> {
        if package.summary_path().is_none() {
            return Err(DomainError::MissingRequiredField { field: "summary" });
        }
        Ok(())
    }
}
