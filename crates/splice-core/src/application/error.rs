//! Application layer errors.
//!
//! These errors represent failures in orchestration, not generation logic.
//! Generation errors are `DomainError` from `crate::domain`.

use thiserror::Error;

use crate::domain::DomainError;
use crate::error::ErrorCategory;

/// Errors that occur during application orchestration.
#[derive(Debug, Error, Clone)]
pub enum ApplicationError {
    /// No snippet registered under this name.
    #[error("Snippet not found: {name}")]
    SnippetNotFound { name: String },

    /// A snippet with this name is already registered.
    #[error("Snippet already registered: {name}")]
    DuplicateSnippet { name: String },

    /// A single invocation was rejected.
    #[error("Invocation #{index} of '{snippet}' failed: {source}")]
    InvocationFailed {
        index: usize,
        snippet: String,
        #[source]
        source: DomainError,
    },

    /// Rendering the merged build failed.
    #[error("Rendering failed: {reason}")]
    RenderingFailed { reason: String },

    /// Registry access failed (lock poisoned).
    #[error("Snippet registry error")]
    RegistryLockError,

    /// A run manifest could not be read or parsed.
    #[error("Invalid run manifest {source_name}: {reason}")]
    ManifestError { source_name: String, reason: String },
}

impl ApplicationError {
    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::SnippetNotFound { name } => vec![
                format!("No snippet named '{}'", name),
                "List registered snippets to see what is available".into(),
            ],
            Self::DuplicateSnippet { name } => vec![
                format!("'{}' is already registered", name),
                "Remove the existing snippet first or pick another name".into(),
            ],
            Self::InvocationFailed { source, .. } => source.suggestions(),
            Self::RegistryLockError => vec![
                "The snippet registry is locked".into(),
                "Try again in a moment".into(),
            ],
            Self::ManifestError { source_name, .. } => vec![
                format!("Check the syntax of {}", source_name),
                "Each [[invocations]] entry needs a `snippet` key".into(),
            ],
            _ => vec!["Check the error details above".into()],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::SnippetNotFound { .. } => ErrorCategory::NotFound,
            Self::DuplicateSnippet { .. } => ErrorCategory::Conflict,
            Self::InvocationFailed { source, .. } => source.category().into(),
            Self::RenderingFailed { .. } | Self::RegistryLockError => ErrorCategory::Internal,
            Self::ManifestError { .. } => ErrorCategory::Configuration,
        }
    }
}
