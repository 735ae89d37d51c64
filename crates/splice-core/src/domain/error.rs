// ============================================================================
// domain/error.rs - DOMAIN ERROR TAXONOMY
// ============================================================================

use thiserror::Error;

/// Root domain error type.
///
/// All errors are:
/// - Cloneable (the lenient orchestrator keeps them in its report)
/// - Categorizable (for display)
/// - Actionable (provides suggestions)
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    // ========================================================================
    // Parameter Errors
    // ========================================================================
    #[error("Invalid value for parameter '{parameter}': {message}")]
    Validation { parameter: String, message: String },

    #[error("Missing required parameter '{parameter}'")]
    MissingParameter { parameter: String },

    #[error("Unknown parameter '{parameter}'")]
    UnknownParameter {
        parameter: String,
        expected: Vec<String>,
    },

    #[error("Parameter '{parameter}' has an invalid pattern: {reason}")]
    InvalidPattern { parameter: String, reason: String },

    // ========================================================================
    // Merge Conflicts
    // ========================================================================
    #[error("Class '{namespace}' declared with conflicting parents '{existing}' and '{incoming}'")]
    ClassConflict {
        namespace: String,
        existing: String,
        incoming: String,
    },

    #[error("Document '{path}' declared with conflicting roots <{existing}> and <{incoming}>")]
    DocumentRootConflict {
        path: String,
        existing: String,
        incoming: String,
    },

    #[error("Destination '{path}' claimed by both a {existing} and a {incoming}")]
    DestinationConflict {
        path: String,
        existing: &'static str,
        incoming: &'static str,
    },

    // ========================================================================
    // Model Invariants
    // ========================================================================
    #[error("Malformed node at {location}: {reason}")]
    MalformedNode { location: String, reason: String },

    #[error("Invalid {kind} '{value}'")]
    InvalidIdentifier { kind: &'static str, value: String },

    #[error("Absolute paths not allowed: {path}")]
    AbsolutePathNotAllowed { path: String },

    #[error("Invalid path '{path}': {reason}")]
    InvalidPath { path: String, reason: String },

    #[error("Duplicate path in package: {path}")]
    DuplicatePath { path: String },

    #[error("Required field missing: {field}")]
    MissingRequiredField { field: &'static str },
}

impl DomainError {
    /// Build a validation error for a parameter.
    pub fn validation(parameter: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            parameter: parameter.into(),
            message: message.into(),
        }
    }

    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Validation { parameter, message } => vec![
                format!("Check the value given for '{}'", parameter),
                format!("Rule: {}", message),
            ],
            Self::MissingParameter { parameter } => vec![
                format!("Provide a value for '{}'", parameter),
                "Required parameters without a default must always be supplied".into(),
            ],
            Self::UnknownParameter {
                parameter,
                expected,
            } => vec![
                format!("'{}' is not a parameter of this snippet", parameter),
                format!("Expected one of: {}", expected.join(", ")),
            ],
            Self::ClassConflict {
                namespace,
                existing,
                incoming,
            } => vec![
                format!("Two snippets disagree on the parent of '{}'", namespace),
                format!("Make both extend '{}' or both extend '{}'", existing, incoming),
            ],
            Self::DocumentRootConflict { path, .. } => vec![
                format!("Every fragment written to '{}' must use the same root element", path),
            ],
            Self::DestinationConflict {
                path,
                existing,
                incoming,
            } => vec![
                format!("Only one artifact can be written to '{}'", path),
                format!("Move the {} or the {} to another path", incoming, existing),
            ],
            Self::MalformedNode { .. } => vec![
                "A node may carry text or children, never both".into(),
                "This usually means two fragments disagree on a node's shape".into(),
            ],
            _ => vec!["See documentation for more details".into()],
        }
    }

    /// Error category for display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Validation { .. }
            | Self::MissingParameter { .. }
            | Self::UnknownParameter { .. }
            | Self::InvalidIdentifier { .. }
            | Self::AbsolutePathNotAllowed { .. }
            | Self::InvalidPath { .. } => ErrorCategory::Validation,
            Self::ClassConflict { .. }
            | Self::DocumentRootConflict { .. }
            | Self::DestinationConflict { .. }
            | Self::DuplicatePath { .. } => ErrorCategory::Conflict,
            Self::InvalidPattern { .. }
            | Self::MalformedNode { .. }
            | Self::MissingRequiredField { .. } => ErrorCategory::Internal,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Conflict,
    Internal,
}
