//! Application layer for Splice.
//!
//! This layer contains:
//! - **Services**: use case orchestration (GenerationService, SnippetService)
//! - **Ports**: interface definitions (traits) for external dependencies
//! - **Errors**: application-specific error types
//!
//! The application layer coordinates the domain layer but contains no
//! generation logic itself. All merge rules live in `crate::domain`.

pub mod error;
pub mod ports;
pub mod services;

pub use services::{GenerationOutcome, GenerationService, Invocation, RejectedInvocation, SnippetService};

pub use ports::{PackageRenderer, SnippetRegistry};

pub use error::ApplicationError;
