//! Application services - orchestrate use cases.
//!
//! Services coordinate the domain layer and ports to accomplish
//! high-level use cases like "generate a package" or "describe a snippet".

pub mod generation_service;
pub mod snippet_service;

pub use generation_service::{GenerationOutcome, GenerationService, Invocation, RejectedInvocation};
pub use snippet_service::SnippetService;
