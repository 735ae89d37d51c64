//! Application ports (traits) for external dependencies.
//!
//! Driven ports are called by the application and implemented in
//! `splice-adapters`:
//!
//! - `SnippetRegistry`: snippet storage and lookup
//! - `PackageRenderer`: merged build to package

pub mod output;

pub use output::{PackageRenderer, SnippetRegistry};

#[cfg(test)]
pub use output::{MockPackageRenderer, MockSnippetRegistry};
