//! Driven (output) ports - implemented by infrastructure.

use std::sync::Arc;

use crate::domain::{DynSnippet, GeneratedPackage, MergedBuild, RelativePath};
use crate::error::SpliceResult;

/// Port for snippet storage and retrieval.
///
/// Implemented by:
/// - `splice_adapters::snippet_registry::InMemoryRegistry`
#[cfg_attr(test, mockall::automock)]
pub trait SnippetRegistry: Send + Sync {
    /// Get a snippet by registry key.
    fn get(&self, name: &str) -> SpliceResult<Arc<dyn DynSnippet>>;

    /// All snippets, ordered by name.
    fn list(&self) -> SpliceResult<Vec<Arc<dyn DynSnippet>>>;

    /// Register a snippet; fails if the name is taken.
    fn insert(&self, snippet: Arc<dyn DynSnippet>) -> SpliceResult<()>;

    /// Remove a snippet.
    fn remove(&self, name: &str) -> SpliceResult<()>;
}

/// Port for rendering a merged build into files.
///
/// Implemented by:
/// - `splice_adapters::renderer::StandardRenderer` (PHP, XML, Markdown)
#[cfg_attr(test, mockall::automock)]
pub trait PackageRenderer: Send + Sync {
    /// Where the summary file will be written; merged artifacts may not use it.
    fn summary_path(&self) -> SpliceResult<RelativePath>;

    fn render(&self, build: &MergedBuild) -> SpliceResult<GeneratedPackage>;
}
