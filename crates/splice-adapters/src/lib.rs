//! Infrastructure adapters for Splice.
//!
//! This crate implements the ports defined in `splice-core::application::ports`
//! and owns everything that touches the outside world: rendering to text,
//! reading configuration and run manifests, installing a log subscriber.

pub mod config;
pub mod logging;
pub mod manifest;
pub mod renderer;
pub mod snippet_registry;

// Re-export commonly used adapters
pub use self::config::{Indent, RenderConfig};
pub use manifest::RunManifest;
pub use renderer::StandardRenderer;
pub use snippet_registry::InMemoryRegistry;
