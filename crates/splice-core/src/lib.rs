//! Splice Core - Hexagonal Architecture Implementation
//!
//! This crate provides the domain and application layers of the Splice
//! fragment-merging scaffolding engine.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │        callers (CLI, web front end)     │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Application Services            │
//! │  (GenerationService, SnippetService)    │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │      Application Ports (Traits)         │
//! │   (SnippetRegistry, PackageRenderer)    │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │     splice-adapters (Infrastructure)    │
//! │  (InMemoryRegistry, StandardRenderer)   │
//! └─────────────────────────────────────────┘
//!                    │
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Domain Layer (Pure Logic)       │
//! │ (Parameters, ClassModel, DocumentNode,  │
//! │   Merger, BuildSession, Snippet)        │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use splice_core::prelude::*;
//!
//! let module = ModuleIdentity::new("Mage2gen", "Shop")?;
//! let service = GenerationService::new(registry, renderer);
//! let package = service.generate(
//!     module,
//!     &[Invocation::new("controller", RawParams::new().with("section", "orders"))],
//! )?;
//! ```

pub mod domain;

pub mod application;

pub mod error;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{
        GenerationOutcome, GenerationService, Invocation, SnippetService,
        ports::{PackageRenderer, SnippetRegistry},
    };
    pub use crate::domain::{
        Attribute, ClassModel, Contribution, DocContribution, DocumentNode, DynSnippet,
        GeneratedPackage, MergedBuild, MethodModel, ModuleIdentity, ParamKey, ParameterSet,
        ParameterSpec, PassParams, RawParams, Slot, Snippet, SnippetMetadata, Visibility,
    };
    pub use crate::error::{SpliceError, SpliceResult};
}

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
