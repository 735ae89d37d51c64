// ============================================================================
//  CLEAN MODULE BOUNDARIES
// ============================================================================

//! Core domain layer for Splice.
//!
//! Pure generation logic: parameters, the structural IR, the snippet
//! contract and the merge engine. No I/O, no rendering to text.
//!
//! ## Hexagonal Architecture Compliance
//!
//! - **No async**: domain logic is synchronous
//! - **No I/O**: rendering and loading happen behind ports
//! - **Immutable output**: fragments are frozen once committed to a session
//! - **Rich domain model**: merge behaviour lives on the entities it merges

pub mod entities;
pub mod error;
pub mod merge;
pub mod parameters;
pub mod session;
pub mod snippet;

mod validation;

pub use entities::{
    Attribute, AttributeChange, ClassModel, DocumentFragment, DocumentNode, GeneratedPackage,
    MergeIdentity, MethodBuilder, MethodModel, ModuleIdentity, PackageBuilder, PackageEntry,
    PackageFile, RelativePath, Slot, StaticFile, Visibility,
};

pub use error::{DomainError, ErrorCategory};

pub use merge::{ArtifactKind, Destination, MergeWarning, MergedBuild, Merger, WarningKind};

pub use parameters::{
    ParamKey, ParamValue, ParameterDescriptor, ParameterSet, ParameterSpec, PassParams, RawParams,
    RawValue, ResolvedParams, ValidationRule, parse_flag,
};

pub use session::BuildSession;

pub use snippet::{Contribution, DocContribution, DynSnippet, Snippet, SnippetInfo, SnippetMetadata};

pub use validation::DomainValidator;
