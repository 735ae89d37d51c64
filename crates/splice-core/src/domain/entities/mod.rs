pub mod class;
pub mod common;
pub mod document;
pub mod module;
pub mod package;
pub mod static_file;

pub use crate::domain::DomainError;
pub use class::{Attribute, AttributeChange, ClassModel, MethodBuilder, MethodModel, Visibility};
pub use common::RelativePath;
pub use document::{DocumentFragment, DocumentNode, MergeIdentity, Slot};
pub use module::ModuleIdentity;
pub use package::{GeneratedPackage, PackageBuilder, PackageEntry, PackageFile};
pub use static_file::StaticFile;
