use serde::{Deserialize, Serialize};
use std::fmt;

use super::common::is_identifier;
use crate::domain::error::DomainError;

/// Vendor and module name of the package being generated.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ModuleIdentity {
    vendor: String,
    name: String,
}

impl ModuleIdentity {
    /// Both parts must be identifiers.
    pub fn new(vendor: impl Into<String>, name: impl Into<String>) -> Result<Self, DomainError> {
        let vendor = vendor.into().trim().to_string();
        let name = name.into().trim().to_string();

        for (kind, value) in [("vendor", &vendor), ("module name", &name)] {
            if !is_identifier(value) {
                return Err(DomainError::InvalidIdentifier {
                    kind,
                    value: value.clone(),
                });
            }
        }

        Ok(Self { vendor, name })
    }

    pub fn vendor(&self) -> &str {
        &self.vendor
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// `Vendor_Module`, also the package root directory.
    pub fn module_name(&self) -> String {
        format!("{}_{}", self.vendor, self.name)
    }

    /// `Vendor\Module`.
    pub fn namespace(&self) -> String {
        format!("{}\\{}", self.vendor, self.name)
    }

    /// Prefix a module-relative namespace with `Vendor\Module`.
    pub fn qualify(&self, relative: &str) -> String {
        let relative = relative.trim_matches('\\');
        if relative.is_empty() {
            self.namespace()
        } else {
            format!("{}\\{}", self.namespace(), relative)
        }
    }

    /// Lowercase `vendor_module`, the usual default route frontname.
    pub fn snake_name(&self) -> String {
        self.module_name().to_lowercase()
    }
}

impl fmt::Display for ModuleIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.module_name())
    }
}
