//! Run manifests.
//!
//! A run manifest names the module and lists the snippet invocations to
//! apply, in order:
//!
//! ```toml
//! [module]
//! vendor = "Mage2gen"
//! name   = "Shop"
//!
//! [[invocations]]
//! snippet = "controller"
//!
//! [invocations.params]
//! frontname = "shop"
//! section   = ["index", "cart"]
//! adminhtml = false
//!
//! [[invocations]]
//! snippet = "payment"
//! params  = { method_name = "Invoice" }
//! ```

use std::{fs, path::Path};

use serde::{Deserialize, Serialize};
use splice_core::{
    application::{ApplicationError, Invocation},
    domain::ModuleIdentity,
    error::SpliceResult,
};
use tracing::debug;

// ── Manifest sections ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleSection {
    pub vendor: String,
    pub name: String,
}

/// Parsed run manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunManifest {
    pub module: ModuleSection,
    #[serde(default)]
    pub invocations: Vec<Invocation>,
}

impl RunManifest {
    /// Parse manifest text. `source_name` labels errors.
    pub fn from_toml_str(text: &str, source_name: &str) -> SpliceResult<Self> {
        toml::from_str(text).map_err(|e| {
            ApplicationError::ManifestError {
                source_name: source_name.to_string(),
                reason: e.to_string(),
            }
            .into()
        })
    }

    /// Read and parse a manifest file.
    pub fn load(path: &Path) -> SpliceResult<Self> {
        let source_name = path.display().to_string();
        let text = fs::read_to_string(path).map_err(|e| ApplicationError::ManifestError {
            source_name: source_name.clone(),
            reason: format!("cannot read file: {e}"),
        })?;

        let manifest = Self::from_toml_str(&text, &source_name)?;
        debug!(
            path = %source_name,
            invocations = manifest.invocations.len(),
            "Loaded run manifest"
        );
        Ok(manifest)
    }

    /// Validate the module identity and hand out the invocations.
    pub fn into_parts(self) -> SpliceResult<(ModuleIdentity, Vec<Invocation>)> {
        let module = ModuleIdentity::new(self.module.vendor, self.module.name)?;
        Ok((module, self.invocations))
    }
}
