//! Rendering configuration.
//!
//! [`RenderConfig`] is loaded once and handed to the renderer by value. The
//! core crate never sees it.
//!
//! # Resolution order (highest priority first)
//!
//! 1. Environment variables, `SPLICE__INDENT=4`
//! 2. Config file, when one is given and exists
//! 3. Built-in defaults
//!
//! ```toml
//! indent = 4                # or "tab"
//! xml_declaration = '<?xml version="1.0" ?>'
//! summary_file = "README.md"
//! php_strict_types = false
//! ```

use std::{fmt, path::Path};

use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use splice_core::error::{SpliceError, SpliceResult};

/// Indentation unit used by the PHP and XML writers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Indent {
    #[default]
    Tab,
    Spaces(u8),
}

impl Indent {
    pub fn unit(self) -> String {
        match self {
            Self::Tab => "\t".to_string(),
            Self::Spaces(n) => " ".repeat(usize::from(n)),
        }
    }
}

impl fmt::Display for Indent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tab => f.write_str("tab"),
            Self::Spaces(n) => write!(f, "{n}"),
        }
    }
}

impl Serialize for Indent {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Tab => serializer.serialize_str("tab"),
            Self::Spaces(n) => serializer.serialize_u8(*n),
        }
    }
}

impl<'de> Deserialize<'de> for Indent {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        // Environment values always arrive as strings.
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Width(u8),
            Word(String),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Width(n) => Ok(Self::Spaces(n)),
            Repr::Word(word) => parse_indent(&word).map_err(serde::de::Error::custom),
        }
    }
}

fn parse_indent(word: &str) -> Result<Indent, String> {
    let word = word.trim();
    if word.eq_ignore_ascii_case("tab") {
        return Ok(Indent::Tab);
    }
    word.parse::<u8>()
        .map(Indent::Spaces)
        .map_err(|_| format!("invalid indent '{word}': expected \"tab\" or a number of spaces"))
}

/// Renderer settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub indent: Indent,
    /// First line of every XML document. Empty to omit.
    pub xml_declaration: String,
    /// Summary file name, relative to the package root.
    pub summary_file: String,
    /// Emit `declare(strict_types=1);` in class files.
    pub php_strict_types: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            indent: Indent::Tab,
            xml_declaration: r#"<?xml version="1.0" ?>"#.to_string(),
            summary_file: "README.md".to_string(),
            php_strict_types: false,
        }
    }
}

impl RenderConfig {
    /// Load configuration, starting from defaults.
    ///
    /// A missing file is not an error; a malformed one is.
    pub fn load(config_file: Option<&Path>) -> SpliceResult<Self> {
        let mut builder = Config::builder();

        if let Some(path) = config_file {
            builder = builder.add_source(
                File::from(path)
                    .format(FileFormat::Toml)
                    .required(false),
            );
        }

        builder = builder.add_source(
            Environment::with_prefix("SPLICE")
                .prefix_separator("__")
                .separator("__"),
        );

        let config = builder.build().map_err(configuration)?;
        config.try_deserialize().map_err(configuration)
    }

    /// Parse configuration from TOML text, filling gaps with defaults.
    pub fn from_toml_str(text: &str) -> SpliceResult<Self> {
        toml::from_str(text).map_err(configuration)
    }
}

fn configuration(e: impl fmt::Display) -> SpliceError {
    SpliceError::Configuration {
        message: e.to_string(),
    }
}
