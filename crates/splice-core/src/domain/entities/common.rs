use super::DomainError;
use serde::Serialize;
use std::fmt;
use std::path::Path;

/// A package path guaranteed to be relative and to stay inside the package.
///
/// Invariant: never absolute, never empty, no `..` segments. Segments are
/// always joined with `/` so rendered output does not depend on the host.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct RelativePath(String);

impl RelativePath {
    /// Fallible constructor.
    pub fn try_new(path: impl AsRef<str>) -> Result<Self, DomainError> {
        let raw = path.as_ref().trim();
        if raw.is_empty() {
            return Err(DomainError::InvalidPath {
                path: raw.to_string(),
                reason: "path is empty".into(),
            });
        }
        if raw.starts_with('/') || raw.starts_with('\\') || Path::new(raw).is_absolute() {
            return Err(DomainError::AbsolutePathNotAllowed {
                path: raw.to_string(),
            });
        }

        let mut segments = Vec::new();
        for segment in raw.split(['/', '\\']) {
            match segment {
                "" | "." => continue,
                ".." => {
                    return Err(DomainError::InvalidPath {
                        path: raw.to_string(),
                        reason: "parent directory segments are not allowed".into(),
                    });
                }
                s => segments.push(s),
            }
        }
        if segments.is_empty() {
            return Err(DomainError::InvalidPath {
                path: raw.to_string(),
                reason: "path has no segments".into(),
            });
        }

        Ok(Self(segments.join("/")))
    }

    /// Join a segment, maintaining the relative invariant.
    pub fn join(&self, segment: impl AsRef<str>) -> Result<Self, DomainError> {
        Self::try_new(format!("{}/{}", self.0, segment.as_ref()))
    }

    /// Parent directory, `None` for a top-level entry.
    pub fn parent(&self) -> Option<Self> {
        self.0
            .rsplit_once('/')
            .map(|(parent, _)| Self(parent.to_string()))
    }

    /// Final segment.
    pub fn file_name(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or(&self.0)
    }

    pub fn as_path(&self) -> &Path {
        Path::new(&self.0)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<Path> for RelativePath {
    fn as_ref(&self) -> &Path {
        self.as_path()
    }
}

impl TryFrom<&str> for RelativePath {
    type Error = DomainError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Self::try_new(s)
    }
}

impl fmt::Display for RelativePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// `true` for a PHP-style identifier: a letter or underscore, then letters,
/// digits or underscores.
pub fn is_identifier(value: &str) -> bool {
    let mut chars = value.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// `true` for a backslash-separated sequence of identifiers.
pub fn is_namespace(value: &str) -> bool {
    !value.is_empty() && value.split('\\').all(is_identifier)
}
