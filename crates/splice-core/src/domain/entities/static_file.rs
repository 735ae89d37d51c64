use serde::Serialize;

use super::common::RelativePath;

/// A file copied into the package verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StaticFile {
    pub path: RelativePath,
    #[serde(skip_serializing)]
    pub body: String,
}

impl StaticFile {
    pub fn new(path: RelativePath, body: impl Into<String>) -> Self {
        Self {
            path,
            body: body.into(),
        }
    }
}
