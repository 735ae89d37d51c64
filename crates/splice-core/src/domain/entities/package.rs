use serde::Serialize;
use std::collections::HashSet;
use uuid::Uuid;

use super::common::RelativePath;
use crate::domain::{error::DomainError, merge::MergeWarning};

/// Final package ready for materialization.
///
/// This is the output of the rendering process. It contains no business
/// logic, only data, and can only be produced through [`PackageBuilder`].
#[derive(Debug, Clone, Serialize)]
pub struct GeneratedPackage {
    root: String,
    entries: Vec<PackageEntry>,
    summary: Option<RelativePath>,
    warnings: Vec<MergeWarning>,
    run_id: Uuid,
}

impl GeneratedPackage {
    /// Root directory name, `Vendor_Module`.
    pub fn root(&self) -> &str {
        &self.root
    }

    pub fn entries(&self) -> &[PackageEntry] {
        &self.entries
    }

    pub fn files(&self) -> impl Iterator<Item = &PackageFile> {
        self.entries.iter().filter_map(|e| match e {
            PackageEntry::File(f) => Some(f),
            PackageEntry::Directory { .. } => None,
        })
    }

    pub fn directories(&self) -> impl Iterator<Item = &RelativePath> {
        self.entries.iter().filter_map(|e| match e {
            PackageEntry::Directory { path } => Some(path),
            PackageEntry::File(_) => None,
        })
    }

    pub fn file(&self, path: &str) -> Option<&PackageFile> {
        self.files().find(|f| f.path.as_str() == path)
    }

    pub fn summary_path(&self) -> Option<&RelativePath> {
        self.summary.as_ref()
    }

    pub fn warnings(&self) -> &[MergeWarning] {
        &self.warnings
    }

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum PackageEntry {
    Directory { path: RelativePath },
    File(PackageFile),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackageFile {
    pub path: RelativePath,
    #[serde(skip_serializing)]
    pub content: String,
    pub bytes: usize,
}

impl PackageFile {
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

/// Assembles a [`GeneratedPackage`]. Used by renderers.
#[derive(Debug)]
pub struct PackageBuilder {
    root: String,
    files: Vec<PackageFile>,
    summary: Option<RelativePath>,
    warnings: Vec<MergeWarning>,
    run_id: Uuid,
}

impl PackageBuilder {
    pub fn new(root: impl Into<String>, run_id: Uuid) -> Self {
        Self {
            root: root.into(),
            files: Vec::new(),
            summary: None,
            warnings: Vec::new(),
            run_id,
        }
    }

    pub fn add_file(&mut self, path: RelativePath, content: String) -> &mut Self {
        self.files.push(PackageFile {
            bytes: content.len(),
            path,
            content,
        });
        self
    }

    /// Add the documentation file and remember its path.
    pub fn add_summary(&mut self, path: RelativePath, content: String) -> &mut Self {
        self.summary = Some(path.clone());
        self.add_file(path, content)
    }

    pub fn add_warnings(&mut self, warnings: impl IntoIterator<Item = MergeWarning>) -> &mut Self {
        self.warnings.extend(warnings);
        self
    }

    /// Validate and freeze the package.
    ///
    /// Directories are derived from file parents in first-appearance order,
    /// each listed before the first file it contains.
    pub fn finish(self) -> Result<GeneratedPackage, DomainError> {
        let root = RelativePath::try_new(&self.root)?;
        if root.parent().is_some() {
            return Err(DomainError::InvalidPath {
                path: self.root,
                reason: "package root must be a single directory name".into(),
            });
        }
        if self.files.is_empty() {
            return Err(DomainError::MissingRequiredField { field: "files" });
        }

        let file_paths: HashSet<RelativePath> = self.files.iter().map(|f| f.path.clone()).collect();
        let mut seen_files = HashSet::new();
        let mut seen_dirs = HashSet::new();
        let mut entries = Vec::new();

        for file in self.files {
            if !seen_files.insert(file.path.clone()) {
                return Err(DomainError::DuplicatePath {
                    path: file.path.to_string(),
                });
            }

            let mut ancestors = Vec::new();
            let mut current = file.path.parent();
            while let Some(dir) = current {
                current = dir.parent();
                ancestors.push(dir);
            }
            for dir in ancestors.into_iter().rev() {
                if file_paths.contains(&dir) {
                    return Err(DomainError::DuplicatePath {
                        path: dir.to_string(),
                    });
                }
                if seen_dirs.insert(dir.clone()) {
                    entries.push(PackageEntry::Directory { path: dir });
                }
            }

            entries.push(PackageEntry::File(file));
        }

        Ok(GeneratedPackage {
            root: root.to_string(),
            entries,
            summary: self.summary,
            warnings: self.warnings,
            run_id: self.run_id,
        })
    }
}
