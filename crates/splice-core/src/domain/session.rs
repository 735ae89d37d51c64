//! Build session: the fragment accumulator of one generation run.

use tracing::{debug, info};
use uuid::Uuid;

use crate::domain::{
    entities::{ModuleIdentity, RelativePath},
    error::DomainError,
    merge::{ArtifactKind, MergedBuild, Merger},
    snippet::Contribution,
};

/// Owned by the orchestrator for exactly one run.
///
/// Contributions are committed whole, one invocation at a time, and only
/// merged when the session finishes.
#[derive(Debug)]
pub struct BuildSession {
    module: ModuleIdentity,
    run_id: Uuid,
    committed: Vec<Contribution>,
    reserved: Vec<(RelativePath, ArtifactKind)>,
    invocations: usize,
}

impl BuildSession {
    pub fn new(module: ModuleIdentity) -> Self {
        Self::with_run_id(module, Uuid::new_v4())
    }

    pub fn with_run_id(module: ModuleIdentity, run_id: Uuid) -> Self {
        Self {
            module,
            run_id,
            committed: Vec::new(),
            reserved: Vec::new(),
            invocations: 0,
        }
    }

    pub fn module(&self) -> &ModuleIdentity {
        &self.module
    }

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    /// Commit everything one invocation produced.
    pub fn commit(&mut self, contributions: Vec<Contribution>) {
        self.invocations += 1;
        debug!(
            run_id = %self.run_id,
            invocation = self.invocations,
            passes = contributions.len(),
            "committing invocation"
        );
        self.committed.extend(contributions);
    }

    /// Keep `path` free of merged artifacts.
    pub fn reserve(&mut self, path: RelativePath, kind: ArtifactKind) {
        self.reserved.push((path, kind));
    }

    /// Invocations committed so far.
    pub fn invocation_count(&self) -> usize {
        self.invocations
    }

    pub fn contribution_count(&self) -> usize {
        self.committed.len()
    }

    /// Merge every committed contribution in commit order.
    ///
    /// # Errors
    ///
    /// `ClassConflict`, `DocumentRootConflict` or `DestinationConflict`; all
    /// abort the run.
    pub fn finish(self) -> Result<MergedBuild, DomainError> {
        let mut merger = Merger::new();
        for (path, kind) in self.reserved {
            merger.reserve(path, kind)?;
        }
        for contribution in self.committed {
            merger.absorb(contribution)?;
        }

        let merged = merger.finish(self.module, self.run_id);
        info!(
            run_id = %merged.run_id(),
            classes = merged.classes().len(),
            documents = merged.documents().len(),
            static_files = merged.static_files().len(),
            warnings = merged.warnings().len(),
            "merge complete"
        );
        Ok(merged)
    }
}
