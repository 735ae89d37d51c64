//! Merge engine.
//!
//! Folds contributions into one class per namespace, one document per path
//! and one static file per path. The fold is a serial reduction owned by the
//! build session; nothing here is shared across threads.
//!
//! ## Rules
//!
//! | Target        | Key        | Collision                                                    |
//! |---------------|------------|--------------------------------------------------------------|
//! | class         | namespace  | attributes unioned, methods last-writer-wins, parents agree  |
//! | document root | path       | tags must agree, then merged like any node                  |
//! | document node | identity   | attributes and text last-writer-wins (warned), children recurse |
//! | static file   | path       | last-writer-wins, warned unless identical                    |
//!
//! Child order is the order in which each child first appeared.
//!
//! Classes, documents, static files and the summary share one path space.
//! A path claimed by one kind cannot be claimed by another.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use tracing::warn;
use uuid::Uuid;

use crate::domain::{
    entities::{
        Attribute, AttributeChange, ClassModel, DocumentFragment, DocumentNode, ModuleIdentity,
        RelativePath, StaticFile,
    },
    error::DomainError,
    snippet::{Contribution, DocContribution},
};

// ── Warnings ─────────────────────────────────────────────────────────────────

/// Where a merged artifact lands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum Destination {
    Class(String),
    Path(RelativePath),
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Class(namespace) => f.write_str(namespace),
            Self::Path(path) => write!(f, "{path}"),
        }
    }
}

/// A non-fatal inconsistency resolved by last-writer-wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MergeWarning {
    pub destination: Destination,
    /// Node path inside a document, or the member name inside a class.
    pub location: String,
    pub kind: WarningKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WarningKind {
    AttributeOverwritten {
        key: String,
        previous: String,
        current: String,
    },
    TextOverwritten {
        previous: String,
        current: String,
    },
    PropertyRedeclared {
        previous: String,
        current: String,
    },
    StaticFileOverwritten,
}

impl fmt::Display for MergeWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            WarningKind::AttributeOverwritten {
                key,
                previous,
                current,
            } => write!(
                f,
                "{} {}: attribute '{}' changed from '{}' to '{}'",
                self.destination, self.location, key, previous, current
            ),
            WarningKind::TextOverwritten { previous, current } => write!(
                f,
                "{} {}: text changed from '{}' to '{}'",
                self.destination, self.location, previous, current
            ),
            WarningKind::PropertyRedeclared { previous, current } => write!(
                f,
                "{} {}: '{}' replaced by '{}'",
                self.destination, self.location, previous, current
            ),
            WarningKind::StaticFileOverwritten => {
                write!(f, "{}: overwritten with different content", self.destination)
            }
        }
    }
}

// ── Result ───────────────────────────────────────────────────────────────────

/// Output of a finished build session, input to a renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct MergedBuild {
    module: ModuleIdentity,
    run_id: Uuid,
    classes: Vec<ClassModel>,
    documents: Vec<DocumentFragment>,
    static_files: Vec<StaticFile>,
    docs: Vec<DocContribution>,
    warnings: Vec<MergeWarning>,
}

impl MergedBuild {
    pub fn module(&self) -> &ModuleIdentity {
        &self.module
    }

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    /// Classes in first-declared order.
    pub fn classes(&self) -> &[ClassModel] {
        &self.classes
    }

    pub fn class(&self, namespace: &str) -> Option<&ClassModel> {
        self.classes.iter().find(|c| c.namespace() == namespace)
    }

    /// Documents in first-declared order.
    pub fn documents(&self) -> &[DocumentFragment] {
        &self.documents
    }

    pub fn document(&self, path: &str) -> Option<&DocumentNode> {
        self.documents
            .iter()
            .find(|d| d.path.as_str() == path)
            .map(|d| &d.root)
    }

    pub fn static_files(&self) -> &[StaticFile] {
        &self.static_files
    }

    /// Documentation in invocation order.
    pub fn docs(&self) -> &[DocContribution] {
        &self.docs
    }

    pub fn warnings(&self) -> &[MergeWarning] {
        &self.warnings
    }
}

// ── Engine ───────────────────────────────────────────────────────────────────

/// Kind of artifact holding a package path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    Class,
    Document,
    StaticFile,
    Summary,
}

impl ArtifactKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Class => "class",
            Self::Document => "document",
            Self::StaticFile => "static file",
            Self::Summary => "summary",
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Accumulating merge state.
#[derive(Debug, Default)]
pub struct Merger {
    classes: Vec<ClassModel>,
    documents: Vec<DocumentFragment>,
    static_files: Vec<StaticFile>,
    docs: Vec<DocContribution>,
    warnings: Vec<MergeWarning>,
    claims: BTreeMap<RelativePath, ArtifactKind>,
}

impl Merger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hold `path` for an artifact produced outside the merge, such as the
    /// rendered summary.
    ///
    /// # Errors
    ///
    /// `DestinationConflict` when another kind already holds the path.
    pub fn reserve(&mut self, path: RelativePath, kind: ArtifactKind) -> Result<(), DomainError> {
        self.claim(path, kind)
    }

    fn claim(&mut self, path: RelativePath, kind: ArtifactKind) -> Result<(), DomainError> {
        match self.claims.get(&path) {
            Some(existing) if *existing != kind => Err(DomainError::DestinationConflict {
                path: path.to_string(),
                existing: existing.as_str(),
                incoming: kind.as_str(),
            }),
            Some(_) => Ok(()),
            None => {
                self.claims.insert(path, kind);
                Ok(())
            }
        }
    }

    /// Fold one contribution.
    pub fn absorb(&mut self, contribution: Contribution) -> Result<(), DomainError> {
        let (classes, documents, static_files, docs) = contribution.into_parts();
        for class in classes {
            self.add_class(class)?;
        }
        for fragment in documents {
            self.add_document(fragment)?;
        }
        for file in static_files {
            self.add_static_file(file)?;
        }
        self.docs.extend(docs);
        Ok(())
    }

    /// # Errors
    ///
    /// - `ClassConflict` when both sides name different, non-empty parents
    /// - `DestinationConflict` when the class file path is held by another kind
    pub fn add_class(&mut self, class: ClassModel) -> Result<(), DomainError> {
        match self
            .classes
            .iter_mut()
            .find(|c| c.namespace() == class.namespace())
        {
            Some(existing) => merge_class(existing, class, &mut self.warnings),
            None => {
                self.claim(class.file_path()?, ArtifactKind::Class)?;
                self.classes.push(class);
                Ok(())
            }
        }
    }

    /// # Errors
    ///
    /// - `DocumentRootConflict` when the path already holds a different root tag
    /// - `DestinationConflict` when the path is held by another kind
    pub fn add_document(&mut self, fragment: DocumentFragment) -> Result<(), DomainError> {
        let DocumentFragment { path, root } = fragment;
        let destination = Destination::Path(path.clone());
        let location = root.location_segment();
        self.claim(path.clone(), ArtifactKind::Document)?;

        match self.documents.iter_mut().find(|d| d.path == path) {
            Some(existing) => {
                if existing.root.tag() != root.tag() {
                    return Err(DomainError::DocumentRootConflict {
                        path: path.to_string(),
                        existing: existing.root.tag().to_string(),
                        incoming: root.tag().to_string(),
                    });
                }
                merge_node(&mut existing.root, root, &location, &destination, &mut self.warnings);
            }
            None => {
                let mut shell = root.shell();
                merge_node(&mut shell, root, &location, &destination, &mut self.warnings);
                self.documents.push(DocumentFragment { path, root: shell });
            }
        }
        Ok(())
    }

    /// # Errors
    ///
    /// `DestinationConflict` when the path is held by another kind.
    pub fn add_static_file(&mut self, file: StaticFile) -> Result<(), DomainError> {
        self.claim(file.path.clone(), ArtifactKind::StaticFile)?;
        match self.static_files.iter_mut().find(|f| f.path == file.path) {
            Some(existing) => {
                if existing.body != file.body {
                    record(
                        &mut self.warnings,
                        MergeWarning {
                            destination: Destination::Path(file.path.clone()),
                            location: file.path.file_name().to_string(),
                            kind: WarningKind::StaticFileOverwritten,
                        },
                    );
                }
                *existing = file;
            }
            None => self.static_files.push(file),
        }
        Ok(())
    }

    pub fn documents(&self) -> &[DocumentFragment] {
        &self.documents
    }

    pub fn warnings(&self) -> &[MergeWarning] {
        &self.warnings
    }

    pub fn finish(self, module: ModuleIdentity, run_id: Uuid) -> MergedBuild {
        MergedBuild {
            module,
            run_id,
            classes: self.classes,
            documents: self.documents,
            static_files: self.static_files,
            docs: self.docs,
            warnings: self.warnings,
        }
    }
}

fn record(warnings: &mut Vec<MergeWarning>, warning: MergeWarning) {
    warn!(destination = %warning.destination, location = %warning.location, "{}", warning);
    warnings.push(warning);
}

// ── Classes ──────────────────────────────────────────────────────────────────

fn merge_class(
    target: &mut ClassModel,
    incoming: ClassModel,
    warnings: &mut Vec<MergeWarning>,
) -> Result<(), DomainError> {
    if let (Some(existing), Some(other)) = (target.parent(), incoming.parent()) {
        if existing != other {
            return Err(DomainError::ClassConflict {
                namespace: target.namespace().to_string(),
                existing: existing.to_string(),
                incoming: other.to_string(),
            });
        }
    }
    if target.parent().is_none() {
        target.set_parent(incoming.parent().map(str::to_string));
    }

    if !contains_block(target.doc(), incoming.doc()) {
        for line in incoming.doc() {
            target.add_doc_line(line.clone());
        }
    }

    for attribute in incoming.attributes() {
        if let AttributeChange::Replaced(previous) = target.add_attribute(attribute.clone()) {
            record(
                warnings,
                MergeWarning {
                    destination: Destination::Class(target.namespace().to_string()),
                    location: previous_name(&previous),
                    kind: WarningKind::PropertyRedeclared {
                        previous: previous.declaration(),
                        current: attribute.declaration(),
                    },
                },
            );
        }
    }

    for method in incoming.methods() {
        target.add_method(method.clone());
    }
    Ok(())
}

fn previous_name(attribute: &Attribute) -> String {
    match attribute {
        Attribute::Property { name, .. } => format!("${name}"),
        Attribute::Raw(text) => text.clone(),
    }
}

/// `true` when `block` appears contiguously in `lines`.
fn contains_block(lines: &[String], block: &[String]) -> bool {
    block.is_empty() || lines.windows(block.len()).any(|w| w == block)
}

// ── Documents ────────────────────────────────────────────────────────────────

fn merge_node(
    target: &mut DocumentNode,
    incoming: DocumentNode,
    location: &str,
    destination: &Destination,
    warnings: &mut Vec<MergeWarning>,
) {
    for (key, value) in incoming.attributes() {
        if let Some(previous) = target.set_attribute(key.clone(), value.clone()) {
            if previous != *value && !target.is_identity_key(key) {
                record(
                    warnings,
                    MergeWarning {
                        destination: destination.clone(),
                        location: location.to_string(),
                        kind: WarningKind::AttributeOverwritten {
                            key: key.clone(),
                            previous,
                            current: value.clone(),
                        },
                    },
                );
            }
        }
    }

    if let Some(text) = incoming.text() {
        if let Some(previous) = target.text().filter(|p| *p != text) {
            record(
                warnings,
                MergeWarning {
                    destination: destination.clone(),
                    location: location.to_string(),
                    kind: WarningKind::TextOverwritten {
                        previous: previous.to_string(),
                        current: text.to_string(),
                    },
                },
            );
        }
        target.set_text(Some(text.to_string()));
    }

    for child in incoming.child_nodes() {
        let child_location = format!("{}/{}", location, child.location_segment());
        let siblings = target.child_nodes_mut();
        match siblings.iter_mut().find(|s| s.same_node(child)) {
            Some(existing) => {
                merge_node(existing, child.clone(), &child_location, destination, warnings);
            }
            None => {
                let mut shell = child.shell();
                merge_node(&mut shell, child.clone(), &child_location, destination, warnings);
                siblings.push(shell);
            }
        }
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    // -- Strategy helpers --

    /// Fragments as lists of menu entry numbers, plus a shuffled copy.
    fn arb_fragment_orders() -> impl Strategy<Value = (Vec<Vec<u8>>, Vec<Vec<u8>>)> {
        prop::collection::vec(prop::collection::vec(0u8..6, 0..5), 1..6)
            .prop_flat_map(|frags| (Just(frags.clone()), Just(frags).prop_shuffle()))
    }

    fn entry(i: u8) -> DocumentNode {
        let note = (i % 2 == 0).then(|| DocumentNode::new("note").with_text(format!("note {i}")));
        DocumentNode::new("add")
            .merge_by(["id"])
            .attr("id", format!("Vendor_Module::item_{i}"))
            .attr("title", format!("Item {i}"))
            .child(note)
    }

    fn menu_fragment(ids: &[u8]) -> DocumentFragment {
        DocumentFragment {
            path: RelativePath::try_new("etc/adminhtml/menu.xml").unwrap(),
            root: DocumentNode::new("config").child(
                DocumentNode::new("menu")
                    .merge_by_tag()
                    .children(ids.iter().map(|&i| entry(i))),
            ),
        }
    }

    fn merge_all(frags: &[Vec<u8>]) -> DocumentNode {
        let mut merger = Merger::new();
        for ids in frags {
            merger.add_document(menu_fragment(ids)).unwrap();
        }
        merger.documents()[0].root.clone()
    }

    /// Order-insensitive rendering of a tree.
    fn canonical(node: &DocumentNode) -> String {
        let mut attrs: Vec<String> = node
            .attributes()
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect();
        attrs.sort();
        let mut kids: Vec<String> = node.child_nodes().iter().map(canonical).collect();
        kids.sort();
        format!(
            "<{} {} {:?}>[{}]",
            node.tag(),
            attrs.join(" "),
            node.text(),
            kids.join(",")
        )
    }

    proptest! {
        #[test]
        fn merge_is_order_independent((frags, shuffled) in arb_fragment_orders()) {
            let a = merge_all(&frags);
            let b = merge_all(&shuffled);
            prop_assert_eq!(canonical(&a), canonical(&b));
        }

        #[test]
        fn merging_twice_adds_nothing_for_identified_nodes(ids in prop::collection::vec(1u8..6, 0..6)) {
            // Odd-numbered entries carry no unique children.
            let ids: Vec<u8> = ids.into_iter().map(|i| i | 1).collect();
            let once = merge_all(&[ids.clone()]);
            let twice = merge_all(&[ids.clone(), ids]);
            prop_assert_eq!(once, twice);
        }
    }
}
