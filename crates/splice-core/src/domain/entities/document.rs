//! Hierarchical document intermediate representation.
//!
//! Nodes declare how they merge with siblings through [`MergeIdentity`].
//! Undeclared nodes are [`MergeIdentity::Unique`] and are always appended.

use serde::Serialize;
use std::collections::BTreeSet;

use super::common::RelativePath;

/// How a node recognises its counterpart among siblings of another fragment.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MergeIdentity {
    /// Never merged; every occurrence is kept.
    #[default]
    Unique,
    /// Any sibling with the same tag is the same node.
    Tag,
    /// Same tag and equal values under these attribute keys.
    Attributes(BTreeSet<String>),
}

/// A possibly absent child, so conditional nodes can be written inline.
#[derive(Debug, Clone, PartialEq)]
pub enum Slot {
    Present(DocumentNode),
    Absent,
}

impl From<DocumentNode> for Slot {
    fn from(node: DocumentNode) -> Self {
        Self::Present(node)
    }
}

impl From<Option<DocumentNode>> for Slot {
    fn from(node: Option<DocumentNode>) -> Self {
        node.map_or(Self::Absent, Self::Present)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentNode {
    tag: String,
    attributes: Vec<(String, String)>,
    text: Option<String>,
    children: Vec<DocumentNode>,
    identity: MergeIdentity,
}

impl DocumentNode {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attributes: Vec::new(),
            text: None,
            children: Vec::new(),
            identity: MergeIdentity::Unique,
        }
    }

    // ── Construction ─────────────────────────────────────────────────────────

    /// Set an attribute. Re-setting a key keeps its original position.
    pub fn attr(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.set_attribute(key, value.to_string());
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn child(mut self, slot: impl Into<Slot>) -> Self {
        if let Slot::Present(node) = slot.into() {
            self.children.push(node);
        }
        self
    }

    pub fn children<I, S>(mut self, slots: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Slot>,
    {
        for slot in slots {
            self = self.child(slot);
        }
        self
    }

    /// Merge with any sibling of the same tag.
    pub fn merge_by_tag(mut self) -> Self {
        self.identity = MergeIdentity::Tag;
        self
    }

    /// Merge with siblings of the same tag agreeing on `keys`.
    ///
    /// An empty key set declares no identity and leaves the node unique.
    pub fn merge_by<I, S>(self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.with_identity(MergeIdentity::Attributes(
            keys.into_iter().map(Into::into).collect(),
        ))
    }

    pub fn with_identity(mut self, identity: MergeIdentity) -> Self {
        self.identity = match identity {
            MergeIdentity::Attributes(keys) if keys.is_empty() => MergeIdentity::Unique,
            other => other,
        };
        self
    }

    // ── Mutation (merge engine) ──────────────────────────────────────────────

    /// Set an attribute, returning the previous value.
    pub fn set_attribute(&mut self, key: impl Into<String>, value: String) -> Option<String> {
        let key = key.into();
        match self.attributes.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => Some(std::mem::replace(existing, value)),
            None => {
                self.attributes.push((key, value));
                None
            }
        }
    }

    pub fn set_text(&mut self, text: Option<String>) {
        self.text = text;
    }

    pub(crate) fn child_nodes_mut(&mut self) -> &mut Vec<DocumentNode> {
        &mut self.children
    }

    /// Same tag and identity, without content.
    pub fn shell(&self) -> Self {
        Self {
            tag: self.tag.clone(),
            attributes: Vec::new(),
            text: None,
            children: Vec::new(),
            identity: self.identity.clone(),
        }
    }

    // ── Queries ──────────────────────────────────────────────────────────────

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn attributes(&self) -> &[(String, String)] {
        &self.attributes
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Text content; blank text counts as none.
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref().filter(|t| !t.trim().is_empty())
    }

    pub fn child_nodes(&self) -> &[DocumentNode] {
        &self.children
    }

    pub fn identity(&self) -> &MergeIdentity {
        &self.identity
    }

    /// `true` when the two nodes denote the same logical node.
    pub fn same_node(&self, other: &Self) -> bool {
        if self.tag != other.tag {
            return false;
        }
        match (&self.identity, &other.identity) {
            (MergeIdentity::Tag, MergeIdentity::Tag) => true,
            (MergeIdentity::Attributes(a), MergeIdentity::Attributes(b)) => {
                !a.is_empty()
                    && a == b
                    && a.iter().all(|k| self.attribute(k) == other.attribute(k))
            }
            _ => false,
        }
    }

    /// Attribute keys taking part in identity.
    pub(crate) fn is_identity_key(&self, key: &str) -> bool {
        matches!(&self.identity, MergeIdentity::Attributes(keys) if keys.contains(key))
    }

    /// Human-readable location segment, e.g. `add[id=Vendor_Module::top_level]`.
    pub fn location_segment(&self) -> String {
        match &self.identity {
            MergeIdentity::Attributes(keys) if !keys.is_empty() => {
                let parts: Vec<String> = keys
                    .iter()
                    .map(|k| format!("{}={}", k, self.attribute(k).unwrap_or("")))
                    .collect();
                format!("{}[{}]", self.tag, parts.join(","))
            }
            _ => self.tag.clone(),
        }
    }
}

/// A document root destined for one path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentFragment {
    pub path: RelativePath,
    pub root: DocumentNode,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_slots_are_dropped() {
        let top_level: Option<DocumentNode> = None;
        let menu = DocumentNode::new("menu")
            .merge_by_tag()
            .child(top_level)
            .child(DocumentNode::new("add").attr("id", "Vendor_Module::index_index"));

        assert_eq!(menu.child_nodes().len(), 1);
        assert_eq!(menu.child_nodes()[0].attribute("id"), Some("Vendor_Module::index_index"));
    }

    #[test]
    fn children_accepts_mixed_slots() {
        let node = DocumentNode::new("resources").children([
            Slot::Absent,
            DocumentNode::new("resource").into(),
            Slot::Absent,
        ]);
        assert_eq!(node.child_nodes().len(), 1);
    }

    #[test]
    fn resetting_attribute_keeps_position() {
        let node = DocumentNode::new("add")
            .attr("id", "a")
            .attr("title", "First")
            .attr("id", "b");
        assert_eq!(
            node.attributes(),
            &[("id".to_string(), "b".to_string()), ("title".to_string(), "First".to_string())]
        );
    }

    #[test]
    fn identity_matching() {
        let a = DocumentNode::new("route").merge_by(["id"]).attr("id", "x").attr("frontName", "x");
        let b = DocumentNode::new("route").merge_by(["id"]).attr("id", "x");
        let c = DocumentNode::new("route").merge_by(["id"]).attr("id", "y");
        let unique = DocumentNode::new("route").attr("id", "x");

        assert!(a.same_node(&b));
        assert!(!a.same_node(&c));
        assert!(!a.same_node(&unique));
        assert!(!unique.same_node(&unique.clone()));

        let t1 = DocumentNode::new("menu").merge_by_tag();
        let t2 = DocumentNode::new("menu").merge_by_tag().attr("extra", "1");
        assert!(t1.same_node(&t2));
        assert!(!t1.same_node(&DocumentNode::new("acl").merge_by_tag()));
    }

    #[test]
    fn identity_requires_same_key_set() {
        let a = DocumentNode::new("item").merge_by(["name"]).attr("name", "n");
        let b = DocumentNode::new("item").merge_by(["name", "type"]).attr("name", "n");
        assert!(!a.same_node(&b));
    }

    #[test]
    fn empty_key_set_is_unique() {
        let a = DocumentNode::new("item").merge_by(Vec::<String>::new()).attr("name", "n");
        assert_eq!(a.identity(), &MergeIdentity::Unique);
        assert!(!a.same_node(&a.clone()));

        let explicit = DocumentNode::new("item").with_identity(MergeIdentity::Attributes(BTreeSet::new()));
        assert_eq!(explicit.identity(), &MergeIdentity::Unique);
    }

    #[test]
    fn location_segment_names_identity() {
        let node = DocumentNode::new("add")
            .merge_by(["id"])
            .attr("id", "Vendor_Module::top_level");
        assert_eq!(node.location_segment(), "add[id=Vendor_Module::top_level]");
        assert_eq!(DocumentNode::new("menu").location_segment(), "menu");
    }

    #[test]
    fn blank_text_is_none() {
        assert_eq!(DocumentNode::new("label").with_text("  ").text(), None);
        assert_eq!(DocumentNode::new("label").with_text("Title").text(), Some("Title"));
    }
}
