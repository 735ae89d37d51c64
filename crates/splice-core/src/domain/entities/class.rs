//! Class intermediate representation.
//!
//! A [`ClassModel`] is keyed by its module-relative namespace
//! (`Controller\Adminhtml\Index\Index`). Several snippets may contribute to
//! the same class; the merge engine folds them together using the same
//! `add_*` operations exposed here.

use serde::Serialize;
use std::fmt;

use super::common::{RelativePath, is_identifier};
use crate::domain::error::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    #[default]
    Public,
    Protected,
    Private,
}

impl Visibility {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Protected => "protected",
            Self::Private => "private",
        }
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Attributes ───────────────────────────────────────────────────────────────

/// A class-level declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Attribute {
    /// Literal declaration text, deduplicated by exact text.
    Raw(String),
    /// Structured property, deduplicated by name.
    Property {
        visibility: Visibility,
        name: String,
        default: Option<String>,
        is_static: bool,
    },
}

impl Attribute {
    pub fn raw(text: impl Into<String>) -> Self {
        Self::Raw(text.into().trim().to_string())
    }

    /// `protected $name;`, refine with [`Self::with_default`].
    pub fn property(visibility: Visibility, name: impl Into<String>) -> Self {
        Self::Property {
            visibility,
            name: name.into().trim_start_matches('$').to_string(),
            default: None,
            is_static: false,
        }
    }

    /// Set the default expression of a property. No effect on raw text.
    pub fn with_default(self, value: impl Into<String>) -> Self {
        match self {
            Self::Property {
                visibility,
                name,
                is_static,
                ..
            } => Self::Property {
                visibility,
                name,
                default: Some(value.into()),
                is_static,
            },
            raw => raw,
        }
    }

    pub fn into_static(self) -> Self {
        match self {
            Self::Property {
                visibility,
                name,
                default,
                ..
            } => Self::Property {
                visibility,
                name,
                default,
                is_static: true,
            },
            raw => raw,
        }
    }

    /// Declaration as it appears in the class body.
    pub fn declaration(&self) -> String {
        match self {
            Self::Raw(text) => text.clone(),
            Self::Property {
                visibility,
                name,
                default,
                is_static,
            } => {
                let modifier = if *is_static { " static" } else { "" };
                match default {
                    Some(value) => format!("{visibility}{modifier} ${name} = {value};"),
                    None => format!("{visibility}{modifier} ${name};"),
                }
            }
        }
    }

    fn same_slot(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Raw(a), Self::Raw(b)) => a == b,
            (Self::Property { name: a, .. }, Self::Property { name: b, .. }) => a == b,
            _ => false,
        }
    }
}

impl From<&str> for Attribute {
    fn from(text: &str) -> Self {
        Self::raw(text)
    }
}

impl From<String> for Attribute {
    fn from(text: String) -> Self {
        Self::raw(text)
    }
}

/// Result of [`ClassModel::add_attribute`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeChange {
    Added,
    Unchanged,
    /// A property of the same name was replaced; holds the previous one.
    Replaced(Attribute),
}

// ── Methods ──────────────────────────────────────────────────────────────────

/// A method definition. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MethodModel {
    name: String,
    params: Vec<String>,
    body: String,
    doc: Vec<String>,
    visibility: Visibility,
    is_static: bool,
}

impl MethodModel {
    pub fn builder(name: impl Into<String>) -> MethodBuilder {
        MethodBuilder {
            name: name.into(),
            params: Vec::new(),
            body: String::new(),
            doc: Vec::new(),
            visibility: Visibility::Public,
            is_static: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn params(&self) -> &[String] {
        &self.params
    }

    /// Dedented body without leading or trailing blank lines.
    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn doc(&self) -> &[String] {
        &self.doc
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    pub fn is_static(&self) -> bool {
        self.is_static
    }
}

#[derive(Debug, Clone)]
pub struct MethodBuilder {
    name: String,
    params: Vec<String>,
    body: String,
    doc: Vec<String>,
    visibility: Visibility,
    is_static: bool,
}

impl MethodBuilder {
    pub fn param(mut self, signature: impl Into<String>) -> Self {
        self.params.push(signature.into().trim().to_string());
        self
    }

    pub fn params<I, S>(mut self, signatures: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.params
            .extend(signatures.into_iter().map(|s| s.into().trim().to_string()));
        self
    }

    pub fn body(mut self, body: impl AsRef<str>) -> Self {
        self.body = dedent(body.as_ref());
        self
    }

    pub fn doc<I, S>(mut self, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.doc.extend(lines.into_iter().map(Into::into));
        self
    }

    pub fn visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    pub fn is_static(mut self, is_static: bool) -> Self {
        self.is_static = is_static;
        self
    }

    /// # Errors
    ///
    /// `InvalidIdentifier` when the name is not an identifier.
    pub fn build(self) -> Result<MethodModel, DomainError> {
        let name = self.name.trim().to_string();
        if !is_identifier(&name) {
            return Err(DomainError::InvalidIdentifier {
                kind: "method name",
                value: name,
            });
        }

        Ok(MethodModel {
            name,
            params: self.params,
            body: self.body,
            doc: self.doc,
            visibility: self.visibility,
            is_static: self.is_static,
        })
    }
}

/// Normalise a method body.
///
/// Blank leading and trailing lines are dropped and trailing whitespace is
/// stripped. The first line loses its own indentation; the remaining lines
/// lose the indentation they have in common, so a body written as an indented
/// block reads the same as one whose first line starts flush.
pub(crate) fn dedent(body: &str) -> String {
    let lines: Vec<&str> = body.lines().map(str::trim_end).collect();
    let start = lines.iter().position(|l| !l.is_empty());
    let end = lines.iter().rposition(|l| !l.is_empty());
    let (Some(start), Some(end)) = (start, end) else {
        return String::new();
    };
    let lines = &lines[start..=end];

    let common = lines[1..]
        .iter()
        .filter(|l| !l.is_empty())
        .map(|l| l.len() - l.trim_start().len())
        .min()
        .unwrap_or(0);

    let mut out = Vec::with_capacity(lines.len());
    out.push(lines[0].trim_start());
    for line in &lines[1..] {
        out.push(line.get(common..).unwrap_or_else(|| line.trim_start()));
    }
    out.join("\n")
}

// ── Classes ──────────────────────────────────────────────────────────────────

/// A class under construction or after merge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassModel {
    namespace: String,
    parent: Option<String>,
    doc: Vec<String>,
    attributes: Vec<Attribute>,
    methods: Vec<MethodModel>,
}

impl ClassModel {
    /// Class at a module-relative namespace.
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into().trim().trim_matches('\\').to_string(),
            parent: None,
            doc: Vec::new(),
            attributes: Vec::new(),
            methods: Vec::new(),
        }
    }

    /// Parent type reference, written as it should appear after `extends`.
    pub fn extends(mut self, parent: impl Into<String>) -> Self {
        self.set_parent(Some(parent.into()));
        self
    }

    pub fn with_doc(mut self, line: impl Into<String>) -> Self {
        self.add_doc_line(line);
        self
    }

    pub fn with_attribute(mut self, attribute: impl Into<Attribute>) -> Self {
        self.add_attribute(attribute.into());
        self
    }

    pub fn with_method(mut self, method: MethodModel) -> Self {
        self.add_method(method);
        self
    }

    pub fn set_parent(&mut self, parent: Option<String>) {
        self.parent = parent
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty());
    }

    /// Append a doc line unless an identical line is already present.
    ///
    /// Blank separator lines are always appended.
    pub fn add_doc_line(&mut self, line: impl Into<String>) -> bool {
        let line = line.into();
        if !line.trim().is_empty() && self.doc.contains(&line) {
            return false;
        }
        self.doc.push(line);
        true
    }

    /// Add a declaration, keeping first-seen order.
    ///
    /// Exact duplicates are skipped. A property whose name is already declared
    /// replaces the earlier declaration in place.
    pub fn add_attribute(&mut self, attribute: Attribute) -> AttributeChange {
        match self.attributes.iter_mut().find(|a| a.same_slot(&attribute)) {
            Some(existing) if *existing == attribute => AttributeChange::Unchanged,
            Some(existing) => AttributeChange::Replaced(std::mem::replace(existing, attribute)),
            None => {
                self.attributes.push(attribute);
                AttributeChange::Added
            }
        }
    }

    /// Add a method. An existing method with the same name is replaced in its
    /// original position and returned.
    pub fn add_method(&mut self, method: MethodModel) -> Option<MethodModel> {
        match self.methods.iter_mut().find(|m| m.name == method.name) {
            Some(existing) => Some(std::mem::replace(existing, method)),
            None => {
                self.methods.push(method);
                None
            }
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Last namespace segment.
    pub fn class_name(&self) -> &str {
        self.namespace
            .rsplit('\\')
            .next()
            .unwrap_or(&self.namespace)
    }

    /// Namespace without the class name, `None` for a top-level class.
    pub fn package(&self) -> Option<&str> {
        self.namespace.rsplit_once('\\').map(|(pkg, _)| pkg)
    }

    /// Package-relative file: `Controller\Index\Index` lands in
    /// `Controller/Index/Index.php`.
    pub fn file_path(&self) -> Result<RelativePath, DomainError> {
        RelativePath::try_new(format!("{}.php", self.namespace.replace('\\', "/")))
    }

    pub fn parent(&self) -> Option<&str> {
        self.parent.as_deref()
    }

    pub fn doc(&self) -> &[String] {
        &self.doc
    }

    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    pub fn methods(&self) -> &[MethodModel] {
        &self.methods
    }

    pub fn method(&self, name: &str) -> Option<&MethodModel> {
        self.methods.iter().find(|m| m.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn method(name: &str, body: &str) -> MethodModel {
        MethodModel::builder(name).body(body).build().unwrap()
    }

    #[test]
    fn add_method_replaces_in_place() {
        let mut class = ClassModel::new("Controller\\Index\\Index")
            .with_method(method("__construct", "parent::__construct($context);"))
            .with_method(method("execute", "return 1;"))
            .with_method(method("jsonResponse", "return 2;"));

        let previous = class.add_method(method("execute", "return 3;"));

        assert_eq!(previous.unwrap().body(), "return 1;");
        let names: Vec<_> = class.methods().iter().map(MethodModel::name).collect();
        assert_eq!(names, ["__construct", "execute", "jsonResponse"]);
        assert_eq!(class.method("execute").unwrap().body(), "return 3;");
    }

    #[test]
    fn raw_attributes_dedupe_by_text() {
        let mut class = ClassModel::new("Model\\Payment\\Visa");
        assert_eq!(
            class.add_attribute("protected $resultPageFactory;".into()),
            AttributeChange::Added
        );
        assert_eq!(
            class.add_attribute("  protected $resultPageFactory;".into()),
            AttributeChange::Unchanged
        );
        assert_eq!(class.attributes().len(), 1);
    }

    #[test]
    fn property_redeclaration_replaces() {
        let mut class = ClassModel::new("Model\\Payment\\Visa").with_attribute(
            Attribute::property(Visibility::Protected, "_code").with_default("\"visa\""),
        );
        let change = class.add_attribute(
            Attribute::property(Visibility::Protected, "$_code").with_default("\"amex\""),
        );

        assert!(matches!(change, AttributeChange::Replaced(_)));
        assert_eq!(class.attributes().len(), 1);
        assert_eq!(
            class.attributes()[0].declaration(),
            "protected $_code = \"amex\";"
        );
    }

    #[test]
    fn static_property_declaration() {
        let attr = Attribute::property(Visibility::Private, "instances").into_static();
        assert_eq!(attr.declaration(), "private static $instances;");
    }

    #[test]
    fn doc_lines_are_not_repeated() {
        let mut class = ClassModel::new("Block\\Index");
        assert!(class.add_doc_line("Index block"));
        assert!(!class.add_doc_line("Index block"));
        assert!(class.add_doc_line(""));
        assert!(class.add_doc_line(""));
        assert_eq!(class.doc().len(), 3);
    }

    #[test]
    fn namespace_parts() {
        let class = ClassModel::new("\\Controller\\Adminhtml\\Index\\Index\\").extends("");
        assert_eq!(class.namespace(), "Controller\\Adminhtml\\Index\\Index");
        assert_eq!(class.class_name(), "Index");
        assert_eq!(class.package(), Some("Controller\\Adminhtml\\Index"));
        assert_eq!(class.parent(), None);
        assert_eq!(class.file_path().unwrap().as_str(), "Controller/Adminhtml/Index/Index.php");
    }

    #[test]
    fn dedent_handles_flush_first_line() {
        let body = "$this->resultPageFactory = $resultPageFactory;\n\t\t\t\t\tparent::__construct($context);\n\t\t\t\t";
        assert_eq!(
            dedent(body),
            "$this->resultPageFactory = $resultPageFactory;\nparent::__construct($context);"
        );
    }

    #[test]
    fn dedent_keeps_relative_indentation() {
        let body = "\n    try {\n        return 1;\n    } catch (\\Exception $e) {\n        return 2;\n    }\n";
        assert_eq!(
            dedent(body),
            "try {\n    return 1;\n} catch (\\Exception $e) {\n    return 2;\n}"
        );
    }

    #[test]
    fn dedent_of_blank_body_is_empty() {
        assert_eq!(dedent("  \n\t\n"), "");
    }

    #[test]
    fn builder_rejects_bad_name() {
        assert!(matches!(
            MethodModel::builder("do-it").build(),
            Err(DomainError::InvalidIdentifier { .. })
        ));
    }
}
