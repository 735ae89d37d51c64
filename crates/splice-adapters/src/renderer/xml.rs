//! XML document writer.
//!
//! Children are indented one unit per level, attributes keep insertion
//! order. A node carries either text or children, never both.

use splice_core::domain::{DocumentNode, DomainError, RelativePath};

use crate::config::RenderConfig;

/// Render a merged document, declaration line first.
pub fn render_document(
    path: &RelativePath,
    root: &DocumentNode,
    config: &RenderConfig,
) -> Result<String, DomainError> {
    let mut out = String::new();
    let declaration = config.xml_declaration.trim();
    if !declaration.is_empty() {
        out.push_str(declaration);
        out.push('\n');
    }

    let writer = XmlWriter {
        unit: config.indent.unit(),
        path,
    };
    writer.write_node(&mut out, root, 0, &root.location_segment())?;
    Ok(out)
}

struct XmlWriter<'a> {
    unit: String,
    path: &'a RelativePath,
}

impl XmlWriter<'_> {
    fn write_node(
        &self,
        out: &mut String,
        node: &DocumentNode,
        depth: usize,
        location: &str,
    ) -> Result<(), DomainError> {
        if !is_xml_name(node.tag()) {
            return Err(self.malformed(location, format!("invalid tag name '{}'", node.tag())));
        }

        let pad = self.unit.repeat(depth);
        out.push_str(&pad);
        out.push('<');
        out.push_str(node.tag());

        for (key, value) in node.attributes() {
            if !is_xml_name(key) {
                return Err(self.malformed(location, format!("invalid attribute name '{key}'")));
            }
            self.check_chars(location, value, &format!("attribute '{key}'"))?;
            out.push(' ');
            out.push_str(key);
            out.push_str("=\"");
            out.push_str(&escape_attribute(value));
            out.push('"');
        }

        match (node.text(), node.child_nodes()) {
            (Some(_), [_, ..]) => {
                return Err(self.malformed(location, "node has both text and children"));
            }
            (None, []) => out.push_str("/>\n"),
            (Some(text), []) => {
                self.check_chars(location, text, "text")?;
                out.push('>');
                out.push_str(&escape(text));
                out.push_str("</");
                out.push_str(node.tag());
                out.push_str(">\n");
            }
            (None, children) => {
                out.push_str(">\n");
                for child in children {
                    let child_location = format!("{location}/{}", child.location_segment());
                    self.write_node(out, child, depth + 1, &child_location)?;
                }
                out.push_str(&pad);
                out.push_str("</");
                out.push_str(node.tag());
                out.push_str(">\n");
            }
        }
        Ok(())
    }

    fn check_chars(&self, location: &str, value: &str, what: &str) -> Result<(), DomainError> {
        match value.chars().find(|c| !is_xml_char(*c)) {
            Some(c) => Err(self.malformed(
                location,
                format!("{what} contains character U+{:04X}, not allowed in XML", u32::from(c)),
            )),
            None => Ok(()),
        }
    }

    fn malformed(&self, location: &str, reason: impl Into<String>) -> DomainError {
        DomainError::MalformedNode {
            location: format!("{}:{location}", self.path),
            reason: reason.into(),
        }
    }
}

/// Escape `& < > "` for text content.
pub fn escape(value: &str) -> String {
    escape_into(value, false)
}

/// Escape an attribute value. Tab, newline and carriage return become
/// character references so attribute normalisation keeps them.
pub fn escape_attribute(value: &str) -> String {
    escape_into(value, true)
}

fn escape_into(value: &str, attribute: bool) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\t' if attribute => out.push_str("&#9;"),
            '\n' if attribute => out.push_str("&#10;"),
            '\r' if attribute => out.push_str("&#13;"),
            c => out.push(c),
        }
    }
    out
}

/// XML 1.0 `Char` production.
fn is_xml_char(c: char) -> bool {
    matches!(
        c,
        '\t' | '\n' | '\r' | '\u{20}'..='\u{D7FF}' | '\u{E000}'..='\u{FFFD}' | '\u{10000}'..='\u{10FFFF}'
    )
}

/// XML 1.0 name, restricted to ASCII plus any non-ASCII letter.
fn is_xml_name(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    let start = |c: char| c.is_alphabetic() || c == '_' || c == ':';
    start(first) && chars.all(|c| start(c) || c.is_alphanumeric() || c == '-' || c == '.')
}
