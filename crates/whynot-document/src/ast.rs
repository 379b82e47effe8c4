//! The document tree handed over by a markup parser.
//!
//! The tree is plain data: block nodes own their children, inline nodes own
//! their text. It serializes as JSON with an internal `"kind"` tag, so a
//! parser in any process can produce it:
//!
//! ```json
//! { "kind": "document", "children": [
//!     { "kind": "heading", "level": 1, "children": [
//!         { "kind": "text", "text": "Hello" } ] },
//!     { "kind": "paragraph", "children": [
//!         { "kind": "text", "text": "Some " },
//!         { "kind": "emphasis", "level": 2, "children": [
//!             { "kind": "text", "text": "bold" } ] } ] }
//! ] }
//! ```

use serde::{Deserialize, Serialize};

/// A node of the document tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Node {
    /// The root: a sequence of block nodes.
    Document {
        /// Block children.
        children: Vec<Node>,
    },
    /// A heading of level 1 (largest) to 6.
    Heading {
        /// Heading level, 1 to 6.
        level: u8,
        /// Inline children.
        children: Vec<Node>,
    },
    /// A paragraph of inline content.
    Paragraph {
        /// Inline children.
        children: Vec<Node>,
    },
    /// A bulleted or numbered list.
    List {
        /// `-`, `+`, `*` for bullets; `.` or `)` for numbers.
        marker: char,
        /// Number of the first item of a numbered list.
        #[serde(default = "default_start")]
        start: usize,
        /// [`Node::ListItem`] children.
        items: Vec<Node>,
    },
    /// One entry of a [`Node::List`].
    ListItem {
        /// A single [`Node::TextBlock`] or [`Node::Paragraph`].
        children: Vec<Node>,
    },
    /// Inline content without paragraph margins, as in tight list items.
    TextBlock {
        /// Inline children.
        children: Vec<Node>,
    },
    /// A fenced or indented code block.
    CodeBlock {
        /// Source lines, without line terminators.
        lines: Vec<String>,
        /// Info string of a fenced block, if any. Not used for layout.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        language: Option<String>,
    },
    /// Plain text. Split into words at whitespace.
    Text {
        /// The text.
        text: String,
    },
    /// Emphasized inline content.
    Emphasis {
        /// 1 for `*em*`, 2 for `**strong**`.
        level: u32,
        /// Inline children.
        children: Vec<Node>,
    },
    /// An inline code span, set in the monospace family.
    CodeSpan {
        /// The code.
        text: String,
    },
    /// An embedded image.
    Image {
        /// Where the host's image source finds the image.
        src: String,
        /// Alternative text.
        #[serde(default)]
        alt: String,
    },
    /// A node kind the parser produced but the compiler has no layout for.
    Other {
        /// The parser's name for the node kind.
        name: String,
    },
}

const fn default_start() -> usize {
    1
}

impl Node {
    /// The kebab-case kind name, as written in the `"kind"` tag.
    #[must_use]
    pub fn kind(&self) -> &str {
        match self {
            Self::Document { .. } => "document",
            Self::Heading { .. } => "heading",
            Self::Paragraph { .. } => "paragraph",
            Self::List { .. } => "list",
            Self::ListItem { .. } => "list-item",
            Self::TextBlock { .. } => "text-block",
            Self::CodeBlock { .. } => "code-block",
            Self::Text { .. } => "text",
            Self::Emphasis { .. } => "emphasis",
            Self::CodeSpan { .. } => "code-span",
            Self::Image { .. } => "image",
            Self::Other { name } => name,
        }
    }

    /// Convenience constructor for a text leaf.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }
}

/// Parse a document tree from JSON.
///
/// # Errors
///
/// Malformed JSON or an unknown `"kind"`.
pub fn from_json(json: &str) -> Result<Node, serde_json::Error> {
    serde_json::from_str(json)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tagged_tree() {
        let node = from_json(
            r#"{"kind": "document", "children": [
                {"kind": "list", "marker": ".", "items": [
                    {"kind": "list-item", "children": [
                        {"kind": "text-block", "children": [{"kind": "text", "text": "one"}]}
                    ]}
                ]},
                {"kind": "code-block", "lines": ["let x = 1;"]}
            ]}"#,
        )
        .unwrap();
        let Node::Document { children } = node else {
            panic!("expected a document");
        };
        assert_eq!(children.len(), 2);
        assert!(matches!(
            &children[0],
            Node::List {
                marker: '.',
                start: 1,
                ..
            }
        ));
        assert_eq!(children[1].kind(), "code-block");
    }

    #[test]
    fn test_other_reports_its_name() {
        let node = from_json(r#"{"kind": "other", "name": "table"}"#).unwrap();
        assert_eq!(node.kind(), "table");
    }

    #[test]
    fn test_unknown_kind_is_rejected() {
        assert!(from_json(r#"{"kind": "blink", "children": []}"#).is_err());
    }
}
