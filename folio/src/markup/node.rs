//! Inline markup AST

use serde::Serialize;

/// Style applied by a tag pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Style {
    /// `<b>` or `<strong>`
    Bold,
    /// `<i>`
    Italic,
    /// `<u>`
    Underline,
}

impl Style {
    /// Map a tag name (already lower-cased) to its style
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "b" | "strong" => Some(Style::Bold),
            "i" => Some(Style::Italic),
            "u" => Some(Style::Underline),
            _ => None,
        }
    }

    /// HTML element used when rendering this style
    pub fn html_element(self) -> &'static str {
        match self {
            Style::Bold => "strong",
            Style::Italic => "em",
            Style::Underline => "u",
        }
    }
}

/// One node of parsed inline markup
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Node {
    /// Literal text, exactly as authored
    Text(String),

    /// `(label)[href]`
    Link {
        /// Display text
        label: String,
        /// Target URL
        href: String,
    },

    /// A tag pair with recursively parsed content
    Styled {
        /// Which tag pair produced the span
        style: Style,
        /// Nodes between the opening and closing tag
        children: Vec<Node>,
    },

    /// Line break between two authored lines
    LineBreak,
}

impl Node {
    /// Shorthand for a text node
    pub fn text(s: impl Into<String>) -> Self {
        Node::Text(s.into())
    }

    fn write_plain(&self, out: &mut String) {
        match self {
            Node::Text(text) => out.push_str(text),
            Node::Link { label, .. } => out.push_str(label),
            Node::Styled { children, .. } => {
                for child in children {
                    child.write_plain(out);
                }
            }
            Node::LineBreak => out.push('\n'),
        }
    }
}

/// Display text of a node sequence, with line breaks as `\n`
pub fn plain_text(nodes: &[Node]) -> String {
    let mut out = String::new();
    for node in nodes {
        node.write_plain(&mut out);
    }
    out
}

/// Count the line-break markers in a node sequence
///
/// Line breaks only occur at the top level since splitting happens before
/// any tag is matched.
pub fn line_breaks(nodes: &[Node]) -> usize {
    nodes.iter().filter(|n| matches!(n, Node::LineBreak)).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_flattens_styles_and_links() {
        let nodes = vec![
            Node::text("see "),
            Node::Styled {
                style: Style::Bold,
                children: vec![Node::Link {
                    label: "docs".to_string(),
                    href: "https://example.com".to_string(),
                }],
            },
            Node::LineBreak,
            Node::text("bye"),
        ];
        assert_eq!(plain_text(&nodes), "see docs\nbye");
        assert_eq!(line_breaks(&nodes), 1);
    }

    #[test]
    fn test_style_from_tag() {
        assert_eq!(Style::from_tag("strong"), Some(Style::Bold));
        assert_eq!(Style::from_tag("b"), Some(Style::Bold));
        assert_eq!(Style::from_tag("s"), None);
    }

    #[test]
    fn test_node_serializes_with_type_tag() {
        let json = serde_json::to_string(&Node::text("hi")).unwrap();
        assert_eq!(json, r#"{"type":"text","value":"hi"}"#);
        let json = serde_json::to_string(&Node::LineBreak).unwrap();
        assert_eq!(json, r#"{"type":"line_break"}"#);
    }
}
