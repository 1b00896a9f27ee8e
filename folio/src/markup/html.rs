//! HTML rendering of inline markup

use super::node::Node;

/// Escape text for use in HTML content and attribute values
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Render nodes to an HTML fragment
///
/// Links open in a new tab, matching how the rest of the page treats
/// outbound links.
pub fn to_html(nodes: &[Node]) -> String {
    let mut result = String::new();
    for node in nodes {
        write_node(&mut result, node);
    }
    result
}

fn write_node(output: &mut String, node: &Node) {
    match node {
        Node::Text(text) => output.push_str(&escape_html(text)),
        Node::Link { label, href } => {
            output.push_str(&format!(
                "<a class=\"inline-link\" href=\"{}\" target=\"_blank\" rel=\"noopener noreferrer\">{}</a>",
                escape_html(href),
                escape_html(label)
            ));
        }
        Node::Styled { style, children } => {
            let element = style.html_element();
            output.push_str(&format!("<{}>", element));
            for child in children {
                write_node(output, child);
            }
            output.push_str(&format!("</{}>", element));
        }
        Node::LineBreak => output.push_str("<br>"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::parse;

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("<div>"), "&lt;div&gt;");
        assert_eq!(escape_html("a & b"), "a &amp; b");
        assert_eq!(escape_html("\"quoted\""), "&quot;quoted&quot;");
    }

    #[test]
    fn test_to_html_nested() {
        assert_eq!(
            to_html(&parse("<b>a<i>b</i></b>\\n<u>c</u>")),
            "<strong>a<em>b</em></strong><br><u>c</u>"
        );
    }

    #[test]
    fn test_to_html_link_is_escaped() {
        assert_eq!(
            to_html(&parse("(a&b)[https://x.dev/?q=\"1\"]")),
            "<a class=\"inline-link\" href=\"https://x.dev/?q=&quot;1&quot;\" target=\"_blank\" rel=\"noopener noreferrer\">a&amp;b</a>"
        );
    }

    #[test]
    fn test_literal_tags_are_escaped() {
        assert_eq!(to_html(&parse("<b>open")), "&lt;b&gt;open");
    }
}
