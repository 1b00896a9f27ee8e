//! Inline markup parser
//!
//! Processing order:
//! 1. split on newlines (real `\n` and the escaped two-character `\n`)
//! 2. per line, match tag pairs leftmost-first, shortest content wins
//! 3. text outside tag pairs is scanned for `(label)[url]` links
//!
//! Content inside a tag pair goes through steps 2 and 3 again, which is what
//! allows `<b>a<i>b</i>c</b>`.

use super::node::{Node, Style};
use regex::Regex;
use std::sync::OnceLock;

static NEWLINE: OnceLock<Regex> = OnceLock::new();
static TAG_PAIR: OnceLock<Regex> = OnceLock::new();
static LINK: OnceLock<Regex> = OnceLock::new();

fn newline_regex() -> &'static Regex {
    NEWLINE.get_or_init(|| Regex::new(r"\\n|\n").expect("newline pattern is valid"))
}

/// Capture groups 1..=4 hold the content for b, strong, i and u respectively
///
/// Tag content never spans a line terminator, carriage returns and the
/// Unicode line and paragraph separators included.
fn tag_pair_regex() -> &'static Regex {
    TAG_PAIR.get_or_init(|| {
        let body = r"([^\r\n\x{2028}\x{2029}]*?)";
        let pattern = format!(
            "(?i)<b>{body}</b>|<strong>{body}</strong>|<i>{body}</i>|<u>{body}</u>"
        );
        Regex::new(&pattern).expect("tag pattern is valid")
    })
}

fn link_regex() -> &'static Regex {
    LINK.get_or_init(|| Regex::new(r"\(([^)]+)\)\[([^\]]+)\]").expect("link pattern is valid"))
}

/// Tag names in capture-group order
const TAG_GROUPS: [&str; 4] = ["b", "strong", "i", "u"];

/// Parse authored text into inline nodes
///
/// Never fails. An empty input produces no nodes. Each newline separator
/// produces one [`Node::LineBreak`], including separators around empty lines.
pub fn parse(raw: &str) -> Vec<Node> {
    let mut nodes = Vec::new();
    if raw.is_empty() {
        return nodes;
    }

    for (i, line) in newline_regex().split(raw).enumerate() {
        if i > 0 {
            nodes.push(Node::LineBreak);
        }
        parse_tags(line, &mut nodes);
    }

    nodes
}

/// Parse optional text; a missing value produces no nodes
pub fn parse_opt(raw: Option<&str>) -> Vec<Node> {
    raw.map(parse).unwrap_or_default()
}

/// Match tag pairs in `text`, parsing the gaps for links
fn parse_tags(text: &str, out: &mut Vec<Node>) {
    let mut last = 0;

    for caps in tag_pair_regex().captures_iter(text) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        let Some((tag, content)) = TAG_GROUPS
            .iter()
            .enumerate()
            .find_map(|(group, tag)| caps.get(group + 1).map(|m| (*tag, m.as_str())))
        else {
            continue;
        };
        let Some(style) = Style::from_tag(tag) else {
            continue;
        };

        if whole.start() > last {
            parse_links(&text[last..whole.start()], out);
        }

        let mut children = Vec::new();
        parse_tags(content, &mut children);
        out.push(Node::Styled { style, children });

        last = whole.end();
    }

    if last < text.len() {
        parse_links(&text[last..], out);
    }
}

/// Split `text` into literal runs and `(label)[url]` links
fn parse_links(text: &str, out: &mut Vec<Node>) {
    let mut last = 0;

    for caps in link_regex().captures_iter(text) {
        let (Some(whole), Some(label), Some(href)) = (caps.get(0), caps.get(1), caps.get(2))
        else {
            continue;
        };

        if whole.start() > last {
            out.push(Node::text(&text[last..whole.start()]));
        }
        out.push(Node::Link {
            label: label.as_str().to_string(),
            href: href.as_str().to_string(),
        });
        last = whole.end();
    }

    if last < text.len() {
        out.push(Node::text(&text[last..]));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::{line_breaks, plain_text};

    fn bold(children: Vec<Node>) -> Node {
        Node::Styled {
            style: Style::Bold,
            children,
        }
    }

    fn italic(children: Vec<Node>) -> Node {
        Node::Styled {
            style: Style::Italic,
            children,
        }
    }

    fn link(label: &str, href: &str) -> Node {
        Node::Link {
            label: label.to_string(),
            href: href.to_string(),
        }
    }

    #[test]
    fn test_tag_content_stops_at_carriage_return() {
        for s in ["<b>a\rb</b>", "<i>left\u{2028}right</i>"] {
            assert_eq!(parse(s), vec![Node::text(s)], "input: {s:?}");
        }
        assert_eq!(
            parse("<b>a</b>\r<b>c</b>"),
            vec![
                bold(vec![Node::text("a")]),
                Node::text("\r"),
                bold(vec![Node::text("c")])
            ]
        );
    }

    #[test]
    fn test_plain_string_is_single_text_run() {
        for s in ["hello", "  padded  ", "a (b) [c]", "<notatag>", "x < y > z"] {
            assert_eq!(parse(s), vec![Node::text(s)], "input: {s:?}");
        }
    }

    #[test]
    fn test_empty_input() {
        assert!(parse("").is_empty());
        assert!(parse_opt(None).is_empty());
        assert!(parse_opt(Some("")).is_empty());
    }

    #[test]
    fn test_real_newline() {
        assert_eq!(
            parse("one\ntwo"),
            vec![Node::text("one"), Node::LineBreak, Node::text("two")]
        );
    }

    #[test]
    fn test_escaped_newline() {
        assert_eq!(
            parse(r"one\ntwo"),
            vec![Node::text("one"), Node::LineBreak, Node::text("two")]
        );
    }

    #[test]
    fn test_mixed_newlines_count() {
        let input = "a\\nb\nc\n\n\\n";
        let nodes = parse(input);
        assert_eq!(line_breaks(&nodes), 5);
        assert_eq!(plain_text(&nodes), "a\nb\nc\n\n\n");
    }

    #[test]
    fn test_nested_styles() {
        assert_eq!(
            parse("<b>a<i>b</i>c</b>"),
            vec![bold(vec![
                Node::text("a"),
                italic(vec![Node::text("b")]),
                Node::text("c"),
            ])]
        );
    }

    #[test]
    fn test_strong_is_bold_and_case_insensitive() {
        assert_eq!(parse("<strong>x</strong>"), vec![bold(vec![Node::text("x")])]);
        assert_eq!(parse("<B>x</B>"), vec![bold(vec![Node::text("x")])]);
    }

    #[test]
    fn test_shortest_match_wins() {
        assert_eq!(
            parse("<u>a</u> and <u>b</u>"),
            vec![
                Node::Styled {
                    style: Style::Underline,
                    children: vec![Node::text("a")],
                },
                Node::text(" and "),
                Node::Styled {
                    style: Style::Underline,
                    children: vec![Node::text("b")],
                },
            ]
        );
    }

    #[test]
    fn test_mismatched_closing_tag_stays_literal() {
        assert_eq!(parse("<b>x</strong>"), vec![Node::text("<b>x</strong>")]);
        assert_eq!(parse("<i>open"), vec![Node::text("<i>open")]);
    }

    #[test]
    fn test_link() {
        assert_eq!(parse("(Click)[http://x]"), vec![link("Click", "http://x")]);
    }

    #[test]
    fn test_broken_link_stays_literal() {
        assert_eq!(parse("(broken"), vec![Node::text("(broken")]);
        assert_eq!(parse("(a) [b]"), vec![Node::text("(a) [b]")]);
        assert_eq!(parse("()[x]"), vec![Node::text("()[x]")]);
    }

    #[test]
    fn test_links_left_to_right() {
        assert_eq!(
            parse("see (A)[u1], (B)[u2]!"),
            vec![
                Node::text("see "),
                link("A", "u1"),
                Node::text(", "),
                link("B", "u2"),
                Node::text("!"),
            ]
        );
    }

    #[test]
    fn test_link_inside_style() {
        assert_eq!(
            parse("<i>read (this)[https://e.com]</i> now"),
            vec![
                italic(vec![Node::text("read "), link("this", "https://e.com")]),
                Node::text(" now"),
            ]
        );
    }

    #[test]
    fn test_tag_does_not_span_lines() {
        let nodes = parse("<b>a\nb</b>");
        assert_eq!(
            nodes,
            vec![Node::text("<b>a"), Node::LineBreak, Node::text("b</b>")]
        );
    }

    #[test]
    fn test_round_trip_strips_markup() {
        let input = r"Hi <b>there</b>,\nvisit (my site)[https://x.dev] <i>today</i>";
        assert_eq!(
            plain_text(&parse(input)),
            "Hi there,\nvisit my site today"
        );
    }

    #[test]
    fn test_unicode_passes_through() {
        let s = "שלום e\u{301} 漢字 🚀";
        assert_eq!(parse(s), vec![Node::text(s)]);
        assert_eq!(
            parse("<b>مرحبا</b>"),
            vec![bold(vec![Node::text("مرحبا")])]
        );
    }
}
