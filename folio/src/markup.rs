//! Inline markup for authored portfolio text
//!
//! Free-text fields in the portfolio document use a small author-facing
//! syntax:
//! - a newline, or the two-character `\n` escape, for a line break
//! - `<b>`/`<strong>`, `<i>` and `<u>` tag pairs for styled spans (nestable)
//! - `(label)[url]` for hyperlinks
//!
//! Parsing is total: anything that does not form a complete construct is kept
//! as literal text.

mod html;
mod node;
mod parser;

pub use html::{escape_html, to_html};
pub use node::{line_breaks, plain_text, Node, Style};
pub use parser::{parse, parse_opt};
