//! Markup Formatter.
//!
//! Re-indents markup one structural token per line. Formatting is total:
//! any input produces output, unbalanced closing tags clamp at depth zero,
//! and formatting already-formatted markup changes nothing.

/// Structural tokens and the tokenizer.
pub mod token;

use serde::{Deserialize, Serialize};

pub use token::{MarkupToken, TokenKind, tokenize};

/// Elements that never have a closing tag. Always classified self-closing.
pub const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// Elements that stay on one line when they wrap a lone text run.
pub const INLINE_ELEMENTS: &[&str] = &[
    "a", "abbr", "acronym", "b", "bdo", "big", "br", "button", "cite", "code", "dfn", "em", "i",
    "img", "input", "kbd", "label", "map", "object", "q", "s", "samp", "select", "small", "span",
    "strong", "sub", "sup", "textarea", "tt", "u", "var",
];

/// Default number of spaces per indent level.
pub const DEFAULT_INDENT_SIZE: usize = 2;

/// Formatter settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatOptions {
    /// Spaces per indent level.
    pub indent_size: usize,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            indent_size: DEFAULT_INDENT_SIZE,
        }
    }
}

/// Re-indent `text` using `indent_size` spaces per level.
#[must_use]
pub fn format(text: &str, indent_size: usize) -> String {
    format_with(text, FormatOptions { indent_size })
}

/// Re-indent `text` with explicit options.
#[must_use]
pub fn format_with(text: &str, options: FormatOptions) -> String {
    let tokens = tokenize(text);
    let unit = " ".repeat(options.indent_size);
    let mut lines: Vec<String> = Vec::with_capacity(tokens.len());
    let mut depth = 0usize;

    let mut i = 0;
    while i < tokens.len() {
        let token = &tokens[i];
        match token {
            MarkupToken::Open { name, content } => {
                if let Some(collapsed) = collapse_inline(name, content, &tokens[i + 1..]) {
                    lines.push(format!("{}{collapsed}", unit.repeat(depth)));
                    i += 3;
                    continue;
                }
                lines.push(format!("{}{content}", unit.repeat(depth)));
                depth += 1;
            }
            MarkupToken::Close { content, .. } => {
                depth = depth.saturating_sub(1);
                lines.push(format!("{}{content}", unit.repeat(depth)));
            }
            _ => lines.push(format!("{}{}", unit.repeat(depth), token.content())),
        }
        i += 1;
    }

    lines.join("\n")
}

/// `<tag>text</tag>` on one line, when `name` is inline and the next two
/// tokens are a text run and the matching closing tag.
fn collapse_inline(name: &str, open: &str, following: &[MarkupToken<'_>]) -> Option<String> {
    if !INLINE_ELEMENTS.contains(&name) {
        return None;
    }
    match following {
        [
            MarkupToken::Text(text),
            MarkupToken::Close {
                name: close_name,
                content: close,
            },
            ..,
        ] if close_name == name => Some(format!("{open}{text}{close}")),
        _ => None,
    }
}
