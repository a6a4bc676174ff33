//! Structural tokens for the formatter.
//!
//! Unlike the renderer's tokenizer this keeps every piece of markup verbatim.
//! Nothing is decoded, attributes are not split, and tag names are lowercased
//! only in the copy used for classification.

use strum_macros::Display;

use super::VOID_ELEMENTS;

/// The classification of a [`MarkupToken`], for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "kebab-case")]
pub enum TokenKind {
    /// `<name ...>`
    Open,
    /// `</name>`
    Close,
    /// `<name .../>` or a void element
    SelfClosing,
    /// A trimmed text run
    Text,
    /// `<!-- ... -->`
    Comment,
    /// `<!DOCTYPE ...>`
    Doctype,
}

/// One structural piece of markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkupToken<'a> {
    /// An opening tag that increases depth.
    Open {
        /// Lowercased tag name.
        name: String,
        /// The tag exactly as written.
        content: &'a str,
    },
    /// A closing tag.
    Close {
        /// Lowercased tag name.
        name: String,
        /// The tag exactly as written.
        content: &'a str,
    },
    /// A tag ending in `/>`, or any tag naming a void element.
    SelfClosing {
        /// Lowercased tag name.
        name: String,
        /// The tag exactly as written.
        content: &'a str,
    },
    /// Text between tags with surrounding whitespace trimmed. Never empty.
    Text(&'a str),
    /// A complete comment, delimiters included.
    Comment(&'a str),
    /// A doctype declaration, delimiters included.
    Doctype(&'a str),
}

impl<'a> MarkupToken<'a> {
    /// The verbatim source text this token emits.
    #[must_use]
    pub const fn content(&self) -> &'a str {
        match self {
            Self::Open { content, .. }
            | Self::Close { content, .. }
            | Self::SelfClosing { content, .. } => *content,
            Self::Text(content) | Self::Comment(content) | Self::Doctype(content) => *content,
        }
    }

    /// Lowercased tag name for tag tokens.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Open { name, .. } | Self::Close { name, .. } | Self::SelfClosing { name, .. } => {
                Some(name)
            }
            _ => None,
        }
    }

    /// This token's classification.
    #[must_use]
    pub const fn kind(&self) -> TokenKind {
        match self {
            Self::Open { .. } => TokenKind::Open,
            Self::Close { .. } => TokenKind::Close,
            Self::SelfClosing { .. } => TokenKind::SelfClosing,
            Self::Text(_) => TokenKind::Text,
            Self::Comment(_) => TokenKind::Comment,
            Self::Doctype(_) => TokenKind::Doctype,
        }
    }
}

/// Split `text` into structural tokens.
///
/// At each `<` the alternatives are tried in priority order: comment,
/// doctype, closing tag, opening tag. A `<` that starts none of them ends
/// the pending text run and becomes a text token of its own, so no other
/// text run ever contains `<`. Whitespace-only runs produce no token.
#[must_use]
pub fn tokenize(text: &str) -> Vec<MarkupToken<'_>> {
    let mut tokens = Vec::new();
    // Start of the pending text run, if any
    let mut text_start: Option<usize> = None;
    let mut pos = 0;

    while pos < text.len() {
        let rest = &text[pos..];
        let Some(lt) = rest.find('<') else {
            let _ = text_start.get_or_insert(pos);
            pos = text.len();
            break;
        };
        if lt > 0 {
            let _ = text_start.get_or_insert(pos);
            pos += lt;
            continue;
        }

        if let Some(start) = text_start.take() {
            push_text(&mut tokens, &text[start..pos]);
        }
        let Some((token, len)) = match_markup(rest) else {
            // A stray `<`
            tokens.push(MarkupToken::Text(&rest[..1]));
            pos += 1;
            continue;
        };
        tokens.push(token);
        pos += len;
    }

    if let Some(start) = text_start {
        push_text(&mut tokens, &text[start..pos]);
    }
    tokens
}

fn push_text<'a>(tokens: &mut Vec<MarkupToken<'a>>, run: &'a str) {
    let trimmed = run.trim();
    if !trimmed.is_empty() {
        tokens.push(MarkupToken::Text(trimmed));
    }
}

/// Match a non-text token at the start of `rest`, which begins with `<`.
/// Returns the token and its length in bytes.
fn match_markup(rest: &str) -> Option<(MarkupToken<'_>, usize)> {
    if let Some(body) = rest.strip_prefix("<!--")
        && let Some(close) = body.find("-->")
    {
        let len = "<!--".len() + close + "-->".len();
        return Some((MarkupToken::Comment(&rest[..len]), len));
    }

    if rest
        .get(..9)
        .is_some_and(|s| s.eq_ignore_ascii_case("<!DOCTYPE"))
        && let Some(close) = rest.find('>')
    {
        let len = close + 1;
        return Some((MarkupToken::Doctype(&rest[..len]), len));
    }

    let bytes = rest.as_bytes();
    if bytes.get(1) == Some(&b'/') {
        // `</name\s*>`
        let name_len = tag_name_len(&bytes[2..])?;
        let after_name = 2 + name_len;
        let spaces = count_whitespace(&bytes[after_name..]);
        if bytes.get(after_name + spaces) != Some(&b'>') {
            return None;
        }
        let len = after_name + spaces + 1;
        let name = rest[2..after_name].to_ascii_lowercase();
        return Some((
            MarkupToken::Close {
                name,
                content: &rest[..len],
            },
            len,
        ));
    }

    // `<name(\s[^>]*)?\s*/?>`
    let name_len = tag_name_len(&bytes[1..])?;
    let after_name = 1 + name_len;
    let len = match *bytes.get(after_name)? {
        b'>' => after_name + 1,
        b'/' if bytes.get(after_name + 1) == Some(&b'>') => after_name + 2,
        c if is_html_whitespace(c) => {
            after_name + bytes[after_name..].iter().position(|&b| b == b'>')? + 1
        }
        _ => return None,
    };
    let name = rest[1..after_name].to_ascii_lowercase();
    let content = &rest[..len];
    let token = if content.ends_with("/>") || VOID_ELEMENTS.contains(&name.as_str()) {
        MarkupToken::SelfClosing { name, content }
    } else {
        MarkupToken::Open { name, content }
    };
    Some((token, len))
}

/// Length of an `[A-Za-z][A-Za-z0-9]*` name at the start of `bytes`.
fn tag_name_len(bytes: &[u8]) -> Option<usize> {
    if !bytes.first()?.is_ascii_alphabetic() {
        return None;
    }
    Some(bytes.iter().take_while(|b| b.is_ascii_alphanumeric()).count())
}

fn count_whitespace(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|&&b| is_html_whitespace(b)).count()
}

const fn is_html_whitespace(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\r' | b'\x0B' | b'\x0C')
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Helper to reduce tokens to `kind:content` strings.
    fn describe(text: &str) -> Vec<String> {
        tokenize(text)
            .iter()
            .map(|t| format!("{}:{}", t.kind(), t.content()))
            .collect()
    }

    #[test]
    fn test_token_kinds() {
        assert_eq!(
            describe("<!doctype html><!-- c --><div class=\"a\">\n  hi\n</div ><br><img/>"),
            vec![
                "doctype:<!doctype html>",
                "comment:<!-- c -->",
                "open:<div class=\"a\">",
                "text:hi",
                "close:</div >",
                "self-closing:<br>",
                "self-closing:<img/>",
            ]
        );
    }

    #[test]
    fn test_names_are_lowercased_content_is_not() {
        let tokens = tokenize("<SPAN Title=X>a</Span>");
        assert_eq!(tokens[0].name(), Some("span"));
        assert_eq!(tokens[0].content(), "<SPAN Title=X>");
        assert_eq!(tokens[2].name(), Some("span"));
        assert_eq!(tokens[2].content(), "</Span>");
        assert_eq!(tokens[1].name(), None);
    }

    #[test]
    fn test_whitespace_runs_are_dropped() {
        assert_eq!(describe("  <p>\n\t\n</p>  "), vec!["open:<p>", "close:</p>"]);
        assert!(tokenize(" \n ").is_empty());
    }

    #[test]
    fn test_comment_wins_over_tags_inside_it() {
        assert_eq!(
            describe("<!--<div>\n</div>-->x"),
            vec!["comment:<!--<div>\n</div>-->", "text:x"]
        );
    }

    #[test]
    fn test_stray_less_than_is_its_own_text() {
        assert_eq!(
            describe("a < b<p>"),
            vec!["text:a", "text:<", "text:b", "open:<p>"]
        );
        assert_eq!(
            describe("<p>1 <2</p>"),
            vec!["open:<p>", "text:1", "text:<", "text:2", "close:</p>"]
        );
        // Unterminated comments and malformed tags are text too
        assert_eq!(describe("<!-- open"), vec!["text:<", "text:!-- open"]);
        assert_eq!(describe("<div-x>"), vec!["text:<", "text:div-x>"]);
        assert_eq!(describe("</div x>"), vec!["text:<", "text:/div x>"]);
        assert_eq!(
            describe("b<<E<T>"),
            vec!["text:b", "text:<", "text:<", "text:E", "open:<T>"]
        );
    }

    #[test]
    fn test_only_stray_text_contains_less_than() {
        for input in ["T<C<p>", "b<<E<T>", "x <\na>", "<em><</em>", "< <!-- c"] {
            for token in tokenize(input) {
                if let MarkupToken::Text(content) = token {
                    assert!(content == "<" || !content.contains('<'), "{input:?}");
                }
            }
        }
    }

    #[test]
    fn test_multiline_attributes() {
        assert_eq!(
            describe("<a\n  href=\"/\">x</a>"),
            vec!["open:<a\n  href=\"/\">", "text:x", "close:</a>"]
        );
    }
}
