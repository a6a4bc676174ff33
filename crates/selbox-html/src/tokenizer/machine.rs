use strum_macros::Display;

use selbox_dom::Attribute;

use super::character_reference::decode;
use super::token::Token;

/// Elements whose content is consumed verbatim up to the matching end tag.
///
/// [§ 13.2.6.4.7](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inbody):
/// `title` and `textarea` switch to RCDATA (references decoded); the others
/// switch to RAWTEXT or script data (references left alone).
const RCDATA_ELEMENTS: &[&str] = &["title", "textarea"];
const RAWTEXT_ELEMENTS: &[&str] = &["script", "style", "xmp", "iframe", "noembed", "noframes"];

/// [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
///
/// The coarse states this tokenizer moves between. Tag internals (names,
/// attributes, quoted values) are consumed inline rather than as separate
/// states.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum TokenizerState {
    /// [§ 13.2.5.1 Data state](https://html.spec.whatwg.org/multipage/parsing.html#data-state)
    Data,
    /// [§ 13.2.5.2 RCDATA state](https://html.spec.whatwg.org/multipage/parsing.html#rcdata-state),
    /// holding the element whose end tag closes it.
    Rcdata(String),
    /// [§ 13.2.5.3 RAWTEXT state](https://html.spec.whatwg.org/multipage/parsing.html#rawtext-state),
    /// holding the element whose end tag closes it.
    Rawtext(String),
}

/// Converts markup text into a flat token list.
pub struct HtmlTokenizer<'a> {
    input: &'a str,
    pos: usize,
    state: TokenizerState,
    tokens: Vec<Token>,
}

impl<'a> HtmlTokenizer<'a> {
    /// Create a tokenizer over `input`.
    #[must_use]
    pub const fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            state: TokenizerState::Data,
            tokens: Vec::new(),
        }
    }

    /// Tokenize the entire input.
    pub fn run(&mut self) {
        while self.pos < self.input.len() {
            match std::mem::replace(&mut self.state, TokenizerState::Data) {
                TokenizerState::Data => self.data_state(),
                TokenizerState::Rcdata(name) => self.raw_text(&name, true),
                TokenizerState::Rawtext(name) => self.raw_text(&name, false),
            }
        }
    }

    /// Consume the tokenizer and return the tokens emitted so far.
    #[must_use]
    pub fn into_tokens(self) -> Vec<Token> {
        self.tokens
    }

    /// Convenience: tokenize `input` in one call.
    #[must_use]
    pub fn tokenize(input: &str) -> Vec<Token> {
        let mut tokenizer = HtmlTokenizer::new(input);
        tokenizer.run();
        tokenizer.into_tokens()
    }

    // =========================================================================
    // Input helpers
    // =========================================================================

    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.rest().chars().nth(offset)
    }

    fn consume(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn next_few_characters_are_case_insensitive(&self, target: &str) -> bool {
        self.rest()
            .get(..target.len())
            .is_some_and(|s| s.eq_ignore_ascii_case(target))
    }

    /// Consume up to and including `delimiter`, returning what came before it.
    /// At end of input everything remaining is returned.
    fn consume_until(&mut self, delimiter: &str) -> &'a str {
        let rest = self.rest();
        match rest.find(delimiter) {
            Some(i) => {
                self.pos += i + delimiter.len();
                &rest[..i]
            }
            None => {
                self.pos = self.input.len();
                rest
            }
        }
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(is_whitespace_char) {
            let _ = self.consume();
        }
    }

    fn emit_text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        if let Some(Token::Text(last)) = self.tokens.last_mut() {
            last.push_str(text);
        } else {
            self.tokens.push(Token::Text(text.to_string()));
        }
    }

    // =========================================================================
    // States
    // =========================================================================

    /// [§ 13.2.5.1 Data state](https://html.spec.whatwg.org/multipage/parsing.html#data-state)
    fn data_state(&mut self) {
        let rest = self.rest();
        let text_len = rest.find('<').unwrap_or(rest.len());
        if text_len > 0 {
            self.pos += text_len;
            self.emit_text(&decode(&rest[..text_len]));
            return;
        }

        // [§ 13.2.5.6 Tag open state]
        match self.peek_at(1) {
            Some(c) if c.is_ascii_alphabetic() => {
                self.pos += 1;
                self.start_tag();
            }
            Some('/') => self.end_tag_open(),
            Some('!') => self.markup_declaration_open(),
            // "U+003F QUESTION MARK (?): This is an unexpected-question-mark-instead-of-tag-name
            // parse error. Create a comment token... Reconsume in the bogus comment state."
            Some('?') => {
                self.pos += 1;
                let data = self.consume_until(">").to_string();
                self.tokens.push(Token::Comment(data));
            }
            // "Anything else: This is an invalid-first-character-of-tag-name parse error.
            // Emit a U+003C LESS-THAN SIGN character token."
            _ => {
                self.pos += 1;
                self.emit_text("<");
            }
        }
    }

    /// [§ 13.2.5.7 End tag open state](https://html.spec.whatwg.org/multipage/parsing.html#end-tag-open-state)
    fn end_tag_open(&mut self) {
        self.pos += 2;
        match self.peek() {
            Some(c) if c.is_ascii_alphabetic() => {
                let name = self.tag_name();
                // End tags may carry attributes; they are parsed for their extent only.
                match self.attributes() {
                    Some(_) => self.tokens.push(Token::EndTag { name }),
                    None => self.pos = self.input.len(),
                }
            }
            // "U+003E GREATER-THAN SIGN (>): This is a missing-end-tag-name parse error.
            // Switch to the data state."
            Some('>') => self.pos += 1,
            // "EOF: ... Emit a U+003C LESS-THAN SIGN character token and a U+002F SOLIDUS
            // character token."
            None => self.emit_text("</"),
            // "Anything else: ... Create a comment token ... Reconsume in the bogus comment state."
            Some(_) => {
                let data = self.consume_until(">").to_string();
                self.tokens.push(Token::Comment(data));
            }
        }
    }

    /// [§ 13.2.5.42 Markup declaration open state](https://html.spec.whatwg.org/multipage/parsing.html#markup-declaration-open-state)
    fn markup_declaration_open(&mut self) {
        self.pos += 2;
        if self.rest().starts_with("--") {
            self.pos += 2;
            // "<!-->" and "<!--->" are abrupt closings of an empty comment.
            for abrupt in [">", "->"] {
                if self.rest().starts_with(abrupt) {
                    self.pos += abrupt.len();
                    self.tokens.push(Token::Comment(String::new()));
                    return;
                }
            }
            let data = self.consume_until("-->").to_string();
            self.tokens.push(Token::Comment(data));
        } else if self.next_few_characters_are_case_insensitive("DOCTYPE") {
            self.pos += "DOCTYPE".len();
            let data = self.consume_until(">").trim().to_string();
            self.tokens.push(Token::Doctype(data));
        } else {
            // "Otherwise, this is an incorrectly-opened-comment parse error.
            // Create a comment token ... Switch to the bogus comment state."
            let data = self.consume_until(">").to_string();
            self.tokens.push(Token::Comment(data));
        }
    }

    /// [§ 13.2.5.8 Tag name state](https://html.spec.whatwg.org/multipage/parsing.html#tag-name-state)
    fn tag_name(&mut self) -> String {
        let mut name = String::new();
        while let Some(c) = self.peek() {
            if is_whitespace_char(c) || c == '/' || c == '>' {
                break;
            }
            name.push(c.to_ascii_lowercase());
            let _ = self.consume();
        }
        name
    }

    fn start_tag(&mut self) {
        let name = self.tag_name();
        let Some((attributes, self_closing)) = self.attributes() else {
            // "EOF: This is an eof-in-tag parse error. Emit an end-of-file token."
            // The unfinished tag is dropped.
            self.pos = self.input.len();
            return;
        };

        if RCDATA_ELEMENTS.contains(&name.as_str()) {
            self.state = TokenizerState::Rcdata(name.clone());
        } else if RAWTEXT_ELEMENTS.contains(&name.as_str()) {
            self.state = TokenizerState::Rawtext(name.clone());
        }

        self.tokens.push(Token::StartTag {
            name,
            self_closing,
            attributes,
        });
    }

    /// [§ 13.2.5.32 Before attribute name state](https://html.spec.whatwg.org/multipage/parsing.html#before-attribute-name-state)
    /// through [§ 13.2.5.40 Self-closing start tag state](https://html.spec.whatwg.org/multipage/parsing.html#self-closing-start-tag-state).
    ///
    /// Returns the attribute list and the self-closing flag, or `None` if the
    /// input ended inside the tag.
    fn attributes(&mut self) -> Option<(Vec<Attribute>, bool)> {
        let mut attributes: Vec<Attribute> = Vec::new();
        loop {
            self.skip_whitespace();
            match self.peek()? {
                '>' => {
                    self.pos += 1;
                    return Some((attributes, false));
                }
                '/' => {
                    self.pos += 1;
                    if self.peek() == Some('>') {
                        self.pos += 1;
                        return Some((attributes, true));
                    }
                }
                _ => {
                    let attr = self.attribute()?;
                    // "if there is already an attribute on the token with the exact
                    // same name, then this is a duplicate-attribute parse error and
                    // the new attribute must be removed from the token."
                    if !attributes.iter().any(|a| a.name == attr.name) {
                        attributes.push(attr);
                    }
                }
            }
        }
    }

    /// [§ 13.2.5.33 Attribute name state](https://html.spec.whatwg.org/multipage/parsing.html#attribute-name-state)
    fn attribute(&mut self) -> Option<Attribute> {
        let mut name = String::new();
        // "U+003D EQUALS SIGN (=) ... Start a new attribute ... Set that attribute's
        // name to the current input character"
        if self.peek() == Some('=') {
            name.push('=');
            let _ = self.consume();
        }
        while let Some(c) = self.peek() {
            if is_whitespace_char(c) || matches!(c, '/' | '>' | '=') {
                break;
            }
            name.push(c.to_ascii_lowercase());
            let _ = self.consume();
        }

        self.skip_whitespace();
        if self.peek() != Some('=') {
            return Some(Attribute::new(name, ""));
        }
        self.pos += 1;
        self.skip_whitespace();

        // [§ 13.2.5.36-38 Attribute value (double-quoted / single-quoted / unquoted) state]
        let raw = match self.peek()? {
            quote @ ('"' | '\'') => {
                self.pos += 1;
                let rest = self.rest();
                let end = rest.find(quote)?;
                self.pos += end + 1;
                &rest[..end]
            }
            _ => {
                let rest = self.rest();
                let end = rest
                    .find(|c: char| is_whitespace_char(c) || c == '>')
                    .unwrap_or(rest.len());
                self.pos += end;
                &rest[..end]
            }
        };
        Some(Attribute::new(name, decode(raw)))
    }

    /// RCDATA / RAWTEXT content: everything up to an appropriate end tag for
    /// `name`, which is then emitted as well.
    ///
    /// [§ 13.2.5.11 RCDATA end tag name state]: "If the current end tag token is an
    /// appropriate end tag token, then switch to the before attribute name state."
    fn raw_text(&mut self, name: &str, decode_references: bool) {
        let rest = self.rest();
        let mut search = 0;
        let end = loop {
            let Some(found) = rest[search..].find("</") else {
                break None;
            };
            let at = search + found;
            let after = &rest[at + 2..];
            let closes = after
                .get(..name.len())
                .is_some_and(|s| s.eq_ignore_ascii_case(name))
                && after[name.len()..]
                    .chars()
                    .next()
                    .is_none_or(|c| is_whitespace_char(c) || c == '/' || c == '>');
            if closes {
                break Some(at);
            }
            search = at + 2;
        };

        let content_len = end.unwrap_or(rest.len());
        let content = &rest[..content_len];
        if decode_references {
            self.emit_text(&decode(content));
        } else {
            self.emit_text(content);
        }
        self.pos += content_len;

        if end.is_some() {
            // Skip "</" + name, then any attributes up to '>'
            self.pos += 2 + name.len();
            if self.attributes().is_some() {
                self.tokens.push(Token::EndTag {
                    name: name.to_string(),
                });
            }
        }
    }
}

/// [§ 12.1.4 ASCII whitespace](https://infra.spec.whatwg.org/#ascii-whitespace)
///
/// "ASCII whitespace is U+0009 TAB, U+000A LF, U+000C FF, U+000D CR,
/// or U+0020 SPACE."
pub(crate) const fn is_whitespace_char(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\x0C' | '\r')
}
