use selbox_dom::Attribute;

/// [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
///
/// "The output of the tokenization step is a series of zero or more of the following
/// tokens: DOCTYPE, start tag, end tag, comment, character, end-of-file."
///
/// Character tokens are coalesced into runs, and end-of-file is implied by the
/// end of the token list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// A DOCTYPE declaration; only the raw text after `<!DOCTYPE` is kept.
    Doctype(String),

    /// "Start and end tag tokens have a tag name, a self-closing flag, and a
    /// list of attributes, each of which has a name and a value."
    StartTag {
        /// "a tag name", ASCII lower-cased
        name: String,
        /// "a self-closing flag"
        self_closing: bool,
        /// "a list of attributes", first occurrence of each name wins
        attributes: Vec<Attribute>,
    },

    /// End tag token. Attributes on end tags are parsed and dropped.
    EndTag {
        /// "a tag name", ASCII lower-cased
        name: String,
    },

    /// "Comment and character tokens have data."
    Comment(String),

    /// A run of character tokens with character references decoded.
    Text(String),
}

impl Token {
    /// Tag name for start and end tags.
    #[must_use]
    pub fn tag_name(&self) -> Option<&str> {
        match self {
            Self::StartTag { name, .. } | Self::EndTag { name } => Some(name),
            _ => None,
        }
    }

    /// Convenience constructor for a start tag without attributes.
    #[must_use]
    pub fn start(name: &str) -> Self {
        Self::StartTag {
            name: name.to_string(),
            self_closing: false,
            attributes: Vec::new(),
        }
    }

    /// Convenience constructor for an end tag.
    #[must_use]
    pub fn end(name: &str) -> Self {
        Self::EndTag {
            name: name.to_string(),
        }
    }
}
