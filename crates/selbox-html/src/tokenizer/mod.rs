//! HTML tokenizer module.
//!
//! A compact take on [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization):
//! tags, attributes, comments, DOCTYPEs, raw text elements, and a small set
//! of character references.

/// Character reference decoding per § 13.2.5.72.
pub mod character_reference;
/// Tokenizer state machine implementation.
pub mod machine;
/// Token types produced by the tokenizer.
pub mod token;

pub use machine::{HtmlTokenizer, TokenizerState};
pub use token::Token;
