//! HTML tokenizer, tree builder and renderer for the selector sandbox.
//!
//! # Scope
//!
//! This crate implements:
//! - **HTML Tokenizer** ([WHATWG § 13.2.5](https://html.spec.whatwg.org/multipage/parsing.html#tokenization))
//!   - Data, RCDATA and RAWTEXT states
//!   - DOCTYPE, comment, and a small set of character references
//!   - Attribute parsing
//!
//! - **Tree Builder** ([WHATWG § 13.2.6](https://html.spec.whatwg.org/multipage/parsing.html#tree-construction))
//!   - Fragment parsing into a container, or whole documents with implied
//!     `html`, `head` and `body`
//!   - Implied end tags, auto-closed `p`, `li`, `dd`, `dt` and `option`
//!   - Implied `tbody`, `tr` and `colgroup` inside tables
//!
//! - **Renderer**: the [`Renderer`] seam the mapper renders markup through.
//!
//! # Not Yet Implemented
//!
//! - Foster parenting
//! - Adoption agency algorithm
//! - Full named character reference table

/// Tree construction.
pub mod parser;
/// Markup to rendered tree.
pub mod renderer;
/// HTML tokenizer for converting input into tokens.
pub mod tokenizer;

pub use parser::{HtmlParser, ParseIssue, VOID_ELEMENTS, print_tree};
pub use renderer::{CONTAINER_CLASS, HtmlRenderer, Isolation, RenderedFragment, Renderer};
pub use tokenizer::{HtmlTokenizer, Token};
