//! Text-level markup processing for the selector sandbox.
//!
//! Both halves of this crate work on the raw markup string and never build a
//! tree:
//!
//! - [`scanner`]: where each opening tag starts, by line.
//! - [`formatter`]: canonical re-indentation.

pub mod formatter;
pub mod scanner;

pub use formatter::{
    DEFAULT_INDENT_SIZE, FormatOptions, INLINE_ELEMENTS, MarkupToken, TokenKind, VOID_ELEMENTS,
    format, format_with, tokenize,
};
pub use scanner::{CommentRange, ScanOptions, SourceTag, comment_ranges, scan_tags};
