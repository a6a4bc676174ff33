//! Common utilities for the selbox sandbox.
//!
//! This crate provides shared infrastructure used by the other crates:
//! - **Line Indexer** - line counts and offset-to-line lookup over raw text
//! - **Warning System** - colored, deduplicated terminal diagnostics

pub mod lines;
pub mod warning;

pub use lines::{LineIndex, line_count};
