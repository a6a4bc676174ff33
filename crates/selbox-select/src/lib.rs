//! Selector matching and unique selector generation.
//!
//! # Modules
//!
//! - [`selector`] - Parsing and scoped matching for a subset of
//!   [Selectors Level 4](https://www.w3.org/TR/selectors-4/)
//! - [`generator`] - Builds a selector that identifies exactly one element
//!   under a scoping root

pub mod generator;
pub mod selector;

pub use generator::{
    CandidateKind, GenerateError, GeneratorOptions, SelectorGenerator, UniqueSelectorGenerator,
};
pub use selector::{ParsedSelector, is_unique, parse_selector, query_all};
