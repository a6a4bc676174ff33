//! Source-line selector mapping for the selbox sandbox.
//!
//! # Scope
//!
//! This crate provides:
//! - **Position Mapper** - rendered elements to source lines by tag ordinal
//! - **Selector Timer** - per-element generation timings
//! - **Mapping Pass** - the scan, walk, generate and aggregate cycle
//! - **Host Session** - text ownership and fresh passes on every change
//! - **Configuration** - JSON-loadable settings
//!
//! The three entry points of the sandbox are [`format`], [`map_to_lines`]
//! and [`line_count`].

pub mod config;
pub mod mapper;
pub mod pass;
pub mod session;
pub mod timer;

pub use selbox_common as common;
pub use selbox_dom as dom;
pub use selbox_html as html;
pub use selbox_markup as markup;
pub use selbox_select as select;

pub use config::{ConfigError, SandboxConfig};
pub use mapper::{LineResolver, TagLineIndex, TagOccurrenceCounter};
pub use pass::{
    MapResult, MappingStats, SelectorsByLine, map_observed, map_to_lines, map_to_lines_with,
};
pub use selbox_common::line_count;
pub use selbox_markup::format;
pub use session::{DEFAULT_SAMPLE, LineView, Session};
pub use timer::{ElementOutcome, SelectorTimer, SelectorTiming};
