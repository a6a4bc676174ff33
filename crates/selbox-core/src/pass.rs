//! One mapping pass: scan, walk, resolve, generate, aggregate.

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use selbox_dom::NodeId;
use selbox_html::RenderedFragment;
use selbox_markup::{ScanOptions, scan_tags};
use selbox_select::SelectorGenerator;
use serde::{Deserialize, Serialize};

use crate::mapper::LineResolver;
use crate::timer::{ElementOutcome, SelectorTimer, SelectorTiming, millis};

/// Selectors grouped by zero-based source line, each line's entries in walk
/// order. Lines with no selectors are absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SelectorsByLine(BTreeMap<usize, Vec<SelectorTiming>>);

impl SelectorsByLine {
    /// Append a selector to `line`.
    pub fn push(&mut self, line: usize, timing: SelectorTiming) {
        self.0.entry(line).or_default().push(timing);
    }

    /// Selectors for `line`, empty when there are none.
    #[must_use]
    pub fn get(&self, line: usize) -> &[SelectorTiming] {
        self.0.get(&line).map(Vec::as_slice).unwrap_or_default()
    }

    /// Lines that have selectors, ascending, with their entries.
    pub fn lines(&self) -> impl Iterator<Item = (usize, &[SelectorTiming])> {
        self.0.iter().map(|(&line, timings)| (line, timings.as_slice()))
    }

    /// Number of lines that have at least one selector.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no line has a selector.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of selectors across all lines.
    #[must_use]
    pub fn selector_count(&self) -> usize {
        self.0.values().map(Vec::len).sum()
    }

    /// Sum of every per-call duration.
    #[must_use]
    pub fn generation_time(&self) -> Duration {
        self.0.values().flatten().map(|t| t.elapsed).sum()
    }
}

/// Per-pass counts of what happened to walked elements.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingStats {
    /// Elements that produced a selector.
    pub mapped: usize,
    /// Elements with no source occurrence left for their tag name.
    pub unmapped: usize,
    /// Elements whose selector generation failed.
    pub skipped: usize,
}

impl MappingStats {
    /// Total elements walked.
    #[must_use]
    pub const fn walked(&self) -> usize {
        self.mapped + self.unmapped + self.skipped
    }

    fn record(&mut self, outcome: &ElementOutcome) {
        match outcome {
            ElementOutcome::Mapped { .. } => self.mapped += 1,
            ElementOutcome::Unmapped => self.unmapped += 1,
            ElementOutcome::Skipped { .. } => self.skipped += 1,
        }
    }
}

/// The result of one pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapResult {
    /// Generated selectors by source line.
    pub selectors_by_line: SelectorsByLine,
    /// Wall-clock time of the whole pass, scanning and walking included.
    /// Serialized as fractional milliseconds under `total_time_ms`.
    #[serde(rename = "total_time_ms", with = "millis")]
    pub total_elapsed: Duration,
    /// Mapped, unmapped and skipped counts.
    pub stats: MappingStats,
}

impl MapResult {
    /// Total pass time in fractional milliseconds.
    #[must_use]
    pub fn total_time_ms(&self) -> f64 {
        self.total_elapsed.as_secs_f64() * 1000.0
    }
}

/// Map every rendered element under `fragment.root` to a source line and
/// generate a timed selector for it, using the comment-aware scanner.
///
/// Never fails. Elements that cannot be resolved or whose generation fails
/// are counted in [`MapResult::stats`] and otherwise left out.
#[must_use]
pub fn map_to_lines<G>(source: &str, fragment: &RenderedFragment, generator: &G) -> MapResult
where
    G: SelectorGenerator + ?Sized,
{
    map_to_lines_with(source, fragment, generator, ScanOptions::default())
}

/// [`map_to_lines`] with explicit scanner options.
#[must_use]
pub fn map_to_lines_with<G>(
    source: &str,
    fragment: &RenderedFragment,
    generator: &G,
    options: ScanOptions,
) -> MapResult
where
    G: SelectorGenerator + ?Sized,
{
    map_observed(source, fragment, generator, options, |_, _| {})
}

/// [`map_to_lines_with`], reporting each element's outcome to `observe` in
/// walk order as it happens.
#[must_use]
pub fn map_observed<G, F>(
    source: &str,
    fragment: &RenderedFragment,
    generator: &G,
    options: ScanOptions,
    mut observe: F,
) -> MapResult
where
    G: SelectorGenerator + ?Sized,
    F: FnMut(NodeId, &ElementOutcome),
{
    if source.trim().is_empty() {
        return MapResult::default();
    }
    let start = Instant::now();

    let mut resolver = LineResolver::new(&scan_tags(source, options));
    let timer = SelectorTimer::new(generator);
    let mut result = MapResult::default();

    for element in fragment.elements() {
        let tag_name = fragment.tag_name(element).to_ascii_lowercase();
        let outcome = match resolver.resolve(&tag_name) {
            None => ElementOutcome::Unmapped,
            Some(line) => match timer.time(&fragment.tree, element, fragment.root) {
                Ok(timing) => ElementOutcome::Mapped { line, timing },
                Err(error) => ElementOutcome::Skipped { line, error },
            },
        };
        observe(element, &outcome);
        result.stats.record(&outcome);
        if let ElementOutcome::Mapped { line, timing } = outcome {
            result.selectors_by_line.push(line, timing);
        }
    }

    result.total_elapsed = start.elapsed();
    result
}
