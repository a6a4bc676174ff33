//! Position Mapper.
//!
//! Associates each rendered element with the source line of its opening tag
//! by ordinal: the k-th rendered `li` belongs to the k-th `li` the scanner
//! found in the source. This is a heuristic. A renderer that implies,
//! drops or moves elements shifts the ordinals, and the mapping follows the
//! renderer's output rather than the author's intent.

use std::collections::HashMap;

use selbox_markup::SourceTag;

/// For each tag name, the lines of its source occurrences in source order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagLineIndex {
    lines: HashMap<String, Vec<usize>>,
}

impl TagLineIndex {
    /// Group scanned tags by name, keeping source order within each name.
    #[must_use]
    pub fn build(tags: &[SourceTag]) -> Self {
        let mut lines: HashMap<String, Vec<usize>> = HashMap::new();
        for tag in tags {
            lines.entry(tag.tag_name.clone()).or_default().push(tag.line);
        }
        Self { lines }
    }

    /// The `ordinal`-th (zero-based) source line for `tag_name`.
    #[must_use]
    pub fn line(&self, tag_name: &str, ordinal: usize) -> Option<usize> {
        self.lines.get(tag_name)?.get(ordinal).copied()
    }

    /// Number of source occurrences of `tag_name`.
    #[must_use]
    pub fn occurrences(&self, tag_name: &str) -> usize {
        self.lines.get(tag_name).map_or(0, Vec::len)
    }
}

/// How many rendered elements of each tag name have been seen so far.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagOccurrenceCounter {
    seen: HashMap<String, usize>,
}

impl TagOccurrenceCounter {
    /// Return the current count for `tag_name`, then increment it.
    pub fn next(&mut self, tag_name: &str) -> usize {
        let count = self.seen.entry(tag_name.to_string()).or_default();
        let ordinal = *count;
        *count += 1;
        ordinal
    }

    /// The current count for `tag_name`.
    #[must_use]
    pub fn count(&self, tag_name: &str) -> usize {
        self.seen.get(tag_name).copied().unwrap_or_default()
    }
}

/// Resolves rendered elements to source lines for a single pass.
///
/// Owns a fresh [`TagOccurrenceCounter`], so a resolver must never be reused
/// across passes.
#[derive(Debug, Clone)]
pub struct LineResolver {
    index: TagLineIndex,
    counter: TagOccurrenceCounter,
}

impl LineResolver {
    /// Start a pass over the given source tags.
    #[must_use]
    pub fn new(tags: &[SourceTag]) -> Self {
        Self {
            index: TagLineIndex::build(tags),
            counter: TagOccurrenceCounter::default(),
        }
    }

    /// The source line for the next rendered element named `tag_name`
    /// (already lowercased), or `None` when the renderer produced more of
    /// them than the source contains.
    ///
    /// The counter advances either way, so a surplus element never shifts
    /// the ordinals of the ones after it.
    pub fn resolve(&mut self, tag_name: &str) -> Option<usize> {
        let ordinal = self.counter.next(tag_name);
        self.index.line(tag_name, ordinal)
    }

    /// The tag index this resolver reads from.
    #[must_use]
    pub const fn index(&self) -> &TagLineIndex {
        &self.index
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use selbox_markup::{ScanOptions, scan_tags};

    #[test]
    fn test_index_keeps_source_order_per_name() {
        let tags = scan_tags("<ul>\n<li>\n<li>\n</ul>\n<li>", ScanOptions::default());
        let index = TagLineIndex::build(&tags);
        assert_eq!(index.line("li", 0), Some(1));
        assert_eq!(index.line("li", 1), Some(2));
        assert_eq!(index.line("li", 2), Some(4));
        assert_eq!(index.line("li", 3), None);
        assert_eq!(index.occurrences("ul"), 1);
        assert_eq!(index.occurrences("p"), 0);
    }

    #[test]
    fn test_counter() {
        let mut counter = TagOccurrenceCounter::default();
        assert_eq!(counter.next("p"), 0);
        assert_eq!(counter.next("p"), 1);
        assert_eq!(counter.next("div"), 0);
        assert_eq!(counter.count("p"), 2);
        assert_eq!(counter.count("span"), 0);
    }

    #[test]
    fn test_resolver_counts_surplus_elements() {
        let tags = scan_tags("<p>\n<p>", ScanOptions::default());
        let mut resolver = LineResolver::new(&tags);
        assert_eq!(resolver.resolve("tbody"), None);
        assert_eq!(resolver.resolve("p"), Some(0));
        assert_eq!(resolver.resolve("p"), Some(1));
        assert_eq!(resolver.resolve("p"), None);
        assert_eq!(resolver.resolve("tbody"), None);
        assert_eq!(resolver.index().occurrences("p"), 2);
    }
}
