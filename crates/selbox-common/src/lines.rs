//! Line Indexer: line counts and byte-offset to line lookup.
//!
//! Lines are `\n`-delimited and zero-based. A `\r` before the `\n` belongs to
//! the preceding line; it is never a separator on its own.

/// Number of `\n`-delimited segments in `text`.
///
/// An empty string has no lines, text without a newline has one, and a
/// trailing newline opens a final empty line.
#[must_use]
pub fn line_count(text: &str) -> usize {
    if text.is_empty() {
        return 0;
    }
    text.bytes().filter(|&b| b == b'\n').count() + 1
}

/// Precomputed newline positions for repeated offset lookups.
#[derive(Debug, Clone, Default)]
pub struct LineIndex {
    /// Byte offsets of every `\n`, ascending.
    newlines: Vec<usize>,
}

impl LineIndex {
    /// Index every newline in `text`.
    #[must_use]
    pub fn new(text: &str) -> Self {
        let newlines = text
            .bytes()
            .enumerate()
            .filter_map(|(i, b)| (b == b'\n').then_some(i))
            .collect();
        Self { newlines }
    }

    /// Zero-based line containing the byte at `offset`.
    ///
    /// This is the number of newlines strictly before `offset`, so a newline
    /// character itself belongs to the line it terminates. Offsets past the
    /// end of the text land on the last line.
    #[must_use]
    pub fn line_of(&self, offset: usize) -> usize {
        self.newlines.partition_point(|&nl| nl < offset)
    }

    /// Byte offset at which `line` starts, or `None` if the text has fewer lines.
    #[must_use]
    pub fn line_start(&self, line: usize) -> Option<usize> {
        match line {
            0 => Some(0),
            n => self.newlines.get(n - 1).map(|&nl| nl + 1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_count_edges() {
        assert_eq!(line_count(""), 0);
        assert_eq!(line_count("a"), 1);
        assert_eq!(line_count("a\nb"), 2);
        assert_eq!(line_count("\n"), 2);
        assert_eq!(line_count("a\r\nb\r\n"), 3);
    }

    #[test]
    fn test_line_of_counts_preceding_newlines() {
        let text = "<div>\n  <p>\n</div>";
        let index = LineIndex::new(text);

        assert_eq!(index.line_of(0), 0);
        // The newline itself still belongs to line 0
        assert_eq!(index.line_of(5), 0);
        assert_eq!(index.line_of(6), 1);
        assert_eq!(index.line_of(text.find("</div>").unwrap()), 2);
        assert_eq!(index.line_of(10_000), 2);
    }

    #[test]
    fn test_line_start() {
        let index = LineIndex::new("ab\ncd\n");
        assert_eq!(index.line_start(0), Some(0));
        assert_eq!(index.line_start(1), Some(3));
        assert_eq!(index.line_start(2), Some(6));
        assert_eq!(index.line_start(3), None);
    }
}
