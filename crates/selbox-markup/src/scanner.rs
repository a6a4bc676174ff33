//! Source Tag Scanner.
//!
//! Finds every opening tag in raw markup, in source order, with the line it
//! starts on. This looks only at the text; it knows nothing about how a
//! parser would later nest, imply or drop those tags.
//!
//! A tag is recognized as `<`, an ASCII letter, more ASCII letters or
//! digits, then anything up to the first `>`. The name must end at a word
//! boundary, so `<a_b>` is not a tag. Closing tags never match because `/`
//! is not a letter.

use selbox_common::LineIndex;

/// One opening-tag occurrence in the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceTag {
    /// ASCII-lowercased tag name.
    pub tag_name: String,
    /// Zero-based line of the tag's `<`.
    pub line: usize,
    /// Byte offset of the tag's `<`.
    pub offset: usize,
}

/// A `<!-- ... -->` span, as a half-open byte range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommentRange {
    /// Offset of the `<` in `<!--`.
    pub start: usize,
    /// Offset just past the `>` in `-->`.
    pub end: usize,
}

impl CommentRange {
    /// Whether `offset` falls inside this comment.
    #[must_use]
    pub const fn contains(&self, offset: usize) -> bool {
        self.start <= offset && offset < self.end
    }
}

/// Scanner behavior switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanOptions {
    /// Drop tags whose `<` lies inside a comment. When off, tags written in
    /// comments are counted like any other and the mapper over-counts.
    pub skip_comments: bool,
}

impl ScanOptions {
    /// Comment-naive scanning.
    #[must_use]
    pub const fn naive() -> Self {
        Self {
            skip_comments: false,
        }
    }
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            skip_comments: true,
        }
    }
}

/// Every terminated comment in `text`, in order.
///
/// Each comment ends at the nearest `-->` after its `<!--`. An unterminated
/// `<!--` is not a comment.
#[must_use]
pub fn comment_ranges(text: &str) -> Vec<CommentRange> {
    let mut ranges = Vec::new();
    let mut pos = 0;
    while let Some(found) = text[pos..].find("<!--") {
        let start = pos + found;
        let body = start + "<!--".len();
        let Some(close) = text[body..].find("-->") else {
            break;
        };
        let end = body + close + "-->".len();
        ranges.push(CommentRange { start, end });
        pos = end;
    }
    ranges
}

/// Every opening tag in `text`, in source order.
#[must_use]
pub fn scan_tags(text: &str, options: ScanOptions) -> Vec<SourceTag> {
    let lines = LineIndex::new(text);
    let comments = if options.skip_comments {
        comment_ranges(text)
    } else {
        Vec::new()
    };

    let mut tags = Vec::new();
    let mut pos = 0;
    while let Some(found) = text[pos..].find('<') {
        let start = pos + found;
        let Some((name_end, end)) = match_open_tag(text.as_bytes(), start) else {
            pos = start + 1;
            continue;
        };
        if !comments.iter().any(|c| c.contains(start)) {
            tags.push(SourceTag {
                tag_name: text[start + 1..name_end].to_ascii_lowercase(),
                line: lines.line_of(start),
                offset: start,
            });
        }
        pos = end;
    }
    tags
}

/// Try to match an opening tag whose `<` is at `start`. Returns the end of
/// the name and the offset just past the closing `>`.
fn match_open_tag(bytes: &[u8], start: usize) -> Option<(usize, usize)> {
    let first = *bytes.get(start + 1)?;
    if !first.is_ascii_alphabetic() {
        return None;
    }
    let name_end = start
        + 1
        + bytes[start + 1..]
            .iter()
            .take_while(|b| b.is_ascii_alphanumeric())
            .count();
    // Name characters are all word characters, so the boundary after the
    // name only fails on `_`.
    if bytes.get(name_end) == Some(&b'_') {
        return None;
    }
    let close = bytes[name_end..].iter().position(|&b| b == b'>')?;
    Some((name_end, name_end + close + 1))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Helper to reduce scan output to `(name, line)` pairs.
    fn names_and_lines(text: &str, options: ScanOptions) -> Vec<(String, usize)> {
        scan_tags(text, options)
            .into_iter()
            .map(|tag| (tag.tag_name, tag.line))
            .collect()
    }

    #[test]
    fn test_opening_tags_only() {
        let found = names_and_lines("<div><p>x</p><br/></div>", ScanOptions::default());
        assert_eq!(
            found,
            vec![
                ("div".to_string(), 0),
                ("p".to_string(), 0),
                ("br".to_string(), 0)
            ]
        );
    }

    #[test]
    fn test_lines_and_case() {
        let found = names_and_lines("<SECTION>\n  <Article id=a>\n</section>", ScanOptions::default());
        assert_eq!(
            found,
            vec![("section".to_string(), 0), ("article".to_string(), 1)]
        );
    }

    #[test]
    fn test_attributes_may_span_lines() {
        let tags = scan_tags("<a\n  href=\"x\"\n>link</a>\n<b>", ScanOptions::default());
        assert_eq!(tags.len(), 2);
        assert_eq!(tags[0].line, 0);
        assert_eq!(tags[1].line, 3);
        assert_eq!(tags[1].offset, 24);
    }

    #[test]
    fn test_rejected_shapes() {
        // Closing tags, non-letter starts, underscores after the name and
        // unterminated tags never match.
        let found = names_and_lines("</div> < p> <1> <a_b> <h1-x> <em", ScanOptions::default());
        assert_eq!(found, vec![("h1".to_string(), 0)]);
    }

    #[test]
    fn test_comment_ranges() {
        let text = "a<!-- x -->b<!---->c<!-- open";
        assert_eq!(
            comment_ranges(text),
            vec![
                CommentRange { start: 1, end: 11 },
                CommentRange { start: 12, end: 19 }
            ]
        );
        assert!(CommentRange { start: 1, end: 11 }.contains(1));
        assert!(!CommentRange { start: 1, end: 11 }.contains(11));
    }

    #[test]
    fn test_comment_aware_and_naive() {
        let text = "<!-- <div></div> -->\n<div></div>";
        assert_eq!(
            names_and_lines(text, ScanOptions::default()),
            vec![("div".to_string(), 1)]
        );
        assert_eq!(
            names_and_lines(text, ScanOptions::naive()),
            vec![("div".to_string(), 0), ("div".to_string(), 1)]
        );
    }
}
