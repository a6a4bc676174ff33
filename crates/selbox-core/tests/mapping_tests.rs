//! Integration tests for the mapping pass over rendered markup.

use std::time::Duration;

use selbox_core::{
    DEFAULT_SAMPLE, MapResult, SelectorsByLine, line_count, map_to_lines, map_to_lines_with,
};
use selbox_dom::{DomTree, NodeId};
use selbox_html::{HtmlRenderer, Isolation, Renderer};
use selbox_markup::ScanOptions;
use selbox_select::{GenerateError, UniqueSelectorGenerator};

/// Helper generator that names each element by its tag, so mapping can be
/// checked independently of selector generation.
fn tag_of(tree: &DomTree, element: NodeId, _root: NodeId) -> Result<String, GenerateError> {
    Ok(tree.tag_name(element).unwrap_or_default().to_string())
}

/// Helper to map markup rendered into the shared container
fn map(source: &str) -> MapResult {
    let fragment = HtmlRenderer::default().render(source);
    map_to_lines(source, &fragment, &tag_of)
}

/// Helper to flatten a result to `(line, selector)` pairs in line order
fn pairs(by_line: &SelectorsByLine) -> Vec<(usize, String)> {
    by_line
        .lines()
        .flat_map(|(line, timings)| timings.iter().map(move |t| (line, t.selector.clone())))
        .collect()
}

/// Helper to build owned pairs from literals
fn expected(items: &[(usize, &str)]) -> Vec<(usize, String)> {
    items.iter().map(|&(l, s)| (l, s.to_string())).collect()
}

#[test]
fn test_line_count() {
    assert_eq!(line_count(""), 0);
    assert_eq!(line_count("a"), 1);
    assert_eq!(line_count("a\nb"), 2);
    assert_eq!(line_count(DEFAULT_SAMPLE), 9);
}

#[test]
fn test_single_line_keeps_document_order() {
    let result = map("<div><p>x</p></div>");
    assert_eq!(
        pairs(&result.selectors_by_line),
        expected(&[(0, "div"), (0, "p")])
    );
    assert_eq!(result.stats.mapped, 2);
}

#[test]
fn test_nth_rendered_matches_nth_source_occurrence() {
    let result = map("<section>\n  <article>\n  </article>\n</section>");
    assert_eq!(
        pairs(&result.selectors_by_line),
        expected(&[(0, "section"), (1, "article")])
    );

    let result = map("<ul>\n<li>a</li>\n<li>b</li>\n</ul>\n<ul><li>c</li></ul>");
    assert_eq!(
        pairs(&result.selectors_by_line),
        expected(&[(0, "ul"), (1, "li"), (2, "li"), (4, "ul"), (4, "li")])
    );
}

#[test]
fn test_comment_aware_and_naive_scanning() {
    let source = "<!-- <div></div> -->\n<div></div>";
    let fragment = HtmlRenderer::default().render(source);

    let aware = map_to_lines(source, &fragment, &tag_of);
    assert_eq!(pairs(&aware.selectors_by_line), expected(&[(1, "div")]));

    // The commented-out tag takes the first ordinal
    let naive = map_to_lines_with(source, &fragment, &tag_of, ScanOptions::naive());
    assert_eq!(pairs(&naive.selectors_by_line), expected(&[(0, "div")]));
}

#[test]
fn test_implied_elements_are_unmapped() {
    let result = map("<table>\n<tr><td>x</td></tr>\n</table>");
    assert_eq!(
        pairs(&result.selectors_by_line),
        expected(&[(0, "table"), (1, "tr"), (1, "td")])
    );
    assert_eq!(result.stats.unmapped, 1);
    assert_eq!(result.stats.walked(), 4);
}

#[test]
fn test_isolated_wrappers_are_unmapped() {
    let source = "<p>x</p>";
    let fragment = HtmlRenderer::new(Isolation::Isolated).render(source);
    let result = map_to_lines(source, &fragment, &tag_of);
    assert_eq!(pairs(&result.selectors_by_line), expected(&[(0, "p")]));
    assert_eq!(result.stats.unmapped, 3);
}

#[test]
fn test_explicit_wrappers_map_in_isolation() {
    let source = "<html>\n<body>\n<p>x</p>\n</body>\n</html>";
    let fragment = HtmlRenderer::new(Isolation::Isolated).render(source);
    let result = map_to_lines(source, &fragment, &tag_of);
    assert_eq!(
        pairs(&result.selectors_by_line),
        expected(&[(0, "html"), (1, "body"), (2, "p")])
    );
    // Only the synthesized head is unmapped
    assert_eq!(result.stats.unmapped, 1);
}

#[test]
fn test_generation_failures_are_skipped() {
    let source = "<div>\n<p>x</p>\n<span>y</span>\n</div>";
    let fragment = HtmlRenderer::default().render(source);
    let refuse_p = |tree: &DomTree, element: NodeId, root: NodeId| {
        if tree.tag_name(element) == Some("p") {
            Err(GenerateError::InvalidSelector("p".to_string()))
        } else {
            tag_of(tree, element, root)
        }
    };
    let result = map_to_lines(source, &fragment, &refuse_p);
    assert_eq!(
        pairs(&result.selectors_by_line),
        expected(&[(0, "div"), (2, "span")])
    );
    assert!(result.selectors_by_line.get(1).is_empty());
    assert_eq!(result.stats.skipped, 1);
    assert_eq!(result.stats.mapped, 2);
}

#[test]
fn test_empty_source_takes_no_time() {
    for source in ["", "   ", "\n\t\n"] {
        let fragment = HtmlRenderer::default().render(source);
        let result = map_to_lines(source, &fragment, &tag_of);
        assert!(result.selectors_by_line.is_empty());
        assert_eq!(result.total_elapsed, Duration::ZERO);
    }
}

#[test]
fn test_total_covers_every_call() {
    let slow = |tree: &DomTree, element: NodeId, root: NodeId| {
        std::thread::sleep(Duration::from_millis(1));
        tag_of(tree, element, root)
    };
    let source = "<ul><li>a</li><li>b</li></ul>";
    let fragment = HtmlRenderer::default().render(source);
    let result = map_to_lines(source, &fragment, &slow);
    let sum = result.selectors_by_line.generation_time();
    assert_eq!(result.selectors_by_line.selector_count(), 3);
    assert!(sum >= Duration::from_millis(3));
    assert!(result.total_elapsed >= sum);
}

#[test]
fn test_passes_are_independent() {
    let source = "<p>a</p>\n<p>b</p>";
    let fragment = HtmlRenderer::default().render(source);
    let first = map_to_lines(source, &fragment, &tag_of);
    let second = map_to_lines(source, &fragment, &tag_of);
    assert_eq!(
        pairs(&first.selectors_by_line),
        pairs(&second.selectors_by_line)
    );
    assert_eq!(first.stats, second.stats);
}

#[test]
fn test_sample_with_unique_generator() {
    let fragment = HtmlRenderer::default().render(DEFAULT_SAMPLE);
    let result = map_to_lines(DEFAULT_SAMPLE, &fragment, &UniqueSelectorGenerator::default());
    assert_eq!(
        pairs(&result.selectors_by_line),
        expected(&[
            (0, ".container"),
            (1, "header"),
            (2, "h1"),
            (4, "main"),
            (5, "p:nth-child(1)"),
            (6, ":nth-of-type(2)"),
        ])
    );
    assert_eq!(result.stats.unmapped + result.stats.skipped, 0);
}

#[test]
fn test_result_serializes_in_milliseconds() {
    let mut result = map("<p>x</p>");
    result.total_elapsed = Duration::from_secs(2);
    let json = serde_json::to_value(&result).expect("serializes");
    assert_eq!(json["total_time_ms"], 2000.0);
    assert_eq!(json["selectors_by_line"]["0"][0]["selector"], "p");
    assert!(json["selectors_by_line"]["0"][0]["time_ms"].is_number());
    assert_eq!(json["stats"]["mapped"], 1);

    let text = serde_json::to_string(&result).expect("serializes");
    let back: MapResult = serde_json::from_str(&text).expect("deserializes");
    assert_eq!(back.total_elapsed, Duration::from_secs(2));
    assert_eq!(back.selectors_by_line.get(0)[0].selector, "p");
}
