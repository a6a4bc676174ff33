//! Integration tests for scoped selector matching over rendered markup.

use selbox_dom::NodeId;
use selbox_html::{HtmlRenderer, Isolation, RenderedFragment, Renderer};
use selbox_select::{is_unique, parse_selector, query_all};

/// Helper to render markup into the shared container
fn render(html: &str) -> RenderedFragment {
    HtmlRenderer::default().render(html)
}

/// Helper to run a query and describe each match as `tag#id` (or just `tag`)
fn select(fragment: &RenderedFragment, selector: &str) -> Vec<String> {
    let parsed = parse_selector(selector).expect("selector should parse");
    query_all(&fragment.tree, fragment.root, &parsed)
        .into_iter()
        .map(|id| {
            let element = fragment.tree.as_element(id).expect("match is an element");
            match element.id() {
                Some(el_id) => format!("{}#{el_id}", element.tag_name),
                None => element.tag_name.clone(),
            }
        })
        .collect()
}

/// Helper to find the first rendered element with the given tag name
fn first(fragment: &RenderedFragment, tag: &str) -> NodeId {
    fragment
        .elements()
        .find(|&id| fragment.tag_name(id) == tag)
        .expect("tag should be rendered")
}

const LIST: &str = r#"<section id="s">
  <ul class="nav main">
    <li id="a" data-k="one">A</li>
    <li id="b" lang="en-US">B</li>
    <li id="c" class="last"></li>
  </ul>
  <p id="p1">x</p><p id="p2">y</p>
</section>"#;

#[test]
fn test_simple_selectors() {
    let fragment = render(LIST);
    assert_eq!(select(&fragment, "li"), vec!["li#a", "li#b", "li#c"]);
    assert_eq!(select(&fragment, "LI"), vec!["li#a", "li#b", "li#c"]);
    assert_eq!(select(&fragment, "#b"), vec!["li#b"]);
    assert_eq!(select(&fragment, ".main"), vec!["ul"]);
    assert_eq!(select(&fragment, "ul.nav.main"), vec!["ul"]);
    assert_eq!(select(&fragment, ".missing"), Vec::<String>::new());
    assert_eq!(select(&fragment, "*").len(), 7);
}

#[test]
fn test_attribute_selectors() {
    let fragment = render(LIST);
    assert_eq!(select(&fragment, "[data-k]"), vec!["li#a"]);
    assert_eq!(select(&fragment, "[data-k=\"one\"]"), vec!["li#a"]);
    assert_eq!(select(&fragment, "[data-k=two]"), Vec::<String>::new());
    assert_eq!(select(&fragment, "[class~=\"nav\"]"), vec!["ul"]);
    assert_eq!(select(&fragment, "[lang|=en]"), vec!["li#b"]);
    assert_eq!(select(&fragment, "[id^=p]"), vec!["p#p1", "p#p2"]);
    assert_eq!(select(&fragment, "[id$=\"2\"]"), vec!["p#p2"]);
    assert_eq!(select(&fragment, "[lang*=\"n-U\"]"), vec!["li#b"]);
}

#[test]
fn test_structural_pseudo_classes() {
    let fragment = render(LIST);
    assert_eq!(select(&fragment, "li:first-child"), vec!["li#a"]);
    assert_eq!(select(&fragment, "li:last-child"), vec!["li#c"]);
    assert_eq!(select(&fragment, "li:nth-child(2)"), vec!["li#b"]);
    assert_eq!(select(&fragment, "p:nth-of-type(2)"), vec!["p#p2"]);
    assert_eq!(select(&fragment, "p:first-of-type"), vec!["p#p1"]);
    assert_eq!(select(&fragment, "p:last-of-type"), vec!["p#p2"]);
    assert_eq!(select(&fragment, ":nth-child(2)"), vec!["li#b", "p#p1"]);
    assert_eq!(select(&fragment, "li:empty"), vec!["li#c"]);
    assert_eq!(select(&fragment, "section:only-child"), vec!["section#s"]);
}

#[test]
fn test_combinators() {
    let fragment = render(LIST);
    assert_eq!(select(&fragment, "section li"), vec!["li#a", "li#b", "li#c"]);
    assert_eq!(select(&fragment, "section > li"), Vec::<String>::new());
    assert_eq!(select(&fragment, "ul > li + li"), vec!["li#b", "li#c"]);
    assert_eq!(select(&fragment, "#a ~ li"), vec!["li#b", "li#c"]);
    assert_eq!(select(&fragment, "ul ~ p"), vec!["p#p1", "p#p2"]);
    assert_eq!(select(&fragment, "p + p"), vec!["p#p2"]);
}

#[test]
fn test_descendant_combinator_backtracks() {
    // The nearest `div` ancestor is not inside a `section`, a farther one is
    let fragment = render("<section><div><article><div><b id=x></b></div></article></div></section>");
    assert_eq!(select(&fragment, "section > div b"), vec!["b#x"]);
    assert_eq!(select(&fragment, "section > div > article b"), vec!["b#x"]);
}

#[test]
fn test_scope_pseudo_class() {
    let fragment = render(LIST);
    assert_eq!(select(&fragment, ":scope > section"), vec!["section#s"]);
    assert_eq!(select(&fragment, ":scope > ul"), Vec::<String>::new());
    assert_eq!(select(&fragment, ":scope li:nth-child(3)"), vec!["li#c"]);
    // The scope itself is never a result
    assert_eq!(select(&fragment, ":scope"), Vec::<String>::new());
}

#[test]
fn test_matching_stops_at_scope() {
    // The container lives inside `body` in the host document, but nothing
    // above the container may satisfy a combinator.
    let fragment = render("<p id=only>x</p>");
    assert_eq!(select(&fragment, "p"), vec!["p#only"]);
    assert_eq!(select(&fragment, "body p"), Vec::<String>::new());
    assert_eq!(select(&fragment, "div p"), vec!["p#only"]);
    assert_eq!(select(&fragment, "div > p"), vec!["p#only"]);
    assert_eq!(select(&fragment, "body div p"), Vec::<String>::new());
}

#[test]
fn test_document_scope() {
    let fragment = HtmlRenderer::new(Isolation::Isolated).render("<p>x</p><p>y</p>");
    assert_eq!(select(&fragment, ":scope > html"), vec!["html"]);
    assert_eq!(select(&fragment, ":root"), vec!["html"]);
    assert_eq!(
        select(&fragment, ":scope > html:nth-child(1) > body:nth-child(2) > p:nth-child(2)"),
        vec!["p"]
    );
}

#[test]
fn test_is_unique() {
    let fragment = render(LIST);
    let tree = &fragment.tree;
    let p1 = first(&fragment, "p");
    let unique = parse_selector("#p1").expect("parses");
    let shared = parse_selector("p").expect("parses");
    assert!(is_unique(tree, fragment.root, &unique, p1));
    assert!(!is_unique(tree, fragment.root, &shared, p1));
    assert!(!is_unique(tree, fragment.root, &unique, first(&fragment, "ul")));
}
