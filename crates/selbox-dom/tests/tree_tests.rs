//! Tests for tree construction, traversal order, and sibling indices.

use selbox_dom::{DomTree, ElementData, NodeId, NodeType};

/// Helper to append an element under `parent` and return its NodeId.
fn element(tree: &mut DomTree, parent: NodeId, tag: &str) -> NodeId {
    tree.append_element(parent, ElementData::new(tag))
}

/// Builds `<div><p>a</p><!--c--><span><b></b></span><p></p></div>` by hand.
fn sample() -> (DomTree, [NodeId; 5]) {
    let mut tree = DomTree::new();
    let div = element(&mut tree, NodeId::ROOT, "div");
    let p1 = element(&mut tree, div, "p");
    tree.append_text(p1, "a");
    let comment = tree.alloc(NodeType::Comment("c".to_string()));
    tree.append_child(div, comment);
    let span = element(&mut tree, div, "span");
    let b = element(&mut tree, span, "b");
    let p2 = element(&mut tree, div, "p");
    (tree, [div, p1, span, b, p2])
}

#[test]
fn test_descendant_elements_are_preorder() {
    let (tree, [div, p1, span, b, p2]) = sample();

    let walked: Vec<NodeId> = tree.descendant_elements(NodeId::ROOT).collect();
    assert_eq!(walked, vec![div, p1, span, b, p2]);

    // The walk root itself is never yielded
    let inside: Vec<NodeId> = tree.descendant_elements(div).collect();
    assert_eq!(inside, vec![p1, span, b, p2]);
}

#[test]
fn test_descendants_include_text_and_comments() {
    let (tree, [div, ..]) = sample();
    assert_eq!(tree.descendants(div).count(), 6);
    let text: String = tree
        .descendants(div)
        .filter_map(|n| match &tree.get(n)?.node_type {
            NodeType::Text(data) => Some(data.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(text, "a");
}

#[test]
fn test_sibling_links() {
    let (tree, [div, p1, span, _, p2]) = sample();

    assert_eq!(tree.parent(p1), Some(div));
    assert_eq!(tree.prev_sibling(p1), None);
    assert_eq!(tree.next_sibling(span), Some(p2));
    assert_eq!(tree.preceding_siblings(p2).count(), 3);
}

#[test]
fn test_element_indices_skip_non_elements() {
    let (tree, [div, p1, span, b, p2]) = sample();

    assert_eq!(tree.element_index(p1), Some(1));
    // The comment between p and span does not count
    assert_eq!(tree.element_index(span), Some(2));
    assert_eq!(tree.element_index(p2), Some(3));
    assert_eq!(tree.element_index(b), Some(1));
    assert_eq!(tree.element_index(NodeId::ROOT), None);

    assert_eq!(tree.element_index_of_type(p1), Some(1));
    assert_eq!(tree.element_index_of_type(p2), Some(2));
    assert_eq!(tree.element_index_of_type(span), Some(1));
    assert_eq!(tree.element_children(div).count(), 3);
}

#[test]
fn test_ancestry() {
    let (tree, [div, _, span, b, _]) = sample();

    assert!(tree.is_descendant_of(b, div));
    assert!(tree.is_descendant_of(b, span));
    assert!(!tree.is_descendant_of(div, b));
    assert!(!tree.is_descendant_of(div, div));
    assert_eq!(tree.ancestors(b).collect::<Vec<_>>(), vec![span, div, NodeId::ROOT]);
    assert_eq!(tree.document_element(), Some(div));
}

#[test]
fn test_append_text_merges_adjacent_runs() {
    let mut tree = DomTree::new();
    let p = element(&mut tree, NodeId::ROOT, "p");
    tree.append_text(p, "Hello");
    tree.append_text(p, ", world");
    tree.append_text(p, "");

    assert_eq!(tree.children(p).len(), 1);
    assert_eq!(tree.as_text(tree.children(p)[0]), Some("Hello, world"));
}

#[test]
fn test_element_data_attributes() {
    let data = ElementData::new("a")
        .with_attr("id", "home")
        .with_attr("class", "nav  active nav")
        .with_attr("href", "/");

    assert_eq!(data.id(), Some("home"));
    assert_eq!(data.classes(), vec!["nav", "active"]);
    assert!(data.has_class("active"));
    assert!(!data.has_class("act"));
    assert_eq!(data.attr("href"), Some("/"));
    assert!(!data.has_attr("title"));

    let empty_id = ElementData::new("a").with_attr("id", "");
    assert_eq!(empty_id.id(), None);
}
