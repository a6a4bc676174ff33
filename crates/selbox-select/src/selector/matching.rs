//! Scoped selector matching.
//!
//! Every match is evaluated relative to a scope node, the way
//! `scope.querySelectorAll(selector)` is. The subject must be a descendant
//! of the scope, and combinators may walk up to the scope itself but never
//! past it, so a selector cannot be satisfied by markup outside the
//! fragment it was generated for.

use selbox_dom::{DomTree, ElementData, NodeId, NodeType};

use super::{
    AttributeSelector, Combinator, CompoundSelector, ParsedSelector, PseudoClass, SimpleSelector,
};

impl ParsedSelector {
    /// [§ 4.1 Selector Matching](https://www.w3.org/TR/selectors-4/#match-a-selector-against-an-element)
    /// "A selector is said to match an element when..."
    ///
    /// Match against `node_id`, with `:scope` bound to `scope` and all
    /// combinators confined to the scope's subtree.
    #[must_use]
    pub fn matches_in_scope(&self, tree: &DomTree, node_id: NodeId, scope: NodeId) -> bool {
        if !tree.is_descendant_of(node_id, scope) || tree.as_element(node_id).is_none() {
            return false;
        }
        compound_matches(&self.complex.subject, tree, node_id, scope)
            && chain_matches(&self.complex.combinators, tree, node_id, scope)
    }
}

/// [§ 16 Combinators](https://www.w3.org/TR/selectors-4/#combinators)
///
/// Match the remaining combinator chain outward from `current`, which has
/// already matched. Descendant and subsequent-sibling steps backtrack: if
/// the nearest candidate leaves the rest of the chain unsatisfiable, farther
/// candidates are tried.
fn chain_matches(
    chain: &[(Combinator, CompoundSelector)],
    tree: &DomTree,
    current: NodeId,
    scope: NodeId,
) -> bool {
    let Some(((combinator, compound), rest)) = chain.split_first() else {
        return true;
    };
    let step = |candidate: NodeId| {
        compound_matches(compound, tree, candidate, scope)
            && chain_matches(rest, tree, candidate, scope)
    };

    match combinator {
        // [§ 16.1 Descendant combinator](https://www.w3.org/TR/selectors-4/#descendant-combinators)
        // "A selector of the form 'A B' represents an element B that is an
        // arbitrary descendant of some ancestor element A."
        Combinator::Descendant => scoped_ancestors(tree, current, scope).any(step),

        // [§ 16.2 Child combinator](https://www.w3.org/TR/selectors-4/#child-combinators)
        // "A selector of the form 'A > B' represents an element B that is a
        // direct child of element A."
        Combinator::Child => scoped_ancestors(tree, current, scope).next().is_some_and(step),

        // [§ 16.3 Next-sibling combinator](https://www.w3.org/TR/selectors-4/#adjacent-sibling-combinators)
        // "A selector of the form 'A + B' represents an element B that
        // immediately follows element A, where A and B share the same parent."
        Combinator::NextSibling => {
            current != scope && previous_element_sibling(tree, current).is_some_and(step)
        }

        // [§ 16.4 Subsequent-sibling combinator](https://www.w3.org/TR/selectors-4/#general-sibling-combinators)
        // "A selector of the form 'A ~ B' represents an element B that
        // follows element A (not necessarily immediately), where A and B share
        // the same parent."
        Combinator::SubsequentSibling => {
            current != scope
                && tree
                    .preceding_siblings(current)
                    .filter(|&s| tree.as_element(s).is_some())
                    .any(step)
        }
    }
}

/// Ancestors of `node_id` from its parent up to and including `scope`.
/// Empty when `node_id` is the scope.
fn scoped_ancestors(
    tree: &DomTree,
    node_id: NodeId,
    scope: NodeId,
) -> impl Iterator<Item = NodeId> + '_ {
    let mut done = node_id == scope;
    tree.ancestors(node_id).take_while(move |&ancestor| {
        if done {
            return false;
        }
        done = ancestor == scope;
        true
    })
}

/// Find the immediately preceding element sibling (skipping text/comment nodes).
fn previous_element_sibling(tree: &DomTree, node_id: NodeId) -> Option<NodeId> {
    tree.preceding_siblings(node_id)
        .find(|&sibling_id| tree.as_element(sibling_id).is_some())
}

/// Check a compound selector against one node.
///
/// `:scope` is the only condition a non-element can satisfy, so a bare
/// `:scope` compound can stand for a document scope.
fn compound_matches(compound: &CompoundSelector, tree: &DomTree, node_id: NodeId, scope: NodeId) -> bool {
    let element = tree.as_element(node_id);
    compound.simple_selectors.iter().all(|simple| match simple {
        SimpleSelector::PseudoClass(PseudoClass::Scope) => node_id == scope,
        SimpleSelector::PseudoClass(pc) => {
            element.is_some_and(|element| pseudo_class_matches(pc, tree, node_id, element))
        }
        _ => element.is_some_and(|element| simple.matches(element)),
    })
}

/// [§ 4 Pseudo-classes](https://www.w3.org/TR/selectors-4/#pseudo-classes)
///
/// Match a structural pseudo-class against an element with full tree context.
fn pseudo_class_matches(
    pc: &PseudoClass,
    tree: &DomTree,
    node_id: NodeId,
    element: &ElementData,
) -> bool {
    let same_type = |c: NodeId| {
        tree.as_element(c)
            .is_some_and(|e| e.tag_name.eq_ignore_ascii_case(&element.tag_name))
    };
    let siblings = || {
        tree.parent(node_id)
            .map(|parent| tree.element_children(parent))
            .into_iter()
            .flatten()
    };

    match pc {
        // Handled by the caller, which knows the scope
        PseudoClass::Scope => false,

        // [§ 4.4 :root](https://www.w3.org/TR/selectors-4/#the-root-pseudo)
        // "In HTML, this is the <html> element."
        PseudoClass::Root => tree.document_element() == Some(node_id),

        PseudoClass::FirstChild => siblings().next() == Some(node_id),
        PseudoClass::LastChild => siblings().last() == Some(node_id),
        PseudoClass::OnlyChild => tree.parent(node_id).is_some() && siblings().count() == 1,
        PseudoClass::FirstOfType => siblings().find(|&c| same_type(c)) == Some(node_id),
        PseudoClass::LastOfType => siblings().filter(|&c| same_type(c)).last() == Some(node_id),

        // [§ 4.5 :empty](https://www.w3.org/TR/selectors-4/#the-empty-pseudo)
        // "The :empty pseudo-class represents an element that has no children
        // except, optionally, document white space characters."
        PseudoClass::Empty => {
            tree.children(node_id)
                .iter()
                .all(|&c| match tree.get(c).map(|n| &n.node_type) {
                    Some(NodeType::Text(t)) => t.trim().is_empty(),
                    Some(NodeType::Comment(_)) => true,
                    _ => false,
                })
        }

        // [§ 4.13 :nth-child()](https://www.w3.org/TR/selectors-4/#the-nth-child-pseudo)
        PseudoClass::NthChild(index) => tree.element_index(node_id) == Some(*index),

        // [§ 4.13 :nth-of-type()](https://www.w3.org/TR/selectors-4/#the-nth-of-type-pseudo)
        PseudoClass::NthOfType(index) => tree.element_index_of_type(node_id) == Some(*index),
    }
}

impl SimpleSelector {
    /// Check if this simple selector matches the given element, without
    /// tree context. Pseudo-classes never match here.
    #[must_use]
    pub fn matches(&self, element: &ElementData) -> bool {
        match self {
            // [§ 5.1 Type selector](https://www.w3.org/TR/selectors-4/#type-selectors)
            Self::Type(name) => element.tag_name.eq_ignore_ascii_case(name),

            // [§ 6.6 Class selector](https://www.w3.org/TR/selectors-4/#class-html)
            Self::Class(class_name) => element.has_class(class_name),

            // [§ 6.7 ID selector](https://www.w3.org/TR/selectors-4/#id-selectors)
            Self::Id(id) => element.id() == Some(id.as_str()),

            Self::Universal => true,

            Self::PseudoClass(_) => false,

            Self::Attribute(attr_sel) => attr_sel.matches(element),
        }
    }
}

impl AttributeSelector {
    /// [§ 6.4 Attribute selectors](https://www.w3.org/TR/selectors-4/#attribute-selectors)
    #[must_use]
    pub fn matches(&self, element: &ElementData) -> bool {
        match self {
            Self::Exists(name) => element.has_attr(name),
            Self::Equals(name, val) => element.attr(name) == Some(val.as_str()),
            Self::Includes(name, val) => element
                .attr(name)
                .is_some_and(|v| v.split_ascii_whitespace().any(|w| w == val)),
            Self::DashMatch(name, val) => element.attr(name).is_some_and(|v| {
                v == val || v.strip_prefix(val.as_str()).is_some_and(|rest| rest.starts_with('-'))
            }),
            Self::PrefixMatch(name, val) => element
                .attr(name)
                .is_some_and(|v| !val.is_empty() && v.starts_with(val.as_str())),
            Self::SuffixMatch(name, val) => element
                .attr(name)
                .is_some_and(|v| !val.is_empty() && v.ends_with(val.as_str())),
            Self::SubstringMatch(name, val) => element
                .attr(name)
                .is_some_and(|v| !val.is_empty() && v.contains(val.as_str())),
        }
    }
}

/// Every element under `scope` matching `selector`, in tree order.
///
/// The scoped equivalent of `querySelectorAll`.
#[must_use]
pub fn query_all(tree: &DomTree, scope: NodeId, selector: &ParsedSelector) -> Vec<NodeId> {
    tree.descendant_elements(scope)
        .filter(|&n| selector.matches_in_scope(tree, n, scope))
        .collect()
}

/// Whether `element` is the one and only match for `selector` under `scope`.
#[must_use]
pub fn is_unique(tree: &DomTree, scope: NodeId, selector: &ParsedSelector, element: NodeId) -> bool {
    let mut found = tree
        .descendant_elements(scope)
        .filter(|&n| selector.matches_in_scope(tree, n, scope));
    found.next() == Some(element) && found.next().is_none()
}
