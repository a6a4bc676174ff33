//! Unique selector generation.
//!
//! Given an element and a scoping root, produce a selector that matches that
//! element and nothing else under the root. Candidates are tried from the
//! most readable (an id, a class) to the least (a positional path), and every
//! candidate is verified with [`is_unique`] before it is returned.

use selbox_dom::{DomTree, ElementData, NodeId};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use thiserror::Error;

use crate::selector::{is_plain_identifier, is_unique, parse_selector};

/// Why a selector could not be produced for an element.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerateError {
    /// The node is text, a comment or the document.
    #[error("node {0:?} is not an element")]
    NotAnElement(NodeId),
    /// The element is not a descendant of the scoping root.
    #[error("node {0:?} is outside the scoping root")]
    OutsideRoot(NodeId),
    /// A built selector was rejected by the selector parser.
    #[error("generated selector does not parse: {0}")]
    InvalidSelector(String),
}

/// Produces a selector string for one element within a scoping root.
pub trait SelectorGenerator {
    /// Generate a selector identifying `element` among the descendants of `root`.
    ///
    /// # Errors
    ///
    /// Implementations fail when no selector can be produced for `element`.
    fn generate(&self, tree: &DomTree, element: NodeId, root: NodeId)
    -> Result<String, GenerateError>;
}

impl<F> SelectorGenerator for F
where
    F: Fn(&DomTree, NodeId, NodeId) -> Result<String, GenerateError>,
{
    fn generate(
        &self,
        tree: &DomTree,
        element: NodeId,
        root: NodeId,
    ) -> Result<String, GenerateError> {
        self(tree, element, root)
    }
}

/// The kinds of single-element condition a candidate can be built from.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum CandidateKind {
    /// `#id`
    Id,
    /// `.class`, one per class
    Class,
    /// The tag name
    Tag,
    /// `[name="value"]`, one per attribute other than `id`, `class` and `style`
    Attribute,
    /// `:nth-child(i)`
    NthChild,
    /// `:nth-of-type(i)`
    NthOfType,
}

/// Generator settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorOptions {
    /// Candidate kinds to use, in priority order.
    pub selectors: Vec<CandidateKind>,
    /// Candidates matching any of these patterns are never used. `*` matches
    /// any run of characters.
    pub blacklist: Vec<String>,
    /// Candidates matching any of these patterns are tried before all others.
    pub whitelist: Vec<String>,
    /// Prefix every compound with the element's tag name.
    pub include_tag: bool,
    /// Most candidates combined into one compound.
    pub max_combinations: usize,
    /// Most selectors tested per element before falling back to a path.
    pub max_candidates: usize,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            selectors: vec![
                CandidateKind::Id,
                CandidateKind::Class,
                CandidateKind::Tag,
                CandidateKind::Attribute,
                CandidateKind::NthChild,
                CandidateKind::NthOfType,
            ],
            blacklist: Vec::new(),
            whitelist: Vec::new(),
            include_tag: false,
            max_combinations: 3,
            max_candidates: 1000,
        }
    }
}

/// A single-element condition in selector syntax.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Candidate {
    kind: CandidateKind,
    text: String,
}

/// Attributes that never become [`CandidateKind::Attribute`] candidates.
const IGNORED_ATTRIBUTES: &[&str] = &["id", "class", "style"];

/// The default generator: shortest readable selector that is unique under
/// the root, falling back to a `:scope > …` child path.
#[derive(Debug, Clone, Default)]
pub struct UniqueSelectorGenerator {
    options: GeneratorOptions,
}

impl UniqueSelectorGenerator {
    /// Create a generator with the given options.
    #[must_use]
    pub const fn new(options: GeneratorOptions) -> Self {
        Self { options }
    }

    /// The generator's options.
    #[must_use]
    pub const fn options(&self) -> &GeneratorOptions {
        &self.options
    }

    /// Every usable candidate for `element`, whitelisted ones first.
    fn candidates(&self, tree: &DomTree, id: NodeId, element: &ElementData) -> Vec<Candidate> {
        let mut all = Vec::new();
        for &kind in &self.options.selectors {
            for text in candidate_texts(kind, tree, id, element) {
                all.push(Candidate { kind, text });
            }
        }
        all.retain(|c| {
            !self
                .options
                .blacklist
                .iter()
                .any(|pattern| wildcard_match(pattern, &c.text))
        });
        // Stable, so kind priority holds within each group
        all.sort_by_key(|c| {
            !self
                .options
                .whitelist
                .iter()
                .any(|pattern| wildcard_match(pattern, &c.text))
        });
        all
    }

    /// Join candidates into a compound, tag first.
    fn compound(&self, element: &ElementData, parts: &[&Candidate]) -> String {
        let mut out = String::new();
        let has_tag = parts.iter().any(|c| c.kind == CandidateKind::Tag);
        if self.options.include_tag && !has_tag && is_plain_identifier(&element.tag_name) {
            out.push_str(&element.tag_name);
        }
        for part in parts.iter().filter(|c| c.kind == CandidateKind::Tag) {
            out.push_str(&part.text);
        }
        for part in parts.iter().filter(|c| c.kind != CandidateKind::Tag) {
            out.push_str(&part.text);
        }
        out
    }
}

impl SelectorGenerator for UniqueSelectorGenerator {
    fn generate(
        &self,
        tree: &DomTree,
        element: NodeId,
        root: NodeId,
    ) -> Result<String, GenerateError> {
        let data = tree
            .as_element(element)
            .ok_or(GenerateError::NotAnElement(element))?;
        if !tree.is_descendant_of(element, root) {
            return Err(GenerateError::OutsideRoot(element));
        }

        let mut search = Search {
            tree,
            root,
            element,
            budget: self.options.max_candidates,
        };
        let own = self.candidates(tree, element, data);

        // Compounds of the element's own candidates, smallest first
        let mut compounds = Vec::new();
        for size in 1..=self.options.max_combinations.min(own.len()) {
            for combination in Combinations::new(own.len(), size) {
                let parts: Vec<&Candidate> = combination.iter().map(|&i| &own[i]).collect();
                let compound = self.compound(data, &parts);
                if search.try_selector(&compound)? {
                    return Ok(compound);
                }
                if size == 1 {
                    compounds.push(compound);
                }
                if search.exhausted() {
                    return search.fallback();
                }
            }
        }

        // Qualified by one ancestor inside the root, nearest first
        for ancestor in tree.ancestors(element).take_while(|&a| a != root) {
            let Some(ancestor_data) = tree.as_element(ancestor) else {
                continue;
            };
            for ancestor_candidate in self.candidates(tree, ancestor, ancestor_data) {
                let qualifier = self.compound(ancestor_data, &[&ancestor_candidate]);
                for compound in &compounds {
                    let selector = format!("{qualifier} {compound}");
                    if search.try_selector(&selector)? {
                        return Ok(selector);
                    }
                    if search.exhausted() {
                        return search.fallback();
                    }
                }
            }
        }

        search.fallback()
    }
}

/// State for one element's search.
struct Search<'a> {
    tree: &'a DomTree,
    root: NodeId,
    element: NodeId,
    budget: usize,
}

impl Search<'_> {
    const fn exhausted(&self) -> bool {
        self.budget == 0
    }

    /// Spend one unit of budget testing `selector` for uniqueness.
    fn try_selector(&mut self, selector: &str) -> Result<bool, GenerateError> {
        if self.budget == 0 {
            return Ok(false);
        }
        self.budget -= 1;
        let parsed = parse_selector(selector)
            .ok_or_else(|| GenerateError::InvalidSelector(selector.to_string()))?;
        Ok(is_unique(self.tree, self.root, &parsed, self.element))
    }

    /// `:scope > a:nth-child(i) > …`, one step per level below the root.
    /// Unique by construction; verified anyway.
    fn fallback(&self) -> Result<String, GenerateError> {
        let mut path: Vec<NodeId> = std::iter::once(self.element)
            .chain(self.tree.ancestors(self.element))
            .take_while(|&n| n != self.root)
            .collect();
        path.reverse();

        let mut selector = String::from(":scope");
        for node in path {
            let index = self
                .tree
                .element_index(node)
                .ok_or(GenerateError::NotAnElement(node))?;
            let tag = self.tree.tag_name(node).unwrap_or_default();
            selector.push_str(" > ");
            if is_plain_identifier(tag) {
                selector.push_str(tag);
            }
            selector.push_str(&format!(":nth-child({index})"));
        }

        let parsed = parse_selector(&selector)
            .ok_or_else(|| GenerateError::InvalidSelector(selector.clone()))?;
        if is_unique(self.tree, self.root, &parsed, self.element) {
            Ok(selector)
        } else {
            Err(GenerateError::InvalidSelector(selector))
        }
    }
}

/// The candidate strings of one kind for an element.
fn candidate_texts(
    kind: CandidateKind,
    tree: &DomTree,
    id: NodeId,
    element: &ElementData,
) -> Vec<String> {
    match kind {
        CandidateKind::Id => element
            .id()
            .filter(|v| !v.is_empty())
            .and_then(|v| identifier_or_attribute(v, '#', "id", "="))
            .into_iter()
            .collect(),
        CandidateKind::Class => {
            let mut seen = Vec::new();
            for class in element.classes() {
                if !seen.contains(&class) {
                    seen.push(class);
                }
            }
            seen.into_iter()
                .filter_map(|c| identifier_or_attribute(c, '.', "class", "~="))
                .collect()
        }
        CandidateKind::Tag => is_plain_identifier(&element.tag_name)
            .then(|| element.tag_name.clone())
            .into_iter()
            .collect(),
        CandidateKind::Attribute => element
            .attrs
            .iter()
            .filter(|a| !IGNORED_ATTRIBUTES.contains(&a.name.as_str()))
            .filter(|a| is_plain_identifier(&a.name) && is_quotable(&a.value))
            .map(|a| format!("[{}=\"{}\"]", a.name, a.value))
            .collect(),
        CandidateKind::NthChild => tree
            .element_index(id)
            .map(|i| format!(":nth-child({i})"))
            .into_iter()
            .collect(),
        CandidateKind::NthOfType => tree
            .element_index_of_type(id)
            .map(|i| format!(":nth-of-type({i})"))
            .into_iter()
            .collect(),
    }
}

/// `#value` / `.value` when `value` is a plain identifier, otherwise a quoted
/// attribute selector. `None` when the value cannot be quoted either.
fn identifier_or_attribute(value: &str, sigil: char, attr: &str, op: &str) -> Option<String> {
    if is_plain_identifier(value) {
        Some(format!("{sigil}{value}"))
    } else if is_quotable(value) {
        Some(format!("[{attr}{op}\"{value}\"]"))
    } else {
        None
    }
}

/// Values written inside `"…"` without escapes.
fn is_quotable(value: &str) -> bool {
    !value.contains(['"', '\\', '\n'])
}

/// Glob match where `*` matches any run of characters, including none.
fn wildcard_match(pattern: &str, text: &str) -> bool {
    let mut pieces = pattern.split('*');
    let Some(first) = pieces.next() else {
        return text.is_empty();
    };
    let Some(mut rest) = text.strip_prefix(first) else {
        return false;
    };
    let pieces: Vec<&str> = pieces.collect();
    let Some((last, middle)) = pieces.split_last() else {
        // No `*` at all
        return rest.is_empty();
    };
    for piece in middle {
        match rest.find(piece) {
            Some(at) => rest = &rest[at + piece.len()..],
            None => return false,
        }
    }
    rest.len() >= last.len() && rest.ends_with(last)
}

/// Index combinations of `size` out of `n`, in lexicographic order.
struct Combinations {
    n: usize,
    indices: Vec<usize>,
    started: bool,
}

impl Combinations {
    fn new(n: usize, size: usize) -> Self {
        Self {
            n,
            indices: (0..size).collect(),
            started: false,
        }
    }
}

impl Iterator for Combinations {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        let size = self.indices.len();
        if size == 0 || size > self.n {
            return None;
        }
        if !self.started {
            self.started = true;
            return Some(self.indices.clone());
        }
        // Rightmost index that can still advance
        let pos = (0..size).rev().find(|&i| self.indices[i] < self.n - size + i)?;
        self.indices[pos] += 1;
        for i in pos + 1..size {
            self.indices[i] = self.indices[i - 1] + 1;
        }
        Some(self.indices.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_combinations() {
        let all: Vec<Vec<usize>> = Combinations::new(4, 2).collect();
        assert_eq!(
            all,
            vec![
                vec![0, 1],
                vec![0, 2],
                vec![0, 3],
                vec![1, 2],
                vec![1, 3],
                vec![2, 3]
            ]
        );
        assert_eq!(Combinations::new(2, 3).count(), 0);
        assert_eq!(Combinations::new(3, 3).count(), 1);
    }

    #[test]
    fn test_wildcard_match() {
        assert!(wildcard_match(".btn", ".btn"));
        assert!(!wildcard_match(".btn", ".btn-x"));
        assert!(wildcard_match(".btn*", ".btn-x"));
        assert!(wildcard_match("*", "#anything"));
        assert!(wildcard_match("[data-*]", "[data-id=\"1\"]"));
        assert!(wildcard_match("*id*", "#main-id-x"));
        assert!(!wildcard_match("#a*b", "#ab-"));
        assert!(wildcard_match("#a*b", "#ab"));
    }

    #[test]
    fn test_identifier_or_attribute() {
        assert_eq!(
            identifier_or_attribute("main", '#', "id", "="),
            Some("#main".to_string())
        );
        assert_eq!(
            identifier_or_attribute("1st", '#', "id", "="),
            Some("[id=\"1st\"]".to_string())
        );
        assert_eq!(
            identifier_or_attribute("a:b", '.', "class", "~="),
            Some("[class~=\"a:b\"]".to_string())
        );
        assert_eq!(identifier_or_attribute("a\"b", '#', "id", "="), None);
    }

    #[test]
    fn test_options_from_json() {
        let options: GeneratorOptions =
            serde_json::from_str(r#"{"selectors": ["tag", "nth-child"], "include_tag": true}"#)
                .expect("options should deserialize");
        assert_eq!(
            options.selectors,
            vec![CandidateKind::Tag, CandidateKind::NthChild]
        );
        assert!(options.include_tag);
        assert_eq!(options.max_combinations, 3);
        assert_eq!(CandidateKind::NthOfType.to_string(), "nth-of-type");
    }
}
