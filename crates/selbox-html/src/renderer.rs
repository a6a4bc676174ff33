//! Turning markup into the element tree a page would actually hold.
//!
//! The sandbox never inspects the markup's own structure when mapping
//! selectors; it inspects what a browser-like parser made of it. These are
//! the types that carry that rendered tree around.

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

use selbox_dom::{DomTree, ElementData, NodeId};

use crate::parser::{HtmlParser, ParseIssue};
use crate::tokenizer::HtmlTokenizer;

/// Class carried by the host container in [`Isolation::Shared`] mode.
pub const CONTAINER_CLASS: &str = "selbox-container";

/// How the rendered markup relates to its surroundings.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum Isolation {
    /// Parsed as the content of a container `div` inside a host document.
    /// Stray `html`, `head` and `body` tags are dropped.
    #[default]
    Shared,
    /// Parsed as a standalone document with its own `html`, `head` and
    /// `body`, rooted at the document node.
    Isolated,
}

/// The result of rendering markup: a tree plus the node whose descendants
/// are the rendered elements.
#[derive(Debug)]
pub struct RenderedFragment {
    /// Everything the renderer built, host document included.
    pub tree: DomTree,
    /// The mapping root. Never itself one of [`RenderedFragment::elements`].
    pub root: NodeId,
    /// Recoveries the parser performed while building `tree`.
    pub issues: Vec<ParseIssue>,
}

impl RenderedFragment {
    /// All elements under the root in document (pre-order) order.
    pub fn elements(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.tree.descendant_elements(self.root)
    }

    /// Number of elements under the root.
    #[must_use]
    pub fn element_count(&self) -> usize {
        self.elements().count()
    }

    /// Tag name of `id`, or `""` for non-elements.
    #[must_use]
    pub fn tag_name(&self, id: NodeId) -> &str {
        self.tree.tag_name(id).unwrap_or_default()
    }
}

/// Anything that can turn markup into a rendered tree.
pub trait Renderer {
    /// Render `markup`. Rendering never fails; malformed input is recovered
    /// from and reported in [`RenderedFragment::issues`].
    fn render(&self, markup: &str) -> RenderedFragment;
}

/// The built-in renderer: tokenizer plus best-effort tree builder.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlRenderer {
    isolation: Isolation,
}

impl HtmlRenderer {
    /// Create a renderer with the given isolation.
    #[must_use]
    pub const fn new(isolation: Isolation) -> Self {
        Self { isolation }
    }

    /// The isolation this renderer uses.
    #[must_use]
    pub const fn isolation(&self) -> Isolation {
        self.isolation
    }
}

impl Renderer for HtmlRenderer {
    fn render(&self, markup: &str) -> RenderedFragment {
        let tokens = HtmlTokenizer::tokenize(markup);
        match self.isolation {
            Isolation::Shared => {
                let (host, container) = host_document();
                let (tree, issues) = HtmlParser::for_fragment(host, container).run(&tokens);
                RenderedFragment {
                    tree,
                    root: container,
                    issues,
                }
            }
            Isolation::Isolated => {
                let (tree, issues) = HtmlParser::for_document().run(&tokens);
                RenderedFragment {
                    tree,
                    root: NodeId::ROOT,
                    issues,
                }
            }
        }
    }
}

/// `<html><head></head><body><div class="selbox-container"></div></body></html>`
fn host_document() -> (DomTree, NodeId) {
    let mut tree = DomTree::new();
    let html = tree.append_element(NodeId::ROOT, ElementData::new("html"));
    let _ = tree.append_element(html, ElementData::new("head"));
    let body = tree.append_element(html, ElementData::new("body"));
    let container = tree.append_element(
        body,
        ElementData::new("div").with_attr("class", CONTAINER_CLASS),
    );
    (tree, container)
}
