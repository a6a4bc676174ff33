//! Best-effort tree construction.
//!
//! [§ 13.2.6 Tree construction](https://html.spec.whatwg.org/multipage/parsing.html#tree-construction)
//!
//! This is a deliberately small subset of the insertion-mode machinery. It
//! reproduces the normalizations that most often make a rendered tree
//! diverge from the raw markup (implied table sections, auto-closed
//! paragraphs and list items, ignored stray tags, synthesized document
//! wrappers) without the adoption agency algorithm or foster parenting.

use selbox_common::warning::warn_once;
use selbox_dom::{Attribute, DomTree, ElementData, NodeId, NodeType};

use crate::tokenizer::Token;

/// [§ 13.1.2 Elements](https://html.spec.whatwg.org/multipage/syntax.html#void-elements)
///
/// "Void elements: area, base, br, col, embed, hr, img, input, link, meta,
/// source, track, wbr"
pub const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// Elements that belong in `head` when they appear before any body content.
const HEAD_ELEMENTS: &[&str] = &[
    "base", "basefont", "bgsound", "link", "meta", "noframes", "script", "style", "template",
    "title",
];

/// Start tags that "close a p element" if one is in button scope.
const CLOSES_P: &[&str] = &[
    "address", "article", "aside", "blockquote", "center", "details", "dialog", "dir", "div", "dl",
    "fieldset", "figcaption", "figure", "footer", "form", "header", "hgroup", "hr", "listing",
    "main", "menu", "nav", "ol", "p", "plaintext", "pre", "search", "section", "summary", "table",
    "ul", "xmp",
];

const HEADINGS: &[&str] = &["h1", "h2", "h3", "h4", "h5", "h6"];

/// Table structure start tags, which are ignored outside a table.
const TABLE_PARTS: &[&str] = &[
    "caption", "col", "colgroup", "tbody", "td", "tfoot", "th", "thead", "tr",
];

/// End tags that close the matching element in scope along with anything
/// still open inside it.
const BLOCK_END_TAGS: &[&str] = &[
    "address", "article", "aside", "blockquote", "button", "center", "details", "dialog", "dir",
    "div", "dl", "fieldset", "figcaption", "figure", "footer", "form", "header", "hgroup",
    "listing", "main", "menu", "nav", "ol", "pre", "search", "section", "summary", "ul",
];

/// [§ 13.2.4.3 The list of active formatting elements](https://html.spec.whatwg.org/multipage/parsing.html#formatting)
const FORMATTING_ELEMENTS: &[&str] = &[
    "a", "b", "big", "code", "em", "font", "i", "nobr", "s", "small", "strike", "strong", "tt", "u",
];

const TABLE_SECTIONS: &[&str] = &["tbody", "thead", "tfoot"];

/// [§ 13.2.4.2 The stack of open elements](https://html.spec.whatwg.org/multipage/parsing.html#has-an-element-in-the-specific-scope)
///
/// "The stack of open elements is said to have an element in scope when it has
/// that element in the specific scope consisting of the following element types"
const DEFAULT_SCOPE: &[&str] = &[
    "applet", "caption", "html", "table", "td", "th", "marquee", "object", "template",
];

/// [§ 13.2.6.3 Closing elements that have implied end tags](https://html.spec.whatwg.org/multipage/parsing.html#generate-implied-end-tags)
const IMPLIED_END_TAG_ELEMENTS: &[&str] = &[
    "dd", "dt", "li", "optgroup", "option", "p", "rb", "rp", "rt", "rtc",
];

/// [§ 13.2.4.2](https://html.spec.whatwg.org/multipage/parsing.html#special)
/// "The following elements have varying levels of special parsing rules"
const SPECIAL_ELEMENTS: &[&str] = &[
    "address", "applet", "area", "article", "aside", "base", "basefont", "bgsound", "blockquote",
    "body", "br", "button", "caption", "center", "col", "colgroup", "dd", "details", "dir", "div",
    "dl", "dt", "embed", "fieldset", "figcaption", "figure", "footer", "form", "frame", "frameset",
    "h1", "h2", "h3", "h4", "h5", "h6", "head", "header", "hgroup", "hr", "html", "iframe", "img",
    "input", "li", "link", "listing", "main", "marquee", "menu", "meta", "nav", "noembed",
    "noframes", "noscript", "object", "ol", "p", "param", "plaintext", "pre", "script", "search",
    "section", "select", "source", "style", "summary", "table", "tbody", "td", "template",
    "textarea", "tfoot", "th", "thead", "title", "tr", "track", "ul", "wbr", "xmp",
];

/// [§ 13.2.2 Parse errors](https://html.spec.whatwg.org/multipage/parsing.html#parse-errors)
///
/// A recovery the tree builder performed. These are the places where the
/// rendered tree stops mirroring the markup one-to-one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseIssue {
    /// Description of the recovery.
    pub message: String,
    /// Index into the token stream where it happened.
    pub token_index: usize,
}

/// Synthesized document wrappers, only tracked when parsing a whole document.
#[derive(Debug, Default)]
struct DocumentParts {
    html: Option<NodeId>,
    head: Option<NodeId>,
    body: Option<NodeId>,
}

/// Builds an element tree from a token stream.
pub struct HtmlParser {
    tree: DomTree,
    /// [§ 13.2.4.2 The stack of open elements](https://html.spec.whatwg.org/multipage/parsing.html#the-stack-of-open-elements)
    open: Vec<NodeId>,
    /// Entries at the bottom of `open` that end tags never pop: the context
    /// element for fragments, `html` (and later `body`) for documents.
    floor: usize,
    /// `None` in fragment mode.
    document: Option<DocumentParts>,
    issues: Vec<ParseIssue>,
    token_index: usize,
}

impl HtmlParser {
    /// [§ 13.4 Parsing HTML fragments](https://html.spec.whatwg.org/multipage/parsing.html#parsing-html-fragments)
    ///
    /// Parse into `tree` as children of `context`, the way assigning markup
    /// to a container element does. `html`, `head` and `body` tags are ignored.
    #[must_use]
    pub fn for_fragment(tree: DomTree, context: NodeId) -> Self {
        Self {
            tree,
            open: vec![context],
            floor: 1,
            document: None,
            issues: Vec::new(),
            token_index: 0,
        }
    }

    /// Parse a complete document into a fresh tree, synthesizing `html`,
    /// `head` and `body` when the markup omits them.
    #[must_use]
    pub fn for_document() -> Self {
        Self {
            tree: DomTree::new(),
            open: vec![NodeId::ROOT],
            floor: 1,
            document: Some(DocumentParts::default()),
            issues: Vec::new(),
            token_index: 0,
        }
    }

    /// Run tree construction over `tokens`, returning the tree and every
    /// recovery performed along the way.
    #[must_use]
    pub fn run(mut self, tokens: &[Token]) -> (DomTree, Vec<ParseIssue>) {
        for (index, token) in tokens.iter().enumerate() {
            self.token_index = index;
            self.process_token(token);
        }
        // An end-of-file token still produces the document wrappers
        if self.document.is_some() {
            let _ = self.ensure_body(&[]);
        }
        (self.tree, self.issues)
    }

    fn parse_warning(&mut self, message: String) {
        warn_once("HTML", &message);
        self.issues.push(ParseIssue {
            message,
            token_index: self.token_index,
        });
    }

    fn process_token(&mut self, token: &Token) {
        let before_body = self.document.as_ref().is_some_and(|d| d.body.is_none());
        if before_body && self.process_before_body(token) {
            return;
        }

        match token {
            Token::Doctype(_) => self.parse_warning("ignored DOCTYPE in content".to_string()),
            Token::Comment(data) => {
                let comment = self.tree.alloc(NodeType::Comment(data.clone()));
                self.tree.append_child(self.current_node(), comment);
            }
            Token::Text(text) => {
                let parent = self.current_node();
                self.tree.append_text(parent, text);
            }
            Token::StartTag {
                name, attributes, ..
            } => self.start_tag_in_body(name, attributes),
            Token::EndTag { name } => self.end_tag_in_body(name),
        }
    }

    // =========================================================================
    // Stack helpers
    // =========================================================================

    /// [§ 13.2.4.2](https://html.spec.whatwg.org/multipage/parsing.html#current-node)
    /// "The current node is the bottommost node in this stack of open elements."
    fn current_node(&self) -> NodeId {
        self.open.last().copied().unwrap_or(NodeId::ROOT)
    }

    fn tag_of(&self, id: NodeId) -> &str {
        self.tree.tag_name(id).unwrap_or_default()
    }

    fn current_tag(&self) -> &str {
        self.tag_of(self.current_node())
    }

    /// Index in `open` of the topmost element (above the floor) named in `names`.
    fn find_open(&self, names: &[&str]) -> Option<usize> {
        (self.floor..self.open.len())
            .rev()
            .find(|&i| names.contains(&self.tag_of(self.open[i])))
    }

    /// Pop elements until one named in `names` has been popped.
    fn pop_until_one_of(&mut self, names: &[&str]) {
        if let Some(i) = self.find_open(names) {
            self.open.truncate(i);
        }
    }

    /// Pop down to (but not including) the topmost element named in `names`.
    /// Returns whether such an element was found.
    fn pop_to(&mut self, names: &[&str]) -> bool {
        match self.find_open(names) {
            Some(i) => {
                self.open.truncate(i + 1);
                true
            }
            None => false,
        }
    }

    /// [§ 13.2.4.2](https://html.spec.whatwg.org/multipage/parsing.html#has-an-element-in-the-specific-scope)
    ///
    /// "1. Initialize node to be the current node.
    ///  2. If node is the target node, terminate in a match state.
    ///  3. Otherwise, if node is one of the element types in list, terminate in a failure state.
    ///  4. Otherwise, set node to the previous entry in the stack of open elements and return to step 2."
    fn has_element_in_specific_scope(&self, names: &[&str], markers: &[&str]) -> bool {
        for &id in self.open[self.floor..].iter().rev() {
            let tag = self.tag_of(id);
            if names.contains(&tag) {
                return true;
            }
            if markers.contains(&tag) {
                return false;
            }
        }
        false
    }

    fn has_element_in_scope(&self, names: &[&str]) -> bool {
        self.has_element_in_specific_scope(names, DEFAULT_SCOPE)
    }

    /// "the list of element types for default scope, plus button"
    fn has_element_in_button_scope(&self, name: &str) -> bool {
        let markers: Vec<&str> = DEFAULT_SCOPE.iter().copied().chain(["button"]).collect();
        self.has_element_in_specific_scope(&[name], &markers)
    }

    /// "the list of element types for default scope, plus ol and ul"
    fn has_element_in_list_item_scope(&self, name: &str) -> bool {
        let markers: Vec<&str> = DEFAULT_SCOPE.iter().copied().chain(["ol", "ul"]).collect();
        self.has_element_in_specific_scope(&[name], &markers)
    }

    /// "html, table, template"
    fn has_element_in_table_scope(&self, name: &str) -> bool {
        self.has_element_in_specific_scope(&[name], &["html", "table", "template"])
    }

    /// [§ 13.2.6.3](https://html.spec.whatwg.org/multipage/parsing.html#generate-implied-end-tags)
    ///
    /// "while the current node is a dd element, a dt element, an li element, an optgroup
    /// element, an option element, a p element, ... the UA must pop the current node off
    /// the stack of open elements."
    fn generate_implied_end_tags_excluding(&mut self, exclude: Option<&str>) {
        while self.open.len() > self.floor {
            let tag = self.current_tag();
            if !IMPLIED_END_TAG_ELEMENTS.contains(&tag) || Some(tag) == exclude {
                break;
            }
            let _ = self.open.pop();
        }
    }

    /// "close a p element": generate implied end tags except for p, then pop
    /// until a p element has been popped.
    fn close_p_element(&mut self) {
        self.generate_implied_end_tags_excluding(Some("p"));
        if self.current_tag() != "p" {
            self.parse_warning("closed <p> with other elements still open".to_string());
        }
        self.pop_until_one_of(&["p"]);
    }

    fn close_p_if_in_button_scope(&mut self) {
        if self.has_element_in_button_scope("p") {
            self.close_p_element();
        }
    }

    // =========================================================================
    // Insertion helpers
    // =========================================================================

    /// [§ 13.2.6.1 Insert an HTML element](https://html.spec.whatwg.org/multipage/parsing.html#insert-an-html-element)
    ///
    /// Append to the current node and push onto the stack unless void.
    fn insert_html_element(&mut self, name: &str, attributes: &[Attribute]) -> NodeId {
        let parent = self.current_node();
        self.insert_element_into(parent, name, attributes)
    }

    fn insert_element_into(&mut self, parent: NodeId, name: &str, attributes: &[Attribute]) -> NodeId {
        let data = ElementData {
            tag_name: name.to_string(),
            attrs: attributes.to_vec(),
        };
        let id = self.tree.append_element(parent, data);
        if !VOID_ELEMENTS.contains(&name) {
            self.open.push(id);
        }
        id
    }

    /// Insert an element the markup never spelled out.
    fn insert_implied(&mut self, name: &str) -> NodeId {
        self.parse_warning(format!("inserted implied <{name}>"));
        self.insert_html_element(name, &[])
    }

    /// Copy attributes the element does not already have, as the parser does
    /// for repeated `<html>` and `<body>` start tags.
    fn merge_attributes(&mut self, id: NodeId, attributes: &[Attribute]) {
        if let Some(element) = self.tree.as_element_mut(id) {
            for attr in attributes {
                if !element.has_attr(&attr.name) {
                    element.attrs.push(attr.clone());
                }
            }
        }
    }

    // =========================================================================
    // Document wrappers
    // =========================================================================

    fn ensure_html(&mut self, attributes: &[Attribute]) -> NodeId {
        if let Some(html) = self.document.as_ref().and_then(|d| d.html) {
            self.merge_attributes(html, attributes);
            return html;
        }
        let html = self.insert_element_into(NodeId::ROOT, "html", attributes);
        self.open = vec![html];
        if let Some(doc) = self.document.as_mut() {
            doc.html = Some(html);
        }
        html
    }

    fn ensure_head(&mut self, attributes: &[Attribute]) -> NodeId {
        if let Some(head) = self.document.as_ref().and_then(|d| d.head) {
            return head;
        }
        let html = self.ensure_html(&[]);
        let head = self.insert_element_into(html, "head", attributes);
        if let Some(doc) = self.document.as_mut() {
            doc.head = Some(head);
        }
        head
    }

    fn ensure_body(&mut self, attributes: &[Attribute]) -> NodeId {
        if let Some(body) = self.document.as_ref().and_then(|d| d.body) {
            self.merge_attributes(body, attributes);
            return body;
        }
        let _ = self.ensure_head(&[]);
        let html = self.ensure_html(&[]);
        let body = self.tree.append_element(
            html,
            ElementData {
                tag_name: "body".to_string(),
                attrs: attributes.to_vec(),
            },
        );
        self.open = vec![html, body];
        self.floor = 2;
        if let Some(doc) = self.document.as_mut() {
            doc.body = Some(body);
        }
        body
    }

    /// [§ 13.2.6.4.1-6](https://html.spec.whatwg.org/multipage/parsing.html#the-initial-insertion-mode)
    ///
    /// The "initial" through "after head" insertion modes, collapsed. Returns
    /// `true` when the token was consumed; otherwise a body has just been
    /// created and the token is reprocessed in body.
    fn process_before_body(&mut self, token: &Token) -> bool {
        let html_exists = self.document.as_ref().is_some_and(|d| d.html.is_some());
        match token {
            Token::Doctype(_) => {
                if html_exists {
                    self.parse_warning("ignored DOCTYPE after <html>".to_string());
                }
                true
            }
            Token::Comment(data) => {
                let comment = self.tree.alloc(NodeType::Comment(data.clone()));
                self.tree.append_child(self.current_node(), comment);
                true
            }
            Token::Text(text) => {
                // Content of an open <title>, <style> or <script> in head
                if !matches!(self.current_tag(), "" | "html" | "head") {
                    let parent = self.current_node();
                    self.tree.append_text(parent, text);
                    return true;
                }
                // "Ignore the token" for whitespace before the body
                let rest = text.trim_start_matches(crate::tokenizer::machine::is_whitespace_char);
                if !rest.is_empty() {
                    let body = self.ensure_body(&[]);
                    self.tree.append_text(body, rest);
                }
                true
            }
            Token::StartTag {
                name, attributes, ..
            } => match name.as_str() {
                "html" => {
                    let _ = self.ensure_html(attributes);
                    true
                }
                "head" => {
                    if self.document.as_ref().is_some_and(|d| d.head.is_some()) {
                        self.parse_warning("ignored second <head>".to_string());
                    } else {
                        let _ = self.ensure_head(attributes);
                    }
                    true
                }
                "body" => {
                    let _ = self.ensure_body(attributes);
                    true
                }
                tag if HEAD_ELEMENTS.contains(&tag) => {
                    let head = self.ensure_head(&[]);
                    let _ = self.insert_element_into(head, tag, attributes);
                    true
                }
                _ => {
                    let _ = self.ensure_body(&[]);
                    false
                }
            },
            Token::EndTag { name } => {
                if let Some(i) = self.find_open(&[name.as_str()]) {
                    self.open.truncate(i);
                } else if !matches!(name.as_str(), "html" | "body" | "br") {
                    self.parse_warning(format!("ignored end tag </{name}> before <body>"));
                }
                // "An end tag whose tag name is one of: "body", "html", "br"
                // ... Act as described in the "anything else" entry"
                if name == "br" {
                    let _ = self.ensure_body(&[]);
                    return false;
                }
                true
            }
        }
    }

    // =========================================================================
    // In body
    // =========================================================================

    /// [§ 13.2.6.4.7 The "in body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inbody)
    /// "A start tag..."
    fn start_tag_in_body(&mut self, name: &str, attributes: &[Attribute]) {
        match name {
            "html" | "body" => {
                let existing = self.document.as_ref().and_then(|d| {
                    if name == "html" { d.html } else { d.body }
                });
                match existing {
                    Some(id) => self.merge_attributes(id, attributes),
                    None => self.parse_warning(format!("ignored <{name}> inside content")),
                }
            }
            "head" | "frameset" | "frame" => {
                self.parse_warning(format!("ignored <{name}> inside content"));
            }
            "li" => {
                self.close_list_item(&["li"]);
                self.close_p_if_in_button_scope();
                let _ = self.insert_html_element(name, attributes);
            }
            "dd" | "dt" => {
                self.close_list_item(&["dd", "dt"]);
                self.close_p_if_in_button_scope();
                let _ = self.insert_html_element(name, attributes);
            }
            _ if HEADINGS.contains(&name) => {
                self.close_p_if_in_button_scope();
                // "If the current node is an HTML element whose tag name is one of
                // "h1", ..., "h6", then this is a parse error; pop the current node"
                if HEADINGS.contains(&self.current_tag()) {
                    self.parse_warning(format!("<{name}> closed an open heading"));
                    let _ = self.open.pop();
                }
                let _ = self.insert_html_element(name, attributes);
            }
            "option" | "optgroup" => {
                if self.current_tag() == "option" {
                    let _ = self.open.pop();
                }
                let _ = self.insert_html_element(name, attributes);
            }
            "a" | "button" => {
                // The adoption agency is not implemented; a nested <a> or
                // <button> just closes the open one.
                if self.has_element_in_scope(&[name]) {
                    self.parse_warning(format!("nested <{name}> closed the open one"));
                    self.generate_implied_end_tags_excluding(None);
                    self.pop_until_one_of(&[name]);
                }
                let _ = self.insert_html_element(name, attributes);
            }
            _ if TABLE_PARTS.contains(&name) => self.start_table_part(name, attributes),
            _ => {
                if CLOSES_P.contains(&name) {
                    self.close_p_if_in_button_scope();
                }
                let _ = self.insert_html_element(name, attributes);
            }
        }
    }

    /// Shared steps for `li`, `dd` and `dt` start tags: close the nearest
    /// open item of the same family unless a special element intervenes.
    fn close_list_item(&mut self, family: &[&str]) {
        for i in (self.floor..self.open.len()).rev() {
            let tag = self.tag_of(self.open[i]);
            if family.contains(&tag) {
                let tag = tag.to_string();
                self.generate_implied_end_tags_excluding(Some(&tag));
                self.pop_until_one_of(&[tag.as_str()]);
                return;
            }
            // "If node is in the special category, but is not an address, div,
            // or p element, then jump to the step labeled done below."
            if SPECIAL_ELEMENTS.contains(&tag) && !matches!(tag, "address" | "div" | "p") {
                return;
            }
        }
    }

    /// [§ 13.2.6.4.9 "in table"](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intable)
    /// and the table body / row modes, collapsed.
    fn start_table_part(&mut self, name: &str, attributes: &[Attribute]) {
        // In body: "A start tag whose tag name is one of: "caption", "col", "colgroup",
        // "frame", "head", "tbody", "td", "tfoot", "th", "thead", "tr"
        // Parse error. Ignore the token."
        if !self.has_element_in_table_scope("table") {
            self.parse_warning(format!("ignored <{name}> outside of a table"));
            return;
        }

        match name {
            "col" => {
                let _ = self.pop_to(&["table", "colgroup"]);
                if self.current_tag() == "table" {
                    let _ = self.insert_implied("colgroup");
                }
            }
            "tr" => {
                let _ = self.pop_to(&["table", "tbody", "thead", "tfoot"]);
                if self.current_tag() == "table" {
                    let _ = self.insert_implied("tbody");
                }
            }
            "td" | "th" => {
                let _ = self.pop_to(&["table", "tbody", "thead", "tfoot", "tr"]);
                if self.current_tag() == "table" {
                    let _ = self.insert_implied("tbody");
                }
                if TABLE_SECTIONS.contains(&self.current_tag()) {
                    let _ = self.insert_implied("tr");
                }
            }
            // caption, colgroup, tbody, thead, tfoot
            _ => {
                let _ = self.pop_to(&["table"]);
            }
        }
        let _ = self.insert_html_element(name, attributes);
    }

    /// [§ 13.2.6.4.7](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inbody)
    /// "An end tag..."
    fn end_tag_in_body(&mut self, name: &str) {
        match name {
            "body" | "html" => {
                if self.document.is_none() {
                    self.parse_warning(format!("ignored </{name}> inside content"));
                }
            }
            "head" => self.parse_warning("ignored </head> inside content".to_string()),
            "p" => {
                // "If the stack of open elements does not have a p element in button
                // scope, then this is a parse error; insert an HTML element for a "p"
                // start tag token with no attributes."
                if !self.has_element_in_button_scope("p") {
                    let _ = self.insert_implied("p");
                }
                self.close_p_element();
            }
            "br" => {
                // "An end tag whose tag name is "br": Parse error. Drop the attributes
                // from the token, and act as described in the next entry"
                self.parse_warning("treated </br> as <br>".to_string());
                let _ = self.insert_html_element("br", &[]);
            }
            "li" => {
                if self.has_element_in_list_item_scope("li") {
                    self.generate_implied_end_tags_excluding(Some("li"));
                    self.pop_until_one_of(&["li"]);
                } else {
                    self.parse_warning("ignored </li> with no open <li>".to_string());
                }
            }
            "dd" | "dt" => {
                if self.has_element_in_scope(&[name]) {
                    self.generate_implied_end_tags_excluding(Some(name));
                    self.pop_until_one_of(&[name]);
                } else {
                    self.parse_warning(format!("ignored </{name}> with no open <{name}>"));
                }
            }
            _ if HEADINGS.contains(&name) => {
                if self.has_element_in_scope(HEADINGS) {
                    self.generate_implied_end_tags_excluding(None);
                    self.pop_until_one_of(HEADINGS);
                } else {
                    self.parse_warning(format!("ignored </{name}> with no open heading"));
                }
            }
            "table" | "caption" | "colgroup" | "tbody" | "thead" | "tfoot" | "tr" | "td" | "th" => {
                if self.has_element_in_table_scope(name) {
                    self.generate_implied_end_tags_excluding(None);
                    self.pop_until_one_of(&[name]);
                } else {
                    self.parse_warning(format!("ignored </{name}> outside of its table part"));
                }
            }
            _ if BLOCK_END_TAGS.contains(&name) || FORMATTING_ELEMENTS.contains(&name) => {
                // Formatting elements skip the adoption agency and close like
                // blocks do.
                if self.has_element_in_scope(&[name]) {
                    self.generate_implied_end_tags_excluding(None);
                    if self.current_tag() != name {
                        self.parse_warning(format!("</{name}> closed other open elements"));
                    }
                    self.pop_until_one_of(&[name]);
                } else {
                    self.parse_warning(format!("ignored end tag </{name}> with no open <{name}>"));
                }
            }
            _ => self.any_other_end_tag(name),
        }
    }

    /// [§ 13.2.6.4.7](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inbody)
    /// "Any other end tag"
    fn any_other_end_tag(&mut self, name: &str) {
        for i in (self.floor..self.open.len()).rev() {
            let tag = self.tag_of(self.open[i]);
            // "If node is an HTML element with the same tag name as the token, then:
            // Generate implied end tags, except for HTML elements with the same tag
            // name as the token. ... Pop all the nodes from the current node up to
            // node, including node, then stop these steps."
            if tag == name {
                self.generate_implied_end_tags_excluding(Some(name));
                self.open.truncate(i);
                return;
            }
            // "Otherwise, if node is in the special category, then this is a parse
            // error; ignore the token, and return."
            if SPECIAL_ELEMENTS.contains(&tag) {
                break;
            }
        }
        self.parse_warning(format!("ignored stray end tag </{name}>"));
    }
}

/// Print a tree for debugging, one node per line, indented by depth.
pub fn print_tree(tree: &DomTree, id: NodeId, indent: usize) {
    let pad = "  ".repeat(indent);
    if let Some(node) = tree.get(id) {
        match &node.node_type {
            NodeType::Document => println!("{pad}#document"),
            NodeType::Element(data) => {
                let attrs: String = data
                    .attrs
                    .iter()
                    .map(|a| format!(" {}=\"{}\"", a.name, a.value))
                    .collect();
                println!("{pad}<{}{attrs}>", data.tag_name);
            }
            NodeType::Text(text) => {
                let text = text.trim();
                if !text.is_empty() {
                    println!("{pad}\"{text}\"");
                }
            }
            NodeType::Comment(data) => println!("{pad}<!--{data}-->"),
        }
        for &child in &node.children {
            print_tree(tree, child, indent + 1);
        }
    }
}
