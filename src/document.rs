//! The composed document: an immutable tree of layout nodes.
//!
//! [`crate::pipeline::compose::compose`] builds a [`ComposedDocument`] from a
//! deck; the rendering engine serialises it once with
//! [`ComposedDocument::to_html`] and drops it after capture. Text and
//! attribute values are stored raw and escaped only on serialisation, so the
//! tree can be inspected in tests without decoding entities.

use crate::deck::DeckStyle;
use crate::stylesheet::CARD_STYLESHEET;

/// A node in the layout tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    Text(String),
}

impl From<Element> for Node {
    fn from(e: Element) -> Self {
        Node::Element(e)
    }
}

/// An element with classes, attributes and children.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    tag: &'static str,
    classes: Vec<String>,
    attrs: Vec<(&'static str, String)>,
    children: Vec<Node>,
}

impl Element {
    pub fn new(tag: &'static str) -> Self {
        Self {
            tag,
            classes: Vec::new(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    pub fn attr(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.attrs.push((name, value.into()));
        self
    }

    pub fn child(mut self, node: impl Into<Node>) -> Self {
        self.children.push(node.into());
        self
    }

    /// Append a child when `node` is `Some`.
    pub fn maybe_child(self, node: Option<impl Into<Node>>) -> Self {
        match node {
            Some(n) => self.child(n),
            None => self,
        }
    }

    pub fn children(mut self, nodes: impl IntoIterator<Item = impl Into<Node>>) -> Self {
        self.children.extend(nodes.into_iter().map(Into::into));
        self
    }

    pub fn text(self, text: impl Into<String>) -> Self {
        self.child(Node::Text(text.into()))
    }

    // ── Inspection ───────────────────────────────────────────────────────

    pub fn tag(&self) -> &str {
        self.tag
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn attr_value(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn child_nodes(&self) -> &[Node] {
        &self.children
    }

    /// Concatenated text of all descendant text nodes.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        collect_text(self, &mut out);
        out
    }

    /// Depth-first search for every descendant (and self) carrying `class`.
    pub fn find_by_class<'a>(&'a self, class: &str) -> Vec<&'a Element> {
        let mut out = Vec::new();
        walk(self, &mut |e| {
            if e.has_class(class) {
                out.push(e);
            }
        });
        out
    }

    /// First descendant (or self) carrying `class`.
    pub fn first_by_class<'a>(&'a self, class: &str) -> Option<&'a Element> {
        self.find_by_class(class).into_iter().next()
    }

    fn write_html(&self, out: &mut String) {
        out.push('<');
        out.push_str(self.tag);
        if !self.classes.is_empty() {
            out.push_str(" class=\"");
            out.push_str(&escape_attribute(&self.classes.join(" ")));
            out.push('"');
        }
        for (name, value) in &self.attrs {
            out.push(' ');
            out.push_str(name);
            out.push_str("=\"");
            out.push_str(&escape_attribute(value));
            out.push('"');
        }
        out.push('>');
        for child in &self.children {
            match child {
                Node::Element(e) => e.write_html(out),
                Node::Text(t) => out.push_str(&escape_text(t)),
            }
        }
        out.push_str("</");
        out.push_str(self.tag);
        out.push('>');
    }
}

fn walk<'a>(e: &'a Element, f: &mut impl FnMut(&'a Element)) {
    f(e);
    for child in &e.children {
        if let Node::Element(c) = child {
            walk(c, f);
        }
    }
}

fn collect_text(e: &Element, out: &mut String) {
    for child in &e.children {
        match child {
            Node::Element(c) => collect_text(c, out),
            Node::Text(t) => out.push_str(t),
        }
    }
}

// ── Document ─────────────────────────────────────────────────────────────

/// The complete, immutable layout for one render.
#[derive(Debug, Clone, PartialEq)]
pub struct ComposedDocument {
    style: DeckStyle,
    body: Element,
}

impl ComposedDocument {
    /// Wrap a `<body>` element. `style` is the deck style recorded on it.
    pub fn new(style: DeckStyle, body: Element) -> Self {
        Self { style, body }
    }

    pub fn style(&self) -> DeckStyle {
        self.style
    }

    pub fn body(&self) -> &Element {
        &self.body
    }

    /// Every card container, in rendering order.
    pub fn cards(&self) -> Vec<&Element> {
        self.body.find_by_class("card")
    }

    pub fn card_count(&self) -> usize {
        self.cards().len()
    }

    /// Serialise to a standalone HTML page with the embedded stylesheet.
    pub fn to_html(&self) -> String {
        let mut out = String::with_capacity(CARD_STYLESHEET.len() + 4096);
        out.push_str("<!DOCTYPE html><html lang=\"en\"><head><meta charset=\"utf-8\">");
        out.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">");
        out.push_str("<style>");
        out.push_str(CARD_STYLESHEET);
        out.push_str("</style></head>");
        self.body.write_html(&mut out);
        out.push_str("</html>");
        out
    }
}

// ── Escaping ─────────────────────────────────────────────────────────────

fn escape_text(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

fn escape_attribute(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '"' => escaped.push_str("&quot;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '\n' | '\r' | '\t' => escaped.push(' '),
            _ => escaped.push(ch),
        }
    }
    escaped
}
