#![forbid(unsafe_code)]

//! In-memory [`ElementTree`] for tests.
//!
//! [`FakeDocument`] starts with `<html><body></body></html>` and grows by
//! appending [`El`] specs. It tracks focus, inline styles and the viewport
//! width, which is everything the site behaviors observe.
//!
//! # Invariants
//!
//! 1. Node ids are indexes into an append-only arena; they never dangle.
//! 2. Class lists keep insertion order and never hold duplicates, like
//!    `DOMTokenList`.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::fmt::Write as _;

use ampui_core::dom::{ElementTree, NodeId};

/// Declarative element spec used to build fixtures.
#[derive(Debug, Clone, Default)]
pub struct El {
    tag: String,
    classes: Vec<String>,
    attrs: Vec<(String, String)>,
    children: Vec<El>,
}

impl El {
    /// Element with the given tag.
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            ..Self::default()
        }
    }

    /// Anchor with an `href`.
    pub fn link(href: &str) -> Self {
        Self::new("a").attr("href", href)
    }

    /// Add a class.
    #[must_use]
    pub fn class(mut self, class: &str) -> Self {
        self.classes.push(class.to_string());
        self
    }

    /// Set the `id` attribute.
    #[must_use]
    pub fn id(self, id: &str) -> Self {
        self.attr("id", id)
    }

    /// Set an attribute.
    #[must_use]
    pub fn attr(mut self, name: &str, value: &str) -> Self {
        self.attrs.push((name.to_string(), value.to_string()));
        self
    }

    /// Append a child spec.
    #[must_use]
    pub fn child(mut self, child: El) -> Self {
        self.children.push(child);
        self
    }

    /// Append several child specs.
    #[must_use]
    pub fn children(mut self, children: impl IntoIterator<Item = El>) -> Self {
        self.children.extend(children);
        self
    }
}

#[derive(Debug, Default)]
struct NodeData {
    tag: String,
    parent: Option<usize>,
    children: Vec<usize>,
    attrs: BTreeMap<String, String>,
    classes: Vec<String>,
    styles: BTreeMap<String, String>,
}

/// Mutable in-memory document.
#[derive(Debug)]
pub struct FakeDocument {
    nodes: RefCell<Vec<NodeData>>,
    focused: Cell<Option<NodeId>>,
    viewport_width: Cell<f64>,
    focus_calls: Cell<usize>,
}

const HTML: usize = 0;
const BODY: usize = 1;

impl Default for FakeDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeDocument {
    /// Empty document (`html > body`) with a 1280px desktop viewport.
    #[must_use]
    pub fn new() -> Self {
        let doc = Self {
            nodes: RefCell::new(Vec::new()),
            focused: Cell::new(None),
            viewport_width: Cell::new(1280.0),
            focus_calls: Cell::new(0),
        };
        doc.insert(None, &El::new("html"));
        doc.insert(Some(HTML), &El::new("body"));
        doc
    }

    /// Append `spec` (and its subtree) under `<body>`.
    pub fn append(&self, spec: El) -> NodeId {
        self.append_to(NodeId::new(BODY as u64), spec)
    }

    /// Append `spec` (and its subtree) under `parent`.
    pub fn append_to(&self, parent: NodeId, spec: El) -> NodeId {
        NodeId::new(self.insert(Some(parent.raw() as usize), &spec) as u64)
    }

    fn insert(&self, parent: Option<usize>, spec: &El) -> usize {
        let idx = {
            let mut nodes = self.nodes.borrow_mut();
            let idx = nodes.len();
            let mut classes: Vec<String> = Vec::new();
            for class in &spec.classes {
                if !classes.contains(class) {
                    classes.push(class.clone());
                }
            }
            nodes.push(NodeData {
                tag: spec.tag.clone(),
                parent,
                children: Vec::new(),
                attrs: spec.attrs.iter().cloned().collect(),
                classes,
                styles: BTreeMap::new(),
            });
            if let Some(p) = parent {
                nodes[p].children.push(idx);
            }
            idx
        };
        for child in &spec.children {
            self.insert(Some(idx), child);
        }
        idx
    }

    /// Change the reported viewport width.
    pub fn set_viewport_width(&self, width: f64) {
        self.viewport_width.set(width);
    }

    /// Number of times focus has been moved.
    #[must_use]
    pub fn focus_calls(&self) -> usize {
        self.focus_calls.get()
    }

    /// First element whose attribute `name` equals `value`.
    #[must_use]
    pub fn find_by_attr(&self, name: &str, value: &str) -> Option<NodeId> {
        self.all_elements()
            .into_iter()
            .find(|&n| self.attribute(n, name).as_deref() == Some(value))
    }

    /// Anchor whose `href` is exactly `href`.
    #[must_use]
    pub fn link(&self, href: &str) -> Option<NodeId> {
        self.all_elements()
            .into_iter()
            .find(|&n| self.is_tag(n, "a") && self.attribute(n, "href").as_deref() == Some(href))
    }

    /// Class list of `node` in insertion order.
    #[must_use]
    pub fn classes(&self, node: NodeId) -> Vec<String> {
        self.with_node(node, |n| n.classes.clone())
    }

    /// Render the subtree under `<body>` as indented pseudo-markup.
    ///
    /// Attributes are sorted, so two documents with the same marker state
    /// render identically.
    #[must_use]
    pub fn snapshot(&self) -> String {
        let mut out = String::new();
        for child in self.children(NodeId::new(BODY as u64)) {
            self.write_node(&mut out, child, 0);
        }
        out
    }

    fn write_node(&self, out: &mut String, node: NodeId, depth: usize) {
        let line = self.with_node(node, |n| {
            let mut line = format!("{}<{}", "  ".repeat(depth), n.tag);
            if !n.classes.is_empty() {
                let _ = write!(line, " class=\"{}\"", n.classes.join(" "));
            }
            for (k, v) in &n.attrs {
                let _ = write!(line, " {k}=\"{v}\"");
            }
            if !n.styles.is_empty() {
                let style: Vec<String> = n.styles.iter().map(|(k, v)| format!("{k}: {v}")).collect();
                let _ = write!(line, " style=\"{}\"", style.join("; "));
            }
            line.push('>');
            line
        });
        out.push_str(&line);
        out.push('\n');
        for child in self.children(node) {
            self.write_node(out, child, depth + 1);
        }
    }

    fn with_node<R>(&self, node: NodeId, f: impl FnOnce(&NodeData) -> R) -> R {
        let nodes = self.nodes.borrow();
        f(&nodes[node.raw() as usize])
    }

    fn with_node_mut<R>(&self, node: NodeId, f: impl FnOnce(&mut NodeData) -> R) -> R {
        let mut nodes = self.nodes.borrow_mut();
        f(&mut nodes[node.raw() as usize])
    }
}

impl ElementTree for FakeDocument {
    fn root(&self) -> Option<NodeId> {
        Some(NodeId::new(HTML as u64))
    }

    fn body(&self) -> Option<NodeId> {
        Some(NodeId::new(BODY as u64))
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.with_node(node, |n| n.parent.map(|p| NodeId::new(p as u64)))
    }

    fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.with_node(node, |n| {
            n.children.iter().map(|&c| NodeId::new(c as u64)).collect()
        })
    }

    fn tag_name(&self, node: NodeId) -> String {
        self.with_node(node, |n| n.tag.clone())
    }

    fn attribute(&self, node: NodeId, name: &str) -> Option<String> {
        self.with_node(node, |n| n.attrs.get(name).cloned())
    }

    fn set_attribute(&self, node: NodeId, name: &str, value: &str) {
        self.with_node_mut(node, |n| {
            n.attrs.insert(name.to_string(), value.to_string());
        });
    }

    fn remove_attribute(&self, node: NodeId, name: &str) {
        self.with_node_mut(node, |n| {
            n.attrs.remove(name);
        });
    }

    fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.with_node(node, |n| n.classes.iter().any(|c| c == class))
    }

    fn add_class(&self, node: NodeId, class: &str) {
        self.with_node_mut(node, |n| {
            if !n.classes.iter().any(|c| c == class) {
                n.classes.push(class.to_string());
            }
        });
    }

    fn remove_class(&self, node: NodeId, class: &str) {
        self.with_node_mut(node, |n| n.classes.retain(|c| c != class));
    }

    fn style(&self, node: NodeId, property: &str) -> Option<String> {
        self.with_node(node, |n| n.styles.get(property).cloned())
    }

    fn set_style(&self, node: NodeId, property: &str, value: &str) {
        self.with_node_mut(node, |n| {
            if value.is_empty() {
                n.styles.remove(property);
            } else {
                n.styles.insert(property.to_string(), value.to_string());
            }
        });
    }

    fn focus(&self, node: NodeId) {
        self.focused.set(Some(node));
        self.focus_calls.set(self.focus_calls.get() + 1);
    }

    fn focused(&self) -> Option<NodeId> {
        self.focused.get()
    }

    fn viewport_width(&self) -> f64 {
        self.viewport_width.get()
    }
}
