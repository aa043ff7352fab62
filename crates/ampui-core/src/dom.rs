#![forbid(unsafe_code)]

//! Minimal element-tree abstraction the site behaviors run against.
//!
//! The controllers never touch a browser directly. They query and mutate an
//! [`ElementTree`]: find elements by id, class or tag, read and write
//! attributes, flip classes, move focus. The browser host implements the
//! trait over `web-sys`; tests implement it over an in-memory document.
//!
//! # Invariants
//!
//! 1. A [`NodeId`] handed out by a tree stays valid and refers to the same
//!    element for the lifetime of that tree.
//! 2. Query results are in document order (pre-order depth-first).
//! 3. All mutating methods take `&self`: a document is a shared, interior
//!    mutable structure, exactly like the DOM it stands in for.
//!
//! # Failure Modes
//!
//! - Lookups for missing elements return `None` or an empty `Vec`.
//! - Mutations on a node that has no such attribute/class are no-ops.

use std::fmt;

/// Opaque handle for an element inside one [`ElementTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u64);

impl NodeId {
    /// Wrap a raw handle value.
    #[inline]
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Get the raw handle value.
    #[inline]
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node#{}", self.0)
    }
}

/// Tags that are focusable without an explicit `tabindex`.
const FOCUSABLE_TAGS: &[&str] = &["button", "input", "select", "textarea"];

/// Read/write access to a document tree.
///
/// Implementors provide the primitive accessors; traversal and convenience
/// queries come as provided methods built on top of them. Hosts with a
/// faster native path (e.g. `getElementById`) override the provided ones.
pub trait ElementTree {
    /// The document element, if the tree has one.
    fn root(&self) -> Option<NodeId>;

    /// The `<body>` element, if present.
    fn body(&self) -> Option<NodeId>;

    /// Parent element of `node`.
    fn parent(&self, node: NodeId) -> Option<NodeId>;

    /// Element children of `node`, in document order.
    fn children(&self, node: NodeId) -> Vec<NodeId>;

    /// Lowercase tag name of `node`.
    fn tag_name(&self, node: NodeId) -> String;

    /// Value of attribute `name`, if set.
    fn attribute(&self, node: NodeId, name: &str) -> Option<String>;

    /// Set attribute `name` to `value`.
    fn set_attribute(&self, node: NodeId, name: &str, value: &str);

    /// Remove attribute `name`.
    fn remove_attribute(&self, node: NodeId, name: &str);

    /// Whether `node` carries `class`.
    fn has_class(&self, node: NodeId, class: &str) -> bool;

    /// Add `class` to `node`.
    fn add_class(&self, node: NodeId, class: &str);

    /// Remove `class` from `node`.
    fn remove_class(&self, node: NodeId, class: &str);

    /// Inline style property value. Empty or unset properties return `None`.
    fn style(&self, node: NodeId, property: &str) -> Option<String>;

    /// Set an inline style property. An empty `value` clears it.
    fn set_style(&self, node: NodeId, property: &str, value: &str);

    /// Move input focus to `node`.
    fn focus(&self, node: NodeId);

    /// The element that currently holds focus.
    fn focused(&self) -> Option<NodeId>;

    /// Viewport width in CSS pixels.
    fn viewport_width(&self) -> f64;

    /// All element descendants of `node` in document order, excluding `node`.
    fn descendants(&self, node: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(node).into_iter().rev().collect();
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(self.children(next).into_iter().rev());
        }
        out
    }

    /// Every element in the tree, in document order.
    fn all_elements(&self) -> Vec<NodeId> {
        match self.root() {
            Some(root) => {
                let mut out = vec![root];
                out.extend(self.descendants(root));
                out
            }
            None => Vec::new(),
        }
    }

    /// First element whose `id` attribute equals `id`.
    fn element_by_id(&self, id: &str) -> Option<NodeId> {
        if id.is_empty() {
            return None;
        }
        self.all_elements()
            .into_iter()
            .find(|&n| self.attribute(n, "id").as_deref() == Some(id))
    }

    /// Every element carrying `class`, in document order.
    fn elements_by_class(&self, class: &str) -> Vec<NodeId> {
        self.all_elements()
            .into_iter()
            .filter(|&n| self.has_class(n, class))
            .collect()
    }

    /// First element carrying `class`.
    fn first_by_class(&self, class: &str) -> Option<NodeId> {
        self.elements_by_class(class).into_iter().next()
    }

    /// Whether `node` is a `tag` element (case-insensitive).
    fn is_tag(&self, node: NodeId, tag: &str) -> bool {
        self.tag_name(node).eq_ignore_ascii_case(tag)
    }

    /// Descendants of `scope` with the given tag name.
    fn descendants_by_tag(&self, scope: NodeId, tag: &str) -> Vec<NodeId> {
        self.descendants(scope)
            .into_iter()
            .filter(|&n| self.is_tag(n, tag))
            .collect()
    }

    /// Element children of `node` with the given tag name.
    fn children_by_tag(&self, node: NodeId, tag: &str) -> Vec<NodeId> {
        self.children(node)
            .into_iter()
            .filter(|&n| self.is_tag(n, tag))
            .collect()
    }

    /// `node` followed by each of its ancestors up to the root.
    fn ancestors_inclusive(&self, node: NodeId) -> Vec<NodeId> {
        let mut out = vec![node];
        let mut cur = node;
        while let Some(parent) = self.parent(cur) {
            out.push(parent);
            cur = parent;
        }
        out
    }

    /// Add or remove `class` so its presence equals `on`.
    fn set_class(&self, node: NodeId, class: &str, on: bool) {
        if on {
            self.add_class(node, class);
        } else {
            self.remove_class(node, class);
        }
    }

    /// Flip `class` on `node`, returning whether it is now present.
    fn toggle_class(&self, node: NodeId, class: &str) -> bool {
        let on = !self.has_class(node, class);
        self.set_class(node, class, on);
        on
    }
}

/// Whether `node` can receive keyboard focus.
///
/// Buttons, form controls, anything with an `href`, and any element with a
/// non-negative `tabindex` qualify.
pub fn is_focusable<T: ElementTree + ?Sized>(tree: &T, node: NodeId) -> bool {
    let tag = tree.tag_name(node);
    if FOCUSABLE_TAGS.iter().any(|t| tag.eq_ignore_ascii_case(t)) {
        return true;
    }
    if tree.attribute(node, "href").is_some() {
        return true;
    }
    tree.attribute(node, "tabindex")
        .and_then(|v| v.trim().parse::<i32>().ok())
        .is_some_and(|order| order >= 0)
}

/// First focusable descendant of `scope`, in document order.
pub fn first_focusable<T: ElementTree + ?Sized>(tree: &T, scope: NodeId) -> Option<NodeId> {
    tree.descendants(scope)
        .into_iter()
        .find(|&n| is_focusable(tree, n))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::{BTreeMap, BTreeSet};

    #[derive(Default)]
    struct Node {
        tag: String,
        parent: Option<usize>,
        children: Vec<usize>,
        attrs: BTreeMap<String, String>,
        classes: BTreeSet<String>,
    }

    /// Tiny tree so the provided methods can be tested without the harness.
    #[derive(Default)]
    struct MiniTree {
        nodes: RefCell<Vec<Node>>,
        focus: RefCell<Option<NodeId>>,
    }

    impl MiniTree {
        fn add(&self, parent: Option<usize>, tag: &str, attrs: &[(&str, &str)]) -> usize {
            let mut nodes = self.nodes.borrow_mut();
            let idx = nodes.len();
            let mut node = Node {
                tag: tag.to_string(),
                parent,
                ..Node::default()
            };
            for (k, v) in attrs {
                if *k == "class" {
                    node.classes.extend(v.split_whitespace().map(str::to_string));
                } else {
                    node.attrs.insert((*k).to_string(), (*v).to_string());
                }
            }
            nodes.push(node);
            if let Some(p) = parent {
                nodes[p].children.push(idx);
            }
            idx
        }
    }

    fn id(i: usize) -> NodeId {
        NodeId::new(i as u64)
    }

    impl ElementTree for MiniTree {
        fn root(&self) -> Option<NodeId> {
            (!self.nodes.borrow().is_empty()).then(|| id(0))
        }
        fn body(&self) -> Option<NodeId> {
            None
        }
        fn parent(&self, node: NodeId) -> Option<NodeId> {
            self.nodes.borrow()[node.raw() as usize].parent.map(id)
        }
        fn children(&self, node: NodeId) -> Vec<NodeId> {
            self.nodes.borrow()[node.raw() as usize]
                .children
                .iter()
                .map(|&c| id(c))
                .collect()
        }
        fn tag_name(&self, node: NodeId) -> String {
            self.nodes.borrow()[node.raw() as usize].tag.clone()
        }
        fn attribute(&self, node: NodeId, name: &str) -> Option<String> {
            self.nodes.borrow()[node.raw() as usize]
                .attrs
                .get(name)
                .cloned()
        }
        fn set_attribute(&self, node: NodeId, name: &str, value: &str) {
            self.nodes.borrow_mut()[node.raw() as usize]
                .attrs
                .insert(name.to_string(), value.to_string());
        }
        fn remove_attribute(&self, node: NodeId, name: &str) {
            self.nodes.borrow_mut()[node.raw() as usize]
                .attrs
                .remove(name);
        }
        fn has_class(&self, node: NodeId, class: &str) -> bool {
            self.nodes.borrow()[node.raw() as usize]
                .classes
                .contains(class)
        }
        fn add_class(&self, node: NodeId, class: &str) {
            self.nodes.borrow_mut()[node.raw() as usize]
                .classes
                .insert(class.to_string());
        }
        fn remove_class(&self, node: NodeId, class: &str) {
            self.nodes.borrow_mut()[node.raw() as usize]
                .classes
                .remove(class);
        }
        fn style(&self, _node: NodeId, _property: &str) -> Option<String> {
            None
        }
        fn set_style(&self, _node: NodeId, _property: &str, _value: &str) {}
        fn focus(&self, node: NodeId) {
            *self.focus.borrow_mut() = Some(node);
        }
        fn focused(&self) -> Option<NodeId> {
            *self.focus.borrow()
        }
        fn viewport_width(&self) -> f64 {
            1024.0
        }
    }

    fn sample() -> MiniTree {
        let t = MiniTree::default();
        let html = t.add(None, "html", &[]);
        let div = t.add(Some(html), "div", &[("id", "box"), ("class", "card wide")]);
        t.add(Some(div), "p", &[("tabindex", "-1")]);
        t.add(Some(div), "span", &[("tabindex", "0")]);
        let list = t.add(Some(html), "ul", &[("class", "card")]);
        t.add(Some(list), "li", &[]);
        t
    }

    #[test]
    fn descendants_are_document_order() {
        let t = sample();
        let order: Vec<u64> = t.descendants(id(0)).iter().map(|n| n.raw()).collect();
        assert_eq!(order, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn element_by_id_finds_and_rejects_empty() {
        let t = sample();
        assert_eq!(t.element_by_id("box"), Some(id(1)));
        assert_eq!(t.element_by_id("missing"), None);
        assert_eq!(t.element_by_id(""), None);
    }

    #[test]
    fn elements_by_class_collects_all() {
        let t = sample();
        assert_eq!(t.elements_by_class("card"), vec![id(1), id(4)]);
        assert_eq!(t.first_by_class("wide"), Some(id(1)));
        assert!(t.elements_by_class("nope").is_empty());
    }

    #[test]
    fn toggle_class_reports_new_state() {
        let t = sample();
        assert!(t.toggle_class(id(5), "active"));
        assert!(t.has_class(id(5), "active"));
        assert!(!t.toggle_class(id(5), "active"));
        assert!(!t.has_class(id(5), "active"));
    }

    #[test]
    fn ancestors_inclusive_walks_to_root() {
        let t = sample();
        assert_eq!(t.ancestors_inclusive(id(3)), vec![id(3), id(1), id(0)]);
    }

    #[test]
    fn negative_tabindex_is_not_focusable() {
        let t = sample();
        assert!(!is_focusable(&t, id(2)));
        assert!(is_focusable(&t, id(3)));
        assert_eq!(first_focusable(&t, id(1)), Some(id(3)));
        assert_eq!(first_focusable(&t, id(4)), None);
    }
}
