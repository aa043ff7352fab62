#![forbid(unsafe_code)]

//! [`ElementTree`] over the live browser DOM.
//!
//! Elements are interned on first sight: each `web_sys::Element` gets the next
//! [`NodeId`] and a `Map` keyed by element identity keeps the handle stable
//! for the lifetime of the tree. Elements are never released, matching the
//! page-lifetime of a [`Site`](ampui_widgets::Site).

use std::cell::RefCell;

use ampui_core::dom::{ElementTree, NodeId};
use js_sys::Map;
use tracing::warn;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, EventTarget, HtmlCollection, HtmlElement, Node, Window};

use crate::error::WebError;

/// Browser document adapter.
///
/// # Memory
///
/// The intern table only grows. Every element a query visits stays reachable
/// through its [`NodeId`] until the tree is dropped, including elements later
/// removed from the document. Subtree walks such as
/// [`ElementTree::descendants`] intern everything they pass, so a page that
/// keeps replacing large fragments holds the old ones alive. A `Site` binds a
/// fixed set of nodes for the life of the page, which keeps the table bounded
/// by the markup it has seen.
pub struct DomTree {
    window: Window,
    document: Document,
    elements: RefCell<Vec<Element>>,
    index: Map,
}

impl DomTree {
    /// Adapter over the global `window.document`.
    pub fn from_global() -> Result<Self, WebError> {
        let window = web_sys::window().ok_or(WebError::NoWindow)?;
        let document = window.document().ok_or(WebError::NoDocument)?;
        Ok(Self::new(window, document))
    }

    /// Adapter over an explicit window and document.
    #[must_use]
    pub fn new(window: Window, document: Document) -> Self {
        Self {
            window,
            document,
            elements: RefCell::new(Vec::new()),
            index: Map::new(),
        }
    }

    /// The wrapped window.
    #[must_use]
    pub fn window(&self) -> &Window {
        &self.window
    }

    /// The wrapped document.
    #[must_use]
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Handle for `element`, interning it if unseen.
    pub fn intern(&self, element: Element) -> NodeId {
        if let Some(raw) = self.index.get(&element).as_f64() {
            return NodeId::new(raw as u64);
        }
        let mut elements = self.elements.borrow_mut();
        let raw = elements.len() as u64;
        self.index.set(&element, &JsValue::from_f64(raw as f64));
        elements.push(element);
        NodeId::new(raw)
    }

    /// The element behind `node`.
    #[must_use]
    pub fn element(&self, node: NodeId) -> Option<Element> {
        let idx = usize::try_from(node.raw()).ok()?;
        self.elements.borrow().get(idx).cloned()
    }

    /// Handle for an event target; text nodes resolve to their parent.
    pub fn node_for_target(&self, target: &EventTarget) -> Option<NodeId> {
        if let Some(element) = target.dyn_ref::<Element>() {
            return Some(self.intern(element.clone()));
        }
        let parent = target.dyn_ref::<Node>()?.parent_element()?;
        Some(self.intern(parent))
    }

    fn html(&self, node: NodeId) -> Option<HtmlElement> {
        self.element(node)?.dyn_into::<HtmlElement>().ok()
    }

    fn collect(&self, collection: &HtmlCollection) -> Vec<NodeId> {
        (0..collection.length())
            .filter_map(|i| collection.item(i))
            .map(|element| self.intern(element))
            .collect()
    }
}

fn report(op: &str, result: Result<(), JsValue>) {
    if let Err(err) = result {
        warn!(op, error = ?err, "DOM call failed");
    }
}

impl ElementTree for DomTree {
    fn root(&self) -> Option<NodeId> {
        self.document.document_element().map(|e| self.intern(e))
    }

    fn body(&self) -> Option<NodeId> {
        self.document
            .body()
            .map(|body| self.intern(Element::from(body)))
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.element(node)?
            .parent_element()
            .map(|e| self.intern(e))
    }

    fn children(&self, node: NodeId) -> Vec<NodeId> {
        match self.element(node) {
            Some(element) => self.collect(&element.children()),
            None => Vec::new(),
        }
    }

    fn tag_name(&self, node: NodeId) -> String {
        self.element(node)
            .map(|e| e.tag_name().to_ascii_lowercase())
            .unwrap_or_default()
    }

    fn attribute(&self, node: NodeId, name: &str) -> Option<String> {
        self.element(node)?.get_attribute(name)
    }

    fn set_attribute(&self, node: NodeId, name: &str, value: &str) {
        if let Some(element) = self.element(node) {
            report("setAttribute", element.set_attribute(name, value));
        }
    }

    fn remove_attribute(&self, node: NodeId, name: &str) {
        if let Some(element) = self.element(node) {
            report("removeAttribute", element.remove_attribute(name));
        }
    }

    fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.element(node)
            .is_some_and(|e| e.class_list().contains(class))
    }

    fn add_class(&self, node: NodeId, class: &str) {
        if let Some(element) = self.element(node) {
            report("classList.add", element.class_list().add_1(class));
        }
    }

    fn remove_class(&self, node: NodeId, class: &str) {
        if let Some(element) = self.element(node) {
            report("classList.remove", element.class_list().remove_1(class));
        }
    }

    fn style(&self, node: NodeId, property: &str) -> Option<String> {
        self.html(node)?
            .style()
            .get_property_value(property)
            .ok()
            .filter(|v| !v.is_empty())
    }

    fn set_style(&self, node: NodeId, property: &str, value: &str) {
        let Some(element) = self.html(node) else {
            return;
        };
        let style = element.style();
        if value.is_empty() {
            report("style.removeProperty", style.remove_property(property).map(drop));
        } else {
            report("style.setProperty", style.set_property(property, value));
        }
    }

    fn focus(&self, node: NodeId) {
        if let Some(element) = self.html(node) {
            report("focus", element.focus());
        }
    }

    fn focused(&self) -> Option<NodeId> {
        self.document.active_element().map(|e| self.intern(e))
    }

    fn viewport_width(&self) -> f64 {
        self.window
            .inner_width()
            .ok()
            .and_then(|w| w.as_f64())
            .or_else(|| {
                self.document
                    .document_element()
                    .map(|e| f64::from(e.client_width()))
            })
            .unwrap_or(0.0)
    }

    fn element_by_id(&self, id: &str) -> Option<NodeId> {
        if id.is_empty() {
            return None;
        }
        self.document.get_element_by_id(id).map(|e| self.intern(e))
    }

    fn elements_by_class(&self, class: &str) -> Vec<NodeId> {
        self.collect(&self.document.get_elements_by_class_name(class))
    }
}
