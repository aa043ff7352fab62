#![forbid(unsafe_code)]

//! Explicit event dispatch table.
//!
//! Rather than attaching closures to elements, components register
//! *bindings*: "on `EventKind` at `NodeId`, emit action `A`". The host
//! installs one listener per event kind and asks the table which actions an
//! event resolves to. Keeping the table as plain data makes every trigger
//! rule inspectable and testable without a browser.
//!
//! # Invariants
//!
//! 1. Registering a binding equal to one already present on the same
//!    `(kind, node)` is a no-op; rebinding is idempotent.
//! 2. Click resolution walks from the target up through its ancestors
//!    (bubbling order); bindings on one node resolve in registration order.
//! 3. An `exact_target` binding only resolves when its node *is* the event
//!    target, never for clicks bubbling up from descendants.
//! 4. Document-level bindings resolve after node bindings.

use ahash::AHashMap;
use tracing::trace;

use crate::dom::{ElementTree, NodeId};
use crate::event::{EventKind, HostEvent};

/// A single registered trigger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding<A> {
    /// Action emitted when the binding fires.
    pub action: A,
    /// Only fire when the bound node is the event target itself.
    pub exact_target: bool,
    /// Suppress the host's default action when the binding fires.
    pub prevent_default: bool,
}

impl<A> Binding<A> {
    /// Binding that fires for the node and anything inside it.
    pub fn new(action: A) -> Self {
        Self {
            action,
            exact_target: false,
            prevent_default: false,
        }
    }

    /// Restrict to events whose target is the bound node.
    #[must_use]
    pub fn exact_target(mut self) -> Self {
        self.exact_target = true;
        self
    }

    /// Suppress the default action when fired.
    #[must_use]
    pub fn prevent_default(mut self) -> Self {
        self.prevent_default = true;
        self
    }
}

/// An action resolved for a concrete event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved<A> {
    pub action: A,
    /// Node the binding was registered on; `None` for document bindings.
    pub node: Option<NodeId>,
    pub prevent_default: bool,
}

/// Mapping from event kind and element to actions.
#[derive(Debug, Clone)]
pub struct DispatchTable<A> {
    nodes: AHashMap<(EventKind, NodeId), Vec<Binding<A>>>,
    document: AHashMap<EventKind, Vec<Binding<A>>>,
}

impl<A> Default for DispatchTable<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> DispatchTable<A> {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: AHashMap::new(),
            document: AHashMap::new(),
        }
    }

    /// Total number of registered bindings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.values().map(Vec::len).sum::<usize>()
            + self.document.values().map(Vec::len).sum::<usize>()
    }

    /// Whether no binding is registered.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether anything is bound for `kind` on `node`.
    #[must_use]
    pub fn is_bound(&self, kind: EventKind, node: NodeId) -> bool {
        self.nodes
            .get(&(kind, node))
            .is_some_and(|list| !list.is_empty())
    }

    /// Number of bindings registered for `kind` on `node`.
    #[must_use]
    pub fn bindings_on(&self, kind: EventKind, node: NodeId) -> usize {
        self.nodes.get(&(kind, node)).map_or(0, Vec::len)
    }
}

impl<A: Clone + PartialEq> DispatchTable<A> {
    /// Register `binding` for `kind` on `node`.
    ///
    /// Returns `false` if an identical binding was already present.
    pub fn bind(&mut self, kind: EventKind, node: NodeId, binding: Binding<A>) -> bool {
        let list = self.nodes.entry((kind, node)).or_default();
        if list.contains(&binding) {
            trace!(?kind, %node, "duplicate binding ignored");
            return false;
        }
        list.push(binding);
        true
    }

    /// Register a document-level binding for `kind`.
    ///
    /// Returns `false` if an identical binding was already present.
    pub fn bind_document(&mut self, kind: EventKind, binding: Binding<A>) -> bool {
        let list = self.document.entry(kind).or_default();
        if list.contains(&binding) {
            trace!(?kind, "duplicate document binding ignored");
            return false;
        }
        list.push(binding);
        true
    }

    /// Actions `event` resolves to, in firing order.
    pub fn resolve<T: ElementTree + ?Sized>(&self, tree: &T, event: &HostEvent) -> Vec<Resolved<A>> {
        let kind = event.kind();
        let mut out = Vec::new();

        if let HostEvent::Click { target } = event {
            for node in tree.ancestors_inclusive(*target) {
                let Some(list) = self.nodes.get(&(kind, node)) else {
                    continue;
                };
                for binding in list {
                    if binding.exact_target && node != *target {
                        continue;
                    }
                    out.push(Resolved {
                        action: binding.action.clone(),
                        node: Some(node),
                        prevent_default: binding.prevent_default,
                    });
                }
            }
        }

        if let Some(list) = self.document.get(&kind) {
            out.extend(list.iter().map(|binding| Resolved {
                action: binding.action.clone(),
                node: None,
                prevent_default: binding.prevent_default,
            }));
        }

        out
    }
}
