#![forbid(unsafe_code)]

//! Modal lifecycle: open/close, trigger bindings, single active record.
//!
//! # Invariants
//!
//! - `open` and `close` update the visible marker, the scroll lock and
//!   `aria-hidden` together in one synchronous call.
//! - The active record names at most one modal. `open` overwrites it;
//!   `close` clears it only when it names the modal being closed.
//!
//! # Failure Modes
//!
//! - Unknown modal id: `open`/`close` return `false` and change nothing.
//! - Opener/closer without a target attribute: not bound.
//! - Overlay without an `id`: not bound.
//! - Escape with no active modal: no-op.
//! - Opening `b` while `a` is open leaves `a` visible and records `b`;
//!   closing either unlocks scrolling.

use ampui_core::config::{MarkupConfig, SiteConfig};
use ampui_core::dispatch::{Binding, DispatchTable};
use ampui_core::dom::{ElementTree, NodeId};
use ampui_core::event::{EventKind, EventOutcome, HostEvent, Key};
use tracing::debug;

use super::focus::{focus_first_in, restore_focus_to_opener};
use super::scroll_lock::{lock_scroll, unlock_scroll};

/// Actions the modal controller binds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModalAction {
    /// An opener was activated.
    Open { id: String },
    /// A closer was activated.
    Close { id: String },
    /// The backdrop of modal `id` was clicked directly.
    BackdropClicked { id: String },
    /// A key was pressed somewhere in the document.
    KeyDown,
}

/// Tracks the active modal and applies open/close transitions.
#[derive(Debug, Clone)]
pub struct ModalController {
    markup: MarkupConfig,
    active: Option<String>,
}

impl ModalController {
    /// Controller for the given site configuration.
    #[must_use]
    pub fn new(config: &SiteConfig) -> Self {
        Self {
            markup: config.markup.clone(),
            active: None,
        }
    }

    /// Id of the modal recorded as active.
    #[must_use]
    pub fn active_modal(&self) -> Option<&str> {
        self.active.as_deref()
    }

    /// Whether modal `id` currently carries the visible marker.
    pub fn is_open<T: ElementTree + ?Sized>(&self, tree: &T, id: &str) -> bool {
        tree.element_by_id(id)
            .is_some_and(|modal| tree.has_class(modal, &self.markup.active_class))
    }

    /// Register opener, closer, backdrop and Escape bindings.
    ///
    /// Returns the number of bindings added.
    pub fn bind<T, A>(&self, tree: &T, table: &mut DispatchTable<A>) -> usize
    where
        T: ElementTree + ?Sized,
        A: From<ModalAction> + Clone + PartialEq,
    {
        let markup = &self.markup;
        let mut added = 0;

        for opener in tree.elements_by_class(&markup.opener_class) {
            let Some(id) = self.target_of(tree, opener) else {
                debug!(%opener, "modal opener without target, skipping");
                continue;
            };
            let binding = Binding::new(A::from(ModalAction::Open { id })).prevent_default();
            added += usize::from(table.bind(EventKind::Click, opener, binding));
        }

        for closer in tree.elements_by_class(&markup.closer_class) {
            let Some(id) = self.target_of(tree, closer) else {
                debug!(%closer, "modal closer without target, skipping");
                continue;
            };
            let binding = Binding::new(A::from(ModalAction::Close { id })).prevent_default();
            added += usize::from(table.bind(EventKind::Click, closer, binding));
        }

        for overlay in tree.elements_by_class(&markup.overlay_class) {
            let Some(id) = tree.attribute(overlay, "id").filter(|id| !id.is_empty()) else {
                debug!(%overlay, "modal overlay without id, skipping");
                continue;
            };
            let binding = Binding::new(A::from(ModalAction::BackdropClicked { id })).exact_target();
            added += usize::from(table.bind(EventKind::Click, overlay, binding));
        }

        added += usize::from(
            table.bind_document(EventKind::KeyDown, Binding::new(A::from(ModalAction::KeyDown))),
        );
        debug!(bindings = added, "modal triggers bound");
        added
    }

    fn target_of<T: ElementTree + ?Sized>(&self, tree: &T, node: NodeId) -> Option<String> {
        tree.attribute(node, &self.markup.target_attr)
            .filter(|id| !id.is_empty())
    }

    /// Show modal `id`, lock scrolling and move focus inside it.
    ///
    /// Returns `false` if no element has that id.
    pub fn open<T: ElementTree + ?Sized>(&mut self, tree: &T, id: &str) -> bool {
        let Some(modal) = tree.element_by_id(id) else {
            debug!(modal = id, "open: no such modal");
            return false;
        };
        tree.add_class(modal, &self.markup.active_class);
        lock_scroll(tree);
        if let Some(previous) = self.active.replace(id.to_string())
            && previous != id
        {
            debug!(modal = id, previous = %previous, "open replaces active modal record");
        }
        tree.set_attribute(modal, "aria-hidden", "false");
        let focused = focus_first_in(tree, modal);
        debug!(modal = id, focused = focused.is_some(), "modal opened");
        true
    }

    /// Hide modal `id`, unlock scrolling and return focus to its opener.
    ///
    /// Returns `false` if no element has that id.
    pub fn close<T: ElementTree + ?Sized>(&mut self, tree: &T, id: &str) -> bool {
        let Some(modal) = tree.element_by_id(id) else {
            debug!(modal = id, "close: no such modal");
            return false;
        };
        tree.remove_class(modal, &self.markup.active_class);
        unlock_scroll(tree);
        if self.active.as_deref() == Some(id) {
            self.active = None;
        }
        tree.set_attribute(modal, "aria-hidden", "true");
        let restored = restore_focus_to_opener(
            tree,
            &self.markup.opener_class,
            &self.markup.target_attr,
            id,
        );
        debug!(modal = id, restored = restored.is_some(), "modal closed");
        true
    }

    /// Close the active modal, if any. Returns whether one was closed.
    pub fn close_active<T: ElementTree + ?Sized>(&mut self, tree: &T) -> bool {
        match self.active.clone() {
            Some(id) => self.close(tree, &id),
            None => false,
        }
    }

    /// Run a bound action for `event`.
    pub fn handle<T: ElementTree + ?Sized>(
        &mut self,
        tree: &T,
        action: &ModalAction,
        event: &HostEvent,
    ) -> EventOutcome {
        let handled = match action {
            ModalAction::Open { id } => {
                self.open(tree, id);
                true
            }
            ModalAction::Close { id } | ModalAction::BackdropClicked { id } => {
                self.close(tree, id);
                true
            }
            ModalAction::KeyDown => match event {
                HostEvent::KeyDown { key: Key::Escape } => self.close_active(tree),
                _ => false,
            },
        };
        EventOutcome {
            handled,
            default_prevented: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modal::is_scroll_locked;
    use ampui_harness::{El, FakeDocument, standard_site};
    use pretty_assertions::assert_eq;

    fn controller() -> ModalController {
        ModalController::new(&SiteConfig::default())
    }

    #[test]
    fn open_shows_locks_and_focuses() {
        let site = standard_site();
        let mut modals = controller();
        assert!(modals.open(&site.doc, "signup"));
        assert!(site.doc.has_class(site.signup, "active"));
        assert!(is_scroll_locked(&site.doc));
        assert_eq!(modals.active_modal(), Some("signup"));
        assert_eq!(site.doc.attribute(site.signup, "aria-hidden").as_deref(), Some("false"));
        assert_eq!(site.doc.focused(), Some(site.signup_email));
    }

    #[test]
    fn open_close_round_trip_restores_everything() {
        let site = standard_site();
        let mut modals = controller();
        modals.open(&site.doc, "signup");
        assert!(modals.close(&site.doc, "signup"));
        assert!(!site.doc.has_class(site.signup, "active"));
        assert!(!is_scroll_locked(&site.doc));
        assert_eq!(modals.active_modal(), None);
        assert_eq!(site.doc.attribute(site.signup, "aria-hidden").as_deref(), Some("true"));
        assert_eq!(site.doc.focused(), Some(site.signup_opener));
    }

    #[test]
    fn unknown_id_is_a_no_op() {
        let site = standard_site();
        let mut modals = controller();
        let before = site.doc.snapshot();
        assert!(!modals.open(&site.doc, "missing"));
        assert!(!modals.close(&site.doc, "missing"));
        assert_eq!(site.doc.snapshot(), before);
        assert_eq!(modals.active_modal(), None);
    }

    #[test]
    fn open_without_focusable_content_keeps_focus() {
        let site = standard_site();
        let mut modals = controller();
        modals.open(&site.doc, "newsletter");
        assert_eq!(site.doc.focused(), None);
        assert!(site.doc.has_class(site.newsletter, "active"));
    }

    #[test]
    fn second_open_overwrites_record_without_hiding_first() {
        let site = standard_site();
        let mut modals = controller();
        modals.open(&site.doc, "signup");
        modals.open(&site.doc, "newsletter");
        assert_eq!(modals.active_modal(), Some("newsletter"));
        assert!(modals.is_open(&site.doc, "signup"));
        assert!(modals.is_open(&site.doc, "newsletter"));
        assert!(is_scroll_locked(&site.doc));

        // Closing the stale one unlocks scrolling but keeps the record.
        modals.close(&site.doc, "signup");
        assert_eq!(modals.active_modal(), Some("newsletter"));
        assert!(!is_scroll_locked(&site.doc));
        assert!(modals.is_open(&site.doc, "newsletter"));
    }

    #[test]
    fn escape_without_active_modal_is_ignored() {
        let site = standard_site();
        let mut modals = controller();
        let out = modals.handle(&site.doc, &ModalAction::KeyDown, &HostEvent::key("Escape"));
        assert!(!out.handled);
        assert_eq!(site.doc.focus_calls(), 0);
    }

    #[test]
    fn escape_closes_active_modal() {
        let site = standard_site();
        let mut modals = controller();
        modals.open(&site.doc, "signup");
        let out = modals.handle(&site.doc, &ModalAction::KeyDown, &HostEvent::key("Escape"));
        assert!(out.handled);
        assert!(!modals.is_open(&site.doc, "signup"));
    }

    #[test]
    fn other_keys_do_nothing() {
        let site = standard_site();
        let mut modals = controller();
        modals.open(&site.doc, "signup");
        modals.handle(&site.doc, &ModalAction::KeyDown, &HostEvent::key("Enter"));
        assert!(modals.is_open(&site.doc, "signup"));
    }

    #[test]
    fn bind_registers_every_trigger() {
        let site = standard_site();
        let modals = controller();
        let mut table = DispatchTable::<ModalAction>::new();
        // 2 openers, 1 closer, 2 overlays, 1 document key binding.
        assert_eq!(modals.bind(&site.doc, &mut table), 6);
        assert_eq!(modals.bind(&site.doc, &mut table), 0);
        assert!(table.is_bound(EventKind::Click, site.signup_opener));
        assert!(table.is_bound(EventKind::Click, site.signup_close));
        assert!(table.is_bound(EventKind::Click, site.signup));
    }

    #[test]
    fn triggers_without_targets_are_skipped() {
        let doc = FakeDocument::new();
        doc.append(El::new("a").class("modal_opener"));
        doc.append(El::new("button").class("modal_kill").attr("amp-target", ""));
        doc.append(El::new("div").class("modal_overlay"));
        let mut table = DispatchTable::<ModalAction>::new();
        assert_eq!(controller().bind(&doc, &mut table), 1);
    }
}
