#![forbid(unsafe_code)]

//! Page-level composition of the navigation and modal controllers.
//!
//! A [`Site`] is built once per page by the host entry point and handed to
//! whoever needs it; there is no global instance. It owns both controllers
//! and the dispatch table their triggers are registered in, and turns each
//! [`HostEvent`] into controller calls.
//!
//! # Event Flow
//!
//! 1. The host delivers a [`HostEvent`] with the current time.
//! 2. The dispatch table resolves it to [`SiteAction`]s (clicks bubble from
//!    the target outwards; keys and resizes hit document bindings).
//! 3. Each action runs to completion on its controller; outcomes are merged.
//! 4. The host honors [`EventOutcome::default_prevented`] and re-arms its
//!    timer for [`Site::next_deadline`].

use ampui_core::config::SiteConfig;
use ampui_core::dispatch::DispatchTable;
use ampui_core::dom::ElementTree;
use ampui_core::event::{EventOutcome, HostEvent};
use ampui_core::location::Location;
use ampui_core::Instant;
use tracing::{debug, trace};

use crate::modal::{ModalAction, ModalController};
use crate::nav::{NavAction, NavigationController};

/// Every action a site binding can emit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SiteAction {
    Nav(NavAction),
    Modal(ModalAction),
}

impl From<NavAction> for SiteAction {
    fn from(action: NavAction) -> Self {
        Self::Nav(action)
    }
}

impl From<ModalAction> for SiteAction {
    fn from(action: ModalAction) -> Self {
        Self::Modal(action)
    }
}

/// Both controllers plus their dispatch table.
#[derive(Debug, Clone)]
pub struct Site {
    config: SiteConfig,
    nav: NavigationController,
    modals: ModalController,
    table: DispatchTable<SiteAction>,
    initialized: bool,
}

impl Site {
    /// Build the controllers for `config`. Nothing is bound yet.
    #[must_use]
    pub fn new(config: SiteConfig) -> Self {
        Self {
            nav: NavigationController::new(&config),
            modals: ModalController::new(&config),
            table: DispatchTable::new(),
            config,
            initialized: false,
        }
    }

    /// Apply navigation state and bind every trigger.
    ///
    /// Runs once; later calls return `false` and do nothing.
    pub fn initialize<T: ElementTree + ?Sized>(&mut self, tree: &T, location: &Location) -> bool {
        if self.initialized {
            debug!("site already initialized");
            return false;
        }
        self.nav.initialize(tree, &mut self.table, location);
        self.modals.bind(tree, &mut self.table);
        self.initialized = true;
        debug!(bindings = self.table.len(), "site initialized");
        true
    }

    /// Whether [`Site::initialize`] has run.
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Route one host event to the bound actions.
    pub fn dispatch<T: ElementTree + ?Sized>(
        &mut self,
        tree: &T,
        event: &HostEvent,
        now: Instant,
    ) -> EventOutcome {
        let resolved = self.table.resolve(tree, event);
        let mut outcome = EventOutcome::IGNORED;
        for entry in resolved {
            trace!(action = ?entry.action, node = ?entry.node, "dispatch");
            let result = match &entry.action {
                SiteAction::Nav(action) => self.nav.handle(tree, *action, now),
                SiteAction::Modal(action) => self.modals.handle(tree, action, event),
            };
            outcome.merge(result);
            if entry.prevent_default {
                outcome.default_prevented = true;
                outcome.handled = true;
            }
        }
        outcome
    }

    /// Run timers whose deadline has passed. Returns whether any fired.
    pub fn poll_timers<T: ElementTree + ?Sized>(&mut self, tree: &T, now: Instant) -> bool {
        self.nav.poll_resize(tree, &mut self.table, now)
    }

    /// Earliest pending timer deadline.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        self.nav.resize_deadline()
    }

    /// Open modal `id` (see [`ModalController::open`]).
    pub fn open_modal<T: ElementTree + ?Sized>(&mut self, tree: &T, id: &str) -> bool {
        self.modals.open(tree, id)
    }

    /// Close modal `id` (see [`ModalController::close`]).
    pub fn close_modal<T: ElementTree + ?Sized>(&mut self, tree: &T, id: &str) -> bool {
        self.modals.close(tree, id)
    }

    /// Id of the modal recorded as active.
    #[must_use]
    pub fn active_modal(&self) -> Option<&str> {
        self.modals.active_modal()
    }

    /// Bind dropdowns added since the last pass. Returns how many were new.
    pub fn reinitialize_dropdowns<T: ElementTree + ?Sized>(&mut self, tree: &T) -> usize {
        self.nav.reinitialize_dropdowns(tree, &mut self.table)
    }

    /// Configuration the site was built with.
    #[must_use]
    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    /// Navigation controller.
    #[must_use]
    pub fn navigation(&self) -> &NavigationController {
        &self.nav
    }

    /// Modal controller.
    #[must_use]
    pub fn modals(&self) -> &ModalController {
        &self.modals
    }

    /// Registered bindings.
    #[must_use]
    pub fn table(&self) -> &DispatchTable<SiteAction> {
        &self.table
    }
}
