#![forbid(unsafe_code)]

//! Site navigation: active-link markers, mobile menu toggle, mobile dropdowns.
//!
//! # Markup
//!
//! | Selector | Role |
//! |----------|------|
//! | `.horizontal` | navigation scope; its `li`/`a` carry active markers |
//! | `.nav-toggle` | mobile menu button (`aria-expanded`) |
//! | `#main-nav` | container opened by the toggle |
//! | `.site-nav` | optional outer wrapper, marked while the menu is open |
//!
//! Names are configurable through [`MarkupConfig`].
//!
//! # Invariants
//!
//! 1. [`NavigationController::update_active_state`] clears every marker in
//!    scope before applying new ones, so repeated calls with the same
//!    location produce the same markers.
//! 2. Each dropdown item is bound at most once no matter how often
//!    [`NavigationController::reinitialize_dropdowns`] runs.
//! 3. Dropdown clicks are only intercepted while the viewport is narrower
//!    than the mobile breakpoint; otherwise the link navigates normally.
//! 4. The menu's `aria-expanded` flag and both open markers always agree.
//!
//! # Failure Modes
//!
//! - Missing toggle or nav container: toggle binding is skipped.
//! - Dropdown item without a direct link: that item is skipped.
//! - No navigation scope on the page: nothing is marked or bound.

use ahash::AHashSet;
use ampui_core::config::{MarkupConfig, SiteConfig};
use ampui_core::debounce::Debouncer;
use ampui_core::dispatch::{Binding, DispatchTable};
use ampui_core::dom::{ElementTree, NodeId};
use ampui_core::event::{EventKind, EventOutcome};
use ampui_core::location::Location;
use ampui_core::Instant;
use tracing::{debug, trace};

use crate::route::RouteMatcher;

/// Value written to `aria-current` on the active top-level link.
const ARIA_CURRENT_PAGE: &str = "page";

/// Actions the navigation controller binds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavAction {
    /// Flip the mobile menu.
    ToggleMenu,
    /// Expand or collapse a dropdown item on mobile.
    ToggleDropdown { item: NodeId, link: NodeId },
    /// The viewport was resized.
    ViewportResized,
}

/// Elements driving the mobile menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuToggle {
    pub button: NodeId,
    pub nav: NodeId,
    pub wrapper: Option<NodeId>,
}

/// Markers applied by one active-state pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActiveMarkers {
    /// Top-level items marked active, in document order.
    pub items: Vec<NodeId>,
    /// Links marked as the in-page target.
    pub sub_links: Vec<NodeId>,
}

/// Navigation behavior for one page.
#[derive(Debug, Clone)]
pub struct NavigationController {
    markup: MarkupConfig,
    matcher: RouteMatcher,
    mobile_breakpoint: f64,
    resize: Debouncer,
    menu: Option<MenuToggle>,
    bound_dropdowns: AHashSet<NodeId>,
    rebinds: u64,
}

impl NavigationController {
    /// Controller for the given site configuration.
    #[must_use]
    pub fn new(config: &SiteConfig) -> Self {
        Self {
            markup: config.markup.clone(),
            matcher: RouteMatcher::new(config.hash_match),
            mobile_breakpoint: config.mobile_breakpoint,
            resize: Debouncer::new(config.resize_debounce()),
            menu: None,
            bound_dropdowns: AHashSet::new(),
            rebinds: 0,
        }
    }

    /// Compute active markers, bind the menu toggle, bind dropdowns and
    /// listen for resizes.
    pub fn initialize<T, A>(&mut self, tree: &T, table: &mut DispatchTable<A>, location: &Location)
    where
        T: ElementTree + ?Sized,
        A: From<NavAction> + Clone + PartialEq,
    {
        let markers = self.update_active_state(tree, location);
        debug!(
            path = %location.path,
            hash = %location.hash,
            items = markers.items.len(),
            sub_links = markers.sub_links.len(),
            "navigation active state applied"
        );
        self.bind_menu_toggle(tree, table);
        self.reinitialize_dropdowns(tree, table);
        table.bind_document(
            EventKind::Resize,
            Binding::new(A::from(NavAction::ViewportResized)),
        );
    }

    // --- Active state ---

    fn scopes<T: ElementTree + ?Sized>(&self, tree: &T) -> Vec<NodeId> {
        tree.elements_by_class(&self.markup.nav_scope_class)
    }

    /// Descendants of every navigation scope with `tag`, deduplicated.
    fn scoped<T: ElementTree + ?Sized>(&self, tree: &T, tag: &str) -> Vec<NodeId> {
        let mut seen = AHashSet::new();
        self.scopes(tree)
            .into_iter()
            .flat_map(|scope| tree.descendants_by_tag(scope, tag))
            .filter(|n| seen.insert(*n))
            .collect()
    }

    /// The outermost `li` between `node` and its navigation scope.
    fn enclosing_item<T: ElementTree + ?Sized>(&self, tree: &T, node: NodeId) -> Option<NodeId> {
        let mut item = None;
        for ancestor in tree.ancestors_inclusive(node) {
            if tree.has_class(ancestor, &self.markup.nav_scope_class) {
                return item;
            }
            if tree.is_tag(ancestor, "li") {
                item = Some(ancestor);
            }
        }
        None
    }

    /// Top-level navigation items: `li`s with no other `li` between them and
    /// their scope.
    pub fn top_level_items<T: ElementTree + ?Sized>(&self, tree: &T) -> Vec<NodeId> {
        self.scoped(tree, "li")
            .into_iter()
            .filter(|&li| self.enclosing_item(tree, li) == Some(li))
            .collect()
    }

    /// Clear all navigation markers, then mark links matching `location`.
    pub fn update_active_state<T: ElementTree + ?Sized>(
        &self,
        tree: &T,
        location: &Location,
    ) -> ActiveMarkers {
        let active = &self.markup.active_class;
        let items = self.scoped(tree, "li");
        let links = self.scoped(tree, "a");

        for &li in &items {
            tree.remove_class(li, active);
        }
        for &a in &links {
            tree.remove_class(a, active);
            tree.remove_attribute(a, "aria-current");
        }

        let mut markers = ActiveMarkers::default();
        for &link in &links {
            let href = tree.attribute(link, "href").unwrap_or_default();
            if href.is_empty() {
                continue;
            }

            if let Some(rule) = self.matcher.top_level_match(&location.path, &href) {
                trace!(href = %href, ?rule, "top-level match");
                if let Some(item) = self.enclosing_item(tree, link) {
                    tree.add_class(item, active);
                    let direct = tree
                        .children_by_tag(item, "a")
                        .into_iter()
                        .next()
                        .unwrap_or(link);
                    tree.set_attribute(direct, "aria-current", ARIA_CURRENT_PAGE);
                    if !markers.items.contains(&item) {
                        markers.items.push(item);
                    }
                }
            }

            if self.matcher.should_mark_sub_nav(&location.hash, &href) {
                trace!(href = %href, hash = %location.hash, "sub-nav match");
                tree.add_class(link, active);
                markers.sub_links.push(link);
            }
        }
        markers
    }

    // --- Mobile menu ---

    /// Bind the mobile menu toggle if its markup is present.
    ///
    /// Returns whether the toggle is bound.
    pub fn bind_menu_toggle<T, A>(&mut self, tree: &T, table: &mut DispatchTable<A>) -> bool
    where
        T: ElementTree + ?Sized,
        A: From<NavAction> + Clone + PartialEq,
    {
        let Some(button) = tree.first_by_class(&self.markup.toggle_class) else {
            debug!(class = %self.markup.toggle_class, "nav toggle markup missing, skipping");
            return false;
        };
        let Some(nav) = tree.element_by_id(&self.markup.nav_id) else {
            debug!(id = %self.markup.nav_id, "nav container missing, skipping toggle");
            return false;
        };
        let wrapper = tree.first_by_class(&self.markup.wrapper_class);
        self.menu = Some(MenuToggle {
            button,
            nav,
            wrapper,
        });
        table.bind(
            EventKind::Click,
            button,
            Binding::new(A::from(NavAction::ToggleMenu)),
        );
        true
    }

    /// Bound menu elements, if the toggle was found.
    #[must_use]
    pub fn menu(&self) -> Option<MenuToggle> {
        self.menu
    }

    /// Whether the mobile menu is currently expanded.
    pub fn is_menu_expanded<T: ElementTree + ?Sized>(&self, tree: &T) -> bool {
        self.menu.is_some_and(|menu| {
            tree.attribute(menu.button, "aria-expanded").as_deref() == Some("true")
        })
    }

    /// Flip the mobile menu. Returns the new expanded state.
    pub fn toggle_menu<T: ElementTree + ?Sized>(&self, tree: &T) -> bool {
        let Some(menu) = self.menu else {
            return false;
        };
        let expanded = !self.is_menu_expanded(tree);
        tree.set_attribute(
            menu.button,
            "aria-expanded",
            if expanded { "true" } else { "false" },
        );
        tree.set_class(menu.nav, &self.markup.menu_open_class, expanded);
        if let Some(wrapper) = menu.wrapper {
            tree.set_class(wrapper, &self.markup.wrapper_open_class, expanded);
        }
        debug!(expanded, "mobile menu toggled");
        expanded
    }

    // --- Dropdowns ---

    /// Bind every dropdown-capable top-level item not bound yet.
    ///
    /// Returns the number of newly bound items.
    pub fn reinitialize_dropdowns<T, A>(&mut self, tree: &T, table: &mut DispatchTable<A>) -> usize
    where
        T: ElementTree + ?Sized,
        A: From<NavAction> + Clone + PartialEq,
    {
        let mut newly_bound = 0;
        for item in self.top_level_items(tree) {
            if self.bound_dropdowns.contains(&item) {
                continue;
            }
            let has_submenu = !tree.descendants_by_tag(item, "ul").is_empty()
                || !tree.descendants_by_tag(item, "ol").is_empty();
            if !has_submenu {
                continue;
            }
            let Some(link) = tree.children_by_tag(item, "a").into_iter().next() else {
                debug!(%item, "dropdown item has no direct link, skipping");
                continue;
            };
            table.bind(
                EventKind::Click,
                link,
                Binding::new(A::from(NavAction::ToggleDropdown { item, link })),
            );
            self.bound_dropdowns.insert(item);
            newly_bound += 1;
        }
        if newly_bound > 0 {
            debug!(newly_bound, total = self.bound_dropdowns.len(), "dropdowns bound");
        }
        newly_bound
    }

    /// Number of dropdown items bound so far.
    #[must_use]
    pub fn bound_dropdowns(&self) -> usize {
        self.bound_dropdowns.len()
    }

    /// Handle a click on a dropdown's parent link.
    ///
    /// Below the mobile breakpoint the click is intercepted and the item's
    /// open marker toggled; otherwise the click proceeds untouched.
    pub fn toggle_dropdown<T: ElementTree + ?Sized>(
        &self,
        tree: &T,
        item: NodeId,
        link: NodeId,
    ) -> EventOutcome {
        let width = tree.viewport_width();
        if width >= self.mobile_breakpoint {
            return EventOutcome::IGNORED;
        }
        let open = tree.toggle_class(item, &self.markup.dropdown_open_class);
        tree.set_attribute(link, "aria-expanded", if open { "true" } else { "false" });
        debug!(%item, open, width, "dropdown toggled");
        EventOutcome {
            handled: true,
            default_prevented: true,
        }
    }

    // --- Resize ---

    /// Record a resize at `now`, restarting the debounce window.
    pub fn on_resize(&mut self, now: Instant) -> Instant {
        self.resize.trigger(now)
    }

    /// Rebind dropdowns if the resize debounce has elapsed.
    ///
    /// Returns whether a rebind ran.
    pub fn poll_resize<T, A>(&mut self, tree: &T, table: &mut DispatchTable<A>, now: Instant) -> bool
    where
        T: ElementTree + ?Sized,
        A: From<NavAction> + Clone + PartialEq,
    {
        if !self.resize.poll(now) {
            return false;
        }
        self.rebinds += 1;
        self.reinitialize_dropdowns(tree, table);
        true
    }

    /// Deadline of the pending resize rebind, if any.
    #[must_use]
    pub fn resize_deadline(&self) -> Option<Instant> {
        self.resize.deadline()
    }

    /// How many debounced rebinds have run.
    #[must_use]
    pub fn rebind_count(&self) -> u64 {
        self.rebinds
    }

    /// Run a bound action.
    pub fn handle<T: ElementTree + ?Sized>(
        &mut self,
        tree: &T,
        action: NavAction,
        now: Instant,
    ) -> EventOutcome {
        match action {
            NavAction::ToggleMenu => {
                self.toggle_menu(tree);
                EventOutcome {
                    handled: true,
                    default_prevented: false,
                }
            }
            NavAction::ToggleDropdown { item, link } => self.toggle_dropdown(tree, item, link),
            NavAction::ViewportResized => {
                self.on_resize(now);
                EventOutcome {
                    handled: true,
                    default_prevented: false,
                }
            }
        }
    }
}
