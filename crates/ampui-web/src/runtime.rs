#![forbid(unsafe_code)]

//! Browser bring-up: listeners, the resize timer and the exported handle.
//!
//! One [`Runtime`] per page owns the [`DomTree`] and the [`Site`]. The first
//! successful [`start`] registers it; later calls hand back the same runtime
//! and install nothing.
//! Three delegated listeners feed it host events: `click` and `keydown` on
//! the document, `resize` on the window. After every event the single
//! `setTimeout` is re-armed for [`Site::next_deadline`], so a burst of
//! resizes costs one pending timer and one rebind.
//!
//! Listener closures live for the page and are leaked with `forget`; the
//! timer callback holds only a weak reference back to the runtime.

use std::cell::{Cell, OnceCell, RefCell};
use std::rc::{Rc, Weak};

use ampui_core::config::SiteConfig;
use ampui_core::event::{EventOutcome, HostEvent};
use ampui_core::location::Location;
use ampui_core::Instant;
use ampui_widgets::Site;
use tracing::{debug, info, warn};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Event, KeyboardEvent};

use crate::dom::DomTree;
use crate::error::WebError;
use crate::logging::init_logging;

thread_local! {
    static RUNTIME: OnceCell<Rc<Runtime>> = const { OnceCell::new() };
}

struct Runtime {
    tree: DomTree,
    site: RefCell<Site>,
    timer: Cell<Option<i32>>,
    tick: RefCell<Option<Closure<dyn FnMut()>>>,
}

impl Runtime {
    fn new(tree: DomTree, config: SiteConfig) -> Rc<Self> {
        let runtime = Rc::new(Self {
            tree,
            site: RefCell::new(Site::new(config)),
            timer: Cell::new(None),
            tick: RefCell::new(None),
        });
        let weak: Weak<Self> = Rc::downgrade(&runtime);
        let tick = Closure::<dyn FnMut()>::new(move || {
            if let Some(runtime) = weak.upgrade() {
                runtime.on_tick();
            }
        });
        *runtime.tick.borrow_mut() = Some(tick);
        runtime
    }

    fn location(&self) -> Location {
        let location = self.tree.window().location();
        Location::new(
            location.pathname().unwrap_or_default(),
            location.hash().unwrap_or_default(),
        )
    }

    /// Initialize the site and install listeners. Runs once.
    fn boot(self: &Rc<Self>) -> Result<(), WebError> {
        if self.tree.document().body().is_none() {
            return Err(WebError::NoBody);
        }
        let location = self.location();
        {
            let mut site = self.site.borrow_mut();
            if !site.initialize(&self.tree, &location) {
                return Ok(());
            }
        }
        self.install_listeners()?;
        info!(path = %location.path, "ampui started");
        Ok(())
    }

    fn install_listeners(self: &Rc<Self>) -> Result<(), WebError> {
        let runtime = Rc::clone(self);
        let on_click = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
            let Some(target) = event.target() else {
                return;
            };
            let Some(node) = runtime.tree.node_for_target(&target) else {
                return;
            };
            let outcome = runtime.dispatch(&HostEvent::click(node));
            if outcome.default_prevented {
                event.prevent_default();
            }
        });
        self.tree
            .document()
            .add_event_listener_with_callback("click", on_click.as_ref().unchecked_ref())?;
        on_click.forget();

        let runtime = Rc::clone(self);
        let on_key = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
            let Some(key) = event.dyn_ref::<KeyboardEvent>().map(KeyboardEvent::key) else {
                return;
            };
            let outcome = runtime.dispatch(&HostEvent::key(&key));
            if outcome.default_prevented {
                event.prevent_default();
            }
        });
        self.tree
            .document()
            .add_event_listener_with_callback("keydown", on_key.as_ref().unchecked_ref())?;
        on_key.forget();

        let runtime = Rc::clone(self);
        let on_resize = Closure::<dyn FnMut(Event)>::new(move |_event: Event| {
            runtime.dispatch(&HostEvent::Resize);
        });
        self.tree
            .window()
            .add_event_listener_with_callback("resize", on_resize.as_ref().unchecked_ref())?;
        on_resize.forget();

        debug!("listeners installed");
        Ok(())
    }

    fn dispatch(&self, event: &HostEvent) -> EventOutcome {
        let outcome = match self.site.try_borrow_mut() {
            Ok(mut site) => site.dispatch(&self.tree, event, Instant::now()),
            Err(_) => {
                warn!(?event, "site busy, dropping re-entrant event");
                return EventOutcome::IGNORED;
            }
        };
        self.rearm();
        outcome
    }

    fn on_tick(&self) {
        self.timer.set(None);
        match self.site.try_borrow_mut() {
            Ok(mut site) => {
                site.poll_timers(&self.tree, Instant::now());
            }
            Err(_) => warn!("site busy, deferring timer"),
        }
        self.rearm();
    }

    /// Point the single timer at the site's next deadline.
    fn rearm(&self) {
        let window = self.tree.window();
        if let Some(handle) = self.timer.take() {
            window.clear_timeout_with_handle(handle);
        }
        let deadline = match self.site.try_borrow() {
            Ok(site) => site.next_deadline(),
            Err(_) => {
                warn!("site busy, timer not re-armed");
                return;
            }
        };
        let Some(deadline) = deadline else {
            return;
        };
        let delay = deadline.saturating_duration_since(Instant::now());
        let millis = i32::try_from(delay.as_millis()).unwrap_or(i32::MAX);
        let tick = self.tick.borrow();
        let Some(tick) = tick.as_ref() else {
            return;
        };
        match window.set_timeout_with_callback_and_timeout_and_arguments_0(
            tick.as_ref().unchecked_ref(),
            millis,
        ) {
            Ok(handle) => self.timer.set(Some(handle)),
            Err(err) => warn!(error = ?err, "setTimeout failed"),
        }
    }
}

fn launch(config: SiteConfig) -> Result<SiteHandle, WebError> {
    config.validate()?;
    if !init_logging(&config.log_filter)? {
        debug!("global subscriber already installed");
    }
    if let Some(runtime) = RUNTIME.with(|cell| cell.get().cloned()) {
        let same = runtime
            .site
            .try_borrow()
            .is_ok_and(|site| site.config() == &config);
        if !same {
            warn!("ampui already started, new configuration ignored");
        }
        debug!("returning existing site handle");
        return Ok(SiteHandle { runtime });
    }
    let tree = DomTree::from_global()?;
    let loading = tree.document().ready_state() == "loading";
    let runtime = Runtime::new(tree, config);

    if loading {
        let pending = Rc::clone(&runtime);
        let on_ready = Closure::<dyn FnMut(Event)>::new(move |_event: Event| {
            if let Err(err) = pending.boot() {
                warn!(%err, "ampui failed to start");
            }
        });
        runtime
            .tree
            .document()
            .add_event_listener_with_callback("DOMContentLoaded", on_ready.as_ref().unchecked_ref())?;
        on_ready.forget();
        debug!("document loading, start deferred");
    } else {
        runtime.boot()?;
    }
    RUNTIME.with(|cell| {
        if cell.set(Rc::clone(&runtime)).is_err() {
            debug!("runtime already registered");
        }
    });
    Ok(SiteHandle { runtime })
}

/// Start with the default configuration.
///
/// Starting twice returns a handle to the first site.
#[wasm_bindgen]
pub fn start() -> Result<SiteHandle, JsValue> {
    Ok(launch(SiteConfig::default())?)
}

/// Start with a JSON configuration; missing fields take their defaults.
#[wasm_bindgen(js_name = startWithConfig)]
pub fn start_with_config(json: &str) -> Result<SiteHandle, JsValue> {
    let config = SiteConfig::from_json_str(json).map_err(WebError::from)?;
    Ok(launch(config)?)
}

/// Script-facing handle to a started site.
#[wasm_bindgen]
pub struct SiteHandle {
    runtime: Rc<Runtime>,
}

impl SiteHandle {
    fn with_site<R>(&self, f: impl FnOnce(&mut Site, &DomTree) -> R) -> Option<R> {
        let runtime = &self.runtime;
        match runtime.site.try_borrow_mut() {
            Ok(mut site) => Some(f(&mut site, &runtime.tree)),
            Err(_) => {
                warn!("site busy, ignoring handle call");
                None
            }
        }
    }
}

#[wasm_bindgen]
impl SiteHandle {
    /// Open modal `id`. Returns `false` if no element has that id.
    #[wasm_bindgen(js_name = openModal)]
    pub fn open_modal(&self, id: &str) -> bool {
        self.with_site(|site, tree| site.open_modal(tree, id))
            .unwrap_or(false)
    }

    /// Close modal `id`. Returns `false` if no element has that id.
    #[wasm_bindgen(js_name = closeModal)]
    pub fn close_modal(&self, id: &str) -> bool {
        self.with_site(|site, tree| site.close_modal(tree, id))
            .unwrap_or(false)
    }

    /// Id of the modal recorded as active.
    #[wasm_bindgen(js_name = activeModal)]
    pub fn active_modal(&self) -> Option<String> {
        self.with_site(|site, _| site.active_modal().map(str::to_owned))
            .flatten()
    }

    /// Bind dropdowns added to the page since the last pass.
    #[wasm_bindgen(js_name = reinitializeDropdowns)]
    pub fn reinitialize_dropdowns(&self) -> u32 {
        self.with_site(|site, tree| site.reinitialize_dropdowns(tree))
            .map_or(0, |added| u32::try_from(added).unwrap_or(u32::MAX))
    }

    /// Whether the deferred start has run.
    #[wasm_bindgen(js_name = isReady)]
    pub fn is_ready(&self) -> bool {
        self.with_site(|site, _| site.is_initialized())
            .unwrap_or(false)
    }
}
