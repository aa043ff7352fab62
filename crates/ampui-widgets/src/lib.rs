#![forbid(unsafe_code)]

//! Navigation and modal behaviors for ampui sites.
//!
//! - [`route`]: which navigation links are active for a location
//! - [`nav`]: active markers, mobile menu toggle, mobile dropdowns
//! - [`modal`]: modal open/close, triggers, focus and scroll lock
//! - [`site`]: both controllers behind one event dispatcher

pub mod modal;
pub mod nav;
pub mod route;
pub mod site;

pub use modal::{ModalAction, ModalController};
pub use nav::{ActiveMarkers, MenuToggle, NavAction, NavigationController};
pub use route::{RouteMatcher, TopLevelMatch, link_fragment, link_path};
pub use site::{Site, SiteAction};
