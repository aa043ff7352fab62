#![forbid(unsafe_code)]

//! ampui public facade.
//!
//! Re-exports the element-tree core, the navigation and modal behaviors and,
//! with the `web` feature, the browser host.
//!
//! ```
//! use ampui::prelude::*;
//!
//! let config = SiteConfig::from_json_str(r#"{"hash_match": "exact"}"#).unwrap();
//! let matcher = RouteMatcher::new(config.hash_match);
//! assert!(matcher.should_mark_top_level("/docs/guide", "/docs"));
//! assert!(!matcher.should_mark_sub_nav("#faq", "/docs#faq-2"));
//! ```

pub use ampui_core as core;
pub use ampui_widgets as widgets;

#[cfg(feature = "web")]
pub use ampui_web as web;

pub use ampui_core::{
    ConfigError, ElementTree, EventOutcome, HashMatch, HostEvent, Location, MarkupConfig, NodeId,
    SiteConfig,
};
pub use ampui_widgets::{ModalController, NavigationController, RouteMatcher, Site, SiteAction};

/// Common imports for hosts and tests.
pub mod prelude {
    pub use ampui_core::{
        ElementTree, EventOutcome, HashMatch, HostEvent, Instant, Key, Location, NodeId,
        SiteConfig,
    };
    pub use ampui_widgets::{RouteMatcher, Site};

    #[cfg(feature = "web")]
    pub use ampui_web::WebError;
}
