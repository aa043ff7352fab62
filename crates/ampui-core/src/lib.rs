#![forbid(unsafe_code)]

//! Core building blocks for ampui.
//!
//! This crate provides:
//! - [`ElementTree`](dom::ElementTree), the document abstraction every
//!   behavior is written against
//! - [`HostEvent`](event::HostEvent) and [`DispatchTable`](dispatch::DispatchTable)
//!   for routing host events to component actions
//! - [`Debouncer`](debounce::Debouncer) for trailing-edge timers
//! - [`SiteConfig`](config::SiteConfig) for breakpoints and markup names

pub mod config;
pub mod debounce;
pub mod dispatch;
pub mod dom;
pub mod event;
pub mod location;

pub use config::{ConfigError, HashMatch, MarkupConfig, SiteConfig};
pub use debounce::Debouncer;
pub use dispatch::{Binding, DispatchTable, Resolved};
pub use dom::{ElementTree, NodeId, first_focusable, is_focusable};
pub use event::{EventKind, EventOutcome, HostEvent, Key};
pub use location::Location;
pub use web_time::Instant;
