#![forbid(unsafe_code)]

//! Modal overlays declared in markup.
//!
//! # Markup
//!
//! | Selector | Role |
//! |----------|------|
//! | `.modal_overlay#ID` | the modal; clicking the backdrop itself closes it |
//! | `.modal_opener[amp-target=ID]` | opens modal `ID` |
//! | `.modal_kill[amp-target=ID]` | closes modal `ID` |
//!
//! # Focus Management
//!
//! - **Focus-in**: opening moves focus to the first focusable descendant.
//! - **Focus restore**: closing returns focus to the first opener that
//!   targets the same modal.
//! - **Escape to close**: closes whichever modal is recorded active.
//!
//! # Scroll Lock
//!
//! Opening sets `overflow: hidden` on `<body>`; closing clears it. The lock
//! is not reference counted: closing any modal unlocks the page.

mod controller;
mod focus;
mod scroll_lock;

pub use controller::{ModalAction, ModalController};
pub use focus::{focus_first_in, restore_focus_to_opener};
pub use scroll_lock::{is_scroll_locked, lock_scroll, unlock_scroll};
