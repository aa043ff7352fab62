#![forbid(unsafe_code)]

//! Page scroll lock via the body's inline `overflow` style.

use ampui_core::dom::ElementTree;

const OVERFLOW: &str = "overflow";
const HIDDEN: &str = "hidden";

/// Stop the page behind a modal from scrolling.
pub fn lock_scroll<T: ElementTree + ?Sized>(tree: &T) {
    if let Some(body) = tree.body() {
        tree.set_style(body, OVERFLOW, HIDDEN);
    }
}

/// Let the page scroll again.
pub fn unlock_scroll<T: ElementTree + ?Sized>(tree: &T) {
    if let Some(body) = tree.body() {
        tree.set_style(body, OVERFLOW, "");
    }
}

/// Whether the page is currently scroll locked.
pub fn is_scroll_locked<T: ElementTree + ?Sized>(tree: &T) -> bool {
    tree.body()
        .and_then(|body| tree.style(body, OVERFLOW))
        .is_some_and(|v| v == HIDDEN)
}
