#![forbid(unsafe_code)]

//! Browser host for ampui.
//!
//! On `wasm32` this crate binds [`ElementTree`](ampui_core::dom::ElementTree)
//! to the live DOM, installs the delegated listeners and exports `start` /
//! `startWithConfig` to the page script. Error types and console logging are
//! target-independent.
//!
//! ```js
//! import init, { startWithConfig } from "./ampui_web.js";
//! await init();
//! const site = startWithConfig('{"log_filter": "ampui_widgets=debug"}');
//! site.openModal("signup");
//! ```

pub mod error;
pub mod logging;

#[cfg(target_arch = "wasm32")]
pub mod dom;
#[cfg(target_arch = "wasm32")]
mod runtime;

pub use error::WebError;
pub use logging::{ConsoleWriter, init_logging};

#[cfg(target_arch = "wasm32")]
pub use dom::DomTree;
#[cfg(target_arch = "wasm32")]
pub use runtime::{SiteHandle, start, start_with_config};
