#![forbid(unsafe_code)]

//! Test harness and reference fixtures for ampui.
//!
//! - [`FakeDocument`]: in-memory [`ElementTree`](ampui_core::ElementTree)
//! - [`fixtures`]: the reference page used across scenario tests
//! - [`LogCapture`]: collects `tracing` output for assertions

pub mod capture;
pub mod document;
pub mod fixtures;

pub use capture::{CapturedEvent, LogCapture};
pub use document::{El, FakeDocument};
pub use fixtures::{SiteFixture, nav_list, standard_site};
