#![forbid(unsafe_code)]

//! Errors raised while bringing up the browser host.

use std::fmt;

use ampui_core::config::ConfigError;

/// Failures from [`start`](crate::start) and friends.
///
/// Behavioral operations never fail; only host bring-up does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebError {
    /// No global `window` (not running in a browser page).
    NoWindow,
    /// The window has no `document`.
    NoDocument,
    /// The document has no `<body>`.
    NoBody,
    /// A browser API call threw.
    Js(String),
    /// The supplied configuration was rejected.
    Config(ConfigError),
}

impl fmt::Display for WebError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoWindow => write!(f, "no global window"),
            Self::NoDocument => write!(f, "window has no document"),
            Self::NoBody => write!(f, "document has no body"),
            Self::Js(msg) => write!(f, "browser call failed: {msg}"),
            Self::Config(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for WebError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ConfigError> for WebError {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

#[cfg(target_arch = "wasm32")]
impl From<wasm_bindgen::JsValue> for WebError {
    fn from(value: wasm_bindgen::JsValue) -> Self {
        Self::Js(value.as_string().unwrap_or_else(|| format!("{value:?}")))
    }
}

#[cfg(target_arch = "wasm32")]
impl From<WebError> for wasm_bindgen::JsValue {
    fn from(err: WebError) -> Self {
        js_sys::Error::new(&err.to_string()).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_errors_display_through() {
        let err = WebError::from(ConfigError::Json("eof".into()));
        assert_eq!(err.to_string(), "invalid JSON config: eof");
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn host_errors_have_no_source() {
        assert_eq!(WebError::NoBody.to_string(), "document has no body");
        assert!(std::error::Error::source(&WebError::NoWindow).is_none());
    }
}
