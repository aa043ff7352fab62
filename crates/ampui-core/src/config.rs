#![forbid(unsafe_code)]

//! Site configuration: breakpoints, timings, matching mode and markup names.
//!
//! Every field has a default matching the stock site markup, so an empty
//! document (`{}`) is a valid configuration. Loaders validate after parsing.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | Malformed JSON | Syntax error, wrong type | [`ConfigError::Json`] |
//! | Malformed TOML | Syntax error, wrong type | [`ConfigError::Toml`] |
//! | Bad value | Non-positive breakpoint, empty name | [`ConfigError::Invalid`] |

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Viewport width below which dropdowns expand on click.
pub const DEFAULT_MOBILE_BREAKPOINT: f64 = 960.0;
/// Quiet period before a resize burst rebinds dropdowns.
pub const DEFAULT_RESIZE_DEBOUNCE_MS: u64 = 250;

/// Errors from loading or validating configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// JSON could not be parsed into a config.
    Json(String),
    /// TOML could not be parsed into a config.
    Toml(String),
    /// A field holds an unusable value.
    Invalid { field: &'static str, reason: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json(msg) => write!(f, "invalid JSON config: {msg}"),
            Self::Toml(msg) => write!(f, "invalid TOML config: {msg}"),
            Self::Invalid { field, reason } => write!(f, "invalid config field '{field}': {reason}"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// How a link is compared against the current URL fragment for sub-nav
/// highlighting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashMatch {
    /// The href merely contains the fragment (`"/a#intro-2"` matches `"#intro"`).
    #[default]
    Substring,
    /// The href's fragment equals the current fragment.
    Exact,
}

/// Class, id and attribute names the behaviors look for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkupConfig {
    /// Class of the navigation list(s) whose links are highlighted.
    pub nav_scope_class: String,
    /// Class of the mobile menu button.
    pub toggle_class: String,
    /// Id of the navigation container the toggle opens.
    pub nav_id: String,
    /// Class of the optional outer navigation wrapper.
    pub wrapper_class: String,
    /// Presentation marker for active links and open modals.
    pub active_class: String,
    /// Marker set on the navigation container while the menu is open.
    pub menu_open_class: String,
    /// Marker set on the outer wrapper while the menu is open.
    pub wrapper_open_class: String,
    /// Marker toggled on a dropdown item when expanded on mobile.
    pub dropdown_open_class: String,
    /// Class of elements that open a modal.
    pub opener_class: String,
    /// Class of elements that close a modal.
    pub closer_class: String,
    /// Class of modal backdrop elements.
    pub overlay_class: String,
    /// Attribute naming the modal an opener/closer targets.
    pub target_attr: String,
}

impl Default for MarkupConfig {
    fn default() -> Self {
        Self {
            nav_scope_class: "horizontal".into(),
            toggle_class: "nav-toggle".into(),
            nav_id: "main-nav".into(),
            wrapper_class: "site-nav".into(),
            active_class: "active".into(),
            menu_open_class: "active".into(),
            wrapper_open_class: "nav-open".into(),
            dropdown_open_class: "active".into(),
            opener_class: "modal_opener".into(),
            closer_class: "modal_kill".into(),
            overlay_class: "modal_overlay".into(),
            target_attr: "amp-target".into(),
        }
    }
}

impl MarkupConfig {
    fn fields(&self) -> [(&'static str, &str); 12] {
        [
            ("markup.nav_scope_class", &self.nav_scope_class),
            ("markup.toggle_class", &self.toggle_class),
            ("markup.nav_id", &self.nav_id),
            ("markup.wrapper_class", &self.wrapper_class),
            ("markup.active_class", &self.active_class),
            ("markup.menu_open_class", &self.menu_open_class),
            ("markup.wrapper_open_class", &self.wrapper_open_class),
            ("markup.dropdown_open_class", &self.dropdown_open_class),
            ("markup.opener_class", &self.opener_class),
            ("markup.closer_class", &self.closer_class),
            ("markup.overlay_class", &self.overlay_class),
            ("markup.target_attr", &self.target_attr),
        ]
    }
}

/// Top-level configuration for a site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Viewport width (CSS px) below which dropdown clicks are intercepted.
    pub mobile_breakpoint: f64,
    /// Resize debounce in milliseconds.
    pub resize_debounce_ms: u64,
    /// Sub-navigation fragment matching mode.
    pub hash_match: HashMatch,
    /// Log filter directive for the host's subscriber (e.g. `"ampui=debug"`).
    pub log_filter: String,
    pub markup: MarkupConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            mobile_breakpoint: DEFAULT_MOBILE_BREAKPOINT,
            resize_debounce_ms: DEFAULT_RESIZE_DEBOUNCE_MS,
            hash_match: HashMatch::default(),
            log_filter: "info".into(),
            markup: MarkupConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Parse and validate a JSON document.
    pub fn from_json_str(input: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(input).map_err(|e| ConfigError::Json(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate a TOML document.
    #[cfg(feature = "toml-config")]
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(input).map_err(|e| ConfigError::Toml(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to pretty JSON.
    pub fn to_json_string(&self) -> Result<String, ConfigError> {
        serde_json::to_string_pretty(self).map_err(|e| ConfigError::Json(e.to_string()))
    }

    /// Resize debounce as a [`Duration`].
    #[must_use]
    pub fn resize_debounce(&self) -> Duration {
        Duration::from_millis(self.resize_debounce_ms)
    }

    /// Check value ranges and that every markup name is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.mobile_breakpoint.is_finite() || self.mobile_breakpoint <= 0.0 {
            return Err(ConfigError::Invalid {
                field: "mobile_breakpoint",
                reason: format!("must be a positive width, got {}", self.mobile_breakpoint),
            });
        }
        for (field, value) in self.markup.fields() {
            if value.trim().is_empty() {
                return Err(ConfigError::Invalid {
                    field,
                    reason: "must not be empty".into(),
                });
            }
            if value.chars().any(char::is_whitespace) {
                return Err(ConfigError::Invalid {
                    field,
                    reason: format!("must be a single name, got {value:?}"),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_json_yields_defaults() {
        let config = SiteConfig::from_json_str("{}").unwrap();
        assert_eq!(config, SiteConfig::default());
        assert_eq!(config.resize_debounce(), Duration::from_millis(250));
        assert_eq!(config.markup.target_attr, "amp-target");
    }

    #[test]
    fn partial_json_overrides_only_named_fields() {
        let config = SiteConfig::from_json_str(
            r#"{"mobile_breakpoint": 768, "hash_match": "exact", "markup": {"nav_id": "nav"}}"#,
        )
        .unwrap();
        assert_eq!(config.mobile_breakpoint, 768.0);
        assert_eq!(config.hash_match, HashMatch::Exact);
        assert_eq!(config.markup.nav_id, "nav");
        assert_eq!(config.markup.toggle_class, "nav-toggle");
    }

    #[test]
    fn json_round_trips() {
        let config = SiteConfig::default();
        let json = config.to_json_string().unwrap();
        assert_eq!(SiteConfig::from_json_str(&json).unwrap(), config);
    }

    #[test]
    fn malformed_json_is_reported() {
        let err = SiteConfig::from_json_str("{ nope").unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
    }

    #[test]
    fn zero_breakpoint_is_rejected() {
        let err = SiteConfig::from_json_str(r#"{"mobile_breakpoint": 0}"#).unwrap_err();
        assert_eq!(
            err,
            ConfigError::Invalid {
                field: "mobile_breakpoint",
                reason: "must be a positive width, got 0".into(),
            }
        );
    }

    #[test]
    fn blank_class_name_is_rejected() {
        let err = SiteConfig::from_json_str(r#"{"markup": {"opener_class": " "}}"#).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "markup.opener_class",
                ..
            }
        ));
        assert!(err.to_string().contains("markup.opener_class"));
    }

    #[test]
    fn multi_word_class_name_is_rejected() {
        let err = SiteConfig::from_json_str(r#"{"markup": {"active_class": "a b"}}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
    }

    #[cfg(feature = "toml-config")]
    #[test]
    fn toml_config_loads() {
        let config = SiteConfig::from_toml_str(
            "resize_debounce_ms = 100\n[markup]\noverlay_class = \"backdrop\"\n",
        )
        .unwrap();
        assert_eq!(config.resize_debounce_ms, 100);
        assert_eq!(config.markup.overlay_class, "backdrop");
    }
}
