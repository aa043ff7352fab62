#![forbid(unsafe_code)]

//! Snapshot of the host's current location.

/// Path and fragment of the current page, as the host reports them.
///
/// `hash` keeps its leading `#` (`"#intro"`), or is empty when the URL has no
/// fragment. Neither field is normalized.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Location {
    pub path: String,
    pub hash: String,
}

impl Location {
    /// Build a location from a path and a fragment.
    #[must_use]
    pub fn new(path: impl Into<String>, hash: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            hash: hash.into(),
        }
    }

    /// Location with a path and no fragment.
    #[must_use]
    pub fn path(path: impl Into<String>) -> Self {
        Self::new(path, "")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_has_empty_hash() {
        let loc = Location::path("/docs");
        assert_eq!(loc, Location::new("/docs", ""));
        assert!(loc.hash.is_empty());
    }
}
