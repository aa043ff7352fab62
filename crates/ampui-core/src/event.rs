#![forbid(unsafe_code)]

//! Host events delivered to the site controllers.
//!
//! The host (browser glue or a test) translates native events into
//! [`HostEvent`] values and feeds them to the dispatcher one at a time. Every
//! event runs to completion before the next one is delivered.

use crate::dom::NodeId;

/// Keyboard key, reduced to what the behaviors care about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    Escape,
    Other(String),
}

impl Key {
    /// Map a DOM `KeyboardEvent.key` value.
    ///
    /// Legacy `"Esc"` (old Edge/IE) maps to [`Key::Escape`] as well.
    #[must_use]
    pub fn from_dom(key: &str) -> Self {
        match key {
            "Escape" | "Esc" => Self::Escape,
            other => Self::Other(other.to_string()),
        }
    }
}

/// Event kinds a binding can be registered for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Click,
    KeyDown,
    Resize,
}

/// An event raised by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEvent {
    /// Pointer activation on `target` (the innermost element hit).
    Click { target: NodeId },
    /// Key press anywhere in the document.
    KeyDown { key: Key },
    /// Viewport was resized.
    Resize,
}

impl HostEvent {
    /// The kind of this event.
    #[must_use]
    pub fn kind(&self) -> EventKind {
        match self {
            Self::Click { .. } => EventKind::Click,
            Self::KeyDown { .. } => EventKind::KeyDown,
            Self::Resize => EventKind::Resize,
        }
    }

    /// Convenience constructor for a click.
    #[must_use]
    pub fn click(target: NodeId) -> Self {
        Self::Click { target }
    }

    /// Convenience constructor for a key press from a DOM key string.
    #[must_use]
    pub fn key(key: &str) -> Self {
        Self::KeyDown {
            key: Key::from_dom(key),
        }
    }
}

/// What happened while handling one event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EventOutcome {
    /// At least one binding ran.
    pub handled: bool,
    /// The host must suppress the event's default action.
    pub default_prevented: bool,
}

impl EventOutcome {
    /// Outcome for an event nobody listened to.
    pub const IGNORED: Self = Self {
        handled: false,
        default_prevented: false,
    };

    /// Fold another outcome into this one.
    pub fn merge(&mut self, other: Self) {
        self.handled |= other.handled;
        self.default_prevented |= other.default_prevented;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_variants_map_to_escape() {
        assert_eq!(Key::from_dom("Escape"), Key::Escape);
        assert_eq!(Key::from_dom("Esc"), Key::Escape);
        assert_eq!(Key::from_dom("a"), Key::Other("a".into()));
    }

    #[test]
    fn outcome_merge_is_sticky() {
        let mut out = EventOutcome::IGNORED;
        out.merge(EventOutcome {
            handled: true,
            default_prevented: false,
        });
        out.merge(EventOutcome {
            handled: false,
            default_prevented: true,
        });
        assert!(out.handled);
        assert!(out.default_prevented);
    }

    #[test]
    fn event_kind_matches_variant() {
        assert_eq!(HostEvent::click(NodeId::new(3)).kind(), EventKind::Click);
        assert_eq!(HostEvent::key("Escape").kind(), EventKind::KeyDown);
        assert_eq!(HostEvent::Resize.kind(), EventKind::Resize);
    }
}
