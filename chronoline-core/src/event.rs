//! Journal event records as they arrive from the event store.
//!
//! The engine consumes these; it never owns or persists them. Timestamps stay
//! raw strings so malformed legacy values survive untouched and are simply
//! treated as absent when resolved.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque unique event identifier.
pub type EventId = String;

/// A journal event (timed entry, task, or both).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: EventId,

    /// Display-only; the engine never reads it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    /// On a task without `start_time` this is the deadline.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,

    /// Task facet: the event carries a checkable state.
    #[serde(default)]
    pub is_task: bool,

    /// Every check action. Unordered; merges and imports may interleave entries.
    #[serde(default)]
    pub checked: Vec<String>,
    /// Every uncheck action. Unordered, like `checked`.
    #[serde(default)]
    pub unchecked: Vec<String>,
}

impl Event {
    pub fn new(id: impl Into<EventId>) -> Self {
        Event {
            id: id.into(),
            ..Default::default()
        }
    }

    pub fn start_time(&self) -> Option<&str> {
        present(&self.start_time)
    }

    pub fn end_time(&self) -> Option<&str> {
        present(&self.end_time)
    }

    pub fn created_at(&self) -> Option<&str> {
        present(&self.created_at)
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match present(&self.title) {
            Some(title) => write!(f, "{}", title),
            None => write!(f, "(untitled {})", self.id),
        }
    }
}

/// Empty strings count as absent.
fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_camel_case_with_missing_fields() {
        let json = r#"{
            "id": "evt-1",
            "startTime": "2025-12-01 09:00:00",
            "createdAt": "2025-11-30 20:00:00",
            "isTask": true,
            "checked": ["2025-12-01 10:00:00"]
        }"#;
        let event: Event = serde_json::from_str(json).unwrap();

        assert_eq!(event.id, "evt-1");
        assert_eq!(event.start_time(), Some("2025-12-01 09:00:00"));
        assert_eq!(event.end_time(), None);
        assert!(event.is_task);
        assert_eq!(event.checked.len(), 1);
        assert!(event.unchecked.is_empty());
    }

    #[test]
    fn test_empty_strings_are_absent() {
        let event = Event {
            start_time: Some(String::new()),
            end_time: Some("  ".to_string()),
            ..Event::new("a")
        };
        assert_eq!(event.start_time(), None);
        assert_eq!(event.end_time(), None);
    }

    #[test]
    fn test_display_falls_back_to_id() {
        assert_eq!(Event::new("x1").to_string(), "(untitled x1)");
        let titled = Event {
            title: Some("Standup".to_string()),
            ..Event::new("x2")
        };
        assert_eq!(titled.to_string(), "Standup");
    }
}
