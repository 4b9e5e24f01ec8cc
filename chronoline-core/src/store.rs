//! In-memory event store, used by the CLI (events loaded from a JSON file) and tests.

use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

use chrono::{NaiveDate, NaiveDateTime};
use tracing::debug;

use crate::anchor::resolve_timeline_anchor_at;
use crate::error::{ChronolineError, ChronolineResult};
use crate::event::Event;
use crate::window::EventStore;

#[derive(Debug)]
pub struct MemoryEventStore {
    events: Mutex<Vec<Event>>,
    now: NaiveDateTime,
    failing: AtomicBool,
    fetches: AtomicUsize,
}

impl MemoryEventStore {
    /// `now` is the fallback instant used when resolving anchor days.
    pub fn new(events: Vec<Event>, now: NaiveDateTime) -> Self {
        MemoryEventStore {
            events: Mutex::new(events),
            now,
            failing: AtomicBool::new(false),
            fetches: AtomicUsize::new(0),
        }
    }

    /// Load a JSON array of events.
    pub fn from_json_file(path: &Path, now: NaiveDateTime) -> ChronolineResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let events: Vec<Event> = serde_json::from_str(&content).map_err(|e| {
            ChronolineError::Serialization(format!("{}: {e}", path.display()))
        })?;
        debug!(path = %path.display(), count = events.len(), "loaded events");
        Ok(Self::new(events, now))
    }

    /// Add or replace an event by id.
    pub fn insert(&self, event: Event) {
        let mut events = self.events.lock().unwrap_or_else(PoisonError::into_inner);
        match events.iter_mut().find(|e| e.id == event.id) {
            Some(existing) => *existing = event,
            None => events.push(event),
        }
    }

    /// Make every subsequent fetch fail until reset.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Number of fetches served, failed ones included.
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    pub fn len(&self) -> usize {
        self.events.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl EventStore for MemoryEventStore {
    async fn fetch_events_in_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> ChronolineResult<Vec<Event>> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(ChronolineError::Store(format!(
                "fetch {start}..{end} rejected"
            )));
        }

        let events = self.events.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(events
            .iter()
            .filter(|e| {
                let day = resolve_timeline_anchor_at(e, self.now).day();
                day >= start && day < end
            })
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timestamp::parse_timestamp;
    use std::io::Write;

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn now() -> NaiveDateTime {
        parse_timestamp("2025-12-15 12:00:00").unwrap()
    }

    #[tokio::test]
    async fn test_fetch_is_start_inclusive_end_exclusive() {
        let store = MemoryEventStore::new(
            vec![
                Event {
                    start_time: Some("2025-12-01 00:00:00".into()),
                    ..Event::new("first")
                },
                Event {
                    start_time: Some("2025-12-10 09:00:00".into()),
                    ..Event::new("edge")
                },
            ],
            now(),
        );

        let page = store
            .fetch_events_in_range(day("2025-12-01"), day("2025-12-10"))
            .await
            .unwrap();

        let ids: Vec<&str> = page.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, ["first"]);
    }

    #[tokio::test]
    async fn test_dateless_task_anchors_on_creation_day() {
        let store = MemoryEventStore::new(
            vec![Event {
                is_task: true,
                created_at: Some("2025-12-03 08:00:00".into()),
                ..Event::new("task")
            }],
            now(),
        );

        let page = store
            .fetch_events_in_range(day("2025-12-03"), day("2025-12-04"))
            .await
            .unwrap();
        assert_eq!(page.len(), 1);
    }

    #[tokio::test]
    async fn test_failing_store() {
        let store = MemoryEventStore::new(Vec::new(), now());
        store.set_failing(true);

        let result = store
            .fetch_events_in_range(day("2025-12-01"), day("2025-12-02"))
            .await;
        assert!(matches!(result, Err(ChronolineError::Store(_))));
        assert_eq!(store.fetch_count(), 1);
    }

    #[test]
    fn test_insert_replaces_by_id() {
        let store = MemoryEventStore::new(vec![Event::new("a")], now());
        store.insert(Event {
            title: Some("renamed".into()),
            ..Event::new("a")
        });
        store.insert(Event::new("b"));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_from_json_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"id":"a","title":"Standup","startTime":"2025-12-01 09:00:00"}},
               {{"id":"b","isTask":true,"checked":["2025-12-02 10:00:00"]}}]"#
        )
        .unwrap();

        let store = MemoryEventStore::from_json_file(file.path(), now()).unwrap();
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_from_json_file_rejects_malformed() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();

        let err = MemoryEventStore::from_json_file(file.path(), now()).unwrap_err();
        assert!(matches!(err, ChronolineError::Serialization(_)));
    }
}
