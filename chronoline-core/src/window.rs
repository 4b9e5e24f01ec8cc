//! The loaded event window.
//!
//! An `EventWindow` holds every event fetched so far plus the `[start, end)`
//! day bounds those fetches cover. It grows in both directions on request:
//! each extension fetches only the newly covered slice from the event store,
//! merges it by id (the freshly fetched copy always wins) and then widens the
//! bound. A failed fetch leaves the bounds and the merged events untouched.
//!
//! At most one extension per direction runs at a time. A second request for a
//! busy direction is dropped, not queued: the next scroll tick re-issues it if
//! it is still needed.

use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{NaiveDate, NaiveDateTime};
use tracing::{debug, warn};

use crate::anchor::resolve_timeline_anchor_at;
use crate::config::WindowConfig;
use crate::error::ChronolineResult;
use crate::event::{Event, EventId};
use crate::timestamp::{days_after, days_before, now_local};

/// The one capability the window needs from persistence.
pub trait EventStore: Send + Sync {
    /// All events whose resolved anchor day falls in `[start, end)`.
    ///
    /// Each call is treated as authoritative for its range.
    fn fetch_events_in_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> impl Future<Output = ChronolineResult<Vec<Event>>> + Send;
}

/// Result of an extension request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtendOutcome {
    /// The slice was fetched and merged; `bound` is the new window edge.
    Extended { fetched: usize, bound: NaiveDate },
    /// Another extension in the same direction was pending; nothing happened.
    AlreadyInFlight,
}

/// What a merge changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeStats {
    pub inserted: usize,
    pub replaced: usize,
}

/// Point-in-time copy of the window, for building segments.
#[derive(Debug, Clone)]
pub struct WindowSnapshot {
    /// First covered day.
    pub start: NaiveDate,
    /// First day past the window.
    pub end: NaiveDate,
    pub events: Vec<Event>,
}

impl WindowSnapshot {
    /// Last covered day, or `None` for an empty window.
    pub fn last_day(&self) -> Option<NaiveDate> {
        self.end.pred_opt().filter(|last| *last >= self.start)
    }
}

#[derive(Debug)]
struct WindowState {
    start: NaiveDate,
    end: NaiveDate,
    events: HashMap<EventId, Event>,
}

impl WindowState {
    fn merge(&mut self, page: Vec<Event>) -> MergeStats {
        let mut stats = MergeStats::default();
        for event in page {
            match self.events.insert(event.id.clone(), event) {
                Some(_) => stats.replaced += 1,
                None => stats.inserted += 1,
            }
        }
        stats
    }
}

/// Marks a direction busy until dropped, including when the future is cancelled.
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| InFlight(flag))
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

pub struct EventWindow<S> {
    store: S,
    state: Mutex<WindowState>,
    backward_in_flight: AtomicBool,
    forward_in_flight: AtomicBool,
    /// Fallback instant for events with no usable timestamp.
    now: NaiveDateTime,
}

impl<S: EventStore> EventWindow<S> {
    /// An empty window covering `[start, end)`; nothing is fetched.
    pub fn new(store: S, start: NaiveDate, end: NaiveDate, now: NaiveDateTime) -> Self {
        EventWindow {
            store,
            state: Mutex::new(WindowState {
                start,
                end,
                events: HashMap::new(),
            }),
            backward_in_flight: AtomicBool::new(false),
            forward_in_flight: AtomicBool::new(false),
            now,
        }
    }

    /// Initial load around the current local day.
    pub async fn open(store: S, config: &WindowConfig) -> ChronolineResult<Self> {
        Self::open_at(store, now_local(), config).await
    }

    /// Initial load around `now`, widening the history adaptively.
    ///
    /// Loads `initial_past_days` back and `initial_future_days` ahead of today.
    /// While fewer than `min_past_events` events fall in `[start, today]`, the
    /// start moves back by `widen_step_days`, never past `max_past_days`. A step
    /// that brings in no new event ends the widening: the history is sparse.
    pub async fn open_at(
        store: S,
        now: NaiveDateTime,
        config: &WindowConfig,
    ) -> ChronolineResult<Self> {
        let today = now.date();
        let start = days_before(today, config.initial_past_days);
        let end = days_after(today, config.initial_future_days.saturating_add(1));

        let page = store.fetch_events_in_range(start, end).await?;
        debug!(%start, %end, fetched = page.len(), "initial window loaded");

        let window = EventWindow::new(store, start, end, now);
        window.merge(page);

        let floor = days_before(today, config.max_past_days.max(config.initial_past_days));
        loop {
            let (start, _) = window.bounds();
            if start <= floor || window.count_past_events(today) >= config.min_past_events {
                break;
            }

            let next = days_before(start, config.widen_step_days.max(1)).max(floor);
            let page = window.store.fetch_events_in_range(next, start).await?;
            let stats = window.merge(page);
            window.lock().start = next;
            debug!(start = %next, inserted = stats.inserted, "widened initial history");

            if stats.inserted == 0 {
                debug!("history saturated, stop widening");
                break;
            }
        }

        Ok(window)
    }

    /// Fetch `[start - days, start)` and move the start back.
    pub async fn extend_backward(&self, days: u64) -> ChronolineResult<ExtendOutcome> {
        let Some(_guard) = InFlight::acquire(&self.backward_in_flight) else {
            debug!("backward extension already in flight, dropping request");
            return Ok(ExtendOutcome::AlreadyInFlight);
        };

        let old_start = self.bounds().0;
        let new_start = days_before(old_start, days);

        let page = self
            .store
            .fetch_events_in_range(new_start, old_start)
            .await
            .inspect_err(|e| warn!(%new_start, %old_start, "backward fetch failed: {e}"))?;

        let fetched = page.len();
        let mut state = self.lock();
        state.merge(page);
        state.start = state.start.min(new_start);
        debug!(start = %state.start, fetched, "extended backward");

        Ok(ExtendOutcome::Extended {
            fetched,
            bound: state.start,
        })
    }

    /// Fetch `[end, end + days)` and move the end forward.
    pub async fn extend_forward(&self, days: u64) -> ChronolineResult<ExtendOutcome> {
        let Some(_guard) = InFlight::acquire(&self.forward_in_flight) else {
            debug!("forward extension already in flight, dropping request");
            return Ok(ExtendOutcome::AlreadyInFlight);
        };

        let old_end = self.bounds().1;
        let new_end = days_after(old_end, days);

        let page = self
            .store
            .fetch_events_in_range(old_end, new_end)
            .await
            .inspect_err(|e| warn!(%old_end, %new_end, "forward fetch failed: {e}"))?;

        let fetched = page.len();
        let mut state = self.lock();
        state.merge(page);
        state.end = state.end.max(new_end);
        debug!(end = %state.end, fetched, "extended forward");

        Ok(ExtendOutcome::Extended {
            fetched,
            bound: state.end,
        })
    }

    /// Merge a fetched page by id; the incoming copy replaces any existing one.
    pub fn merge(&self, page: Vec<Event>) -> MergeStats {
        self.lock().merge(page)
    }

    /// Apply a pushed single-event update.
    pub fn upsert(&self, event: Event) {
        self.lock().merge(vec![event]);
    }

    /// Apply a pushed delete. Returns the removed event, if it was loaded.
    pub fn remove(&self, id: &str) -> Option<Event> {
        self.lock().events.remove(id)
    }

    /// `[start, end)` day bounds.
    pub fn bounds(&self) -> (NaiveDate, NaiveDate) {
        let state = self.lock();
        (state.start, state.end)
    }

    pub fn get(&self, id: &str) -> Option<Event> {
        self.lock().events.get(id).cloned()
    }

    pub fn len(&self) -> usize {
        self.lock().events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().events.is_empty()
    }

    /// Instant used when an event has no usable timestamp.
    pub fn now(&self) -> NaiveDateTime {
        self.now
    }

    pub fn snapshot(&self) -> WindowSnapshot {
        let state = self.lock();
        let mut events: Vec<Event> = state.events.values().cloned().collect();
        events.sort_by(|a, b| a.id.cmp(&b.id));
        WindowSnapshot {
            start: state.start,
            end: state.end,
            events,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Events anchored in `[start, today]`.
    fn count_past_events(&self, today: NaiveDate) -> usize {
        let state = self.lock();
        state
            .events
            .values()
            .map(|e| resolve_timeline_anchor_at(e, self.now).day())
            .filter(|day| *day >= state.start && *day <= today)
            .count()
    }

    fn lock(&self) -> MutexGuard<'_, WindowState> {
        // Merges never panic mid-update, so a poisoned state is still consistent.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
