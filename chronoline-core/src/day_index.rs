//! Events grouped by the calendar day their anchor lands on.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{NaiveDate, NaiveDateTime};

use crate::anchor::{resolve_timeline_anchor_at, sort_chronologically};
use crate::event::{Event, EventId};

/// Day → event ids, chronological within each day.
///
/// A pure projection of an event set: rebuild it after any merge, upsert or
/// delete and stale day membership disappears with it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DayIndex {
    days: BTreeMap<NaiveDate, Vec<EventId>>,
}

impl DayIndex {
    pub fn build<'a, I>(events: I, now: NaiveDateTime) -> Self
    where
        I: IntoIterator<Item = &'a Event>,
    {
        let mut days: BTreeMap<NaiveDate, Vec<EventId>> = BTreeMap::new();

        for event in sort_chronologically(events, now) {
            let day = resolve_timeline_anchor_at(event, now).day();
            days.entry(day).or_default().push(event.id.clone());
        }

        DayIndex { days }
    }

    /// Days with at least one event.
    pub fn occupied_days(&self) -> BTreeSet<NaiveDate> {
        self.days.keys().copied().collect()
    }

    pub fn is_occupied(&self, day: NaiveDate) -> bool {
        self.days.contains_key(&day)
    }

    pub fn events_on(&self, day: NaiveDate) -> &[EventId] {
        self.days.get(&day).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, &[EventId])> {
        self.days.iter().map(|(day, ids)| (*day, ids.as_slice()))
    }

    /// Number of occupied days.
    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}
