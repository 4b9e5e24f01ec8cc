//! Host-facing bundle of one render: segments, day index and event placements.

use std::collections::{BTreeSet, HashMap};

use chrono::{NaiveDate, NaiveDateTime};

use crate::anchor::{
    CalendarDateRange, TimelineAnchor, resolve_calendar_date_range_at, resolve_timeline_anchor_at,
};
use crate::day_index::DayIndex;
use crate::event::{Event, EventId};
use crate::segment::{Segment, SegmentBuilder};
use crate::window::WindowSnapshot;

/// Where one event is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub range: CalendarDateRange,
    pub anchor: TimelineAnchor,
}

#[derive(Debug, Clone)]
pub struct Timeline {
    segments: Vec<Segment>,
    index: DayIndex,
    events: HashMap<EventId, Event>,
    placements: HashMap<EventId, Placement>,
}

impl Timeline {
    /// Project a window snapshot. `expanded` holds the days the user revealed.
    pub fn build(
        snapshot: WindowSnapshot,
        today: NaiveDate,
        expanded: &BTreeSet<NaiveDate>,
        now: NaiveDateTime,
    ) -> Self {
        let index = DayIndex::build(&snapshot.events, now);
        let occupied = index.occupied_days();

        let segments = match snapshot.last_day() {
            Some(last) => SegmentBuilder::new(snapshot.start, last, today, &occupied)
                .with_expanded(expanded)
                .build(),
            None => Vec::new(),
        };

        let placements = snapshot
            .events
            .iter()
            .map(|e| {
                let placement = Placement {
                    range: resolve_calendar_date_range_at(e, now),
                    anchor: resolve_timeline_anchor_at(e, now),
                };
                (e.id.clone(), placement)
            })
            .collect();

        let events = snapshot
            .events
            .into_iter()
            .map(|e| (e.id.clone(), e))
            .collect();

        Timeline {
            segments,
            index,
            events,
            placements,
        }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn index(&self) -> &DayIndex {
        &self.index
    }

    /// Events anchored on `day`, chronological.
    pub fn events_on(&self, day: NaiveDate) -> Vec<&Event> {
        self.index
            .events_on(day)
            .iter()
            .filter_map(|id| self.events.get(id))
            .collect()
    }

    pub fn placement(&self, id: &str) -> Option<&Placement> {
        self.placements.get(id)
    }
}
