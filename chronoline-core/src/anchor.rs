//! Anchor resolution: where an event lands on the calendar.
//!
//! Every function here is total. Unparsable timestamps count as absent and
//! the fill-chains end in "now", so a broken or legacy record still renders
//! somewhere instead of dropping out of the timeline.
//!
//! Functions that may fall back to the current instant come in two flavors:
//! the plain one reads the local clock, the `_at` twin takes `now` explicitly.

use std::cmp::Ordering;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::event::Event;
use crate::timestamp::{format_timestamp, midnight, now_local, parse_timestamp};

/// Completion state derived from the check/uncheck history.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckState {
    pub is_checked: bool,
    pub last_checked: Option<String>,
    pub last_unchecked: Option<String>,
}

impl CheckState {
    /// Resolve from unordered check/uncheck histories.
    ///
    /// The latest entry is picked by parsed value, never by position.
    /// Checked iff a check exists and it is strictly later than the latest uncheck.
    pub fn resolve(checked: &[String], unchecked: &[String]) -> Self {
        let last_checked = latest_of(checked);
        let last_unchecked = latest_of(unchecked);

        let is_checked = match (last_checked, last_unchecked) {
            (Some(c), Some(u)) => is_later(c, u),
            (Some(_), None) => true,
            (None, _) => false,
        };

        CheckState {
            is_checked,
            last_checked: last_checked.map(str::to_string),
            last_unchecked: last_unchecked.map(str::to_string),
        }
    }
}

/// Resolve the completion state of a check/uncheck history.
pub fn resolve_check_state(checked: &[String], unchecked: &[String]) -> CheckState {
    CheckState::resolve(checked, unchecked)
}

/// Ordering key: parsable timestamps beat unparsable ones, raw text breaks ties.
fn timestamp_key(raw: &str) -> (Option<NaiveDateTime>, &str) {
    (parse_timestamp(raw), raw)
}

fn latest_of(values: &[String]) -> Option<&str> {
    values
        .iter()
        .map(String::as_str)
        .filter(|s| !s.trim().is_empty())
        .max_by(|a, b| timestamp_key(a).cmp(&timestamp_key(b)))
}

fn is_later(a: &str, b: &str) -> bool {
    match (parse_timestamp(a), parse_timestamp(b)) {
        (Some(x), Some(y)) => x > y,
        (Some(_), None) => true,
        (None, Some(_)) => false,
        (None, None) => a.cmp(b) == Ordering::Greater,
    }
}

/// Options for [`resolve_task_anchor_timestamp`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskAnchorOptions {
    /// Checked tasks land on the day they were completed.
    pub prefer_completion_day_when_checked: bool,
    /// Use the current instant when every source is missing.
    pub fallback_to_now: bool,
}

impl Default for TaskAnchorOptions {
    fn default() -> Self {
        TaskAnchorOptions {
            prefer_completion_day_when_checked: true,
            fallback_to_now: false,
        }
    }
}

/// Timestamp used to place a dateless task on a day.
///
/// Precedence: last check (checked tasks, when preferred), then the deadline
/// (unchecked tasks), then `created_at`, then now (when allowed).
pub fn resolve_task_anchor_timestamp(event: &Event, options: TaskAnchorOptions) -> Option<String> {
    resolve_task_anchor_timestamp_at(event, options, now_local())
}

pub fn resolve_task_anchor_timestamp_at(
    event: &Event,
    options: TaskAnchorOptions,
    now: NaiveDateTime,
) -> Option<String> {
    match task_anchor_source(event, options) {
        Some((raw, _)) => Some(raw.to_string()),
        None if options.fallback_to_now => Some(format_timestamp(now)),
        None => None,
    }
}

/// First usable source in precedence order, with its parsed value.
fn task_anchor_source(event: &Event, options: TaskAnchorOptions) -> Option<(&str, NaiveDateTime)> {
    let state = CheckState::resolve(&event.checked, &event.unchecked);

    let completion = latest_of(&event.checked)
        .filter(|_| options.prefer_completion_day_when_checked && state.is_checked);
    let deadline = event.end_time().filter(|_| !state.is_checked);

    [completion, deadline, event.created_at()]
        .into_iter()
        .flatten()
        .find_map(|raw| parse_timestamp(raw).map(|at| (raw, at)))
}

/// How a [`CalendarDateRange`] was derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RangeKind {
    /// A task without a start time, pinned to midnight of its anchor day.
    TaskDateOnly,
    /// Placed by its own start/end times (with fallbacks).
    TimeBased,
}

/// Display range of an event on the calendar.
///
/// For `TaskDateOnly`, `start == end == midnight`. For `TimeBased`, inverted
/// input (`end < start`) is passed through unrepaired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarDateRange {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub kind: RangeKind,
}

pub fn resolve_calendar_date_range(event: &Event) -> CalendarDateRange {
    resolve_calendar_date_range_at(event, now_local())
}

pub fn resolve_calendar_date_range_at(event: &Event, now: NaiveDateTime) -> CalendarDateRange {
    if event.start_time().is_none() && event.is_task {
        let options = TaskAnchorOptions {
            prefer_completion_day_when_checked: true,
            fallback_to_now: true,
        };
        let anchor = task_anchor_source(event, options)
            .map(|(_, at)| at)
            .unwrap_or(now);
        let start = midnight(anchor);
        return CalendarDateRange {
            start,
            end: start,
            kind: RangeKind::TaskDateOnly,
        };
    }

    let start = first_parsable(&[event.start_time(), event.end_time(), event.created_at()]);
    let end = first_parsable(&[event.end_time(), event.start_time(), event.created_at()]);

    CalendarDateRange {
        start: start.unwrap_or(now),
        end: end.unwrap_or(now),
        kind: RangeKind::TimeBased,
    }
}

fn first_parsable(candidates: &[Option<&str>]) -> Option<NaiveDateTime> {
    candidates.iter().flatten().find_map(|raw| parse_timestamp(raw))
}

/// Single sortable instant for an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineAnchor {
    pub date: NaiveDateTime,
    pub kind: RangeKind,
}

impl TimelineAnchor {
    /// Calendar day the anchor falls on.
    pub fn day(&self) -> NaiveDate {
        self.date.date()
    }
}

pub fn resolve_timeline_anchor(event: &Event) -> TimelineAnchor {
    resolve_timeline_anchor_at(event, now_local())
}

pub fn resolve_timeline_anchor_at(event: &Event, now: NaiveDateTime) -> TimelineAnchor {
    let range = resolve_calendar_date_range_at(event, now);
    TimelineAnchor {
        date: range.start,
        kind: range.kind,
    }
}

/// Order events ascending by anchor; ties fall back to id so the order is total.
pub fn sort_chronologically<'a, I>(events: I, now: NaiveDateTime) -> Vec<&'a Event>
where
    I: IntoIterator<Item = &'a Event>,
{
    let mut sorted: Vec<&Event> = events.into_iter().collect();
    sorted.sort_by_cached_key(|e| (resolve_timeline_anchor_at(e, now).date, e.id.clone()));
    sorted
}
