//! Segment building: compress a window of days into a renderable sequence.
//!
//! The output is a pure projection of `(window, today, occupied, expanded)`.
//! It is rebuilt from scratch whenever one of those changes and never mutated
//! in place, so calling [`SegmentBuilder::build`] twice yields equal lists.
//!
//! Steps:
//! 1. Walk forward from today to the window end, and backward from yesterday
//!    to the window start; history is reversed and prepended.
//! 2. Maximal runs of empty days become one `CompressedRange`; a run of one
//!    day stays a plain `DayGroup`.
//! 3. Ranges spanning several months are cut at month boundaries.
//! 4. A `MonthHeader` precedes every range, and precedes a `DayGroup` only
//!    when the month changes.
//! 5. Ranges containing user-expanded days are re-walked and replaced in place.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::timestamp::{date_key, days_between, last_day_of_month, month_of};

/// One renderable timeline element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Segment {
    /// A label only; carries no events.
    MonthHeader { year: i32, month: u32 },
    /// One calendar day and whatever events are anchored to it (possibly none).
    DayGroup { date: NaiveDate },
    /// Inclusive run of at least two empty days inside a single month.
    CompressedRange { start: NaiveDate, end: NaiveDate },
}

impl Segment {
    /// `(year, month)` the segment belongs to.
    pub fn month(&self) -> (i32, u32) {
        match self {
            Segment::MonthHeader { year, month } => (*year, *month),
            Segment::DayGroup { date } => month_of(*date),
            Segment::CompressedRange { start, .. } => month_of(*start),
        }
    }

    /// Inclusive day span; `None` for headers.
    pub fn days(&self) -> Option<(NaiveDate, NaiveDate)> {
        match self {
            Segment::MonthHeader { .. } => None,
            Segment::DayGroup { date } => Some((*date, *date)),
            Segment::CompressedRange { start, end } => Some((*start, *end)),
        }
    }

    /// Number of calendar days covered.
    pub fn day_count(&self) -> u64 {
        self.days()
            .map(|(start, end)| (end - start).num_days() as u64 + 1)
            .unwrap_or(0)
    }

    /// Day key of a `DayGroup`.
    pub fn date_key(&self) -> Option<String> {
        match self {
            Segment::DayGroup { date } => Some(date_key(*date)),
            _ => None,
        }
    }

    fn header(month: (i32, u32)) -> Self {
        Segment::MonthHeader {
            year: month.0,
            month: month.1,
        }
    }

    /// A single day degenerates to a `DayGroup`.
    fn span(start: NaiveDate, end: NaiveDate) -> Self {
        if start == end {
            Segment::DayGroup { date: start }
        } else {
            Segment::CompressedRange { start, end }
        }
    }
}

/// Inputs of one segment build.
///
/// `window_end` is inclusive. `today` is passed in, never read from the clock,
/// so the build stays a pure function of its inputs.
#[derive(Debug, Clone, Copy)]
pub struct SegmentBuilder<'a> {
    window_start: NaiveDate,
    window_end: NaiveDate,
    today: NaiveDate,
    occupied: &'a BTreeSet<NaiveDate>,
    expanded: Option<&'a BTreeSet<NaiveDate>>,
}

impl<'a> SegmentBuilder<'a> {
    pub fn new(
        window_start: NaiveDate,
        window_end: NaiveDate,
        today: NaiveDate,
        occupied: &'a BTreeSet<NaiveDate>,
    ) -> Self {
        SegmentBuilder {
            window_start,
            window_end,
            today,
            occupied,
            expanded: None,
        }
    }

    /// Days inside compressed runs that the user chose to reveal.
    pub fn with_expanded(mut self, expanded: &'a BTreeSet<NaiveDate>) -> Self {
        self.expanded = Some(expanded);
        self
    }

    pub fn build(&self) -> Vec<Segment> {
        if self.window_start > self.window_end {
            return Vec::new();
        }

        let spans = split_by_month(self.walk());
        let segments = interleave_headers(spans);

        match self.expanded {
            Some(expanded) if !expanded.is_empty() => reexpand(segments, expanded),
            _ => segments,
        }
    }

    /// Run-length walk over the window, in ascending order.
    ///
    /// Today is the pivot and is always materialized. When today lies outside
    /// the window there is no pivot to keep, so the window is walked in one pass.
    fn walk(&self) -> Vec<Segment> {
        let (start, end) = (self.window_start, self.window_end);

        if self.today < start || self.today > end {
            let is_anchor = |day: NaiveDate| self.occupied.contains(&day);
            return compress_forward(days_between(start, end), is_anchor);
        }

        let today = self.today;
        let is_anchor = |day: NaiveDate| day == today || self.occupied.contains(&day);

        let future = compress_forward(days_between(today, end), is_anchor);

        let yesterday_backward =
            std::iter::successors(today.pred_opt(), |d| d.pred_opt()).take_while(|d| *d >= start);
        let mut history = compress_backward(yesterday_backward, is_anchor);
        history.reverse();

        history.extend(future);
        history
    }
}

/// Compress days given in ascending order.
fn compress_forward<I, F>(days: I, is_anchor: F) -> Vec<Segment>
where
    I: Iterator<Item = NaiveDate>,
    F: Fn(NaiveDate) -> bool,
{
    let mut out = Vec::new();
    let mut run: Option<(NaiveDate, NaiveDate)> = None;

    for day in days {
        if is_anchor(day) {
            if let Some((first, last)) = run.take() {
                out.push(Segment::span(first, last));
            }
            out.push(Segment::DayGroup { date: day });
        } else {
            run = Some(match run {
                Some((first, _)) => (first, day),
                None => (day, day),
            });
        }
    }
    if let Some((first, last)) = run {
        out.push(Segment::span(first, last));
    }
    out
}

/// Compress days given in descending order; output is descending too.
fn compress_backward<I, F>(days: I, is_anchor: F) -> Vec<Segment>
where
    I: Iterator<Item = NaiveDate>,
    F: Fn(NaiveDate) -> bool,
{
    compress_forward(days, is_anchor)
        .into_iter()
        .map(|segment| match segment {
            Segment::CompressedRange { start, end } => Segment::CompressedRange {
                start: end,
                end: start,
            },
            other => other,
        })
        .collect()
}

/// Cut every range that crosses a month boundary into one piece per month.
fn split_by_month(spans: Vec<Segment>) -> Vec<Segment> {
    let mut out = Vec::with_capacity(spans.len());

    for segment in spans {
        let Segment::CompressedRange { start, end } = segment else {
            out.push(segment);
            continue;
        };

        let mut cursor = start;
        loop {
            let piece_end = last_day_of_month(cursor).min(end);
            out.push(Segment::span(cursor, piece_end));
            match piece_end.succ_opt() {
                Some(next) if piece_end < end => cursor = next,
                _ => break,
            }
        }
    }
    out
}

/// Header before every range; before a day group only on a month change.
fn interleave_headers(spans: Vec<Segment>) -> Vec<Segment> {
    let mut out = Vec::with_capacity(spans.len() * 2);
    let mut last_month: Option<(i32, u32)> = None;

    for segment in spans {
        let month = segment.month();
        let is_range = matches!(segment, Segment::CompressedRange { .. });

        if is_range || last_month != Some(month) {
            out.push(Segment::header(month));
            last_month = Some(month);
        }
        out.push(segment);
    }
    out
}

/// Replace each range holding expanded days with its re-walked pieces.
///
/// Pieces get a header only when their month differs from whatever was
/// emitted right before them.
fn reexpand(segments: Vec<Segment>, expanded: &BTreeSet<NaiveDate>) -> Vec<Segment> {
    let mut out: Vec<Segment> = Vec::with_capacity(segments.len());

    for segment in segments {
        let Segment::CompressedRange { start, end } = segment else {
            out.push(segment);
            continue;
        };
        if expanded.range(start..=end).next().is_none() {
            out.push(segment);
            continue;
        }

        let pieces = compress_forward(days_between(start, end), |day| expanded.contains(&day));
        for piece in pieces {
            if out.last().map(Segment::month) != Some(piece.month()) {
                out.push(Segment::header(piece.month()));
            }
            out.push(piece);
        }
    }
    out
}
