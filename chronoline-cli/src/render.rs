//! Terminal rendering for chronoline-core types, colored with owo_colors.

use chrono::NaiveDate;
use chronoline_core::anchor::{CalendarDateRange, RangeKind};
use chronoline_core::{Event, Segment, resolve_check_state};
use owo_colors::OwoColorize;

/// Extension trait for TUI rendering with colors.
pub trait Render {
    fn render(&self) -> String;
}

impl Render for Segment {
    fn render(&self) -> String {
        match *self {
            Segment::MonthHeader { year, month } => {
                let label = NaiveDate::from_ymd_opt(year, month, 1)
                    .map(|first| first.format("%B %Y").to_string())
                    .unwrap_or_else(|| format!("{year}-{month:02}"));
                label.bold().to_string()
            }
            Segment::DayGroup { date } => format!("  {}", date.format("%a %d")),
            Segment::CompressedRange { start, end } => {
                let days = self.day_count();
                format!(
                    "  ··· {}–{} ({} empty {})",
                    start.format("%d"),
                    end.format("%d %b"),
                    days,
                    pluralize("day", days)
                )
                .dimmed()
                .to_string()
            }
        }
    }
}

impl Render for RangeKind {
    fn render(&self) -> String {
        match self {
            RangeKind::TaskDateOnly => "task".cyan().to_string(),
            RangeKind::TimeBased => "timed".blue().to_string(),
        }
    }
}

impl Render for CalendarDateRange {
    fn render(&self) -> String {
        match self.kind {
            RangeKind::TaskDateOnly => self.start.format("%Y-%m-%d").to_string(),
            RangeKind::TimeBased if self.start == self.end => {
                self.start.format("%Y-%m-%d %H:%M").to_string()
            }
            RangeKind::TimeBased if self.start.date() == self.end.date() => format!(
                "{} → {}",
                self.start.format("%Y-%m-%d %H:%M"),
                self.end.format("%H:%M")
            ),
            RangeKind::TimeBased => format!(
                "{} → {}",
                self.start.format("%Y-%m-%d %H:%M"),
                self.end.format("%Y-%m-%d %H:%M")
            ),
        }
    }
}

/// One event line under its day group.
pub fn render_event_line(event: &Event, range: Option<&CalendarDateRange>) -> String {
    let time = match range {
        Some(r) if r.kind == RangeKind::TimeBased => r.start.format("%H:%M").to_string(),
        _ => "  -  ".to_string(),
    };
    let title = if event.is_task {
        let mark = if resolve_check_state(&event.checked, &event.unchecked).is_checked {
            "[x]".green().to_string()
        } else {
            "[ ]".to_string()
        };
        format!("{mark} {event}")
    } else {
        event.to_string()
    };
    format!("      {}  {}", time.dimmed(), title)
}

/// Highlight the day the timeline pivots on.
pub fn render_today(segment: &Segment) -> String {
    format!("{} {}", segment.render().yellow().bold(), "today".yellow())
}

fn pluralize(word: &str, count: u64) -> String {
    if count == 1 {
        word.to_string()
    } else {
        format!("{word}s")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chronoline_core::timestamp::parse_timestamp;

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_month_header_label() {
        let header = Segment::MonthHeader { year: 2025, month: 12 };
        assert!(header.render().contains("December 2025"));
    }

    #[test]
    fn test_compressed_range_counts_days() {
        let range = Segment::CompressedRange {
            start: day("2025-12-02"),
            end: day("2025-12-04"),
        };
        assert!(range.render().contains("··· 02–04 Dec (3 empty days)"));
    }

    #[test]
    fn test_same_day_range_shows_end_time_only() {
        let range = CalendarDateRange {
            start: parse_timestamp("2025-12-01 09:00:00").unwrap(),
            end: parse_timestamp("2025-12-01 10:30:00").unwrap(),
            kind: RangeKind::TimeBased,
        };
        assert_eq!(range.render(), "2025-12-01 09:00 → 10:30");
    }
}
