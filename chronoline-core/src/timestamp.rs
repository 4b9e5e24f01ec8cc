//! Wall-clock timestamp parsing and calendar-day helpers.
//!
//! Events store their times as local wall-clock strings (`YYYY-MM-DD HH:mm:ss`).
//! Legacy and imported records may carry other shapes, so parsing is lenient
//! and returns `None` instead of failing.

use chrono::{DateTime, Datelike, Days, Local, NaiveDate, NaiveDateTime, NaiveTime};

/// Canonical storage format for timestamps.
pub const STORAGE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Format used for day keys (`YYYY-MM-DD`).
pub const DATE_KEY_FORMAT: &str = "%Y-%m-%d";

const TIME_FORMATS: [&str; 2] = ["%H:%M:%S%.f", "%H:%M"];

/// Parse a stored timestamp into a local wall-clock instant.
///
/// Accepted shapes:
/// - `YYYY-MM-DD HH:mm:ss` (also `/` separators and single-digit month/day)
/// - `YYYY-MM-DDTHH:mm[:ss]`
/// - `YYYY-MM-DD` (local midnight)
/// - RFC 3339 with `Z` or a numeric offset, converted to the local clock
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    if s.ends_with('Z') || s.ends_with('z') || has_numeric_offset(s) {
        return DateTime::parse_from_rfc3339(s)
            .ok()
            .map(|dt| dt.with_timezone(&Local).naive_local());
    }

    match s.split_once([' ', 'T']) {
        Some((date, time)) => {
            let date = parse_loose_date(date)?;
            let time = time.trim();
            let time = TIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveTime::parse_from_str(time, fmt).ok())?;
            Some(date.and_time(time))
        }
        None => parse_loose_date(s).map(|d| d.and_time(NaiveTime::MIN)),
    }
}

/// Format an instant in the canonical storage form.
pub fn format_timestamp(dt: NaiveDateTime) -> String {
    dt.format(STORAGE_FORMAT).to_string()
}

/// Day key for a calendar date (`YYYY-MM-DD`).
pub fn date_key(date: NaiveDate) -> String {
    date.format(DATE_KEY_FORMAT).to_string()
}

/// Inverse of [`date_key`].
pub fn parse_date_key(key: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(key.trim(), DATE_KEY_FORMAT).ok()
}

/// Clamp an instant to local midnight of the same day.
pub fn midnight(dt: NaiveDateTime) -> NaiveDateTime {
    dt.date().and_time(NaiveTime::MIN)
}

/// Current local wall-clock instant.
pub fn now_local() -> NaiveDateTime {
    Local::now().naive_local()
}

/// `(year, month)` of a date.
pub fn month_of(date: NaiveDate) -> (i32, u32) {
    (date.year(), date.month())
}

/// Last calendar day of the month containing `date`.
pub fn last_day_of_month(date: NaiveDate) -> NaiveDate {
    let first = date.with_day(1).unwrap_or(date);
    first
        .checked_add_months(chrono::Months::new(1))
        .and_then(|next| next.pred_opt())
        .unwrap_or(NaiveDate::MAX)
}

/// `date - n days`, saturating at the earliest representable date.
pub fn days_before(date: NaiveDate, n: u64) -> NaiveDate {
    date.checked_sub_days(Days::new(n)).unwrap_or(NaiveDate::MIN)
}

/// `date + n days`, saturating at the latest representable date.
pub fn days_after(date: NaiveDate, n: u64) -> NaiveDate {
    date.checked_add_days(Days::new(n)).unwrap_or(NaiveDate::MAX)
}

/// Every day in `[start, end]`, ascending. Empty when `start > end`.
pub fn days_between(start: NaiveDate, end: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    std::iter::successors(Some(start), |d| d.succ_opt()).take_while(move |d| *d <= end)
}

/// Parse `YYYY-M-D` / `YYYY/M/D` without the zero-padding `%m`/`%d` would demand.
fn parse_loose_date(s: &str) -> Option<NaiveDate> {
    let mut parts = s.trim().split(['-', '/']);
    let year = parts.next()?;
    let month = parts.next()?;
    let day = parts.next()?;
    if parts.next().is_some() || year.len() != 4 {
        return None;
    }
    NaiveDate::from_ymd_opt(year.parse().ok()?, month.parse().ok()?, day.parse().ok()?)
}

/// True for strings ending in `+HH:MM` / `-HH:MM`.
fn has_numeric_offset(s: &str) -> bool {
    let b = s.as_bytes();
    if b.len() < 6 {
        return false;
    }
    let tail = &b[b.len() - 6..];
    matches!(tail[0], b'+' | b'-')
        && tail[1].is_ascii_digit()
        && tail[2].is_ascii_digit()
        && tail[3] == b':'
        && tail[4].is_ascii_digit()
        && tail[5].is_ascii_digit()
}
