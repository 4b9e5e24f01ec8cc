use std::collections::BTreeSet;

use chrono::{NaiveDate, NaiveDateTime};
use chronoline_core::config::WindowConfig;
use chronoline_core::store::MemoryEventStore;
use chronoline_core::timeline::Timeline;
use chronoline_core::timestamp::parse_timestamp;
use chronoline_core::{Event, EventWindow, ExtendOutcome, Segment};

fn day(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn now() -> NaiveDateTime {
    parse_timestamp("2025-12-15 12:00:00").unwrap()
}

fn timed(id: &str, start: &str) -> Event {
    Event {
        title: Some(id.to_string()),
        start_time: Some(start.to_string()),
        ..Event::new(id)
    }
}

fn journal() -> Vec<Event> {
    vec![
        timed("autumn-walk", "2025-11-10 16:00:00"),
        timed("dentist", "2025-12-06 09:30:00"),
        timed("standup", "2025-12-12 10:00:00"),
        timed("review", "2025-12-14 15:00:00"),
        Event {
            is_task: true,
            end_time: Some("2025-12-20 18:00:00".into()),
            ..Event::new("report")
        },
        timed("new-year", "2026-01-01 00:00:00"),
    ]
}

/// Day-carrying segments must tile `[first, last]` with no gap or overlap.
fn assert_tiles(segments: &[Segment], first: NaiveDate, last: NaiveDate) {
    let spans: Vec<(NaiveDate, NaiveDate)> = segments.iter().filter_map(Segment::days).collect();
    assert_eq!(spans.first().map(|s| s.0), Some(first));
    assert_eq!(spans.last().map(|s| s.1), Some(last));
    for pair in spans.windows(2) {
        assert_eq!(pair[0].1.succ_opt(), Some(pair[1].0), "gap or overlap at {pair:?}");
    }
}

#[tokio::test]
async fn test_open_extend_and_render() {
    let store = MemoryEventStore::new(journal(), now());
    let window = EventWindow::open_at(store, now(), &WindowConfig::default())
        .await
        .unwrap();

    // Sparse history: one widening step finds the dentist, the next finds nothing.
    assert_eq!(window.bounds(), (day("2025-12-02"), day("2026-01-15")));
    assert!(window.get("autumn-walk").is_none());

    let outcome = window.extend_backward(30).await.unwrap();
    assert_eq!(
        outcome,
        ExtendOutcome::Extended {
            fetched: 1,
            bound: day("2025-11-02"),
        }
    );

    let timeline = Timeline::build(window.snapshot(), now().date(), &BTreeSet::new(), now());
    let segments = timeline.segments();

    assert_eq!(segments[0], Segment::MonthHeader { year: 2025, month: 11 });
    assert_tiles(segments, day("2025-11-02"), day("2026-01-14"));

    let occupied_days = [
        "2025-11-10",
        "2025-12-06",
        "2025-12-12",
        "2025-12-14",
        "2025-12-20",
        "2026-01-01",
    ];
    for occupied in occupied_days {
        assert!(
            segments.contains(&Segment::DayGroup { date: day(occupied) }),
            "{occupied} should be its own day group"
        );
    }
    assert!(segments.contains(&Segment::DayGroup { date: day("2025-12-15") }));
    assert!(segments.contains(&Segment::MonthHeader { year: 2026, month: 1 }));
    assert!(
        segments
            .iter()
            .all(|s| !matches!(s, Segment::CompressedRange { start, end } if start == end))
    );

    let report = timeline.placement("report").unwrap();
    assert_eq!(report.anchor.day(), day("2025-12-20"));
}

#[tokio::test]
async fn test_pushed_changes_show_up_on_rebuild() {
    let store = MemoryEventStore::new(journal(), now());
    let window = EventWindow::open_at(store, now(), &WindowConfig::default())
        .await
        .unwrap();

    window.upsert(timed("standup", "2025-12-13 10:00:00"));
    window.remove("review");

    let timeline = Timeline::build(window.snapshot(), now().date(), &BTreeSet::new(), now());

    assert!(timeline.events_on(day("2025-12-12")).is_empty());
    assert_eq!(timeline.events_on(day("2025-12-13")).len(), 1);
    assert!(!timeline.index().is_occupied(day("2025-12-14")));
}

#[tokio::test]
async fn test_expanding_a_day_reveals_it() {
    let store = MemoryEventStore::new(journal(), now());
    let window = EventWindow::open_at(store, now(), &WindowConfig::default())
        .await
        .unwrap();

    let expanded = BTreeSet::from([day("2025-12-09")]);
    let timeline = Timeline::build(window.snapshot(), now().date(), &expanded, now());
    let segments = timeline.segments();

    assert!(segments.contains(&Segment::DayGroup { date: day("2025-12-09") }));
    assert_tiles(segments, day("2025-12-02"), day("2026-01-14"));
}
