use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use chronoline_core::Event;
use chronoline_core::anchor::{resolve_calendar_date_range_at, sort_chronologically};
use chronoline_core::timestamp::now_local;
use owo_colors::OwoColorize;

use crate::render::Render;

pub fn run(events_path: &Path) -> Result<()> {
    let content = std::fs::read_to_string(events_path)
        .with_context(|| format!("Could not read {}", events_path.display()))?;
    let events: Vec<Event> = serde_json::from_str(&content)
        .with_context(|| format!("Could not parse events in {}", events_path.display()))?;

    for line in render_anchors(&events, now_local()) {
        println!("{line}");
    }

    Ok(())
}

pub fn render_anchors(events: &[Event], now: NaiveDateTime) -> Vec<String> {
    sort_chronologically(events, now)
        .into_iter()
        .map(|event| {
            let range = resolve_calendar_date_range_at(event, now);
            format!(
                "{:<5} {}  {} {}",
                range.kind.render(),
                range.render(),
                event,
                format!("({})", event.id).dimmed()
            )
        })
        .collect()
}
