use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Result;
use chrono::{NaiveDate, NaiveDateTime};
use chronoline_core::config::WindowConfig;
use chronoline_core::store::MemoryEventStore;
use chronoline_core::timeline::Timeline;
use chronoline_core::timestamp::now_local;
use chronoline_core::{EventWindow, ExtendOutcome, Segment};
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;

use crate::render::{Render, render_event_line, render_today};

pub struct TimelineArgs {
    pub events: PathBuf,
    pub today: Option<NaiveDate>,
    pub expanded: BTreeSet<NaiveDate>,
    pub earlier: u32,
    pub later: u32,
}

pub async fn run(args: TimelineArgs, config: &WindowConfig) -> Result<()> {
    let now = resolve_now(args.today);
    let store = MemoryEventStore::from_json_file(&args.events, now)?;

    let spinner = loading_spinner(&args.events);
    let window = load_window(store, now, config, args.earlier, args.later, &spinner).await;
    spinner.finish_and_clear();
    let window = window?;

    let timeline = Timeline::build(window.snapshot(), now.date(), &args.expanded, now);
    for line in render_timeline(&timeline, now.date()) {
        println!("{line}");
    }

    let (start, end) = window.bounds();
    println!();
    println!(
        "{}",
        format!("{} events loaded, {start} to {end} (exclusive)", window.len()).dimmed()
    );

    Ok(())
}

async fn load_window(
    store: MemoryEventStore,
    now: NaiveDateTime,
    config: &WindowConfig,
    earlier: u32,
    later: u32,
    spinner: &ProgressBar,
) -> Result<EventWindow<MemoryEventStore>> {
    let window = EventWindow::open_at(store, now, config).await?;

    for step in 1..=earlier {
        spinner.set_message(format!("Scrolling back {step}/{earlier}"));
        report_extension("earlier", window.extend_backward(config.scroll_step_days).await?);
    }
    for step in 1..=later {
        spinner.set_message(format!("Scrolling ahead {step}/{later}"));
        report_extension("later", window.extend_forward(config.scroll_step_days).await?);
    }

    Ok(window)
}

/// Spinner on stderr while the window opens and extends.
fn loading_spinner(events: &Path) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    match ProgressStyle::with_template("{spinner:.cyan} {msg}") {
        Ok(style) => spinner.set_style(style.tick_chars("◐◓◑◒ ")),
        Err(e) => tracing::debug!("spinner template rejected: {e}"),
    }
    let name = events.file_name().unwrap_or(events.as_os_str());
    spinner.set_message(format!("Anchoring events from {}", name.to_string_lossy()));
    spinner.enable_steady_tick(Duration::from_millis(120));
    spinner
}

/// `--today` keeps the current wall-clock time but moves the date.
fn resolve_now(today: Option<NaiveDate>) -> NaiveDateTime {
    let now = now_local();
    match today {
        Some(day) => day.and_time(now.time()),
        None => now,
    }
}

fn report_extension(direction: &str, outcome: ExtendOutcome) {
    if let ExtendOutcome::Extended { fetched, bound } = outcome {
        tracing::info!(direction, fetched, %bound, "window extended");
    }
}

/// Segment list with each day's events underneath.
pub fn render_timeline(timeline: &Timeline, today: NaiveDate) -> Vec<String> {
    let mut lines = Vec::new();

    for segment in timeline.segments() {
        match segment {
            Segment::MonthHeader { .. } => {
                if !lines.is_empty() {
                    lines.push(String::new());
                }
                lines.push(segment.render());
            }
            Segment::DayGroup { date } => {
                lines.push(if *date == today {
                    render_today(segment)
                } else {
                    segment.render()
                });
                for event in timeline.events_on(*date) {
                    let range = timeline.placement(&event.id).map(|p| &p.range);
                    lines.push(render_event_line(event, range));
                }
            }
            Segment::CompressedRange { .. } => lines.push(segment.render()),
        }
    }

    lines
}
