//! Core types for the chronoline timeline engine.
//!
//! This crate turns loosely-timed journal records into a renderable timeline:
//! - `anchor` resolves each event to a date range and a single sortable instant
//! - `window` keeps a bidirectionally growing set of loaded events
//! - `segment` compresses the window into month headers, day groups and
//!   collapsed ranges of empty days
//! - `scroll_anchor` is the contract a host follows when content is prepended

pub mod anchor;
pub mod config;
pub mod constants;
pub mod day_index;
pub mod error;
pub mod event;
pub mod scroll_anchor;
pub mod segment;
pub mod store;
pub mod timeline;
pub mod timestamp;
pub mod window;

pub use anchor::{
    CalendarDateRange, CheckState, RangeKind, TaskAnchorOptions, TimelineAnchor,
    resolve_calendar_date_range, resolve_check_state, resolve_task_anchor_timestamp,
    resolve_timeline_anchor,
};
pub use config::{ChronolineConfig, WindowConfig};
pub use error::{ChronolineError, ChronolineResult};
pub use event::{Event, EventId};
pub use scroll_anchor::ScrollAnchor;
pub use segment::{Segment, SegmentBuilder};
pub use store::MemoryEventStore;
pub use timeline::{Placement, Timeline};
pub use window::{EventStore, EventWindow, ExtendOutcome, MergeStats, WindowSnapshot};
