//! Default window sizing, shared by the config layer and the window itself.

/// Days of history loaded on first open.
pub const DEFAULT_INITIAL_PAST_DAYS: u64 = 7;

/// Days of future loaded on first open (today excluded).
pub const DEFAULT_INITIAL_FUTURE_DAYS: u64 = 30;

/// Keep widening the initial history until at least this many past events are loaded.
pub const DEFAULT_MIN_PAST_EVENTS: usize = 10;

/// Size of each adaptive widening step.
pub const DEFAULT_WIDEN_STEP_DAYS: u64 = 3;

/// Hard cap on how far back the adaptive widening may reach.
pub const DEFAULT_MAX_PAST_DAYS: u64 = 30;

/// Days added per scroll-triggered extension, in either direction.
pub const DEFAULT_SCROLL_STEP_DAYS: u64 = 30;
