//! Global chronoline configuration.

use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_INITIAL_FUTURE_DAYS, DEFAULT_INITIAL_PAST_DAYS, DEFAULT_MAX_PAST_DAYS,
    DEFAULT_MIN_PAST_EVENTS, DEFAULT_SCROLL_STEP_DAYS, DEFAULT_WIDEN_STEP_DAYS,
};
use crate::error::{ChronolineError, ChronolineResult};

/// Prefix for environment overrides, e.g. `CHRONOLINE_WINDOW__MAX_PAST_DAYS=60`.
const ENV_PREFIX: &str = "CHRONOLINE";

/// Sizing of the loaded event window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Days of history loaded on open.
    pub initial_past_days: u64,
    /// Days ahead of today loaded on open.
    pub initial_future_days: u64,
    /// Keep widening the history on open until this many past events are loaded.
    pub min_past_events: usize,
    pub widen_step_days: u64,
    /// Never widen the initial history beyond this many days.
    pub max_past_days: u64,
    /// Days fetched per scroll-triggered extension.
    pub scroll_step_days: u64,
}

impl Default for WindowConfig {
    fn default() -> Self {
        WindowConfig {
            initial_past_days: DEFAULT_INITIAL_PAST_DAYS,
            initial_future_days: DEFAULT_INITIAL_FUTURE_DAYS,
            min_past_events: DEFAULT_MIN_PAST_EVENTS,
            widen_step_days: DEFAULT_WIDEN_STEP_DAYS,
            max_past_days: DEFAULT_MAX_PAST_DAYS,
            scroll_step_days: DEFAULT_SCROLL_STEP_DAYS,
        }
    }
}

/// Global configuration at ~/.config/chronoline/config.toml
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChronolineConfig {
    pub window: WindowConfig,
}

impl ChronolineConfig {
    pub fn config_path() -> ChronolineResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| ChronolineError::Config("Could not determine config directory".into()))?
            .join("chronoline");

        Ok(config_dir.join("config.toml"))
    }

    /// Load the global config, writing a commented default file on first use.
    pub fn load() -> ChronolineResult<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
        }

        Self::load_from(&config_path)
    }

    /// Load from `path` (optional) layered under `CHRONOLINE_*` environment overrides.
    pub fn load_from(path: &Path) -> ChronolineResult<Self> {
        Self::build(path, env_source())
    }

    fn build(path: &Path, env: Environment) -> ChronolineResult<Self> {
        Config::builder()
            .add_source(File::from(path).required(false))
            .add_source(env)
            .build()
            .map_err(|e| ChronolineError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| ChronolineError::Config(e.to_string()))
    }

    pub fn to_toml(&self) -> ChronolineResult<String> {
        toml::to_string_pretty(self).map_err(|e| ChronolineError::Serialization(e.to_string()))
    }

    /// Create a default config file with all options commented out.
    pub fn create_default_config(path: &Path) -> ChronolineResult<()> {
        let contents = format!(
            "\
# chronoline configuration

[window]
# Days of history loaded when the timeline opens:
# initial_past_days = {DEFAULT_INITIAL_PAST_DAYS}

# Days ahead of today loaded when the timeline opens:
# initial_future_days = {DEFAULT_INITIAL_FUTURE_DAYS}

# Sparse history is widened until this many past events are loaded...
# min_past_events = {DEFAULT_MIN_PAST_EVENTS}

# ...in steps of this many days...
# widen_step_days = {DEFAULT_WIDEN_STEP_DAYS}

# ...but never further back than this:
# max_past_days = {DEFAULT_MAX_PAST_DAYS}

# Days fetched each time the timeline is scrolled past an edge:
# scroll_step_days = {DEFAULT_SCROLL_STEP_DAYS}
"
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                ChronolineError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| ChronolineError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }
}

fn env_source() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}
