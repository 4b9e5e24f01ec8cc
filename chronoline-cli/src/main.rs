mod commands;
mod render;

use std::env;
use std::path::PathBuf;

use anyhow::Result;
use chrono::NaiveDate;
use chronoline_core::config::ChronolineConfig;
use clap::{Parser, Subcommand};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

#[derive(Parser)]
#[command(name = "chronoline")]
#[command(about = "Render a journal of events and tasks as a compressed timeline")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Open a window around today and print the segment list
    Timeline {
        /// JSON file holding an array of events
        #[arg(short, long)]
        events: PathBuf,

        /// Pretend today is this day (YYYY-MM-DD)
        #[arg(long)]
        today: Option<NaiveDate>,

        /// Reveal this empty day inside a compressed range (repeatable)
        #[arg(long = "expand", value_name = "YYYY-MM-DD")]
        expanded: Vec<NaiveDate>,

        /// Extend the window backward this many times before rendering
        #[arg(long, default_value_t = 0)]
        earlier: u32,

        /// Extend the window forward this many times before rendering
        #[arg(long, default_value_t = 0)]
        later: u32,
    },
    /// Print each event's resolved range and anchor, chronologically
    Anchor {
        /// JSON file holding an array of events
        #[arg(short, long)]
        events: PathBuf,
    },
    /// Show the effective configuration
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Timeline {
            events,
            today,
            expanded,
            earlier,
            later,
        } => {
            let config = ChronolineConfig::load()?;
            let args = commands::timeline::TimelineArgs {
                events,
                today,
                expanded: expanded.into_iter().collect(),
                earlier,
                later,
            };
            commands::timeline::run(args, &config.window).await
        }
        Commands::Anchor { events } => commands::anchor::run(&events),
        Commands::Config => commands::config::run(),
    }
}

/// Log to stderr. `CHRONOLINE_LOG` takes an env-filter directive,
/// `CHRONOLINE_LOG_FORMAT=json` switches to structured output.
fn init_tracing() {
    let filter = EnvFilter::try_from_env("CHRONOLINE_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if env::var("DEBUG").is_ok() {
            "chronoline_core=debug,chronoline=debug,info"
        } else {
            "warn"
        })
    });

    let format = env::var("CHRONOLINE_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .init();
        }
    }
}
