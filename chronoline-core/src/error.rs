//! Error types for the timeline engine.

use thiserror::Error;

/// Errors that can occur in chronoline operations.
///
/// Anchor resolution and segment building are total and never produce these;
/// only the event store boundary and configuration loading can fail.
#[derive(Error, Debug)]
pub enum ChronolineError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Event store error: {0}")]
    Store(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type alias for chronoline operations.
pub type ChronolineResult<T> = Result<T, ChronolineError>;
