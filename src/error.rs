//! Error types shared across the simulator, forecaster, and loaders.

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::config::ConfigError;

/// A price series that cannot be used as input.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SeriesError {
    #[error("price series is empty")]
    Empty,

    #[error("timestamp at index {index} ({timestamp}) is earlier than its predecessor")]
    NonMonotonic {
        index: usize,
        timestamp: DateTime<Utc>,
    },

    #[error("duplicate timestamp at index {index} ({timestamp})")]
    DuplicateTimestamp {
        index: usize,
        timestamp: DateTime<Utc>,
    },
}

/// A plant parameter that violates its constraints.
///
/// Raised before any per-hour computation starts, so a failed call never
/// produces a partial result.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("invalid parameter `{field}`: {message}")]
pub struct ParameterError {
    /// Parameter name (e.g., `"capacity_factor"`).
    pub field: &'static str,
    /// Human-readable constraint description.
    pub message: String,
}

impl ParameterError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Crate-level error.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Series(#[from] SeriesError),

    #[error(transparent)]
    Parameter(#[from] ParameterError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
