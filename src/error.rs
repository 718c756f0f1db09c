//! Error types
//!
//! Only programming errors and configuration failures are errors. Commands
//! that are valid but arrive at the wrong time are reported as
//! [`Outcome::Ignored`](crate::sim::Outcome) instead.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GameError {
    /// Lane index outside `[0, lane_count)`
    #[error("lane {lane} out of range (lane count {lane_count})")]
    InvalidLane { lane: usize, lane_count: usize },

    /// A projectile was resolved twice
    #[error("projectile already resolved")]
    DoubleResolve,

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, GameError>;
