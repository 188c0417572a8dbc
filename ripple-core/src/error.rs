//! Error types.
//!
//! The tick/compose path never fails; these errors only surface at the
//! effect pool and configuration seams.

use thiserror::Error;

/// Effect pool failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PoolError {
    #[error("effect pool exhausted: all {capacity} slots are in use")]
    Exhausted { capacity: usize },

    #[error("stale effect handle for slot {slot} (generation {generation})")]
    StaleHandle { slot: usize, generation: u32 },

    #[error("effect handle slot {slot} is out of range")]
    OutOfRange { slot: usize },

    #[error("effect parameters do not fit a graph of {key_count} keys")]
    Rejected { key_count: usize },
}

/// Configuration failures.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse lighting config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid lighting config: {0}")]
    Invalid(String),
}
