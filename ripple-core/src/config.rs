//! Lighting Configuration
//!
//! Tunables for the lighting core, loadable from JSON. Every field has a
//! default, so an empty object (or a partial one) is a valid config.

use serde::{Deserialize, Serialize};

use crate::effect::RippleParams;
use crate::error::ConfigError;
use crate::graph::{KeyIndex, NEIGHBOR_THRESHOLD};
use crate::util::Color;

/// Number of effects that may run at once unless configured otherwise.
pub const DEFAULT_POOL_CAPACITY: usize = 20;

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightingConfig {
    /// Maximum number of concurrently live effects.
    pub pool_capacity: usize,

    /// Manhattan distance (exclusive) under which two keys are neighbors.
    pub neighbor_threshold: f32,

    /// Timing used by [`RippleDefaults::params`].
    pub ripple: RippleDefaults,
}

impl Default for LightingConfig {
    fn default() -> Self {
        Self {
            pool_capacity: DEFAULT_POOL_CAPACITY,
            neighbor_threshold: NEIGHBOR_THRESHOLD,
            ripple: RippleDefaults::default(),
        }
    }
}

impl LightingConfig {
    /// Parse and validate a config from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the core cannot run with.
    ///
    /// Ripple durations are not checked here; they are clamped when a ripple
    /// is created.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pool_capacity == 0 {
            return Err(ConfigError::Invalid(
                "pool_capacity must be at least 1".to_string(),
            ));
        }
        if u32::try_from(self.pool_capacity).is_err() {
            return Err(ConfigError::Invalid(format!(
                "pool_capacity {} is too large",
                self.pool_capacity
            )));
        }
        if !self.neighbor_threshold.is_finite() || self.neighbor_threshold <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "neighbor_threshold must be a positive number, got {}",
                self.neighbor_threshold
            )));
        }
        Ok(())
    }
}

/// Default ripple timing, in ticks (60 ticks is one second at 60 Hz).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RippleDefaults {
    pub step_duration: i32,
    pub propagation_delay: i32,
    pub max_lifetime: i32,
}

impl Default for RippleDefaults {
    fn default() -> Self {
        Self {
            step_duration: 8,
            propagation_delay: 3,
            max_lifetime: 64,
        }
    }
}

impl RippleDefaults {
    /// Ripple parameters for a press on `seed` with these timings.
    pub fn params(&self, seed: KeyIndex, color: Color) -> RippleParams {
        RippleParams {
            seed,
            color,
            step_duration: self.step_duration,
            propagation_delay: self.propagation_delay,
            max_lifetime: self.max_lifetime,
        }
    }
}
