//! Driver reaction-time compensation

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::DEFAULT_REACTION_TIME_S;

/// Shortens the TTC margin by the time a driver needs to react
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ReactionCompensation {
    /// Subtract the reaction time before comparing to the threshold
    pub enabled: bool,

    /// Driver reaction time (seconds)
    pub reaction_time_seconds: f64,
}

impl Default for ReactionCompensation {
    fn default() -> Self {
        Self::disabled()
    }
}

impl ReactionCompensation {
    /// Compensation off, default reaction time retained for later enabling
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            reaction_time_seconds: DEFAULT_REACTION_TIME_S,
        }
    }

    /// Compensation on with the given reaction time
    pub fn enabled(reaction_time_seconds: f64) -> Self {
        Self {
            enabled: true,
            reaction_time_seconds,
        }
    }

    /// Effective TTC for a raw TTC.
    ///
    /// Not clamped: a negative result means the driver can no longer react
    /// in time. An infinite raw TTC stays infinite.
    pub fn apply(&self, raw_ttc: f64) -> f64 {
        if self.enabled {
            raw_ttc - self.reaction_time_seconds
        } else {
            raw_ttc
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.reaction_time_seconds.is_finite() || self.reaction_time_seconds < 0.0 {
            return Err(ConfigError::InvalidReactionTime(self.reaction_time_seconds));
        }
        Ok(())
    }
}
