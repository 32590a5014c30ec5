//! Engine configuration

use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::policy::ThresholdPolicy;
use crate::reaction::ReactionCompensation;
use crate::sample::WeatherCondition;
use crate::{DEFAULT_BASE_THRESHOLD_S, DEFAULT_REACTION_TIME_S};

/// Complete decision policy for one run
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EngineConfig {
    /// Weather-scaled threshold
    pub threshold_policy: ThresholdPolicy,

    /// Reaction-time compensation
    pub reaction_compensation: ReactionCompensation,
}

impl EngineConfig {
    /// Create a config from its parts
    pub fn new(threshold_policy: ThresholdPolicy, reaction_compensation: ReactionCompensation) -> Self {
        Self {
            threshold_policy,
            reaction_compensation,
        }
    }

    /// Default table with reaction compensation switched on
    pub fn with_reaction_time(reaction_time_seconds: f64) -> Self {
        Self {
            reaction_compensation: ReactionCompensation::enabled(reaction_time_seconds),
            ..Default::default()
        }
    }

    /// Validate both halves of the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.threshold_policy.validate()?;
        self.reaction_compensation.validate()
    }
}

/// Named policies matching the recorded-data simulator variants
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum EnginePreset {
    /// Fixed threshold, no weather scaling, no reaction compensation
    Basic,
    /// Dry/wet scaling
    Weather,
    /// Dry/wet scaling, reaction time subtracted before comparing
    WeatherReaction,
    /// Dry/wet/icy scaling, reaction time subtracted before comparing
    Enhanced,
}

impl EnginePreset {
    pub const ALL: [EnginePreset; 4] = [
        EnginePreset::Basic,
        EnginePreset::Weather,
        EnginePreset::WeatherReaction,
        EnginePreset::Enhanced,
    ];

    /// Build the configuration for this preset
    pub fn config(self) -> EngineConfig {
        let dry_wet = ThresholdPolicy::new(DEFAULT_BASE_THRESHOLD_S)
            .with_multiplier(WeatherCondition::Dry, 1.0)
            .with_multiplier(WeatherCondition::Wet, 1.5);

        match self {
            Self::Basic => EngineConfig::new(
                ThresholdPolicy::new(DEFAULT_BASE_THRESHOLD_S),
                ReactionCompensation::disabled(),
            ),
            Self::Weather => EngineConfig::new(dry_wet, ReactionCompensation::disabled()),
            Self::WeatherReaction => EngineConfig::new(
                dry_wet,
                ReactionCompensation::enabled(DEFAULT_REACTION_TIME_S),
            ),
            Self::Enhanced => EngineConfig::new(
                dry_wet.with_multiplier(WeatherCondition::Icy, 2.0),
                ReactionCompensation::enabled(DEFAULT_REACTION_TIME_S),
            ),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::Weather => "weather",
            Self::WeatherReaction => "weather-reaction",
            Self::Enhanced => "enhanced",
        }
    }
}

impl FromStr for EnginePreset {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_lowercase().replace('_', "-");
        Self::ALL
            .into_iter()
            .find(|preset| preset.name() == name)
            .ok_or_else(|| ConfigError::UnknownPreset(s.to_string()))
    }
}

impl fmt::Display for EnginePreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
