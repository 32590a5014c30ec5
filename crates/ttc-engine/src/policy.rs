//! Weather-scaled braking threshold

use std::collections::BTreeMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ConfigError;
use crate::sample::WeatherCondition;
use crate::{DEFAULT_BASE_THRESHOLD_S, DEFAULT_MULTIPLIER};

/// Maps a weather condition to a scaled TTC threshold
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ThresholdPolicy {
    /// Threshold under nominal (dry) conditions (seconds)
    pub base_threshold_seconds: f64,

    /// Per-condition multipliers, each >= 1.0
    pub weather_multipliers: BTreeMap<WeatherCondition, f64>,
}

impl Default for ThresholdPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_THRESHOLD_S)
            .with_multiplier(WeatherCondition::Dry, 1.0)
            .with_multiplier(WeatherCondition::Wet, 1.5)
            .with_multiplier(WeatherCondition::Icy, 2.0)
    }
}

impl ThresholdPolicy {
    /// Policy with an empty multiplier table (every condition scales by 1.0)
    pub fn new(base_threshold_seconds: f64) -> Self {
        Self {
            base_threshold_seconds,
            weather_multipliers: BTreeMap::new(),
        }
    }

    /// Set the multiplier for a condition
    pub fn with_multiplier(mut self, condition: WeatherCondition, multiplier: f64) -> Self {
        self.weather_multipliers.insert(condition, multiplier);
        self
    }

    /// Multiplier for a condition.
    ///
    /// Conditions missing from the table fall back to 1.0, i.e. they are
    /// treated as dry road rather than the most severe known condition.
    pub fn multiplier_for(&self, condition: &WeatherCondition) -> f64 {
        self.weather_multipliers
            .get(condition)
            .copied()
            .unwrap_or(DEFAULT_MULTIPLIER)
    }

    /// Weather-adjusted threshold (seconds)
    pub fn threshold_for(&self, condition: &WeatherCondition) -> f64 {
        self.base_threshold_seconds * self.multiplier_for(condition)
    }

    /// Check the policy can only ever produce positive finite thresholds
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.base_threshold_seconds.is_finite() || self.base_threshold_seconds <= 0.0 {
            return Err(ConfigError::InvalidBaseThreshold(self.base_threshold_seconds));
        }

        for (condition, &value) in &self.weather_multipliers {
            if !value.is_finite() || value < 1.0 {
                return Err(ConfigError::InvalidMultiplier {
                    condition: condition.to_string(),
                    value,
                });
            }
            if !(self.base_threshold_seconds * value).is_finite() {
                return Err(ConfigError::ThresholdOverflow {
                    condition: condition.to_string(),
                    base: self.base_threshold_seconds,
                    multiplier: value,
                });
            }
        }

        debug!(
            "Threshold policy: base={}s, {} weather entries",
            self.base_threshold_seconds,
            self.weather_multipliers.len()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table() {
        let policy = ThresholdPolicy::default();
        assert!((policy.threshold_for(&WeatherCondition::Dry) - 2.0).abs() < 1e-9);
        assert!((policy.threshold_for(&WeatherCondition::Wet) - 3.0).abs() < 1e-9);
        assert!((policy.threshold_for(&WeatherCondition::Icy) - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_unknown_condition_falls_back_to_dry() {
        let policy = ThresholdPolicy::default();
        let fog = WeatherCondition::from_name("fog");
        assert_eq!(policy.multiplier_for(&fog), 1.0);
        assert!((policy.threshold_for(&fog) - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_table_without_icy() {
        let policy = ThresholdPolicy::new(2.0).with_multiplier(WeatherCondition::Wet, 1.5);
        assert!((policy.threshold_for(&WeatherCondition::Icy) - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_custom_condition_key() {
        let policy = ThresholdPolicy::new(2.0).with_multiplier(WeatherCondition::from_name("Snow"), 2.5);
        assert!((policy.threshold_for(&WeatherCondition::from_name("snow")) - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        assert!(ThresholdPolicy::default().validate().is_ok());
        assert_eq!(
            ThresholdPolicy::new(0.0).validate(),
            Err(ConfigError::InvalidBaseThreshold(0.0))
        );
        assert!(ThresholdPolicy::new(f64::NAN).validate().is_err());

        let weak = ThresholdPolicy::new(2.0).with_multiplier(WeatherCondition::Wet, 0.5);
        assert!(matches!(
            weak.validate(),
            Err(ConfigError::InvalidMultiplier { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_overflowing_threshold() {
        let huge = ThresholdPolicy::new(1e308).with_multiplier(WeatherCondition::Wet, 2.0);
        assert!(huge.threshold_for(&WeatherCondition::Wet).is_infinite());
        assert!(matches!(
            huge.validate(),
            Err(ConfigError::ThresholdOverflow { ref condition, .. }) if condition == "wet"
        ));

        // Large but representable products still pass
        let large = ThresholdPolicy::new(1e300).with_multiplier(WeatherCondition::Icy, 2.0);
        assert!(large.validate().is_ok());
    }
}
