//! Sample Validator for Range Checking

use crate::error::ValidationError;
use serde::{Deserialize, Serialize};
use tracing::debug;
use ttc_engine::{Sample, Timestamp, WeatherCondition};

/// Validation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Ego vehicle speed valid range (m/s)
    pub vehicle_speed_range: (f64, f64),
    /// Object speed valid range (m/s), negative for oncoming traffic
    pub object_speed_range: (f64, f64),
    /// Longitudinal object distance valid range (m)
    pub position_range: (f64, f64),
    /// Accepted weather conditions, empty accepts anything
    pub allowed_weather: Vec<WeatherCondition>,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            vehicle_speed_range: (-20.0, 100.0),
            object_speed_range: (-100.0, 100.0),
            position_range: (0.0, 1000.0),
            allowed_weather: Vec::new(),
        }
    }
}

impl ValidationConfig {
    /// Only accept weather conditions with a known multiplier
    pub fn strict() -> Self {
        Self {
            allowed_weather: vec![
                WeatherCondition::Dry,
                WeatherCondition::Wet,
                WeatherCondition::Icy,
            ],
            ..Default::default()
        }
    }
}

/// Result of validation
#[derive(Debug, Clone)]
pub struct ValidationResult {
    /// Whether all values are valid
    pub valid: bool,
    /// List of validation errors
    pub errors: Vec<ValidationError>,
    /// Number of fields validated
    pub fields_checked: usize,
}

impl ValidationResult {
    /// Create a valid result
    pub fn valid(fields_checked: usize) -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
            fields_checked,
        }
    }

    /// Create an invalid result with errors
    pub fn invalid(errors: Vec<ValidationError>, fields_checked: usize) -> Self {
        Self {
            valid: false,
            errors,
            fields_checked,
        }
    }

    /// First error, if any
    pub fn into_result(self) -> Result<(), ValidationError> {
        match self.errors.into_iter().next() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

/// Validator for recorded kinematic samples
pub struct Validator {
    config: ValidationConfig,
}

impl Validator {
    /// Create a new validator with given config
    pub fn new(config: ValidationConfig) -> Self {
        Self { config }
    }

    /// Validate a single value against a range
    pub fn validate_range(
        &self,
        field: &'static str,
        value: f64,
        range: (f64, f64),
    ) -> Result<(), ValidationError> {
        if !value.is_finite() {
            return Err(ValidationError::NonFinite { field, value });
        }
        if value < range.0 || value > range.1 {
            Err(ValidationError::OutOfRange {
                field,
                value,
                min: range.0,
                max: range.1,
            })
        } else {
            Ok(())
        }
    }

    /// Validate ego vehicle speed
    pub fn validate_vehicle_speed(&self, speed: f64) -> Result<(), ValidationError> {
        self.validate_range("vehicle_speed", speed, self.config.vehicle_speed_range)
    }

    /// Validate object speed
    pub fn validate_object_speed(&self, speed: f64) -> Result<(), ValidationError> {
        self.validate_range("object_speed", speed, self.config.object_speed_range)
    }

    /// Validate longitudinal object distance
    pub fn validate_position(&self, x: f64) -> Result<(), ValidationError> {
        self.validate_range("object_position_x", x, self.config.position_range)
    }

    /// Validate a timestamp: numbers must be finite, labels non-empty
    pub fn validate_timestamp(&self, timestamp: &Timestamp) -> Result<(), ValidationError> {
        match timestamp {
            Timestamp::Number(value) if !value.is_finite() => Err(ValidationError::NonFinite {
                field: "timestamp",
                value: *value,
            }),
            Timestamp::Text(label) if label.trim().is_empty() => {
                Err(ValidationError::InvalidFormat("empty timestamp".to_string()))
            }
            _ => Ok(()),
        }
    }

    /// Validate weather against the allowed list
    pub fn validate_weather(&self, weather: &WeatherCondition) -> Result<(), ValidationError> {
        if self.config.allowed_weather.is_empty() || self.config.allowed_weather.contains(weather) {
            Ok(())
        } else {
            Err(ValidationError::InvalidFormat(format!(
                "unsupported weather condition '{}'",
                weather
            )))
        }
    }

    /// Validate every field of a sample, collecting all errors
    pub fn validate(&self, sample: &Sample) -> ValidationResult {
        let checks = [
            self.validate_timestamp(&sample.timestamp),
            self.validate_vehicle_speed(sample.vehicle_speed),
            self.validate_object_speed(sample.object_speed),
            self.validate_position(sample.object_position_x),
            self.validate_weather(&sample.weather_condition),
        ];
        let fields_checked = checks.len();
        let errors: Vec<_> = checks.into_iter().filter_map(Result::err).collect();

        if errors.is_empty() {
            ValidationResult::valid(fields_checked)
        } else {
            debug!("Sample at {} failed {} checks", sample.timestamp, errors.len());
            ValidationResult::invalid(errors, fields_checked)
        }
    }

    /// Validate a sample, stopping at the first error
    pub fn check(&self, sample: &Sample) -> Result<(), ValidationError> {
        self.validate(sample).into_result()
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new(ValidationConfig::default())
    }
}
