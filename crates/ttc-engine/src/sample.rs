//! Kinematic samples and weather conditions

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Road weather condition
///
/// Names are matched case-insensitively. Anything not recognized is kept
/// verbatim (lowercased) as `Other`, so custom policy tables can still key
/// on it.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "String", into = "String"))]
pub enum WeatherCondition {
    Dry,
    Wet,
    Icy,
    Other(String),
}

impl WeatherCondition {
    /// Parse a weather name, normalizing case and surrounding whitespace
    pub fn from_name(name: &str) -> Self {
        let name = name.trim().to_lowercase();
        match name.as_str() {
            "dry" => Self::Dry,
            "wet" => Self::Wet,
            "icy" => Self::Icy,
            _ => Self::Other(name),
        }
    }

    /// Canonical lowercase name
    pub fn as_str(&self) -> &str {
        match self {
            Self::Dry => "dry",
            Self::Wet => "wet",
            Self::Icy => "icy",
            Self::Other(name) => name,
        }
    }
}

impl FromStr for WeatherCondition {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_name(s))
    }
}

impl From<&str> for WeatherCondition {
    fn from(name: &str) -> Self {
        Self::from_name(name)
    }
}

impl From<String> for WeatherCondition {
    fn from(name: String) -> Self {
        Self::from_name(&name)
    }
}

impl From<WeatherCondition> for String {
    fn from(condition: WeatherCondition) -> Self {
        condition.as_str().to_string()
    }
}

impl fmt::Display for WeatherCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Opaque ordering key carried through the engine untouched.
///
/// Integer keys stay integers so nanosecond epochs keep every digit;
/// variant order matters for untagged deserialization.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum Timestamp {
    Unsigned(u64),
    Integer(i64),
    Number(f64),
    Text(String),
}

impl From<u64> for Timestamp {
    fn from(value: u64) -> Self {
        Self::Unsigned(value)
    }
}

impl From<i64> for Timestamp {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for Timestamp {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for Timestamp {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unsigned(value) => write!(f, "{}", value),
            Self::Integer(value) => write!(f, "{}", value),
            Self::Number(value) => write!(f, "{}", value),
            Self::Text(value) => f.write_str(value),
        }
    }
}

/// One observed driving sample: ego vehicle vs. a single lead object
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Sample {
    /// Ordering key
    pub timestamp: Timestamp,

    /// Ego vehicle speed (m/s)
    pub vehicle_speed: f64,

    /// Lead object speed (m/s)
    pub object_speed: f64,

    /// Longitudinal distance to the object (m)
    pub object_position_x: f64,

    /// Weather at the time of the sample
    pub weather_condition: WeatherCondition,

    /// Weather name as recorded, when it came from a log
    #[cfg_attr(feature = "serde", serde(skip))]
    pub weather_label: Option<String>,
}

impl Sample {
    /// Create a new sample
    pub fn new(
        timestamp: impl Into<Timestamp>,
        vehicle_speed: f64,
        object_speed: f64,
        object_position_x: f64,
        weather_condition: WeatherCondition,
    ) -> Self {
        Self {
            timestamp: timestamp.into(),
            vehicle_speed,
            object_speed,
            object_position_x,
            weather_condition,
            weather_label: None,
        }
    }

    /// Keep the recorded spelling of the weather name for output
    pub fn with_weather_label(mut self, label: impl Into<String>) -> Self {
        self.weather_label = Some(label.into());
        self
    }

    /// Weather name for display: recorded spelling, else canonical name
    pub fn weather_name(&self) -> &str {
        self.weather_label
            .as_deref()
            .unwrap_or_else(|| self.weather_condition.as_str())
    }
}
