//! Recording document: load, annotate, save

use std::path::Path;

use data_validator::{ValidationError, Validator};
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{debug, info};
use ttc_engine::{AnnotateError, AnnotatedSample, Sample, Timestamp, WeatherCondition};

use crate::RecordingError;

const VEHICLE_DATA: &str = "vehicle_data";
const BRAKING_STATE: &str = "braking_state";

/// Object position as recorded; only the longitudinal axis is used
#[derive(Debug, Deserialize)]
struct Position {
    x: f64,
}

/// Recorded entry fields the engine needs
#[derive(Debug, Deserialize)]
struct RawEntry {
    timestamp: Timestamp,
    vehicle_speed: f64,
    object_speed: f64,
    #[serde(default)]
    object_position: Option<Position>,
    #[serde(default)]
    object_position_x: Option<f64>,
    weather_condition: String,
}

impl RawEntry {
    fn into_sample(self) -> Result<Sample, ValidationError> {
        let x = self
            .object_position
            .map(|p| p.x)
            .or(self.object_position_x)
            .ok_or(ValidationError::MissingField("object_position.x"))?;

        let condition = WeatherCondition::from_name(&self.weather_condition);
        Ok(Sample::new(self.timestamp, self.vehicle_speed, self.object_speed, x, condition)
            .with_weather_label(self.weather_condition))
    }
}

/// A recorded driving log.
///
/// The full JSON document is kept so that annotating it only adds
/// `braking_state` to each entry and leaves every other field intact.
#[derive(Debug, Clone)]
pub struct Recording {
    document: Value,
}

impl Recording {
    /// Wrap a parsed document, checking it has a `vehicle_data` array
    pub fn from_value(document: Value) -> Result<Self, RecordingError> {
        if !document.get(VEHICLE_DATA).is_some_and(Value::is_array) {
            return Err(RecordingError::MissingVehicleData);
        }
        Ok(Self { document })
    }

    /// Parse a recording from JSON text
    pub fn from_json_str(json: &str) -> Result<Self, RecordingError> {
        Self::from_value(serde_json::from_str(json)?)
    }

    /// Read a recording from disk
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, RecordingError> {
        let path = path.as_ref();
        let json = tokio::fs::read_to_string(path).await?;
        let recording = Self::from_json_str(&json)?;
        info!("Loaded {} entries from {}", recording.len(), path.display());
        Ok(recording)
    }

    /// Underlying JSON document
    pub fn document(&self) -> &Value {
        &self.document
    }

    fn entries(&self) -> &[Value] {
        self.document
            .get(VEHICLE_DATA)
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    fn entries_mut(&mut self) -> Option<&mut Vec<Value>> {
        self.document.get_mut(VEHICLE_DATA).and_then(Value::as_array_mut)
    }

    /// Number of recorded entries
    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Parse every entry into a sample, in recorded order
    pub fn samples(&self) -> Result<Vec<Sample>, RecordingError> {
        self.entries()
            .iter()
            .enumerate()
            .map(|(index, entry)| {
                let raw = RawEntry::deserialize(entry)
                    .map_err(|source| RecordingError::Schema { index, source })?;
                raw.into_sample()
                    .map_err(|source| RecordingError::Validation { index, source })
            })
            .collect()
    }

    /// Parse and range-check every entry
    pub fn validated_samples(&self, validator: &Validator) -> Result<Vec<Sample>, RecordingError> {
        let samples = self.samples()?;
        for (index, sample) in samples.iter().enumerate() {
            validator
                .check(sample)
                .map_err(|source| RecordingError::Validation { index, source })?;
        }
        debug!("Validated {} samples", samples.len());
        Ok(samples)
    }

    /// Write `braking_state` into each entry; annotation `i` goes to entry `i`
    pub fn apply_annotations(&mut self, annotated: &[AnnotatedSample]) -> Result<(), RecordingError> {
        let len = self.len();
        if annotated.len() != len {
            return Err(AnnotateError::LengthMismatch {
                samples: len,
                decisions: annotated.len(),
            }
            .into());
        }

        let entries = self.entries_mut().ok_or(RecordingError::MissingVehicleData)?;
        for (index, (entry, record)) in entries.iter_mut().zip(annotated).enumerate() {
            let fields: &mut Map<String, Value> = entry.as_object_mut().ok_or_else(|| {
                RecordingError::Validation {
                    index,
                    source: ValidationError::InvalidFormat("entry is not an object".to_string()),
                }
            })?;
            fields.insert(BRAKING_STATE.to_string(), Value::Bool(record.braking_state));
        }
        Ok(())
    }

    /// Pretty-printed JSON (two-space indent)
    pub fn to_json_pretty(&self) -> Result<String, RecordingError> {
        Ok(serde_json::to_string_pretty(&self.document)?)
    }

    /// Write the document to disk
    pub async fn save(&self, path: impl AsRef<Path>) -> Result<(), RecordingError> {
        let path = path.as_ref();
        tokio::fs::write(path, self.to_json_pretty()?).await?;
        info!("Wrote {} entries to {}", self.len(), path.display());
        Ok(())
    }
}
