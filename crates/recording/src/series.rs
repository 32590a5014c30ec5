//! Plot-ready decision series
//!
//! Parallel columns handed to an external time-series renderer. Infinite
//! TTCs become `null` so plotting tools leave a gap instead of a spike.

use std::path::Path;

use serde::Serialize;
use tracing::info;
use ttc_engine::{AnnotateError, Decision, Sample, Timestamp};

use crate::RecordingError;

/// Column-oriented view of one engine run
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DecisionSeries {
    pub timestamps: Vec<Timestamp>,
    pub ttc_values: Vec<Option<f64>>,
    pub effective_ttc_values: Vec<Option<f64>>,
    pub threshold_values: Vec<f64>,
    /// Weather names as recorded
    pub weather_conditions: Vec<String>,
    pub braking_flags: Vec<bool>,
}

fn finite(value: f64) -> Option<f64> {
    value.is_finite().then_some(value)
}

impl DecisionSeries {
    /// Build the columns from samples and their decisions
    pub fn from_run(samples: &[Sample], decisions: &[Decision]) -> Result<Self, RecordingError> {
        if samples.len() != decisions.len() {
            return Err(AnnotateError::LengthMismatch {
                samples: samples.len(),
                decisions: decisions.len(),
            }
            .into());
        }

        let mut series = Self::with_capacity(samples.len());
        for (sample, decision) in samples.iter().zip(decisions) {
            series.push(sample, decision);
        }
        Ok(series)
    }

    fn with_capacity(n: usize) -> Self {
        Self {
            timestamps: Vec::with_capacity(n),
            ttc_values: Vec::with_capacity(n),
            effective_ttc_values: Vec::with_capacity(n),
            threshold_values: Vec::with_capacity(n),
            weather_conditions: Vec::with_capacity(n),
            braking_flags: Vec::with_capacity(n),
        }
    }

    fn push(&mut self, sample: &Sample, decision: &Decision) {
        self.timestamps.push(sample.timestamp.clone());
        self.ttc_values.push(finite(decision.raw_ttc));
        self.effective_ttc_values.push(finite(decision.effective_ttc));
        self.threshold_values.push(decision.threshold);
        self.weather_conditions.push(sample.weather_name().to_string());
        self.braking_flags.push(decision.brake);
    }

    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    pub fn to_json_pretty(&self) -> Result<String, RecordingError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the series as JSON for an external plotter
    pub async fn save(&self, path: impl AsRef<Path>) -> Result<(), RecordingError> {
        let path = path.as_ref();
        tokio::fs::write(path, self.to_json_pretty()?).await?;
        info!("Wrote {}-point series to {}", self.len(), path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Recording;
    use ttc_engine::{DecisionEngine, EngineConfig, WeatherCondition};

    fn run() -> (Vec<Sample>, Vec<Decision>) {
        let samples = vec![
            Sample::new(0.0, 10.0, 15.0, 20.0, WeatherCondition::Dry),
            Sample::new(0.1, 20.0, 10.0, 22.0, WeatherCondition::Wet),
        ];
        let engine = DecisionEngine::new(EngineConfig::with_reaction_time(1.5)).unwrap();
        let decisions = engine.decide_all(&samples);
        (samples, decisions)
    }

    #[test]
    fn test_columns_line_up() {
        let (samples, decisions) = run();
        let series = DecisionSeries::from_run(&samples, &decisions).unwrap();

        assert_eq!(series.len(), 2);
        assert_eq!(series.ttc_values[0], None);
        assert!((series.ttc_values[1].unwrap() - 2.2).abs() < 1e-9);
        assert!((series.effective_ttc_values[1].unwrap() - 0.7).abs() < 1e-9);
        assert_eq!(series.threshold_values, vec![2.0, 3.0]);
        assert_eq!(series.braking_flags, vec![false, true]);
        assert_eq!(series.weather_conditions[1], "wet");
    }

    #[test]
    fn test_infinite_ttc_serialized_as_null() {
        let (samples, decisions) = run();
        let json = DecisionSeries::from_run(&samples, &decisions)
            .unwrap()
            .to_json_pretty()
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert!(value["ttc_values"][0].is_null());
        assert_eq!(value["weather_conditions"][1], "wet");
    }

    #[test]
    fn test_recorded_values_written_verbatim() {
        let json = r#"{"vehicle_data": [
            {"timestamp": 1700000000000000123, "vehicle_speed": 20.0, "object_speed": 10.0,
             "object_position": {"x": 22.0}, "weather_condition": "Wet"},
            {"timestamp": 3, "vehicle_speed": 10.0, "object_speed": 15.0,
             "object_position": {"x": 20.0}, "weather_condition": "DRY"}
        ]}"#;
        let samples = Recording::from_json_str(json).unwrap().samples().unwrap();
        let decisions = DecisionEngine::new(EngineConfig::default())
            .unwrap()
            .decide_all(&samples);

        let text = DecisionSeries::from_run(&samples, &decisions)
            .unwrap()
            .to_json_pretty()
            .unwrap();
        assert!(text.contains("1700000000000000123"));

        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["timestamps"][0].as_u64(), Some(1_700_000_000_000_000_123));
        assert_eq!(value["timestamps"][1].as_u64(), Some(3));
        assert!(!value["timestamps"][1].is_f64());

        // Lookup is case-insensitive, output keeps the recorded spelling
        assert_eq!(value["weather_conditions"][0], "Wet");
        assert_eq!(value["weather_conditions"][1], "DRY");
        assert_eq!(value["threshold_values"][0], 3.0);
    }

    #[test]
    fn test_length_mismatch() {
        let (samples, _) = run();
        assert!(DecisionSeries::from_run(&samples, &[]).is_err());
    }
}
