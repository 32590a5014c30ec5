//! Recording annotation pipeline

use std::path::Path;
use std::sync::Arc;

use data_validator::Validator;
use metrics::counter;
use recording::{DecisionSeries, Recording, RecordingError, RunSummary};
use thiserror::Error;
use tokio::sync::watch;
use tracing::{debug, info};
use ttc_engine::{ConfigError, Decision, DecisionEngine, EngineConfig, Sample};

/// Pipeline errors
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Recording error: {0}")]
    Recording(#[from] RecordingError),

    #[error("Engine configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Hot-swappable engine configuration.
///
/// Every run takes one snapshot up front, so an update published mid-run
/// only affects the next run.
pub struct ConfigWatch {
    tx: watch::Sender<Arc<EngineConfig>>,
}

impl ConfigWatch {
    /// Create a watch holding a validated configuration
    pub fn new(config: EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let (tx, _rx) = watch::channel(Arc::new(config));
        Ok(Self { tx })
    }

    /// Publish a new configuration; invalid ones are rejected and the
    /// current configuration stays in place
    pub fn update(&self, config: EngineConfig) -> Result<(), ConfigError> {
        config.validate()?;
        self.tx.send_replace(Arc::new(config));
        info!("Engine configuration updated");
        Ok(())
    }

    /// Current configuration
    pub fn snapshot(&self) -> Arc<EngineConfig> {
        self.tx.borrow().clone()
    }

    /// Receiver notified on every update
    pub fn subscribe(&self) -> watch::Receiver<Arc<EngineConfig>> {
        self.tx.subscribe()
    }
}

/// Output of one evaluated recording
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub samples: Vec<Sample>,
    pub decisions: Vec<Decision>,
    pub summary: RunSummary,
}

impl RunOutput {
    /// Plot-ready columns for this run
    pub fn series(&self) -> Result<DecisionSeries, RecordingError> {
        DecisionSeries::from_run(&self.samples, &self.decisions)
    }
}

/// Loads recordings, decides every sample and writes annotations back
pub struct Pipeline {
    config: ConfigWatch,
    validator: Validator,
    parallel: bool,
}

impl Pipeline {
    pub fn new(config: EngineConfig, validator: Validator, parallel: bool) -> Result<Self, ConfigError> {
        Ok(Self {
            config: ConfigWatch::new(config)?,
            validator,
            parallel,
        })
    }

    /// Configuration handle, for hosts that reload policy at runtime
    pub fn config(&self) -> &ConfigWatch {
        &self.config
    }

    /// Decide every entry of a recording and annotate it in place
    pub fn evaluate(&self, recording: &mut Recording) -> Result<RunOutput, PipelineError> {
        let engine = DecisionEngine::from_snapshot(self.config.snapshot())?;
        let samples = recording.validated_samples(&self.validator)?;

        let decisions = if self.parallel {
            engine.decide_par(&samples)
        } else {
            engine.decide_all(&samples)
        };

        log_brake_onsets(&samples, &decisions);

        let annotated = ttc_engine::annotate(&samples, &decisions).map_err(RecordingError::from)?;
        recording.apply_annotations(&annotated)?;

        let summary = RunSummary::from_run(&samples, &decisions);
        counter!("aeb_samples_total").increment(summary.samples as u64);
        counter!("aeb_brake_decisions_total").increment(summary.brake_decisions as u64);

        Ok(RunOutput {
            samples,
            decisions,
            summary,
        })
    }

    /// Read `input`, annotate it, write `output` and optionally the plot series
    pub async fn run_files(
        &self,
        input: &Path,
        output: &Path,
        series: Option<&Path>,
    ) -> Result<RunSummary, PipelineError> {
        let mut recording = Recording::load(input).await?;
        let run = self.evaluate(&mut recording)?;
        recording.save(output).await?;

        if let Some(path) = series {
            run.series()?.save(path).await?;
        }

        info!("Run summary: {}", run.summary);
        Ok(run.summary)
    }
}

/// Log each transition into emergency braking
fn log_brake_onsets(samples: &[Sample], decisions: &[Decision]) {
    let mut braking = false;
    for (sample, decision) in samples.iter().zip(decisions) {
        if decision.brake && !braking {
            info!(
                "Emergency braking at {}: effective TTC {:.2}s < threshold {:.2}s ({})",
                sample.timestamp, decision.effective_ttc, decision.threshold, sample.weather_name()
            );
        } else if !decision.brake && braking {
            debug!("Braking released at {}", sample.timestamp);
        }
        braking = decision.brake;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ttc_engine::{EnginePreset, WeatherCondition};

    const RECORDING: &str = r#"{"vehicle_data": [
        {"timestamp": 0.0, "vehicle_speed": 10.0, "object_speed": 15.0,
         "object_position": {"x": 20.0}, "weather_condition": "dry"},
        {"timestamp": 0.5, "vehicle_speed": 20.0, "object_speed": 10.0,
         "object_position": {"x": 22.0}, "weather_condition": "dry"},
        {"timestamp": 1.0, "vehicle_speed": 20.0, "object_speed": 10.0,
         "object_position": {"x": 22.0}, "weather_condition": "icy"}
    ]}"#;

    #[test]
    fn test_snapshot_isolated_from_updates() {
        let watch = ConfigWatch::new(EngineConfig::default()).unwrap();
        let before = watch.snapshot();

        watch.update(EnginePreset::Enhanced.config()).unwrap();

        assert!(!before.reaction_compensation.enabled);
        assert!(watch.snapshot().reaction_compensation.enabled);
    }

    #[test]
    fn test_invalid_update_keeps_current() {
        let watch = ConfigWatch::new(EngineConfig::default()).unwrap();
        let mut bad = EngineConfig::default();
        bad.reaction_compensation.reaction_time_seconds = -1.0;

        assert!(watch.update(bad).is_err());
        assert_eq!(*watch.snapshot(), EngineConfig::default());
    }

    #[tokio::test]
    async fn test_subscriber_sees_update() {
        let watch = ConfigWatch::new(EngineConfig::default()).unwrap();
        let mut rx = watch.subscribe();
        watch.update(EngineConfig::with_reaction_time(1.0)).unwrap();

        rx.changed().await.unwrap();
        assert!(rx.borrow().reaction_compensation.enabled);
    }

    #[test]
    fn test_evaluate_annotates_recording() {
        let pipeline = Pipeline::new(EngineConfig::default(), Validator::default(), false).unwrap();
        let mut recording = Recording::from_json_str(RECORDING).unwrap();

        let run = pipeline.evaluate(&mut recording).unwrap();
        assert_eq!(run.decisions.len(), 3);
        assert_eq!(run.summary.brake_decisions, 1);

        let entries = &recording.document()["vehicle_data"];
        assert_eq!(entries[0]["braking_state"], false);
        assert_eq!(entries[1]["braking_state"], false);
        assert_eq!(entries[2]["braking_state"], true);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let sequential = Pipeline::new(EngineConfig::default(), Validator::default(), false).unwrap();
        let parallel = Pipeline::new(EngineConfig::default(), Validator::default(), true).unwrap();

        let a = sequential
            .evaluate(&mut Recording::from_json_str(RECORDING).unwrap())
            .unwrap();
        let b = parallel
            .evaluate(&mut Recording::from_json_str(RECORDING).unwrap())
            .unwrap();
        assert_eq!(a.decisions, b.decisions);
    }

    #[test]
    fn test_config_update_applies_to_next_run() {
        let pipeline = Pipeline::new(EngineConfig::default(), Validator::default(), false).unwrap();
        let first = pipeline
            .evaluate(&mut Recording::from_json_str(RECORDING).unwrap())
            .unwrap();

        pipeline
            .config()
            .update(EngineConfig::with_reaction_time(1.5))
            .unwrap();
        let second = pipeline
            .evaluate(&mut Recording::from_json_str(RECORDING).unwrap())
            .unwrap();

        assert!(!first.decisions[1].brake);
        assert!(second.decisions[1].brake);
    }

    #[tokio::test]
    async fn test_run_files() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("recorded_data.json");
        let output = dir.path().join("out.json");
        let series = dir.path().join("series.json");
        tokio::fs::write(&input, RECORDING).await.unwrap();

        let pipeline =
            Pipeline::new(EnginePreset::Enhanced.config(), Validator::default(), false).unwrap();
        let summary = pipeline
            .run_files(&input, &output, Some(&series))
            .await
            .unwrap();
        assert_eq!(summary.samples, 3);
        assert_eq!(summary.brake_decisions, 2);

        let written: serde_json::Value =
            serde_json::from_str(&tokio::fs::read_to_string(&output).await.unwrap()).unwrap();
        assert_eq!(written["vehicle_data"][1]["braking_state"], true);

        let plotted: serde_json::Value =
            serde_json::from_str(&tokio::fs::read_to_string(&series).await.unwrap()).unwrap();
        assert_eq!(plotted["braking_flags"].as_array().unwrap().len(), 3);
        assert_eq!(
            plotted["weather_conditions"][2],
            WeatherCondition::Icy.to_string()
        );
    }

    #[tokio::test]
    async fn test_missing_input_file() {
        let dir = tempfile::tempdir().unwrap();
        let pipeline = Pipeline::new(EngineConfig::default(), Validator::default(), false).unwrap();
        let err = pipeline
            .run_files(&dir.path().join("absent.json"), &dir.path().join("out.json"), None)
            .await
            .unwrap_err();
        assert!(matches!(err, PipelineError::Recording(RecordingError::Io(_))));
    }
}
