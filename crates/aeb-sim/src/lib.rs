//! AEB Recording Simulator
//!
//! Reads a recorded drive, decides per sample whether emergency braking
//! must engage, and writes the annotated recording back out.

pub mod pipeline;
pub mod settings;

pub use pipeline::{ConfigWatch, Pipeline, PipelineError, RunOutput};
pub use settings::{Args, LogSettings, Settings, SettingsError};

use data_validator::Validator;
use recording::RunSummary;
use tracing::info;
use tracing_subscriber::FmtSubscriber;

/// Initialize logging; fails on an unrecognized level name
pub fn init_logging(log: &LogSettings) -> Result<(), SettingsError> {
    let level = log.max_level()?;
    let builder = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true);

    if log.json {
        tracing::subscriber::set_global_default(builder.json().finish())
            .expect("Failed to set tracing subscriber");
    } else {
        tracing::subscriber::set_global_default(builder.finish())
            .expect("Failed to set tracing subscriber");
    }
    Ok(())
}

/// Run one annotation pass with resolved settings
pub async fn run(settings: &Settings) -> anyhow::Result<RunSummary> {
    let engine_config = settings.engine_config()?;
    info!(
        "Policy: base threshold {}s, {} weather entries, reaction compensation {} ({}s)",
        engine_config.threshold_policy.base_threshold_seconds,
        engine_config.threshold_policy.weather_multipliers.len(),
        if engine_config.reaction_compensation.enabled { "on" } else { "off" },
        engine_config.reaction_compensation.reaction_time_seconds
    );

    let validator = Validator::new(settings.validation.clone());
    let pipeline = Pipeline::new(engine_config, validator, settings.parallel)?;

    let summary = pipeline
        .run_files(&settings.input, &settings.output, settings.series.as_deref())
        .await?;
    Ok(summary)
}
