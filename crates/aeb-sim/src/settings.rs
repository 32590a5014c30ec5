//! Layered run settings
//!
//! Precedence, lowest first: built-in defaults, optional config file,
//! `AEB_*` environment variables, command-line flags.

use std::path::{Path, PathBuf};

use clap::Parser;
use config::{Config, Environment, File};
use data_validator::ValidationConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, Level};
use ttc_engine::{EngineConfig, EnginePreset};

/// Settings errors
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Configuration source error: {0}")]
    Source(#[from] config::ConfigError),

    #[error("Invalid engine configuration: {0}")]
    Engine(#[from] ttc_engine::ConfigError),

    #[error("Invalid log level '{0}', expected trace, debug, info, warn or error")]
    LogLevel(String),
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    /// Max level: trace, debug, info, warn, error
    pub level: String,
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

impl LogSettings {
    /// Parsed max level; unknown names are an error rather than a silent fallback
    pub fn max_level(&self) -> Result<Level, SettingsError> {
        self.level
            .trim()
            .parse::<Level>()
            .map_err(|_| SettingsError::LogLevel(self.level.clone()))
    }
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

/// Individual engine values forced on top of the preset or engine section
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineOverrides {
    pub base_threshold_seconds: Option<f64>,
    pub reaction_time_seconds: Option<f64>,
    pub compensate: Option<bool>,
}

/// Complete run settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Recording to annotate
    pub input: PathBuf,
    /// Annotated recording destination
    pub output: PathBuf,
    /// Optional plot series destination
    pub series: Option<PathBuf>,
    /// Named policy, used when no `engine` section is given
    pub preset: Option<EnginePreset>,
    /// Full engine policy
    pub engine: Option<EngineConfig>,
    pub overrides: EngineOverrides,
    pub validation: ValidationConfig,
    /// Evaluate on the rayon pool
    pub parallel: bool,
    pub log: LogSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            input: PathBuf::from(recording::DEFAULT_INPUT_FILE),
            output: PathBuf::from(recording::DEFAULT_OUTPUT_FILE),
            series: None,
            preset: None,
            engine: None,
            overrides: EngineOverrides::default(),
            validation: ValidationConfig::default(),
            parallel: false,
            log: LogSettings::default(),
        }
    }
}

impl Settings {
    /// Load settings from an optional file plus `AEB_` environment variables
    /// (`AEB_PRESET=enhanced`, `AEB_OVERRIDES__REACTION_TIME_SECONDS=1.2`)
    pub fn load(file: Option<&Path>) -> Result<Self, SettingsError> {
        let mut builder = Config::builder();
        if let Some(path) = file {
            debug!("Reading settings from {}", path.display());
            builder = builder.add_source(File::from(path));
        }
        builder = builder.add_source(
            Environment::with_prefix("AEB")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        Ok(builder.build()?.try_deserialize()?)
    }

    /// Resolve the engine policy: engine section, else preset, else
    /// defaults; overrides applied last, then validated
    pub fn engine_config(&self) -> Result<EngineConfig, SettingsError> {
        let mut config = match (&self.engine, self.preset) {
            (Some(engine), _) => engine.clone(),
            (None, Some(preset)) => preset.config(),
            (None, None) => EngineConfig::default(),
        };

        if let Some(base) = self.overrides.base_threshold_seconds {
            config.threshold_policy.base_threshold_seconds = base;
        }
        if let Some(reaction_time) = self.overrides.reaction_time_seconds {
            config.reaction_compensation.reaction_time_seconds = reaction_time;
        }
        if let Some(enabled) = self.overrides.compensate {
            config.reaction_compensation.enabled = enabled;
        }

        config.validate()?;
        Ok(config)
    }
}

/// Command-line arguments
#[derive(Parser, Debug, Default)]
#[command(
    name = "aeb-sim",
    version,
    about = "Annotate recorded driving data with emergency braking decisions"
)]
pub struct Args {
    /// Recording to read
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Annotated recording to write
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Write plot-ready series to this file
    #[arg(long)]
    pub series: Option<PathBuf>,

    /// Settings file (TOML, JSON or YAML)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Engine preset: basic, weather, weather-reaction, enhanced
    #[arg(long)]
    pub preset: Option<EnginePreset>,

    /// Base TTC threshold in seconds
    #[arg(long)]
    pub base_threshold: Option<f64>,

    /// Driver reaction time in seconds
    #[arg(long)]
    pub reaction_time: Option<f64>,

    /// Subtract the reaction time before comparing to the threshold
    #[arg(long, conflicts_with = "no_compensate")]
    pub compensate: bool,

    /// Compare the raw TTC to the threshold
    #[arg(long)]
    pub no_compensate: bool,

    /// Evaluate samples in parallel
    #[arg(long)]
    pub parallel: bool,

    /// Log level
    #[arg(long)]
    pub log_level: Option<String>,

    /// JSON log output
    #[arg(long)]
    pub json_logs: bool,
}

impl Args {
    /// Layer the flags given on the command line over loaded settings
    pub fn apply(&self, settings: &mut Settings) {
        if let Some(input) = &self.input {
            settings.input = input.clone();
        }
        if let Some(output) = &self.output {
            settings.output = output.clone();
        }
        if self.series.is_some() {
            settings.series = self.series.clone();
        }
        if let Some(preset) = self.preset {
            settings.preset = Some(preset);
            settings.engine = None;
        }
        if self.base_threshold.is_some() {
            settings.overrides.base_threshold_seconds = self.base_threshold;
        }
        if self.reaction_time.is_some() {
            settings.overrides.reaction_time_seconds = self.reaction_time;
        }
        if self.compensate {
            settings.overrides.compensate = Some(true);
        } else if self.no_compensate {
            settings.overrides.compensate = Some(false);
        }
        if self.parallel {
            settings.parallel = true;
        }
        if let Some(level) = &self.log_level {
            settings.log.level = level.clone();
        }
        if self.json_logs {
            settings.log.json = true;
        }
    }
}
