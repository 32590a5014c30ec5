//! Engine Error Types

use thiserror::Error;

/// Errors raised while building an engine configuration
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// Base threshold must be a positive finite number of seconds
    #[error("Base threshold must be positive and finite, got {0}")]
    InvalidBaseThreshold(f64),

    /// Weather multiplier below 1.0 or not finite
    #[error("Weather multiplier for '{condition}' must be finite and >= 1.0, got {value}")]
    InvalidMultiplier { condition: String, value: f64 },

    /// Base threshold times multiplier overflows to infinity
    #[error("Threshold for '{condition}' is not finite: {base} * {multiplier}")]
    ThresholdOverflow {
        condition: String,
        base: f64,
        multiplier: f64,
    },

    /// Reaction time must be a non-negative finite number of seconds
    #[error("Reaction time must be non-negative and finite, got {0}")]
    InvalidReactionTime(f64),

    /// Preset name not recognized
    #[error("Unknown engine preset: {0}")]
    UnknownPreset(String),
}

/// Errors raised while pairing samples with decisions
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnnotateError {
    /// Sample and decision sequences differ in length
    #[error("Length mismatch: {samples} samples, {decisions} decisions")]
    LengthMismatch { samples: usize, decisions: usize },
}
