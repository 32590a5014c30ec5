//! Time-to-Collision Decision Engine
//!
//! Decides, per kinematic sample, whether emergency braking must engage:
//! - Kinematic evaluation (closing speed, raw TTC)
//! - Weather-scaled safety threshold
//! - Optional driver reaction-time compensation
//! - Order-preserving batch evaluation and dataset annotation
//!
//! The engine is pure: no I/O, no shared mutable state. Loading and
//! persisting recordings is left to the callers.

pub mod annotator;
pub mod config;
pub mod engine;
pub mod kinematics;
pub mod policy;
pub mod reaction;
pub mod sample;

mod error;

pub use annotator::{annotate, annotate_pairs, AnnotatedSample};
pub use config::{EngineConfig, EnginePreset};
pub use engine::{decide, Decision, DecisionEngine, Decisions};
pub use error::{AnnotateError, ConfigError};
pub use kinematics::ClosingState;
pub use policy::ThresholdPolicy;
pub use reaction::ReactionCompensation;
pub use sample::{Sample, Timestamp, WeatherCondition};

/// Default base TTC threshold (seconds)
pub const DEFAULT_BASE_THRESHOLD_S: f64 = 2.0;

/// Default driver reaction time (seconds)
pub const DEFAULT_REACTION_TIME_S: f64 = 1.5;

/// Multiplier applied to weather conditions absent from the policy table
pub const DEFAULT_MULTIPLIER: f64 = 1.0;
