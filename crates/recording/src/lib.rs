//! Recorded Driving Data
//!
//! Boundary between the decision engine and the outside world:
//! - Loading `vehicle_data` recordings from JSON
//! - Writing `braking_state` annotations back, preserving every other field
//! - Parallel-column series for time-series plotting
//! - Run summaries

mod document;
mod error;
mod series;
mod summary;

pub use document::Recording;
pub use error::RecordingError;
pub use series::DecisionSeries;
pub use summary::RunSummary;

/// Default input file name
pub const DEFAULT_INPUT_FILE: &str = "recorded_data.json";

/// Default annotated output file name
pub const DEFAULT_OUTPUT_FILE: &str = "recorded_data_with_braking.json";
