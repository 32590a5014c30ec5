//! Recording Error Types

use data_validator::ValidationError;
use thiserror::Error;
use ttc_engine::AnnotateError;

/// Errors while reading or writing recordings
#[derive(Debug, Error)]
pub enum RecordingError {
    /// File system error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Document is not valid JSON
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Top-level `vehicle_data` array missing
    #[error("Recording has no 'vehicle_data' array")]
    MissingVehicleData,

    /// Entry missing a field or carrying the wrong type
    #[error("Entry {index}: {source}")]
    Schema {
        index: usize,
        source: serde_json::Error,
    },

    /// Entry failed range validation
    #[error("Entry {index}: {source}")]
    Validation {
        index: usize,
        source: ValidationError,
    },

    /// Annotations do not line up with the recording
    #[error(transparent)]
    Annotate(#[from] AnnotateError),
}
