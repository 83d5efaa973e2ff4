//! Error types for the sales_forecast crate

use thiserror::Error;

/// Custom error types for the sales_forecast crate
#[derive(Debug, Error)]
pub enum ForecastError {
    /// No valid observations survived validation
    #[error("Empty dataset: {0}")]
    EmptyDataset(String),

    /// Internal consistency fault while encoding observations
    #[error("Encoding error: {0}")]
    EncodingError(String),

    /// Malformed training input or a numeric failure during training
    #[error("Training error: {0}")]
    TrainingError(String),

    /// Error from invalid parameters
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Error from the tensor backend
    #[error("Model error: {0}")]
    ModelError(String),

    /// Training was cancelled before it finished
    #[error("Training cancelled after {epochs_completed} epoch(s)")]
    Cancelled {
        /// Number of epochs that ran to completion
        epochs_completed: usize,
    },

    /// Training did not finish within the configured time budget
    #[error("Training timed out after {0:?}")]
    Timeout(std::time::Duration),

    /// Error from IO operations
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Error from reading CSV records
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    /// Error from serializing output
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

/// Result type with our custom error
pub type Result<T> = std::result::Result<T, ForecastError>;

impl From<candle_core::Error> for ForecastError {
    fn from(err: candle_core::Error) -> Self {
        ForecastError::ModelError(err.to_string())
    }
}

impl ForecastError {
    /// Whether the error should be reported to the end user as a data problem
    /// rather than an internal fault.
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            ForecastError::EmptyDataset(_)
                | ForecastError::InvalidParameter(_)
                | ForecastError::IoError(_)
                | ForecastError::CsvError(_)
                | ForecastError::Timeout(_)
                | ForecastError::Cancelled { .. }
        )
    }
}
