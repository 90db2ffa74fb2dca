//! Error types for the forecast_sales crate

use polars::prelude::PolarsError;
use thiserror::Error;

/// Custom error types for the forecast_sales crate
#[derive(Debug, Error)]
pub enum ForecastError {
    /// Not enough observations to split or fit; fatal to the forecast call
    #[error("Insufficient data in {stage}: {detail}")]
    InsufficientData {
        /// Stage that ran out of data ("split", "forecast", ...)
        stage: &'static str,
        detail: String,
    },

    /// Non-positive forecast horizon; caller error
    #[error("Invalid horizon: {0}")]
    InvalidHorizon(usize),

    /// A fitting strategy failed; consumed by the fallback cascade and
    /// never surfaced past the forecast engine
    #[error("Model fit failed ({model}): {reason}")]
    FitFailed { model: String, reason: String },

    /// Accuracy metrics requested for an empty test split
    #[error("Accuracy metrics are undefined for an empty test split")]
    MetricUndefined,

    /// The alert evaluator was invoked without a metrics bundle
    #[error("Missing input bundle: {0}")]
    MissingInputBundle(String),

    /// Error related to data validation or processing
    #[error("Data error: {0}")]
    DataError(String),

    /// Error related to forecasting operations
    #[error("Forecasting error: {0}")]
    ForecastingError(String),

    /// Error related to parameter validation
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Error from invalid parameters
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Error from IO operations
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Error from Polars operations
    #[error("Polars error: {0}")]
    PolarsError(String),

    /// Error from JSON serialization
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

/// Result type with our custom error
pub type Result<T> = std::result::Result<T, ForecastError>;

impl From<PolarsError> for ForecastError {
    fn from(err: PolarsError) -> Self {
        ForecastError::PolarsError(err.to_string())
    }
}

impl From<serde_json::Error> for ForecastError {
    fn from(err: serde_json::Error) -> Self {
        ForecastError::SerializationError(err.to_string())
    }
}
