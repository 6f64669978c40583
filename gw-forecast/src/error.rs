//! Error types for the forecasting crate.

use gw_db::StoreError;
use thiserror::Error;

/// Result type alias for forecast operations.
pub type Result<T> = std::result::Result<T, ForecastError>;

/// Errors that can occur while configuring or running a forecast.
#[derive(Error, Debug)]
pub enum ForecastError {
    /// The model's feature schema names fields the encoder cannot produce.
    #[error("feature schema mismatch: cannot supply {missing:?}")]
    SchemaMismatch { missing: Vec<String> },

    /// The village is not part of the model's one-hot vocabulary.
    #[error("village '{0}' is unknown to the model")]
    UnknownVillage(String),

    /// The requested range needs more steps than the configured cap.
    #[error("forecast horizon of {steps} months exceeds the limit of {limit}")]
    HorizonTooLong { steps: usize, limit: usize },

    /// The model artifact is malformed.
    #[error("invalid model artifact: {0}")]
    InvalidModel(String),

    /// The model failed to produce a prediction.
    #[error("model prediction failed: {0}")]
    Model(String),

    /// The historical store failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The model artifact is not valid JSON.
    #[error("failed to parse model artifact: {0}")]
    Json(#[from] serde_json::Error),

    /// The model artifact could not be read.
    #[error("failed to read model artifact: {0}")]
    Io(#[from] std::io::Error),
}
