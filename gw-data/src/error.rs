/// Error types for series export
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DataError {
    /// Failed to write CSV data
    #[error("Failed to write CSV: {0}")]
    Csv(#[from] csv::Error),

    /// Underlying writer failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, DataError>;
