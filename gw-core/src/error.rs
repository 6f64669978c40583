/// Error types for the groundwater core library
use thiserror::Error;

/// Main error type for core parsing and conversion operations
#[derive(Error, Debug)]
pub enum CoreError {
    /// Failed to read or write CSV data
    #[error("Failed to process CSV: {0}")]
    Csv(#[from] csv::Error),

    /// Underlying reader or writer failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Date parsing failed
    #[error("Failed to parse date: {0}")]
    DateParse(String),

    /// Invalid data format
    #[error("Invalid data format: {0}")]
    InvalidFormat(String),
}

/// Type alias for Results using CoreError
pub type Result<T> = std::result::Result<T, CoreError>;
