/// Error types for the historical series store
use thiserror::Error;

/// Main error type for store operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Fewer than two observations exist for the village
    #[error("Insufficient history for village '{village}' (needed: 2, found: {found})")]
    InsufficientHistory { village: String, found: usize },

    /// SQLite operation failed
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Failed to parse CSV data
    #[error("Failed to parse CSV: {0}")]
    Csv(#[from] csv::Error),

    /// Failed to read input data
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The input CSV lacks a required column
    #[error("Missing required column: {0}")]
    MissingColumn(&'static str),

    /// A stored date could not be parsed
    #[error("Failed to parse date: {0}")]
    DateParse(String),

    /// A thread panicked while holding the connection
    #[error("Store connection lock poisoned")]
    Poisoned,
}

/// Type alias for Results using StoreError
pub type Result<T> = std::result::Result<T, StoreError>;
