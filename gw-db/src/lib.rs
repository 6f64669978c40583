//! In-memory SQLite store for historical village groundwater observations.
//!
//! The store is loaded once from the cleaned monitoring CSV at startup and is
//! read-only afterwards. It answers the two questions the forecaster and the
//! dashboards ask of the history: "what was observed in this window" and
//! "what were the last two readings".
//!
//! # Usage
//!
//! ```rust
//! use chrono::NaiveDate;
//! use gw_db::Database;
//!
//! let db = Database::new().unwrap();
//! db.load_observations("VILLAGE,Date,DTWL\nAlbany,2023-01-01,5.0\nAlbany,2023-02-01,5.5\n").unwrap();
//!
//! let lags = db.seed_lags(" albany ").unwrap();
//! assert_eq!(lags.lag1, 5.5);
//!
//! let start = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
//! let end = NaiveDate::from_ymd_opt(2023, 12, 31).unwrap();
//! assert_eq!(db.range_query("Albany", start, end).unwrap().len(), 2);
//! ```
//!
//! # Tables
//!
//! See [`schema::create_schema`] for the full SQL schema.

pub mod error;
mod loader;
pub mod models;
mod queries;
pub mod schema;

pub use error::{Result, StoreError};

use rusqlite::Connection;
use std::sync::{Arc, Mutex, MutexGuard};

/// In-memory SQLite database holding every village observation.
///
/// Cheaply cloneable (via `Arc`) and shareable across threads; the mutex only
/// serializes access to the single SQLite connection.
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    /// Create a new in-memory database with the full schema applied.
    ///
    /// The database is empty after creation; use the `load_*` methods
    /// to populate it with CSV data.
    pub fn new() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(schema::create_schema())?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| StoreError::Poisoned)
    }
}
