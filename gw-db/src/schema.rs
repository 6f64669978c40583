//! SQL schema definitions for the in-memory SQLite database.
//!
//! The schema is applied as a single batch when the database is initialized.

/// Returns the full SQL schema as a single batch string.
///
/// This creates the following tables:
///
/// - `villages` - Village metadata keyed by the normalized village name
///   (display name, state, district, block, lat/lon)
/// - `observations` - Depth-to-water-level readings (village_key, date, dtwl in meters)
///
/// Dates are stored as `YYYY-MM-DD` text so lexical order is chronological.
/// The `(village_key, date)` primary key keeps at most one reading per
/// village and day.
pub fn create_schema() -> &'static str {
    r#"
    CREATE TABLE IF NOT EXISTS villages (
        village_key TEXT PRIMARY KEY,
        village TEXT NOT NULL,
        state_ut TEXT,
        district TEXT,
        block TEXT,
        latitude REAL,
        longitude REAL
    );

    CREATE TABLE IF NOT EXISTS observations (
        village_key TEXT NOT NULL,
        date TEXT NOT NULL,
        dtwl REAL NOT NULL,
        PRIMARY KEY (village_key, date)
    );
    CREATE INDEX IF NOT EXISTS idx_obs_village ON observations(village_key);
    CREATE INDEX IF NOT EXISTS idx_obs_date ON observations(date);
    "#
}
