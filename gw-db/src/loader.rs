//! CSV data loading for populating the in-memory SQLite database.
//!
//! # CSV Format
//!
//! The cleaned monitoring CSV, with headers:
//! `STATE_UT,DISTRICT,BLOCK,VILLAGE,LATITUDE,LONGITUDE,Date,DTWL`
//!
//! Only `VILLAGE`, `Date` and `DTWL` are required; the other columns are
//! stored as village metadata when present. Column order does not matter.

use crate::error::{Result, StoreError};
use crate::Database;
use gw_core::observation::village_key;
use gw_utils::dates::{format_date, parse_date};
use rusqlite::params;
use std::collections::HashSet;
use std::path::Path;

/// Header positions of the columns the loader reads.
struct Columns {
    village: usize,
    date: usize,
    dtwl: usize,
    state_ut: Option<usize>,
    district: Option<usize>,
    block: Option<usize>,
    latitude: Option<usize>,
    longitude: Option<usize>,
}

impl Columns {
    fn resolve(headers: &csv::StringRecord) -> Result<Self> {
        let find = |name: &str| headers.iter().position(|h| h.trim() == name);
        let require = |name: &'static str| find(name).ok_or(StoreError::MissingColumn(name));
        Ok(Columns {
            village: require("VILLAGE")?,
            date: require("Date")?,
            dtwl: require("DTWL")?,
            state_ut: find("STATE_UT"),
            district: find("DISTRICT"),
            block: find("BLOCK"),
            latitude: find("LATITUDE"),
            longitude: find("LONGITUDE"),
        })
    }
}

/// Trimmed field at `index`; short rows read as empty.
fn field(r: &csv::StringRecord, index: usize) -> &str {
    r.get(index).unwrap_or("").trim()
}

fn optional_field(r: &csv::StringRecord, index: Option<usize>) -> Option<&str> {
    index.map(|i| field(r, i)).filter(|s| !s.is_empty())
}

impl Database {
    /// Load observations from the cleaned monitoring CSV string.
    ///
    /// Rows with an empty village, an unparseable date or a non-numeric DTWL
    /// are skipped. When a (village, date) pair repeats, the last row wins.
    /// Returns the number of rows stored.
    ///
    /// # Example CSV
    /// ```text
    /// STATE_UT,DISTRICT,BLOCK,VILLAGE,LATITUDE,LONGITUDE,Date,DTWL
    /// Tamil Nadu,Krishnagiri,Hosur,Bagalur,12.83,77.86,2019-11-05,7.45
    /// ```
    pub fn load_observations(&self, csv_data: &str) -> Result<usize> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(csv_data.as_bytes());

        let columns = Columns::resolve(rdr.headers()?)?;

        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        let mut seen: HashSet<(String, String)> = HashSet::new();
        let mut count = 0usize;
        let mut skipped = 0usize;
        let mut duplicates = 0usize;

        for result in rdr.records() {
            let r = result?;
            let village = field(&r, columns.village);
            if village.is_empty() {
                skipped += 1;
                continue;
            }
            let date = match parse_date(field(&r, columns.date)) {
                Ok(d) => format_date(&d),
                Err(_) => {
                    skipped += 1;
                    continue;
                }
            };
            let dtwl: f64 = match field(&r, columns.dtwl).parse::<f64>() {
                Ok(v) if v.is_finite() => v,
                _ => {
                    skipped += 1;
                    continue;
                }
            };
            let key = village_key(village);
            let latitude: Option<f64> =
                optional_field(&r, columns.latitude).and_then(|s| s.parse().ok());
            let longitude: Option<f64> =
                optional_field(&r, columns.longitude).and_then(|s| s.parse().ok());

            tx.execute(
                "INSERT OR IGNORE INTO villages
                 (village_key, village, state_ut, district, block, latitude, longitude)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    key,
                    village,
                    optional_field(&r, columns.state_ut),
                    optional_field(&r, columns.district),
                    optional_field(&r, columns.block),
                    latitude,
                    longitude
                ],
            )?;
            tx.execute(
                "INSERT OR REPLACE INTO observations (village_key, date, dtwl)
                 VALUES (?1, ?2, ?3)",
                params![key, date, dtwl],
            )?;
            if seen.insert((key, date)) {
                count += 1;
            } else {
                duplicates += 1;
            }
        }
        tx.commit()?;

        if duplicates > 0 {
            log::warn!(
                "loader: {} duplicate (village, date) rows replaced by later rows",
                duplicates
            );
        }
        log::info!(
            "loader: loaded {} observations, skipped {} invalid",
            count,
            skipped
        );
        Ok(count)
    }

    /// Load observations from a cleaned monitoring CSV file on disk.
    pub fn load_observations_from_path<P: AsRef<Path>>(&self, path: P) -> Result<usize> {
        let csv_data = std::fs::read_to_string(path.as_ref())?;
        log::debug!("loader: reading {}", path.as_ref().display());
        self.load_observations(&csv_data)
    }
}

#[cfg(test)]
mod tests {
    use crate::{Database, StoreError};

    #[test]
    fn load_observations_from_csv() {
        let db = Database::new().unwrap();
        let csv = "\
STATE_UT,DISTRICT,BLOCK,VILLAGE,LATITUDE,LONGITUDE,Date,DTWL
Tamil Nadu,Krishnagiri,Hosur,Bagalur,12.83,77.86,2019-11-05,7.45
Tamil Nadu,Krishnagiri,Hosur,Bagalur,12.83,77.86,2020-11-05,6.9
Tamil Nadu,Vellore,Katpadi,Sevur,12.97,79.13,2020-01-12,3.1
";
        let loaded = db.load_observations(csv).unwrap();
        assert_eq!(loaded, 3);

        let conn = db.conn.lock().unwrap();
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM observations", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 3);

        let district: String = conn
            .query_row(
                "SELECT district FROM villages WHERE village_key = 'bagalur'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(district, "Krishnagiri");
    }

    #[test]
    fn load_observations_minimal_columns_any_order() {
        let db = Database::new().unwrap();
        let csv = "\
DTWL,VILLAGE,Date
5.0,Albany,2023-01-01 00:00:00
5.5,Albany,2023-02-01 00:00:00
";
        assert_eq!(db.load_observations(csv).unwrap(), 2);
        let villages = db.villages().unwrap();
        assert_eq!(villages[0].village, "Albany");
        assert!(villages[0].district.is_none());
    }

    #[test]
    fn load_observations_skips_invalid_rows() {
        let db = Database::new().unwrap();
        let csv = "\
VILLAGE,Date,DTWL
Kolar,2020-01-01,4.0
Kolar,not-a-date,4.1
Kolar,2020-03-01,n/a
,2020-04-01,4.3
Kolar,2020-05-01,4.4
";
        assert_eq!(db.load_observations(csv).unwrap(), 2);
    }

    #[test]
    fn load_observations_skips_truncated_rows() {
        let db = Database::new().unwrap();
        let csv = "\
VILLAGE,Date,DTWL
Kolar,2020-01-01,4.0
Kolar,2020-02-01
Kolar
Kolar,2020-03-01,4.4
";
        assert_eq!(db.load_observations(csv).unwrap(), 2);
        let lags = db.seed_lags("kolar").unwrap();
        assert_eq!(lags.lag1, 4.4);
        assert_eq!(lags.lag2, 4.0);
    }

    #[test]
    fn load_observations_short_metadata_row_keeps_reading() {
        let db = Database::new().unwrap();
        let csv = "\
VILLAGE,Date,DTWL,STATE_UT,DISTRICT
Kolar,2020-01-01,4.0
";
        assert_eq!(db.load_observations(csv).unwrap(), 1);
        let villages = db.villages().unwrap();
        assert!(villages[0].state_ut.is_none());
        assert!(villages[0].district.is_none());
    }

    #[test]
    fn load_observations_last_duplicate_wins() {
        let db = Database::new().unwrap();
        let csv = "\
VILLAGE,Date,DTWL
Kolar,2020-01-01,4.0
kolar ,2020-01-01,4.8
";
        assert_eq!(db.load_observations(csv).unwrap(), 1);

        let conn = db.conn.lock().unwrap();
        let value: f64 = conn
            .query_row(
                "SELECT dtwl FROM observations WHERE village_key = 'kolar'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert!((value - 4.8).abs() < 1e-9);
    }

    #[test]
    fn load_observations_requires_columns() {
        let db = Database::new().unwrap();
        let err = db
            .load_observations("VILLAGE,Date\nKolar,2020-01-01\n")
            .unwrap_err();
        assert!(matches!(err, StoreError::MissingColumn("DTWL")));
    }
}
