//! Typed query methods for retrieving village history from the database.
//!
//! Every village argument is matched case-insensitively and ignoring
//! surrounding whitespace, so `" albany "` finds `"Albany"`.

use crate::error::{Result, StoreError};
use crate::models::{SeedLags, VillageInfo};
use crate::Database;
use chrono::NaiveDate;
use gw_core::observation::{village_key, Observation};
use gw_utils::dates::{format_date, parse_date};
use rusqlite::{params, OptionalExtension};

fn to_date(s: &str) -> Result<NaiveDate> {
    parse_date(s).map_err(|e| StoreError::DateParse(format!("{}: {}", s, e)))
}

impl Database {
    /// All observations for `village` dated within `[start, end]` inclusive,
    /// ordered chronologically.
    ///
    /// Unknown villages and windows without readings (including inverted
    /// windows) yield an empty vector.
    pub fn range_query(
        &self,
        village: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Observation>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT v.village, o.date, o.dtwl
             FROM observations o
             INNER JOIN villages v ON o.village_key = v.village_key
             WHERE o.village_key = ?1 AND o.date >= ?2 AND o.date <= ?3
             ORDER BY o.date",
        )?;
        let raw_rows: Vec<(String, String, f64)> = stmt
            .query_map(
                params![village_key(village), format_date(&start), format_date(&end)],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
            )?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let mut rows = Vec::with_capacity(raw_rows.len());
        for (name, date, dtwl) in raw_rows {
            rows.push(Observation::new(&name, to_date(&date)?, dtwl));
        }
        log::debug!(
            "query: range_query '{}' {}..{} returned {} records",
            village.trim(),
            start,
            end,
            rows.len()
        );
        Ok(rows)
    }

    /// The two most recent readings for `village`.
    ///
    /// Fails with [`StoreError::InsufficientHistory`] when fewer than two
    /// readings exist, which includes villages the store has never seen.
    pub fn seed_lags(&self, village: &str) -> Result<SeedLags> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT dtwl FROM observations
             WHERE village_key = ?1
             ORDER BY date DESC
             LIMIT 2",
        )?;
        let latest: Vec<f64> = stmt
            .query_map(params![village_key(village)], |row| row.get(0))?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        match latest.as_slice() {
            [lag1, lag2] => Ok(SeedLags {
                lag1: *lag1,
                lag2: *lag2,
            }),
            _ => Err(StoreError::InsufficientHistory {
                village: village.trim().to_string(),
                found: latest.len(),
            }),
        }
    }

    /// Every village in the store with its metadata, sorted by display name.
    pub fn villages(&self) -> Result<Vec<VillageInfo>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT village, state_ut, district, block, latitude, longitude
             FROM villages
             ORDER BY village COLLATE NOCASE",
        )?;
        let rows = stmt
            .query_map([], |row| {
                Ok(VillageInfo {
                    village: row.get(0)?,
                    state_ut: row.get(1)?,
                    district: row.get(2)?,
                    block: row.get(3)?,
                    latitude: row.get(4)?,
                    longitude: row.get(5)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Metadata for `village` as stored, if the store knows it.
    pub fn village_info(&self, village: &str) -> Result<Option<VillageInfo>> {
        let conn = self.conn()?;
        let info = conn
            .query_row(
                "SELECT village, state_ut, district, block, latitude, longitude
                 FROM villages WHERE village_key = ?1",
                params![village_key(village)],
                |row| {
                    Ok(VillageInfo {
                        village: row.get(0)?,
                        state_ut: row.get(1)?,
                        district: row.get(2)?,
                        block: row.get(3)?,
                        latitude: row.get(4)?,
                        longitude: row.get(5)?,
                    })
                },
            )
            .optional()?;
        Ok(info)
    }

    /// Earliest and latest observation dates for `village`.
    pub fn date_bounds(&self, village: &str) -> Result<Option<(NaiveDate, NaiveDate)>> {
        let conn = self.conn()?;
        let (min, max): (Option<String>, Option<String>) = conn.query_row(
            "SELECT MIN(date), MAX(date) FROM observations WHERE village_key = ?1",
            params![village_key(village)],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;
        match (min, max) {
            (Some(min), Some(max)) => Ok(Some((to_date(&min)?, to_date(&max)?))),
            _ => Ok(None),
        }
    }
}
