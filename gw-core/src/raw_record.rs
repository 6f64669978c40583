//! Parsing of the raw whitespace-separated monitoring text into cleaned rows.
//!
//! Each data line ends with four fields: latitude, longitude, a `dd-mm-yy`
//! date and the depth-to-water-level reading. Everything before them is
//! free text holding the state, district, block and village names.

use crate::error::Result;
use chrono::NaiveDate;
use gw_utils::dates::parse_raw_date;
use serde::{Deserialize, Serialize};
use std::io::Write;

/// Number of trailing numeric/date fields on every raw line.
const TRAILING_FIELDS: usize = 4;

/// Minimum number of leading text words (state needs two, village one).
const MIN_TEXT_FIELDS: usize = 2;

/// One cleaned monitoring row, serialized with the cleaned-CSV headers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    #[serde(rename = "STATE_UT")]
    pub state_ut: String,
    #[serde(rename = "DISTRICT")]
    pub district: String,
    #[serde(rename = "BLOCK")]
    pub block: String,
    #[serde(rename = "VILLAGE")]
    pub village: String,
    #[serde(rename = "LATITUDE")]
    pub latitude: f64,
    #[serde(rename = "LONGITUDE")]
    pub longitude: f64,
    #[serde(rename = "Date")]
    pub date: NaiveDate,
    #[serde(rename = "DTWL")]
    pub dtwl: f64,
}

/// Result of cleaning a raw text file.
#[derive(Debug, Default)]
pub struct CleanedText {
    pub records: Vec<RawRecord>,
    pub skipped: usize,
}

fn parse_decimal(token: &str) -> Option<f64> {
    if token.is_empty() || !token.chars().all(|c| c.is_ascii_digit() || c == '.') {
        return None;
    }
    token.parse::<f64>().ok()
}

fn parse_short_date(token: &str) -> Option<NaiveDate> {
    let bytes = token.as_bytes();
    let shaped = bytes.len() == 8
        && bytes[2] == b'-'
        && bytes[5] == b'-'
        && bytes
            .iter()
            .enumerate()
            .all(|(i, b)| i == 2 || i == 5 || b.is_ascii_digit());
    if !shaped {
        return None;
    }
    parse_raw_date(token).ok()
}

impl RawRecord {
    /// Parse a single raw data line, returning `None` when it does not match
    /// the expected layout.
    pub fn parse_line(line: &str) -> Option<RawRecord> {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.len() < TRAILING_FIELDS + MIN_TEXT_FIELDS {
            return None;
        }
        let (text, tail) = tokens.split_at(tokens.len() - TRAILING_FIELDS);
        let latitude = parse_decimal(tail[0])?;
        let longitude = parse_decimal(tail[1])?;
        let date = parse_short_date(tail[2])?;
        let dtwl = parse_decimal(tail[3])?;

        let state_ut = text[..2].join(" ");
        let block = text[text.len() - 2].to_string();
        let village = text[text.len() - 1].to_string();
        let district = if text.len() > 4 {
            text[2..text.len() - 2].join(" ")
        } else {
            String::new()
        };

        Some(RawRecord {
            state_ut,
            district,
            block,
            village,
            latitude,
            longitude,
            date,
            dtwl,
        })
    }

    /// Parse a whole raw text file. The first line is a header and is skipped.
    pub fn parse_raw_text(text: &str) -> CleanedText {
        let mut cleaned = CleanedText::default();
        for line in text.lines().skip(1) {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            match RawRecord::parse_line(line) {
                Some(record) => cleaned.records.push(record),
                None => {
                    log::debug!("raw_record: skipping unmatched line '{}'", line);
                    cleaned.skipped += 1;
                }
            }
        }
        log::info!(
            "raw_record: parsed {} rows, skipped {}",
            cleaned.records.len(),
            cleaned.skipped
        );
        cleaned
    }

    /// Write records as the cleaned CSV consumed by the store loader.
    pub fn write_cleaned_csv<W: Write>(records: &[RawRecord], writer: W) -> Result<()> {
        let mut wtr = csv::Writer::from_writer(writer);
        for record in records {
            wtr.serialize(record)?;
        }
        wtr.flush()?;
        Ok(())
    }
}
