//! Shared utility functions for the groundwater crates.

/// Date utility functions
pub mod dates {
    use chrono::{Datelike, Months, NaiveDate, NaiveDateTime};

    /// ISO calendar date, the format used in cleaned CSV files.
    pub const DATE_FORMAT: &str = "%Y-%m-%d";

    /// Timestamp format pandas-style exports sometimes carry.
    pub const DATE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

    /// Day-first two-digit-year format used by the raw monitoring text.
    pub const RAW_DATE_FORMAT: &str = "%d-%m-%y";

    /// Format a NaiveDate as "YYYY-MM-DD"
    pub fn format_date(date: &NaiveDate) -> String {
        date.format(DATE_FORMAT).to_string()
    }

    /// Parse a date string in "YYYY-MM-DD" format, tolerating a trailing
    /// "HH:MM:SS" time component.
    pub fn parse_date(s: &str) -> anyhow::Result<NaiveDate> {
        let s = s.trim();
        match NaiveDate::parse_from_str(s, DATE_FORMAT) {
            Ok(date) => Ok(date),
            Err(_) => Ok(NaiveDateTime::parse_from_str(s, DATE_TIME_FORMAT)?.date()),
        }
    }

    /// Parse a date string in "DD-MM-YY" format (raw monitoring text)
    pub fn parse_raw_date(s: &str) -> anyhow::Result<NaiveDate> {
        Ok(NaiveDate::parse_from_str(s.trim(), RAW_DATE_FORMAT)?)
    }

    /// Last calendar day of the month containing `date`.
    pub fn month_end(date: &NaiveDate) -> Option<NaiveDate> {
        let first = date.with_day(1)?;
        first.checked_add_months(Months::new(1))?.pred_opt()
    }

    /// Month end of the month after the one containing `date`.
    pub fn next_month_end(date: &NaiveDate) -> Option<NaiveDate> {
        let first = date.with_day(1)?.checked_add_months(Months::new(1))?;
        month_end(&first)
    }

    /// Whole days from `start` to `end`; negative when `end` precedes `start`.
    pub fn span_days(start: &NaiveDate, end: &NaiveDate) -> i64 {
        (*end - *start).num_days()
    }

}
