//! Data processing for groundwater depth series.
//!
//! Everything here is a pure function of a `(date, value)` series, whether
//! it came from the historical store or from a forecast: summary statistics,
//! the critical-level alert, recharge estimates and CSV export.

pub mod error;

/// The series shape shared by history and forecasts.
pub mod series {
    use chrono::NaiveDate;
    use gw_core::observation::Observation;
    use serde::Serialize;

    /// A single data point of a depth series (meters).
    #[derive(Debug, Clone, Copy, PartialEq, Serialize)]
    pub struct DataPoint {
        pub date: NaiveDate,
        pub value: f64,
    }

    impl DataPoint {
        pub fn new(date: NaiveDate, value: f64) -> Self {
            DataPoint { date, value }
        }
    }

    impl From<&Observation> for DataPoint {
        fn from(obs: &Observation) -> Self {
            DataPoint::new(obs.date, obs.dtwl)
        }
    }
}

/// Mean/min/max summaries and the critical-level alert.
pub mod summary {
    use crate::series::DataPoint;
    use serde::Serialize;

    /// Depth below which a panel is flagged, in meters.
    pub const DEFAULT_CRITICAL_THRESHOLD_M: f64 = 3.0;

    #[derive(Debug, Clone, Copy, PartialEq, Serialize)]
    pub struct Summary {
        pub count: usize,
        pub mean: f64,
        pub min: f64,
        pub max: f64,
    }

    /// Alert state of a series relative to the critical threshold.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
    pub enum LevelAlert {
        /// The minimum depth is below the threshold.
        Critical,
        Safe,
    }

    /// Summary statistics of a series; `None` when the series is empty.
    pub fn summarize(points: &[DataPoint]) -> Option<Summary> {
        if points.is_empty() {
            return None;
        }
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        let mut total = 0.0;
        for p in points {
            min = min.min(p.value);
            max = max.max(p.value);
            total += p.value;
        }
        Some(Summary {
            count: points.len(),
            mean: total / points.len() as f64,
            min,
            max,
        })
    }

    /// Compare a series minimum against `threshold`.
    pub fn assess(min: f64, threshold: f64) -> LevelAlert {
        if min < threshold {
            LevelAlert::Critical
        } else {
            LevelAlert::Safe
        }
    }

}

/// Recharge estimates: the drop in depth between consecutive readings.
pub mod recharge {
    use crate::series::DataPoint;
    use chrono::NaiveDate;
    use gw_core::month_range::MonthEndRange;
    use gw_utils::dates::{month_end, span_days};
    use serde::Serialize;
    use std::collections::BTreeMap;

    /// Requested span (days) above which recharge is summed per month.
    pub const DEFAULT_RESAMPLE_SPAN_DAYS: i64 = 90;

    /// Recharge attributed to a date; the first reading of a series has none.
    #[derive(Debug, Clone, Copy, PartialEq, Serialize)]
    pub struct RechargePoint {
        pub date: NaiveDate,
        pub recharge: Option<f64>,
    }

    /// Step-wise recharge, `previous - current`, after sorting by date.
    pub fn recharge(points: &[DataPoint]) -> Vec<RechargePoint> {
        let mut sorted = points.to_vec();
        sorted.sort_by_key(|p| p.date);
        let mut result = Vec::with_capacity(sorted.len());
        let mut previous: Option<f64> = None;
        for p in &sorted {
            result.push(RechargePoint {
                date: p.date,
                recharge: previous.map(|prev| prev - p.value),
            });
            previous = Some(p.value);
        }
        result
    }

    /// Monthly sums labelled by month end, covering every month from the
    /// first to the last point. Months without recharge sum to zero.
    pub fn resample_monthly(points: &[RechargePoint]) -> Vec<RechargePoint> {
        let (first, last) = match (points.iter().map(|p| p.date).min(), points.iter().map(|p| p.date).max()) {
            (Some(first), Some(last)) => (first, last),
            _ => return Vec::new(),
        };
        let mut sums: BTreeMap<NaiveDate, f64> = BTreeMap::new();
        for p in points {
            if let (Some(bucket), Some(r)) = (month_end(&p.date), p.recharge) {
                *sums.entry(bucket).or_insert(0.0) += r;
            }
        }
        let last_bucket = month_end(&last).unwrap_or(last);
        MonthEndRange::new(first, last_bucket)
            .map(|date| RechargePoint {
                date,
                recharge: Some(sums.get(&date).copied().unwrap_or(0.0)),
            })
            .collect()
    }

    /// Recharge for a dashboard panel covering `[start, end]`.
    ///
    /// Panels spanning more than `resample_span_days` are summed per month.
    pub fn recharge_for_panel(
        points: &[DataPoint],
        start: NaiveDate,
        end: NaiveDate,
        resample_span_days: i64,
    ) -> Vec<RechargePoint> {
        let steps = recharge(points);
        if span_days(&start, &end) > resample_span_days {
            resample_monthly(&steps)
        } else {
            steps
        }
    }

    /// Mean of the defined recharge values.
    pub fn mean_recharge(points: &[RechargePoint]) -> Option<f64> {
        let values: Vec<f64> = points.iter().filter_map(|p| p.recharge).collect();
        if values.is_empty() {
            None
        } else {
            Some(values.iter().sum::<f64>() / values.len() as f64)
        }
    }

}

/// CSV export of series.
pub mod export {
    use crate::error::Result;
    use crate::series::DataPoint;
    use gw_utils::dates::format_date;
    use serde::Serialize;
    use std::io::Write;

    /// Column name used for historical readings.
    pub const HISTORICAL_COLUMN: &str = "DTWL";

    /// Column name used for forecast values.
    pub const FORECAST_COLUMN: &str = "Predicted_DTWl";

    /// Write `points` as `Date,<value_column>` CSV.
    pub fn write_series_csv<W: Write>(
        writer: W,
        value_column: &str,
        points: &[DataPoint],
    ) -> Result<()> {
        let mut wtr = csv::Writer::from_writer(writer);
        wtr.write_record(["Date", value_column])?;
        for p in points {
            wtr.write_record([format_date(&p.date), p.value.to_string()])?;
        }
        wtr.flush()?;
        log::debug!("export: wrote {} rows of {}", points.len(), value_column);
        Ok(())
    }

    /// Location columns of the cleaned monitoring data, in file order.
    pub const SITE_COLUMNS: [&str; 6] =
        ["STATE_UT", "DISTRICT", "BLOCK", "VILLAGE", "LATITUDE", "LONGITUDE"];

    /// Where a historical series was measured.
    #[derive(Debug, Clone, Default, PartialEq, Serialize)]
    pub struct SiteMetadata {
        pub state_ut: Option<String>,
        pub district: Option<String>,
        pub block: Option<String>,
        pub village: String,
        pub latitude: Option<f64>,
        pub longitude: Option<f64>,
    }

    impl SiteMetadata {
        fn fields(&self) -> [String; 6] {
            let text = |v: &Option<String>| v.clone().unwrap_or_default();
            let number = |v: Option<f64>| v.map(|x| x.to_string()).unwrap_or_default();
            [
                text(&self.state_ut),
                text(&self.district),
                text(&self.block),
                self.village.clone(),
                number(self.latitude),
                number(self.longitude),
            ]
        }
    }

    /// Write historical readings in the cleaned monitoring layout:
    /// the site columns, then `Date,DTWL`.
    pub fn write_historical_csv<W: Write>(
        writer: W,
        site: &SiteMetadata,
        points: &[DataPoint],
    ) -> Result<()> {
        let mut wtr = csv::Writer::from_writer(writer);
        let mut header: Vec<&str> = SITE_COLUMNS.to_vec();
        header.extend(["Date", HISTORICAL_COLUMN]);
        wtr.write_record(&header)?;
        let site_fields = site.fields();
        for p in points {
            let mut record: Vec<String> = site_fields.to_vec();
            record.push(format_date(&p.date));
            record.push(p.value.to_string());
            wtr.write_record(&record)?;
        }
        wtr.flush()?;
        log::debug!("export: wrote {} historical rows for {}", points.len(), site.village);
        Ok(())
    }

}
