//! Dashboard and forecast settings, read from an optional JSON file.

use anyhow::Context;
use chrono::NaiveDate;
use gw_data::recharge::DEFAULT_RESAMPLE_SPAN_DAYS;
use gw_data::summary::DEFAULT_CRITICAL_THRESHOLD_M;
use gw_forecast::{ForecastOptions, UnknownVillagePolicy};
use serde::Deserialize;
use std::path::Path;

/// Settings shared by every command. Missing fields take their defaults.
///
/// ```json
/// {
///   "critical_threshold_m": 3.0,
///   "resample_span_days": 90,
///   "max_horizon_months": 120,
///   "unknown_village": "reject",
///   "forecast_start": "2025-01-01",
///   "forecast_end": "2026-12-31"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// A panel whose minimum depth falls below this is flagged critical.
    pub critical_threshold_m: f64,
    /// Panels spanning more days than this get monthly recharge sums.
    pub resample_span_days: i64,
    pub max_horizon_months: Option<usize>,
    pub unknown_village: UnknownVillagePolicy,
    /// Default forecast window for Policy Maker and Researcher dashboards.
    pub forecast_start: NaiveDate,
    pub forecast_end: NaiveDate,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        DashboardConfig {
            critical_threshold_m: DEFAULT_CRITICAL_THRESHOLD_M,
            resample_span_days: DEFAULT_RESAMPLE_SPAN_DAYS,
            max_horizon_months: None,
            unknown_village: UnknownVillagePolicy::default(),
            forecast_start: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap_or_default(),
            forecast_end: NaiveDate::from_ymd_opt(2026, 12, 31).unwrap_or_default(),
        }
    }
}

impl DashboardConfig {
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read the config file at `path`, or fall back to defaults when no path
    /// is given.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        match path {
            Some(path) => {
                let json = std::fs::read_to_string(path)
                    .with_context(|| format!("reading config {}", path.display()))?;
                let config = Self::from_json(&json)
                    .with_context(|| format!("parsing config {}", path.display()))?;
                log::info!("config: loaded {}", path.display());
                Ok(config)
            }
            None => Ok(Self::default()),
        }
    }

    pub fn forecast_options(&self) -> ForecastOptions {
        ForecastOptions {
            unknown_village: self.unknown_village,
            max_horizon: self.max_horizon_months,
        }
    }

    pub fn forecast_window(&self) -> (NaiveDate, NaiveDate) {
        (self.forecast_start, self.forecast_end)
    }
}
