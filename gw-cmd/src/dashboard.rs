//! Role-segmented dashboard assembly.

use crate::config::DashboardConfig;
use chrono::NaiveDate;
use gw_core::role::{Panel, PanelSource, Role};
use gw_data::export::{
    write_historical_csv, write_series_csv, SiteMetadata, FORECAST_COLUMN, HISTORICAL_COLUMN,
};
use gw_data::recharge::{mean_recharge, recharge_for_panel, RechargePoint};
use gw_data::series::DataPoint;
use gw_data::summary::{assess, summarize, LevelAlert, Summary};
use gw_db::models::VillageInfo;
use gw_db::Database;
use gw_forecast::{Forecaster, RegressionModel};
use serde::Serialize;
use std::fmt::Write as _;
use std::path::Path;

/// Everything shown for one panel of a dashboard.
#[derive(Debug, Clone, Serialize)]
pub struct PanelReport {
    pub panel: Panel,
    pub points: Vec<DataPoint>,
    pub summary: Option<Summary>,
    pub alert: Option<LevelAlert>,
    pub recharge: Vec<RechargePoint>,
    pub mean_recharge: Option<f64>,
    /// Set only for roles allowed to download data.
    pub export_file: Option<String>,
}

impl PanelReport {
    pub fn value_column(&self) -> &'static str {
        match self.panel.source {
            PanelSource::Historical => HISTORICAL_COLUMN,
            PanelSource::Forecast => FORECAST_COLUMN,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardReport {
    pub village: String,
    /// Location columns written ahead of exported historical readings.
    pub site: SiteMetadata,
    pub role: Role,
    pub critical_threshold_m: f64,
    pub panels: Vec<PanelReport>,
}

/// User-chosen windows; `None` falls back to the village history bounds
/// (past) or the configured forecast window (future).
#[derive(Debug, Clone, Copy, Default)]
pub struct Windows {
    pub past: Option<(NaiveDate, NaiveDate)>,
    pub future: Option<(NaiveDate, NaiveDate)>,
}

fn site_metadata(info: VillageInfo) -> SiteMetadata {
    SiteMetadata {
        state_ut: info.state_ut,
        district: info.district,
        block: info.block,
        village: info.village,
        latitude: info.latitude,
        longitude: info.longitude,
    }
}

/// Location columns for `village`; only the trimmed name when the store
/// does not know it.
pub(crate) fn site_for(store: &Database, village: &str) -> anyhow::Result<SiteMetadata> {
    Ok(match store.village_info(village)? {
        Some(info) => site_metadata(info),
        None => SiteMetadata {
            village: village.trim().to_string(),
            ..SiteMetadata::default()
        },
    })
}

/// Assemble the dashboard for `village` as seen by `role`.
///
/// Returns `None` when the store holds no readings at all for the village.
pub fn build_dashboard<M: RegressionModel + ?Sized>(
    store: &Database,
    forecaster: &Forecaster<'_, M>,
    config: &DashboardConfig,
    village: &str,
    role: Role,
    windows: Windows,
) -> anyhow::Result<Option<DashboardReport>> {
    let bounds = match store.date_bounds(village)? {
        Some(bounds) => bounds,
        None => {
            log::info!("dashboard: no data found for '{}'", village.trim());
            return Ok(None);
        }
    };
    let site = site_for(store, village)?;
    let display = site.village.clone();
    let past = windows.past.unwrap_or(bounds);
    let future = windows.future.unwrap_or_else(|| config.forecast_window());

    let mut panels = Vec::new();
    for panel in role.panels(past, future) {
        let points: Vec<DataPoint> = match panel.source {
            PanelSource::Historical => store
                .range_query(village, panel.start, panel.end)?
                .iter()
                .map(DataPoint::from)
                .collect(),
            PanelSource::Forecast => forecaster
                .forecast(village, panel.start, panel.end)?
                .into_iter()
                .map(|p| DataPoint::new(p.date, p.predicted_dtwl))
                .collect(),
        };
        let summary = summarize(&points);
        let alert = summary.map(|s| assess(s.min, config.critical_threshold_m));
        let recharge = recharge_for_panel(&points, panel.start, panel.end, config.resample_span_days);
        let mean = mean_recharge(&recharge);
        let export_file = if role.can_export() && !points.is_empty() {
            Some(panel.export_file_name(&display))
        } else {
            None
        };
        log::debug!(
            "dashboard: panel '{}' has {} points",
            panel.label,
            points.len()
        );
        panels.push(PanelReport {
            panel,
            points,
            summary,
            alert,
            recharge,
            mean_recharge: mean,
            export_file,
        });
    }

    Ok(Some(DashboardReport {
        village: display,
        site,
        role,
        critical_threshold_m: config.critical_threshold_m,
        panels,
    }))
}

/// Write each exportable panel's series into `dir`. Historical panels keep
/// the village's location columns. Returns the paths written.
pub fn export_panels(report: &DashboardReport, dir: &Path) -> anyhow::Result<Vec<String>> {
    std::fs::create_dir_all(dir)?;
    let mut written = Vec::new();
    for panel in &report.panels {
        if let Some(name) = &panel.export_file {
            let path = dir.join(name);
            let file = std::fs::File::create(&path)?;
            match panel.panel.source {
                PanelSource::Historical => {
                    write_historical_csv(file, &report.site, &panel.points)?
                }
                PanelSource::Forecast => {
                    write_series_csv(file, panel.value_column(), &panel.points)?
                }
            }
            written.push(path.display().to_string());
        }
    }
    log::info!("dashboard: exported {} panels", written.len());
    Ok(written)
}

/// Plain-text rendering of a dashboard.
pub fn render_text(report: &DashboardReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} Dashboard - {}", report.role, report.village);
    for p in &report.panels {
        let label = &p.panel.label;
        let _ = writeln!(out);
        let _ = writeln!(out, "{} Groundwater Levels", label);
        let summary = match &p.summary {
            Some(summary) => summary,
            None => {
                let _ = writeln!(out, "No data available for {}.", label);
                continue;
            }
        };
        match p.alert {
            Some(LevelAlert::Critical) => {
                let _ = writeln!(
                    out,
                    "Alert: Critical groundwater level! Minimum depth {:.2}m below threshold.",
                    summary.min
                );
            }
            _ => {
                let _ = writeln!(
                    out,
                    "Groundwater level within safe limits. Minimum depth {:.2}m.",
                    summary.min
                );
            }
        }
        for point in &p.points {
            let _ = writeln!(out, "  {}  {:.2}", point.date, point.value);
        }
        let _ = writeln!(out, "Summary ({}):", label);
        let _ = writeln!(out, "- Average Depth to Water Level: {:.2} m", summary.mean);
        let _ = writeln!(out, "- Minimum Depth to Water Level: {:.2} m", summary.min);
        let _ = writeln!(out, "- Maximum Depth to Water Level: {:.2} m", summary.max);
        match p.mean_recharge {
            Some(mean) => {
                let _ = writeln!(out, "Average Recharge ({}): {:.2} m", label, mean);
            }
            None => {
                let _ = writeln!(out, "No recharge data available for {}.", label);
            }
        }
    }
    out
}
