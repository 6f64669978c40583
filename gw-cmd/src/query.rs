//! Village listing, history and forecast queries.

use crate::context::AppContext;
use crate::dashboard::site_for;
use chrono::NaiveDate;
use gw_data::export::{write_historical_csv, write_series_csv, FORECAST_COLUMN};
use gw_data::series::DataPoint;
use gw_data::summary::summarize;
use gw_db::Database;
use gw_forecast::catalog::village_catalog;
use log::info;
use std::path::Path;

fn print_series(title: &str, points: &[DataPoint]) {
    println!("{}", title);
    if points.is_empty() {
        println!("No data available.");
        return;
    }
    for p in points {
        println!("  {}  {:.2}", p.date, p.value);
    }
    if let Some(s) = summarize(points) {
        println!(
            "Average {:.2} m, minimum {:.2} m, maximum {:.2} m",
            s.mean, s.min, s.max
        );
    }
}

fn maybe_export(csv: Option<&Path>, column: &str, points: &[DataPoint]) -> anyhow::Result<()> {
    if let Some(path) = csv {
        let file = std::fs::File::create(path)?;
        write_series_csv(file, column, points)?;
        info!("Wrote {} rows to {}", points.len(), path.display());
    }
    Ok(())
}

/// Print every selectable village: those with history plus those the model
/// knows.
pub fn run_villages(ctx: &AppContext) -> anyhow::Result<()> {
    let forecaster = ctx.forecaster()?;
    let catalog = village_catalog(&ctx.store, forecaster.schema())?;
    for village in &catalog {
        println!("{}", village);
    }
    info!("{} villages", catalog.len());
    Ok(())
}

pub fn run_history(
    store: &Database,
    village: &str,
    start: NaiveDate,
    end: NaiveDate,
    csv: Option<&Path>,
) -> anyhow::Result<()> {
    let points: Vec<DataPoint> = store
        .range_query(village, start, end)?
        .iter()
        .map(DataPoint::from)
        .collect();
    print_series(
        &format!("{} observations {}..{}", village.trim(), start, end),
        &points,
    );
    if let Some(path) = csv {
        let site = site_for(store, village)?;
        let file = std::fs::File::create(path)?;
        write_historical_csv(file, &site, &points)?;
        info!("Wrote {} rows to {}", points.len(), path.display());
    }
    Ok(())
}

pub fn run_forecast(
    ctx: &AppContext,
    village: &str,
    start: NaiveDate,
    end: NaiveDate,
    csv: Option<&Path>,
) -> anyhow::Result<()> {
    let forecaster = ctx.forecaster()?;
    let points: Vec<DataPoint> = forecaster
        .forecast(village, start, end)?
        .into_iter()
        .map(|p| DataPoint::new(p.date, p.predicted_dtwl))
        .collect();
    print_series(
        &format!("{} forecast {}..{}", village.trim(), start, end),
        &points,
    );
    maybe_export(csv, FORECAST_COLUMN, &points)
}
