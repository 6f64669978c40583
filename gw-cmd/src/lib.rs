//! Command implementations for the groundwater CLI.
//!
//! Provides subcommands for cleaning raw monitoring text, browsing village
//! history, forecasting depth to water level and rendering role-specific
//! dashboards.

use chrono::NaiveDate;
use clap::{Args, Subcommand};
use gw_core::role::Role;
use std::path::PathBuf;

pub mod clean;
pub mod config;
pub mod context;
pub mod dashboard;
pub mod query;

use config::DashboardConfig;
use context::{load_store, AppContext};
use dashboard::{build_dashboard, export_panels, render_text, Windows};

/// Inputs shared by every subcommand.
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Cleaned monitoring CSV (VILLAGE, Date, DTWL columns)
    #[arg(short = 'd', long, global = true, default_value = "dataset/monsoon_cleaned.csv")]
    pub data: PathBuf,

    /// JSON model artifact (feature_names, coefficients, intercept)
    #[arg(short = 'm', long, global = true, default_value = "models/model.json")]
    pub model: PathBuf,

    /// Optional JSON settings file
    #[arg(short = 'c', long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Convert raw whitespace-separated monitoring text into the cleaned CSV
    Clean {
        /// Raw text file (first line is a header)
        #[arg(short = 'i', long)]
        input: PathBuf,

        /// Output path for the cleaned CSV
        #[arg(short = 'o', long)]
        output: PathBuf,
    },

    /// List villages with history or known to the model
    Villages,

    /// Show recorded depth to water level for a village
    History {
        #[arg(short = 'v', long)]
        village: String,

        /// First date (YYYY-MM-DD), inclusive
        #[arg(long, value_parser = date_arg)]
        start: NaiveDate,

        /// Last date (YYYY-MM-DD), inclusive
        #[arg(long, value_parser = date_arg)]
        end: NaiveDate,

        /// Also write the series to this CSV file
        #[arg(long)]
        csv: Option<PathBuf>,
    },

    /// Forecast monthly depth to water level for a village
    Forecast {
        #[arg(short = 'v', long)]
        village: String,

        /// First date (YYYY-MM-DD); the first point is this month's end
        #[arg(long, value_parser = date_arg)]
        start: NaiveDate,

        /// Last date (YYYY-MM-DD), inclusive
        #[arg(long, value_parser = date_arg)]
        end: NaiveDate,

        /// Also write the forecast to this CSV file
        #[arg(long)]
        csv: Option<PathBuf>,
    },

    /// Render the dashboard for a village as seen by a role
    Dashboard {
        #[arg(short = 'v', long)]
        village: String,

        /// farmer, policy-maker or researcher
        #[arg(short = 'r', long)]
        role: Role,

        #[arg(long, value_parser = date_arg, requires = "past_end")]
        past_start: Option<NaiveDate>,

        #[arg(long, value_parser = date_arg, requires = "past_start")]
        past_end: Option<NaiveDate>,

        #[arg(long, value_parser = date_arg, requires = "future_end")]
        future_start: Option<NaiveDate>,

        #[arg(long, value_parser = date_arg, requires = "future_start")]
        future_end: Option<NaiveDate>,

        /// Write exportable panels as CSV files into this directory
        #[arg(long)]
        export_dir: Option<PathBuf>,

        /// Print the report as JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

fn date_arg(s: &str) -> Result<NaiveDate, String> {
    gw_utils::dates::parse_date(s).map_err(|e| e.to_string())
}

fn window(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Option<(NaiveDate, NaiveDate)> {
    start.zip(end)
}

pub fn run(global: GlobalArgs, command: Command) -> anyhow::Result<()> {
    let config = DashboardConfig::load(global.config.as_deref())?;
    match command {
        Command::Clean { input, output } => clean::run_clean(&input, &output),
        Command::Villages => {
            let ctx = AppContext::load(&global.data, &global.model, config)?;
            query::run_villages(&ctx)
        }
        Command::History {
            village,
            start,
            end,
            csv,
        } => {
            let store = load_store(&global.data)?;
            query::run_history(&store, &village, start, end, csv.as_deref())
        }
        Command::Forecast {
            village,
            start,
            end,
            csv,
        } => {
            let ctx = AppContext::load(&global.data, &global.model, config)?;
            query::run_forecast(&ctx, &village, start, end, csv.as_deref())
        }
        Command::Dashboard {
            village,
            role,
            past_start,
            past_end,
            future_start,
            future_end,
            export_dir,
            json,
        } => {
            let ctx = AppContext::load(&global.data, &global.model, config)?;
            let forecaster = ctx.forecaster()?;
            let windows = Windows {
                past: window(past_start, past_end),
                future: window(future_start, future_end),
            };
            let report = match build_dashboard(&ctx.store, &forecaster, &ctx.config, &village, role, windows)? {
                Some(report) => report,
                None => {
                    println!("No data found for this village.");
                    return Ok(());
                }
            };
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print!("{}", render_text(&report));
            }
            if let Some(dir) = export_dir {
                if role.can_export() {
                    for path in export_panels(&report, &dir)? {
                        println!("Exported {}", path);
                    }
                } else {
                    log::warn!("{} dashboards do not offer data downloads", role);
                }
            }
            Ok(())
        }
    }
}
