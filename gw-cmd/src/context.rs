//! Explicit process context: the historical store, the model and the
//! settings, loaded once at startup and borrowed by every command.

use crate::config::DashboardConfig;
use anyhow::Context;
use gw_db::Database;
use gw_forecast::{Forecaster, LinearModel};
use std::path::Path;

pub struct AppContext {
    pub store: Database,
    pub model: LinearModel,
    pub config: DashboardConfig,
}

/// Create a store and load the cleaned monitoring CSV into it.
pub fn load_store(data_path: &Path) -> anyhow::Result<Database> {
    let store = Database::new()?;
    store
        .load_observations_from_path(data_path)
        .with_context(|| format!("loading observations from {}", data_path.display()))?;
    Ok(store)
}

pub fn load_model(model_path: &Path) -> anyhow::Result<LinearModel> {
    LinearModel::from_path(model_path)
        .with_context(|| format!("loading model from {}", model_path.display()))
}

impl AppContext {
    pub fn load(
        data_path: &Path,
        model_path: &Path,
        config: DashboardConfig,
    ) -> anyhow::Result<Self> {
        Ok(AppContext {
            store: load_store(data_path)?,
            model: load_model(model_path)?,
            config,
        })
    }

    /// A forecaster over this context, configured from the settings.
    pub fn forecaster(&self) -> anyhow::Result<Forecaster<'_, LinearModel>> {
        let forecaster = Forecaster::new(&self.store, &self.model)
            .context("model feature schema does not match the forecast encoder")?;
        Ok(forecaster.with_options(self.config.forecast_options()))
    }
}
