//! The regression model capability consumed by the forecaster.

use crate::error::{ForecastError, Result};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;
use std::sync::Mutex;

/// A trained single-output regression model.
///
/// The forecaster only needs the ordered list of feature names the model
/// was fit on and a way to score one row laid out in that order. Identical
/// rows must yield identical predictions.
pub trait RegressionModel {
    /// Feature names in the order `predict` expects them.
    fn feature_names(&self) -> &[String];

    /// Score a single row whose values follow [`feature_names`](Self::feature_names).
    fn predict(&self, row: &[f64]) -> Result<f64>;
}

impl<M: RegressionModel + ?Sized> RegressionModel for &M {
    fn feature_names(&self) -> &[String] {
        (**self).feature_names()
    }

    fn predict(&self, row: &[f64]) -> Result<f64> {
        (**self).predict(row)
    }
}

/// A linear model read from a JSON artifact:
///
/// ```json
/// {
///   "feature_names": ["Year", "Month", "Lag1", "Lag2", "VILLAGE_Albany"],
///   "coefficients": [0.0, 0.01, 0.8, 0.15, -0.3],
///   "intercept": 0.25
/// }
/// ```
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct LinearModel {
    feature_names: Vec<String>,
    coefficients: Vec<f64>,
    intercept: f64,
}

impl LinearModel {
    /// Build a model from parts, validating the artifact shape.
    pub fn new(feature_names: Vec<String>, coefficients: Vec<f64>, intercept: f64) -> Result<Self> {
        let model = LinearModel {
            feature_names,
            coefficients,
            intercept,
        };
        model.validate()?;
        Ok(model)
    }

    /// Parse a JSON model artifact.
    pub fn from_json(json: &str) -> Result<Self> {
        let model: LinearModel = serde_json::from_str(json)?;
        model.validate()?;
        log::info!(
            "model: loaded linear model with {} features",
            model.feature_names.len()
        );
        Ok(model)
    }

    /// Read and parse a JSON model artifact from disk.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    fn validate(&self) -> Result<()> {
        if self.feature_names.len() != self.coefficients.len() {
            return Err(ForecastError::InvalidModel(format!(
                "{} feature names but {} coefficients",
                self.feature_names.len(),
                self.coefficients.len()
            )));
        }
        let mut seen = HashSet::new();
        for name in &self.feature_names {
            if !seen.insert(name.as_str()) {
                return Err(ForecastError::InvalidModel(format!(
                    "duplicate feature name '{}'",
                    name
                )));
            }
        }
        if !self.intercept.is_finite() || self.coefficients.iter().any(|c| !c.is_finite()) {
            return Err(ForecastError::InvalidModel(
                "non-finite coefficient".to_string(),
            ));
        }
        Ok(())
    }
}

impl RegressionModel for LinearModel {
    fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    fn predict(&self, row: &[f64]) -> Result<f64> {
        if row.len() != self.coefficients.len() {
            return Err(ForecastError::Model(format!(
                "expected {} features, got {}",
                self.coefficients.len(),
                row.len()
            )));
        }
        let dot: f64 = row
            .iter()
            .zip(&self.coefficients)
            .map(|(x, w)| x * w)
            .sum();
        Ok(self.intercept + dot)
    }
}

/// Serializes every prediction behind a mutex, for models that are not
/// safe to call from several threads at once.
pub struct SerializedModel<M> {
    feature_names: Vec<String>,
    inner: Mutex<M>,
}

impl<M: RegressionModel> SerializedModel<M> {
    pub fn new(model: M) -> Self {
        SerializedModel {
            feature_names: model.feature_names().to_vec(),
            inner: Mutex::new(model),
        }
    }
}

impl<M: RegressionModel> RegressionModel for SerializedModel<M> {
    fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    fn predict(&self, row: &[f64]) -> Result<f64> {
        let model = self
            .inner
            .lock()
            .map_err(|_| ForecastError::Model("model lock poisoned".to_string()))?;
        model.predict(row)
    }
}
