//! Autoregressive groundwater level forecasting.
//!
//! A village's two most recent readings seed a month-by-month rollout: each
//! step encodes calendar year, month, the two lags and a one-hot village
//! indicator, asks an externally trained regression model for the next
//! depth, and feeds that prediction back in as the nearest lag.
//!
//! The model is consumed only through [`RegressionModel`]; the
//! [`LinearModel`] adapter reads a JSON coefficient artifact.

pub mod catalog;
pub mod error;
pub mod features;
pub mod forecaster;
pub mod model;

pub use error::{ForecastError, Result};
pub use features::{FeatureRow, FeatureSchema};
pub use forecaster::{ForecastOptions, ForecastPoint, Forecaster, UnknownVillagePolicy};
pub use model::{LinearModel, RegressionModel, SerializedModel};
