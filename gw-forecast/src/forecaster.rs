//! Month-by-month autoregressive rollout.

use crate::error::{ForecastError, Result};
use crate::features::FeatureSchema;
use crate::model::RegressionModel;
use chrono::NaiveDate;
use gw_core::month_range::MonthEndRange;
use gw_db::models::SeedLags;
use gw_db::{Database, StoreError};
use serde::{Deserialize, Serialize};

/// What to do when the requested village has no one-hot indicator in the
/// model schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownVillagePolicy {
    /// Encode every indicator as zero and predict anyway.
    #[default]
    EncodeZeros,
    /// Fail with [`ForecastError::UnknownVillage`].
    Reject,
}

/// Per-forecaster settings.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ForecastOptions {
    pub unknown_village: UnknownVillagePolicy,
    /// Upper bound on the number of monthly steps in one request.
    pub max_horizon: Option<usize>,
}

/// One predicted month-end reading.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ForecastPoint {
    pub date: NaiveDate,
    pub predicted_dtwl: f64,
}

/// Produces monthly forecasts for a village by feeding each prediction back
/// in as the next step's `Lag1`.
///
/// Holds no state between calls; several threads may forecast through one
/// instance when the model is `Sync`.
pub struct Forecaster<'a, M: RegressionModel + ?Sized> {
    store: &'a Database,
    model: &'a M,
    schema: FeatureSchema,
    options: ForecastOptions,
}

impl<'a, M: RegressionModel + ?Sized> Forecaster<'a, M> {
    /// Bind a store and a model, validating the model's feature schema.
    ///
    /// A schema naming features the encoder cannot produce fails here with
    /// [`ForecastError::SchemaMismatch`]; it never fails per call.
    pub fn new(store: &'a Database, model: &'a M) -> Result<Self> {
        let schema = FeatureSchema::from_names(model.feature_names())?;
        log::debug!(
            "forecast: schema has {} features, {} villages",
            schema.names().len(),
            schema.vocabulary().len()
        );
        Ok(Forecaster {
            store,
            model,
            schema,
            options: ForecastOptions::default(),
        })
    }

    pub fn with_options(mut self, options: ForecastOptions) -> Self {
        self.options = options;
        self
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    pub fn options(&self) -> &ForecastOptions {
        &self.options
    }

    /// Forecast `village` at every month end within `[start, end]`.
    ///
    /// A village with fewer than two readings, or an inverted range, yields
    /// an empty vector.
    pub fn forecast(
        &self,
        village: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<ForecastPoint>> {
        let seed = match self.store.seed_lags(village) {
            Ok(seed) => seed,
            Err(StoreError::InsufficientHistory { village, found }) => {
                log::info!(
                    "forecast: '{}' has {} readings, nothing to forecast",
                    village,
                    found
                );
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };

        if !self.schema.knows_village(village) {
            match self.options.unknown_village {
                UnknownVillagePolicy::Reject => {
                    return Err(ForecastError::UnknownVillage(village.trim().to_string()))
                }
                UnknownVillagePolicy::EncodeZeros => log::warn!(
                    "forecast: '{}' is not in the model vocabulary, encoding all indicators as zero",
                    village.trim()
                ),
            }
        }

        let dates: Vec<NaiveDate> = MonthEndRange::new(start, end).collect();
        if let Some(limit) = self.options.max_horizon {
            if dates.len() > limit {
                return Err(ForecastError::HorizonTooLong {
                    steps: dates.len(),
                    limit,
                });
            }
        }

        log::debug!(
            "forecast: '{}' {}..{} seeded with lag1={} lag2={}",
            village.trim(),
            start,
            end,
            seed.lag1,
            seed.lag2
        );
        let points = self.rollout(village, seed, dates)?;
        log::info!(
            "forecast: produced {} points for '{}'",
            points.len(),
            village.trim()
        );
        Ok(points)
    }

    /// Run the recurrence from `seed` over `dates`, in the order given.
    ///
    /// After each step `lag2` takes the previous `lag1` and `lag1` takes the
    /// prediction. No clamping or correction is applied.
    pub fn rollout<I>(&self, village: &str, seed: SeedLags, dates: I) -> Result<Vec<ForecastPoint>>
    where
        I: IntoIterator<Item = NaiveDate>,
    {
        let SeedLags { mut lag1, mut lag2 } = seed;
        let mut points = Vec::new();
        for date in dates {
            let row = self.schema.encode(village, date, lag1, lag2);
            let features = self.schema.materialize(&row)?;
            let prediction = self.model.predict(&features)?;
            points.push(ForecastPoint {
                date,
                predicted_dtwl: prediction,
            });
            lag2 = lag1;
            lag1 = prediction;
        }
        Ok(points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::LinearModel;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn store() -> Database {
        let db = Database::new().unwrap();
        db.load_observations("VILLAGE,Date,DTWL\nKolar,2023-01-01,4.0\nKolar,2023-02-01,6.0\n")
            .unwrap();
        db
    }

    /// next = 0.5 * Lag1 + 0.5 * Lag2
    fn averaging_model() -> LinearModel {
        LinearModel::new(
            vec!["Lag1".into(), "Lag2".into(), "VILLAGE_Kolar".into()],
            vec![0.5, 0.5, 0.0],
            0.0,
        )
        .unwrap()
    }

    #[test]
    fn rollout_feeds_predictions_back() {
        let db = store();
        let model = averaging_model();
        let forecaster = Forecaster::new(&db, &model).unwrap();
        let points = forecaster
            .forecast("kolar", ymd(2023, 3, 1), ymd(2023, 5, 31))
            .unwrap();
        let values: Vec<f64> = points.iter().map(|p| p.predicted_dtwl).collect();
        // (6+4)/2 = 5, (5+6)/2 = 5.5, (5.5+5)/2 = 5.25
        assert_eq!(values, vec![5.0, 5.5, 5.25]);
        assert_eq!(points[2].date, ymd(2023, 5, 31));
    }

    #[test]
    fn horizon_limit_is_enforced() {
        let db = store();
        let model = averaging_model();
        let forecaster = Forecaster::new(&db, &model).unwrap().with_options(ForecastOptions {
            max_horizon: Some(2),
            ..ForecastOptions::default()
        });
        assert!(matches!(
            forecaster.forecast("Kolar", ymd(2023, 3, 1), ymd(2023, 5, 31)),
            Err(ForecastError::HorizonTooLong { steps: 3, limit: 2 })
        ));
        assert_eq!(
            forecaster
                .forecast("Kolar", ymd(2023, 3, 1), ymd(2023, 4, 30))
                .unwrap()
                .len(),
            2
        );
    }

    #[test]
    fn reject_policy_refuses_unknown_village() {
        let db = Database::new().unwrap();
        db.load_observations("VILLAGE,Date,DTWL\nHosur,2023-01-01,4.0\nHosur,2023-02-01,6.0\n")
            .unwrap();
        let model = averaging_model();
        let forecaster = Forecaster::new(&db, &model).unwrap().with_options(ForecastOptions {
            unknown_village: UnknownVillagePolicy::Reject,
            max_horizon: None,
        });
        match forecaster.forecast(" Hosur ", ymd(2023, 3, 1), ymd(2023, 5, 31)) {
            Err(ForecastError::UnknownVillage(v)) => assert_eq!(v, "Hosur"),
            other => panic!("expected UnknownVillage, got {:?}", other),
        }
    }

    #[test]
    fn short_history_is_empty_even_under_reject() {
        let db = Database::new().unwrap();
        db.load_observations("VILLAGE,Date,DTWL\nHosur,2023-01-01,4.0\n")
            .unwrap();
        let model = averaging_model();
        let forecaster = Forecaster::new(&db, &model).unwrap().with_options(ForecastOptions {
            unknown_village: UnknownVillagePolicy::Reject,
            max_horizon: None,
        });
        let points = forecaster
            .forecast("Hosur", ymd(2023, 3, 1), ymd(2023, 5, 31))
            .unwrap();
        assert!(points.is_empty());
    }

    #[test]
    fn schema_mismatch_is_fatal_at_construction() {
        let db = store();
        let model = LinearModel::new(vec!["Lag1".into(), "Rainfall".into()], vec![1.0, 1.0], 0.0)
            .unwrap();
        assert!(matches!(
            Forecaster::new(&db, &model),
            Err(ForecastError::SchemaMismatch { .. })
        ));
    }

    #[test]
    fn policy_deserializes_from_snake_case() {
        let policy: UnknownVillagePolicy = serde_json::from_str("\"reject\"").unwrap();
        assert_eq!(policy, UnknownVillagePolicy::Reject);
        let policy: UnknownVillagePolicy = serde_json::from_str("\"encode_zeros\"").unwrap();
        assert_eq!(policy, UnknownVillagePolicy::EncodeZeros);
    }
}
