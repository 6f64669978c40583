//! End-to-end forecasting behaviour against an in-memory store and a model
//! stub that records every row it is asked to score.

use chrono::NaiveDate;
use gw_db::Database;
use gw_forecast::{Forecaster, RegressionModel, Result};
use std::sync::Mutex;

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// prediction = 0.9 * Lag1 + 0.05 * Lag2 + 0.01 * Month + VILLAGE_X
struct RecordingModel {
    names: Vec<String>,
    rows: Mutex<Vec<Vec<f64>>>,
}

impl RecordingModel {
    fn new() -> Self {
        RecordingModel {
            names: ["Year", "Month", "Lag1", "Lag2", "VILLAGE_X", "VILLAGE_Albany"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            rows: Mutex::new(Vec::new()),
        }
    }

    fn index(&self, name: &str) -> usize {
        self.names.iter().position(|n| n == name).unwrap()
    }

    fn rows(&self) -> Vec<Vec<f64>> {
        self.rows.lock().unwrap().clone()
    }
}

impl RegressionModel for RecordingModel {
    fn feature_names(&self) -> &[String] {
        &self.names
    }

    fn predict(&self, row: &[f64]) -> Result<f64> {
        self.rows.lock().unwrap().push(row.to_vec());
        Ok(0.9 * row[2] + 0.05 * row[3] + 0.01 * row[1] + row[4])
    }
}

fn store() -> Database {
    let db = Database::new().unwrap();
    db.load_observations(
        "\
VILLAGE,Date,DTWL
X,2023-01-01,5.0
X,2023-02-01,5.5
Y,2023-01-01,7.0
Z,2022-06-01,3.0
Z,2022-12-01,3.4
Albany,2021-01-01,8.0
Albany,2021-02-01,8.2
",
    )
    .unwrap();
    db
}

#[test]
fn scenario_a_first_step_uses_last_two_readings() {
    let db = store();
    let model = RecordingModel::new();
    let forecaster = Forecaster::new(&db, &model).unwrap();

    let points = forecaster
        .forecast("X", ymd(2023, 3, 1), ymd(2023, 5, 31))
        .unwrap();
    assert_eq!(points.len(), 3);

    let rows = model.rows();
    let first = &rows[0];
    assert_eq!(first[model.index("Lag1")], 5.5);
    assert_eq!(first[model.index("Lag2")], 5.0);
    assert_eq!(first[model.index("Year")], 2023.0);
    assert_eq!(first[model.index("Month")], 3.0);
    assert_eq!(first[model.index("VILLAGE_X")], 1.0);
    assert_eq!(first[model.index("VILLAGE_Albany")], 0.0);
}

#[test]
fn scenario_a_range_ending_before_month_end() {
    let db = store();
    let model = RecordingModel::new();
    let forecaster = Forecaster::new(&db, &model).unwrap();

    let points = forecaster
        .forecast("X", ymd(2023, 3, 1), ymd(2023, 5, 1))
        .unwrap();
    let dates: Vec<NaiveDate> = points.iter().map(|p| p.date).collect();
    assert_eq!(dates, vec![ymd(2023, 3, 31), ymd(2023, 4, 30)]);
}

#[test]
fn scenario_b_single_reading_yields_empty() {
    let db = store();
    let model = RecordingModel::new();
    let forecaster = Forecaster::new(&db, &model).unwrap();

    let points = forecaster
        .forecast("Y", ymd(2023, 3, 1), ymd(2024, 3, 1))
        .unwrap();
    assert!(points.is_empty());
    assert!(model.rows().is_empty());

    assert!(forecaster
        .forecast("Nowhere", ymd(2023, 3, 1), ymd(2024, 3, 1))
        .unwrap()
        .is_empty());
}

#[test]
fn scenario_c_unknown_village_encodes_all_zero() {
    let db = store();
    let model = RecordingModel::new();
    let forecaster = Forecaster::new(&db, &model).unwrap();

    let points = forecaster
        .forecast("Z", ymd(2023, 1, 1), ymd(2023, 2, 28))
        .unwrap();
    assert_eq!(points.len(), 2);
    for row in model.rows() {
        assert_eq!(row[model.index("VILLAGE_X")], 0.0);
        assert_eq!(row[model.index("VILLAGE_Albany")], 0.0);
    }
}

#[test]
fn scenario_d_padded_mixed_case_village_matches() {
    let db = store();
    let lags = db.seed_lags(" albany ").unwrap();
    assert_eq!((lags.lag1, lags.lag2), (8.2, 8.0));

    let model = RecordingModel::new();
    let forecaster = Forecaster::new(&db, &model).unwrap();
    forecaster
        .forecast(" albany ", ymd(2021, 3, 1), ymd(2021, 3, 31))
        .unwrap();
    let rows = model.rows();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0][model.index("VILLAGE_Albany")], 1.0);
}

#[test]
fn forecast_is_deterministic() {
    let db = store();
    let model = RecordingModel::new();
    let forecaster = Forecaster::new(&db, &model).unwrap();
    let first = forecaster
        .forecast("X", ymd(2023, 3, 1), ymd(2024, 2, 29))
        .unwrap();
    let second = forecaster
        .forecast("X", ymd(2023, 3, 1), ymd(2024, 2, 29))
        .unwrap();
    assert_eq!(first, second);
}

#[test]
fn dates_follow_monthly_grid() {
    let db = store();
    let model = RecordingModel::new();
    let forecaster = Forecaster::new(&db, &model).unwrap();
    let points = forecaster
        .forecast("X", ymd(2023, 11, 15), ymd(2024, 3, 31))
        .unwrap();
    let dates: Vec<NaiveDate> = points.iter().map(|p| p.date).collect();
    assert_eq!(
        dates,
        vec![
            ymd(2023, 11, 30),
            ymd(2023, 12, 31),
            ymd(2024, 1, 31),
            ymd(2024, 2, 29),
            ymd(2024, 3, 31),
        ]
    );
    assert!(dates.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn lags_propagate_between_steps() {
    let db = store();
    let model = RecordingModel::new();
    let forecaster = Forecaster::new(&db, &model).unwrap();
    let points = forecaster
        .forecast("X", ymd(2023, 3, 1), ymd(2023, 12, 31))
        .unwrap();
    let rows = model.rows();
    assert_eq!(rows.len(), points.len());

    let lag1 = model.index("Lag1");
    let lag2 = model.index("Lag2");
    for i in 0..points.len() - 1 {
        assert_eq!(rows[i + 1][lag1], points[i].predicted_dtwl);
        assert_eq!(rows[i + 1][lag2], rows[i][lag1]);
    }
}

#[test]
fn inverted_range_yields_empty() {
    let db = store();
    let model = RecordingModel::new();
    let forecaster = Forecaster::new(&db, &model).unwrap();
    let points = forecaster
        .forecast("X", ymd(2024, 6, 30), ymd(2024, 1, 1))
        .unwrap();
    assert!(points.is_empty());
    assert!(model.rows().is_empty());
}

#[test]
fn villages_forecast_in_parallel() {
    let db = store();
    let model = RecordingModel::new();
    let forecaster = Forecaster::new(&db, &model).unwrap();
    let start = ymd(2023, 3, 1);
    let end = ymd(2023, 8, 31);

    let sequential: Vec<_> = ["X", "Z", "Albany"]
        .iter()
        .map(|v| forecaster.forecast(v, start, end).unwrap())
        .collect();
    let parallel: Vec<_> = std::thread::scope(|s| {
        let handles: Vec<_> = ["X", "Z", "Albany"]
            .iter()
            .map(|v| {
                let forecaster = &forecaster;
                s.spawn(move || forecaster.forecast(v, start, end).unwrap())
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });
    assert_eq!(sequential, parallel);
}
