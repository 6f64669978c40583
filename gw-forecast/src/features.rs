//! Feature row encoding and schema-ordered materialization.

use crate::error::{ForecastError, Result};
use chrono::{Datelike, NaiveDate};
use gw_core::observation::same_village;
use std::collections::BTreeMap;

pub const YEAR: &str = "Year";
pub const MONTH: &str = "Month";
pub const LAG1: &str = "Lag1";
pub const LAG2: &str = "Lag2";

/// Prefix of the one-hot village indicator features.
pub const VILLAGE_PREFIX: &str = "VILLAGE_";

const BASE_FEATURES: [&str; 4] = [YEAR, MONTH, LAG1, LAG2];

/// Named feature values for a single prediction step.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureRow {
    values: BTreeMap<String, f64>,
}

impl FeatureRow {
    pub fn insert(&mut self, name: impl Into<String>, value: f64) {
        self.values.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.values.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// A model's declared feature order, checked against what the encoder can
/// produce.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureSchema {
    names: Vec<String>,
    vocabulary: Vec<String>,
}

impl FeatureSchema {
    /// Validate a model's feature names.
    ///
    /// Every name must be one of `Year`, `Month`, `Lag1`, `Lag2` or a
    /// `VILLAGE_<name>` indicator. Anything else cannot be supplied at
    /// prediction time and is reported as [`ForecastError::SchemaMismatch`].
    pub fn from_names(names: &[String]) -> Result<Self> {
        let mut vocabulary = Vec::new();
        let mut missing = Vec::new();
        for name in names {
            if let Some(village) = name.strip_prefix(VILLAGE_PREFIX) {
                vocabulary.push(village.to_string());
            } else if !BASE_FEATURES.contains(&name.as_str()) {
                missing.push(name.clone());
            }
        }
        if !missing.is_empty() {
            return Err(ForecastError::SchemaMismatch { missing });
        }
        if !names.iter().any(|n| n == LAG1) {
            log::warn!("features: model schema has no {} feature; forecasts will not roll forward", LAG1);
        }
        Ok(FeatureSchema {
            names: names.to_vec(),
            vocabulary,
        })
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Villages the model was fit on, as spelled in the feature names.
    pub fn vocabulary(&self) -> &[String] {
        &self.vocabulary
    }

    /// True when `village` has a one-hot indicator in this schema.
    pub fn knows_village(&self, village: &str) -> bool {
        self.vocabulary.iter().any(|v| same_village(v, village))
    }

    /// Build the named feature values for one step.
    ///
    /// Each vocabulary village gets an indicator that is 1 for `village`
    /// and 0 otherwise, so an unknown village encodes as all zeros.
    pub fn encode(&self, village: &str, date: NaiveDate, lag1: f64, lag2: f64) -> FeatureRow {
        let mut row = FeatureRow::default();
        row.insert(YEAR, date.year() as f64);
        row.insert(MONTH, date.month() as f64);
        row.insert(LAG1, lag1);
        row.insert(LAG2, lag2);
        for v in &self.vocabulary {
            let hot = if same_village(v, village) { 1.0 } else { 0.0 };
            row.insert(format!("{}{}", VILLAGE_PREFIX, v), hot);
        }
        row
    }

    /// Lay `row` out in schema order. Fields the schema does not list are
    /// dropped; a schema field absent from `row` is a mismatch.
    pub fn materialize(&self, row: &FeatureRow) -> Result<Vec<f64>> {
        let mut values = Vec::with_capacity(self.names.len());
        let mut missing = Vec::new();
        for name in &self.names {
            match row.get(name) {
                Some(v) => values.push(v),
                None => missing.push(name.clone()),
            }
        }
        if missing.is_empty() {
            Ok(values)
        } else {
            Err(ForecastError::SchemaMismatch { missing })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2023, 3, 31).unwrap()
    }

    #[test]
    fn schema_collects_vocabulary() {
        let schema = FeatureSchema::from_names(&names(&[
            "VILLAGE_Albany",
            "Lag1",
            "Year",
            "VILLAGE_Kolar",
        ]))
        .unwrap();
        assert_eq!(schema.vocabulary().to_vec(), names(&["Albany", "Kolar"]));
        assert!(schema.knows_village(" KOLAR "));
        assert!(!schema.knows_village("Hosur"));
    }

    #[test]
    fn schema_rejects_unsupported_fields() {
        let err = FeatureSchema::from_names(&names(&["Year", "Rainfall", "Lag1", "Lag3"]))
            .unwrap_err();
        match err {
            ForecastError::SchemaMismatch { missing } => {
                assert_eq!(missing, names(&["Rainfall", "Lag3"]));
            }
            other => panic!("expected SchemaMismatch, got {:?}", other),
        }
    }

    #[test]
    fn encode_sets_single_hot_indicator() {
        let schema = FeatureSchema::from_names(&names(&[
            "Year", "Month", "Lag1", "Lag2", "VILLAGE_Albany", "VILLAGE_Kolar",
        ]))
        .unwrap();
        let row = schema.encode(" albany", date(), 5.5, 5.0);
        assert_eq!(row.get(YEAR), Some(2023.0));
        assert_eq!(row.get(MONTH), Some(3.0));
        assert_eq!(row.get(LAG1), Some(5.5));
        assert_eq!(row.get(LAG2), Some(5.0));
        assert_eq!(row.get("VILLAGE_Albany"), Some(1.0));
        assert_eq!(row.get("VILLAGE_Kolar"), Some(0.0));
    }

    #[test]
    fn encode_unknown_village_is_all_zero() {
        let schema = FeatureSchema::from_names(&names(&["Lag1", "VILLAGE_Albany", "VILLAGE_Kolar"]))
            .unwrap();
        let row = schema.encode("Hosur", date(), 1.0, 2.0);
        assert_eq!(row.get("VILLAGE_Albany"), Some(0.0));
        assert_eq!(row.get("VILLAGE_Kolar"), Some(0.0));
    }

    #[test]
    fn materialize_follows_schema_order_and_drops_extras() {
        let schema = FeatureSchema::from_names(&names(&["VILLAGE_Kolar", "Lag2", "Lag1", "Month"]))
            .unwrap();
        let row = schema.encode("Kolar", date(), 5.5, 5.0);
        assert_eq!(row.len(), 5);
        assert_eq!(schema.materialize(&row).unwrap(), vec![1.0, 5.0, 5.5, 3.0]);
    }

    #[test]
    fn materialize_reports_missing_fields() {
        let schema = FeatureSchema::from_names(&names(&["Lag1", "Lag2"])).unwrap();
        let mut row = FeatureRow::default();
        row.insert(LAG1, 1.0);
        match schema.materialize(&row) {
            Err(ForecastError::SchemaMismatch { missing }) => assert_eq!(missing, names(&["Lag2"])),
            other => panic!("expected SchemaMismatch, got {:?}", other),
        }
    }
}
