//! Query result model structs.

use serde::Serialize;

/// The two most recent readings of a village, used to seed a forecast.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SeedLags {
    /// Most recent reading (meters)
    pub lag1: f64,
    /// Second most recent reading (meters)
    pub lag2: f64,
}

/// Village metadata for selection lists and catalog output.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct VillageInfo {
    /// Display name, trimmed, casing as first seen in the data.
    pub village: String,
    pub state_ut: Option<String>,
    pub district: Option<String>,
    pub block: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}
