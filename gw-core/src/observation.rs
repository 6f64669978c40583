use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Normalize a village name into its lookup key.
///
/// Village names in the monitoring data carry inconsistent casing and
/// padding, so every comparison goes through this key.
pub fn village_key(name: &str) -> String {
    name.trim().to_lowercase()
}

/// True when two village names refer to the same village.
pub fn same_village(a: &str, b: &str) -> bool {
    village_key(a) == village_key(b)
}

/// A single depth-to-water-level reading for a village.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Village name as displayed (trimmed, original casing)
    pub village: String,
    pub date: NaiveDate,
    /// Depth to water level in meters below the reference datum
    pub dtwl: f64,
}

impl Observation {
    pub fn new(village: &str, date: NaiveDate, dtwl: f64) -> Self {
        Observation {
            village: village.trim().to_string(),
            date,
            dtwl,
        }
    }
}
