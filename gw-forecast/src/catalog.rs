//! The set of villages a user can pick from.

use crate::error::Result;
use crate::features::FeatureSchema;
use gw_core::observation::village_key;
use gw_db::Database;
use std::collections::BTreeMap;

/// Union of the villages with history in `store` and the villages the model
/// was fit on, deduplicated case-insensitively and sorted.
///
/// Store spellings take precedence over model spellings.
pub fn village_catalog(store: &Database, schema: &FeatureSchema) -> Result<Vec<String>> {
    let mut catalog: BTreeMap<String, String> = BTreeMap::new();
    for info in store.villages()? {
        catalog.insert(village_key(&info.village), info.village);
    }
    for name in schema.vocabulary() {
        catalog
            .entry(village_key(name))
            .or_insert_with(|| name.trim().to_string());
    }
    Ok(catalog.into_values().collect())
}
