//! Convert raw monitoring text into the cleaned CSV the store loads.

use anyhow::Context;
use gw_core::raw_record::RawRecord;
use log::info;
use std::path::Path;

pub fn run_clean(input: &Path, output: &Path) -> anyhow::Result<()> {
    let text = std::fs::read_to_string(input)
        .with_context(|| format!("reading raw text {}", input.display()))?;
    let cleaned = RawRecord::parse_raw_text(&text);
    let file = std::fs::File::create(output)
        .with_context(|| format!("creating {}", output.display()))?;
    RawRecord::write_cleaned_csv(&cleaned.records, file)?;
    info!(
        "Clean complete. {} rows written to {}, {} lines skipped",
        cleaned.records.len(),
        output.display(),
        cleaned.skipped
    );
    println!(
        "Saved {} rows to {} ({} lines skipped)",
        cleaned.records.len(),
        output.display(),
        cleaned.skipped
    );
    Ok(())
}
