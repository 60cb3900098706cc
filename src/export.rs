//! Writing the last calculation out as a JSON file.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use crate::client::ResultSet;
use crate::defaults::Defaults;
use crate::scenario::Scenario;

/// Most recent successful calculation.
#[derive(Debug, Clone, PartialEq)]
pub struct LastCalculation {
    pub scenario: Scenario,
    pub results: ResultSet,
    pub explanation: String,
}

#[derive(Debug, Serialize)]
struct ExportRecord<'a> {
    timestamp: String,
    tab: &'a str,
    explanation: &'a str,
    results: &'a ResultSet,
}

pub fn export_file_name(scenario: Scenario, at: OffsetDateTime) -> String {
    let millis = at.unix_timestamp_nanos() / 1_000_000;
    format!("{}-{}-{}.json", Defaults::EXPORT_FILE_PREFIX, scenario.id(), millis)
}

/// Write `calc` to `<dir>/wireless-calculation-<tab>-<millis>.json`.
pub fn export_calculation(dir: &Path, calc: &LastCalculation, at: OffsetDateTime) -> Result<PathBuf> {
    let record = ExportRecord {
        timestamp: at.format(&Rfc3339).context("formatting export timestamp")?,
        tab: calc.scenario.id(),
        explanation: &calc.explanation,
        results: &calc.results,
    };

    fs::create_dir_all(dir).with_context(|| format!("creating directory {}", dir.display()))?;
    let path = dir.join(export_file_name(calc.scenario, at));
    let json = serde_json::to_string_pretty(&record)?;
    fs::write(&path, json).with_context(|| format!("writing {}", path.display()))?;
    Ok(path)
}
