use super::{normalize_label, ReconcileError};
use serde::Deserialize;
use std::io::Read;
use std::path::Path;

/// Population counts pulled from the census total-population row. Each count
/// is `None` when the source cell failed numeric parsing; callers decide
/// whether absence is fatal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CensusRaceCounts {
    pub total_population: Option<u64>,
    pub white: Option<u64>,
    pub black: Option<u64>,
    pub asian: Option<u64>,
    pub hispanic: Option<u64>,
}

/// Columns of interest in the wide census export. All other columns are
/// ignored. Trim::All on the reader also normalizes headers, so the export's
/// stray trailing spaces (e.g. "Hispanic or Latino ") still match.
#[derive(Debug, Deserialize)]
struct CensusCsvRow {
    #[serde(rename = "Label (Grouping)")]
    label: String,
    #[serde(rename = "Total population", default)]
    total_population: Option<String>,
    #[serde(rename = "White", default)]
    white: Option<String>,
    #[serde(rename = "Black or African American", default)]
    black: Option<String>,
    #[serde(rename = "Asian", default)]
    asian: Option<String>,
    #[serde(rename = "Hispanic or Latino", default)]
    hispanic: Option<String>,
}

pub fn load_race_counts_from_path<P: AsRef<Path>>(
    path: P,
) -> Result<CensusRaceCounts, ReconcileError> {
    let file = std::fs::File::open(path)?;
    load_race_counts(file)
}

/// Scans the census table for the single total-population row and extracts
/// its counts. A table without that row is unusable.
pub fn load_race_counts<R: Read>(reader: R) -> Result<CensusRaceCounts, ReconcileError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    for record in csv_reader.deserialize::<CensusCsvRow>() {
        let row = record?;
        if normalize_label(&row.label) != "total population" {
            continue;
        }

        return Ok(CensusRaceCounts {
            total_population: row.total_population.as_deref().and_then(parse_count),
            white: row.white.as_deref().and_then(parse_count),
            black: row.black.as_deref().and_then(parse_count),
            asian: row.asian.as_deref().and_then(parse_count),
            hispanic: row.hispanic.as_deref().and_then(parse_count),
        });
    }

    Err(ReconcileError::MissingTotalPopulationRow)
}

/// Best-effort count parsing: strips thousands separators and returns `None`
/// on anything that still fails to parse. Absence is not zero.
pub(crate) fn parse_count(raw: &str) -> Option<u64> {
    let cleaned = raw.trim().replace(',', "");
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<u64>().ok()
}
