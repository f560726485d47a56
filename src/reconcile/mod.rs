//! Reconciles two fixed-schema demographic datasets onto a shared
//! percentage-per-category comparison schema across race, gender, and age.

pub mod census;
pub mod distribution;
pub mod observations;
mod reference;
pub mod report;

pub use census::{load_race_counts, load_race_counts_from_path, CensusRaceCounts};
pub use distribution::{CategoryDistribution, CategoryShare};
pub use observations::{load_observations, load_observations_from_path, ObservationRecord};
pub use report::{ComparisonReport, DimensionReport};

use observations::label_shares;
use serde::Serialize;
use std::io::Read;
use std::path::Path;

#[derive(Debug)]
pub enum ReconcileError {
    Io(std::io::Error),
    Csv(csv::Error),
    MissingTotalPopulationRow,
    MissingCensusCount { field: &'static str },
    ZeroTotalPopulation,
}

impl std::fmt::Display for ReconcileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReconcileError::Io(err) => write!(f, "failed to read dataset: {}", err),
            ReconcileError::Csv(err) => write!(f, "invalid CSV data: {}", err),
            ReconcileError::MissingTotalPopulationRow => {
                write!(f, "census table has no 'Total population' row")
            }
            ReconcileError::MissingCensusCount { field } => write!(
                f,
                "census count '{}' is missing or not a number; cannot compute percentages",
                field
            ),
            ReconcileError::ZeroTotalPopulation => {
                write!(f, "census 'Total population' is zero; cannot divide by it")
            }
        }
    }
}

impl std::error::Error for ReconcileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ReconcileError::Io(err) => Some(err),
            ReconcileError::Csv(err) => Some(err),
            ReconcileError::MissingTotalPopulationRow
            | ReconcileError::MissingCensusCount { .. }
            | ReconcileError::ZeroTotalPopulation => None,
        }
    }
}

impl From<std::io::Error> for ReconcileError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for ReconcileError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

/// Census and model distributions over the same dimension, in display order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistributionPair {
    pub census: CategoryDistribution,
    pub model: CategoryDistribution,
}

/// Census side: named subgroup counts over the whole-population denominator,
/// with "Mixed/Other" derived as the complement of the four named buckets so
/// it absorbs every census category not enumerated here. Model side: direct
/// label shares, with "Mixed/Other" merging the Mixed and Other labels while
/// East and South Asian stay separate for the stacked Asian slot.
pub fn race_distributions(
    counts: &CensusRaceCounts,
    observations: &[ObservationRecord],
) -> Result<DistributionPair, ReconcileError> {
    let total = require_count(counts.total_population, "Total population")?;
    if total == 0 {
        return Err(ReconcileError::ZeroTotalPopulation);
    }
    let total = total as f64;
    let white = require_count(counts.white, "White")? as f64;
    let black = require_count(counts.black, "Black or African American")? as f64;
    let asian = require_count(counts.asian, "Asian")? as f64;
    let hispanic = require_count(counts.hispanic, "Hispanic or Latino")? as f64;

    let census = CategoryDistribution::from_pairs([
        ("White", white / total * 100.0),
        ("Black", black / total * 100.0),
        ("Asian", asian / total * 100.0),
        ("Hispanic", hispanic / total * 100.0),
        (
            "Mixed/Other",
            100.0 - (white + black + asian + hispanic) / total * 100.0,
        ),
    ]);

    let shares = label_shares(
        observations
            .iter()
            .map(|record| record.perceived_race.as_deref()),
    );
    let share = |label: &str| shares.get(label).copied().unwrap_or(0.0);

    let model = CategoryDistribution::from_pairs([
        ("White", share("White")),
        ("Black", share("Black")),
        ("East Asian", share("East Asian")),
        ("South Asian", share("South Asian")),
        ("Hispanic", share("Hispanic")),
        ("Mixed/Other", share("Mixed") + share("Other")),
    ]);

    Ok(DistributionPair { census, model })
}

/// Census side is the fixed national split; model side covers the three-label
/// vocabulary with no complement bucket.
pub fn gender_distributions(observations: &[ObservationRecord]) -> DistributionPair {
    let shares = label_shares(
        observations
            .iter()
            .map(|record| record.perceived_gender.as_deref()),
    );

    let model = CategoryDistribution::from_pairs(
        reference::GENDER_AXIS
            .iter()
            .map(|label| (*label, shares.get(*label).copied().unwrap_or(0.0))),
    );

    DistributionPair {
        census: reference::census_gender_reference(),
        model,
    }
}

/// Census side is the fixed five-bucket rollup; model labels are translated
/// through the taxonomy map ("Middle" -> "Middle-Aged") before lookup.
pub fn age_distributions(observations: &[ObservationRecord]) -> DistributionPair {
    let shares = label_shares(
        observations
            .iter()
            .map(|record| record.perceived_age.as_deref()),
    );

    let model = CategoryDistribution::from_pairs(reference::AGE_AXIS.iter().map(|bucket| {
        let label = reference::model_age_label(bucket);
        (*bucket, shares.get(label).copied().unwrap_or(0.0))
    }));

    DistributionPair {
        census: reference::census_age_reference(),
        model,
    }
}

fn require_count(count: Option<u64>, field: &'static str) -> Result<u64, ReconcileError> {
    count.ok_or(ReconcileError::MissingCensusCount { field })
}

/// Strips byte-order marks and zero-width characters, collapses internal
/// whitespace, and lowercases, so census grouping labels match regardless of
/// the export's indentation.
pub(crate) fn normalize_label(value: &str) -> String {
    let cleaned = value.replace(['\u{feff}', '\u{200b}'], "");
    let collapsed = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed.to_ascii_lowercase()
}

/// The three parallel comparison pairs the report and chart layers consume.
#[derive(Debug, Clone, Serialize)]
pub struct DemographicComparison {
    pub race: DistributionPair,
    pub gender: DistributionPair,
    pub age: DistributionPair,
    pub observation_count: usize,
}

impl DemographicComparison {
    pub fn from_paths<P: AsRef<Path>, Q: AsRef<Path>>(
        census_path: P,
        observations_path: Q,
    ) -> Result<Self, ReconcileError> {
        let counts = load_race_counts_from_path(census_path)?;
        let observations = load_observations_from_path(observations_path)?;
        Self::build(&counts, &observations)
    }

    pub fn from_readers<C: Read, O: Read>(
        census: C,
        observations: O,
    ) -> Result<Self, ReconcileError> {
        let counts = load_race_counts(census)?;
        let observations = load_observations(observations)?;
        Self::build(&counts, &observations)
    }

    pub fn build(
        counts: &CensusRaceCounts,
        observations: &[ObservationRecord],
    ) -> Result<Self, ReconcileError> {
        Ok(Self {
            race: race_distributions(counts, observations)?,
            gender: gender_distributions(observations),
            age: age_distributions(observations),
            observation_count: observations.len(),
        })
    }
}
