use super::ReconcileError;
use serde::{Deserialize, Deserializer};
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

/// One perceived-attribute judgment for one test subject. Blank cells
/// deserialize to `None` and stay out of that dimension's percentage base.
#[derive(Debug, Clone, Deserialize)]
pub struct ObservationRecord {
    #[serde(
        rename = "Perceived Race",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    pub perceived_race: Option<String>,
    #[serde(
        rename = "Perceived Gender",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    pub perceived_gender: Option<String>,
    #[serde(
        rename = "Perceived Age",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    pub perceived_age: Option<String>,
}

pub fn load_observations_from_path<P: AsRef<Path>>(
    path: P,
) -> Result<Vec<ObservationRecord>, ReconcileError> {
    let file = std::fs::File::open(path)?;
    load_observations(file)
}

pub fn load_observations<R: Read>(reader: R) -> Result<Vec<ObservationRecord>, ReconcileError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut records = Vec::new();

    for record in csv_reader.deserialize::<ObservationRecord>() {
        records.push(record?);
    }

    Ok(records)
}

/// Percentage of each distinct label over the non-missing observations of one
/// dimension. Every present label lands in the denominator, including ones no
/// named bucket will later pick up.
pub(crate) fn label_shares<'a, I>(labels: I) -> HashMap<String, f64>
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    let mut counts: HashMap<String, usize> = HashMap::new();
    let mut observed = 0usize;

    for label in labels.into_iter().flatten() {
        observed += 1;
        *counts.entry(label.to_string()).or_insert(0) += 1;
    }

    if observed == 0 {
        return HashMap::new();
    }

    counts
        .into_iter()
        .map(|(label, count)| (label, count as f64 / observed as f64 * 100.0))
        .collect()
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn blank_cells_deserialize_to_none() {
        let csv = "Perceived Race,Perceived Gender,Perceived Age\nWhite,,Teen\n,Male,\n";
        let records = load_observations(Cursor::new(csv)).expect("parse");
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].perceived_race.as_deref(), Some("White"));
        assert!(records[0].perceived_gender.is_none());
        assert_eq!(records[1].perceived_gender.as_deref(), Some("Male"));
        assert!(records[1].perceived_age.is_none());
    }

    #[test]
    fn label_shares_normalizes_over_non_missing() {
        let labels = [Some("White"), Some("White"), None, Some("Black")];
        let shares = label_shares(labels);
        assert_eq!(shares.len(), 2);
        assert!((shares["White"] - 66.666_666_666_666_67).abs() < 1e-9);
        assert!((shares["Black"] - 33.333_333_333_333_336).abs() < 1e-9);
    }

    #[test]
    fn label_shares_of_empty_input_is_empty() {
        assert!(label_shares([None, None]).is_empty());
        assert!(label_shares(std::iter::empty::<Option<&str>>()).is_empty());
    }

    #[test]
    fn missing_file_propagates_io_error() {
        let error = load_observations_from_path("./does-not-exist.csv")
            .expect_err("expected io error");
        assert!(matches!(error, ReconcileError::Io(_)));
    }
}
