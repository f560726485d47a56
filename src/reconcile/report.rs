use super::{DemographicComparison, DistributionPair};
use chrono::NaiveDate;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct DimensionReport {
    pub dimension: &'static str,
    pub census: super::CategoryDistribution,
    pub model: super::CategoryDistribution,
}

impl DimensionReport {
    fn from_pair(dimension: &'static str, pair: &DistributionPair) -> Self {
        Self {
            dimension,
            census: pair.census.clone(),
            model: pair.model.clone(),
        }
    }
}

/// Serializable view of a full comparison, for JSON output and tests.
#[derive(Debug, Clone, Serialize)]
pub struct ComparisonReport {
    pub generated_on: NaiveDate,
    pub observation_count: usize,
    pub race: DimensionReport,
    pub gender: DimensionReport,
    pub age: DimensionReport,
}

impl ComparisonReport {
    pub fn new(comparison: &DemographicComparison, generated_on: NaiveDate) -> Self {
        Self {
            generated_on,
            observation_count: comparison.observation_count,
            race: DimensionReport::from_pair("race", &comparison.race),
            gender: DimensionReport::from_pair("gender", &comparison.gender),
            age: DimensionReport::from_pair("age", &comparison.age),
        }
    }

    pub fn dimensions(&self) -> [&DimensionReport; 3] {
        [&self.race, &self.gender, &self.age]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reconcile::{CensusRaceCounts, ObservationRecord};

    fn sample_comparison() -> DemographicComparison {
        let counts = CensusRaceCounts {
            total_population: Some(1000),
            white: Some(500),
            black: Some(200),
            asian: Some(100),
            hispanic: Some(100),
        };
        let observations = [ObservationRecord {
            perceived_race: Some("White".to_string()),
            perceived_gender: Some("Male".to_string()),
            perceived_age: Some("Teen".to_string()),
        }];
        DemographicComparison::build(&counts, &observations).expect("comparison builds")
    }

    #[test]
    fn report_carries_all_three_dimensions_in_order() {
        let comparison = sample_comparison();
        let generated_on = NaiveDate::from_ymd_opt(2026, 8, 27).expect("valid date");
        let report = ComparisonReport::new(&comparison, generated_on);

        let names: Vec<_> = report
            .dimensions()
            .iter()
            .map(|dim| dim.dimension)
            .collect();
        assert_eq!(names, ["race", "gender", "age"]);
        assert_eq!(report.observation_count, 1);
        assert_eq!(report.generated_on, generated_on);
    }

    #[test]
    fn report_serializes_to_json() {
        let comparison = sample_comparison();
        let generated_on = NaiveDate::from_ymd_opt(2026, 8, 27).expect("valid date");
        let report = ComparisonReport::new(&comparison, generated_on);

        let json = serde_json::to_value(&report).expect("serializes");
        assert_eq!(json["observation_count"], 1);
        assert_eq!(json["race"]["dimension"], "race");
        assert_eq!(json["gender"]["census"][0]["label"], "Male");
        assert_eq!(json["gender"]["census"][0]["percent"], 49.5);
    }
}
