use super::distribution::CategoryDistribution;
use std::collections::HashMap;
use std::sync::OnceLock;

/// Model gender vocabulary; the census reference only covers the first two.
pub(crate) const GENDER_AXIS: [&str; 3] = ["Male", "Female", "Ambiguous"];

pub(crate) const AGE_AXIS: [&str; 5] = ["Child", "Teen", "Young Adult", "Middle-Aged", "Elderly"];

/// National gender split. External reference data, never derived from input.
pub(crate) fn census_gender_reference() -> CategoryDistribution {
    CategoryDistribution::from_pairs([("Male", 49.5), ("Female", 50.5)])
}

/// Official age-bracket percentages rolled up into the five coarse buckets
/// used for comparison. Baked in at authoring time, not read from the file.
pub(crate) fn census_age_reference() -> CategoryDistribution {
    CategoryDistribution::from_pairs([
        ("Child", 5.4),                   // under 5 years
        ("Teen", 16.0),                   // 5-17 years
        ("Young Adult", 9.2 + 13.6),      // 18-34 years
        ("Middle-Aged", 13.5 + 12.0),     // 35-54 years
        ("Elderly", 12.3 + 10.5 + 7.5),   // 55+ years
    ])
}

static AGE_BUCKET_TO_MODEL_LABEL: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();

/// Translates a census age bucket into the label the model dataset uses for
/// it. Only "Middle-Aged" is named differently ("Middle"); everything else
/// passes through unchanged.
pub(crate) fn model_age_label(census_bucket: &str) -> &str {
    age_bucket_map()
        .get(census_bucket)
        .copied()
        .unwrap_or(census_bucket)
}

fn age_bucket_map() -> &'static HashMap<&'static str, &'static str> {
    AGE_BUCKET_TO_MODEL_LABEL.get_or_init(|| {
        const BUCKET_TO_LABEL: &[(&str, &str)] = &[("Middle-Aged", "Middle")];

        let mut map = HashMap::with_capacity(BUCKET_TO_LABEL.len());
        for (bucket, label) in BUCKET_TO_LABEL {
            map.insert(*bucket, *label);
        }
        map
    })
}
