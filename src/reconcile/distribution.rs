use serde::Serialize;

/// One category's slice of a distribution, as a percentage in [0, 100].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryShare {
    pub label: String,
    pub percent: f64,
}

/// An ordered mapping from category label to percentage. Order is display
/// order for reports and charts; the mapping is immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct CategoryDistribution {
    shares: Vec<CategoryShare>,
}

impl CategoryDistribution {
    pub fn from_pairs<I, L>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (L, f64)>,
        L: Into<String>,
    {
        let shares = pairs
            .into_iter()
            .map(|(label, percent)| CategoryShare {
                label: label.into(),
                percent,
            })
            .collect();
        Self { shares }
    }

    pub fn share(&self, label: &str) -> Option<f64> {
        self.shares
            .iter()
            .find(|share| share.label == label)
            .map(|share| share.percent)
    }

    /// Lookup with an explicit zero fallback: categories absent from the
    /// distribution contribute 0%, never a missing-key failure.
    pub fn share_or_zero(&self, label: &str) -> f64 {
        self.share(label).unwrap_or(0.0)
    }

    pub fn total(&self) -> f64 {
        self.shares.iter().map(|share| share.percent).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CategoryShare> {
        self.shares.iter()
    }

    pub fn len(&self) -> usize {
        self.shares.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shares.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn share_lookup_falls_back_to_zero() {
        let dist = CategoryDistribution::from_pairs([("Male", 49.5), ("Female", 50.5)]);
        assert_eq!(dist.share("Male"), Some(49.5));
        assert_eq!(dist.share("Ambiguous"), None);
        assert_eq!(dist.share_or_zero("Ambiguous"), 0.0);
    }

    #[test]
    fn total_sums_all_shares() {
        let dist = CategoryDistribution::from_pairs([("A", 25.0), ("B", 25.0), ("C", 50.0)]);
        assert!((dist.total() - 100.0).abs() < 1e-9);
    }

    #[test]
    fn preserves_insertion_order() {
        let dist = CategoryDistribution::from_pairs([("B", 1.0), ("A", 2.0)]);
        let labels: Vec<_> = dist.iter().map(|share| share.label.as_str()).collect();
        assert_eq!(labels, ["B", "A"]);
    }
}
