//! Fixed-width binning of continuous values into labelled categories.

use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};
use serde::Serialize;
use tracing::debug;

use crate::error::{Error, Result};

/// Edges of the house price categories, in thousands of dollars.
pub const PRICE_EDGES: [f64; 4] = [0.0, 200.0, 400.0, f64::INFINITY];

/// Labels of the house price categories.
pub const PRICE_LABELS: [&str; 3] = ["Low", "Medium", "High"];

/// Right-closed intervals `(edges[i], edges[i + 1]]`, each with a label.
#[derive(Debug, Clone, PartialEq)]
pub struct Bins {
    edges: Vec<f64>,
    labels: Vec<String>,
    include_lowest: bool,
}

/// How many values fell into one bin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BinCount {
    /// Bin label.
    pub label: String,
    /// Number of values in the bin.
    pub count: usize,
}

impl Bins {
    /// Build bins from strictly increasing edges and one label per interval.
    ///
    /// With `include_lowest` the first interval also contains its left edge.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if there are fewer than two edges,
    /// the edges are not strictly increasing, or the label count is not
    /// `edges.len() - 1`.
    pub fn new<S: Into<String>>(
        edges: Vec<f64>,
        labels: impl IntoIterator<Item = S>,
        include_lowest: bool,
    ) -> Result<Self> {
        let labels: Vec<String> = labels.into_iter().map(Into::into).collect();
        if edges.len() < 2 {
            return Err(Error::invalid_argument("binning needs at least two edges"));
        }
        if !edges.windows(2).all(|w| w[0] < w[1]) {
            return Err(Error::invalid_argument(format!(
                "bin edges must be strictly increasing: {edges:?}"
            )));
        }
        if labels.len() != edges.len() - 1 {
            return Err(Error::invalid_argument(format!(
                "{} edges need {} labels, got {}",
                edges.len(),
                edges.len() - 1,
                labels.len()
            )));
        }
        Ok(Self {
            edges,
            labels,
            include_lowest,
        })
    }

    /// The Low / Medium / High house price categories.
    #[must_use]
    pub fn price_categories() -> Self {
        Self {
            edges: PRICE_EDGES.to_vec(),
            labels: PRICE_LABELS.iter().map(ToString::to_string).collect(),
            include_lowest: true,
        }
    }

    /// Bin labels in interval order.
    #[must_use]
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Index of the bin holding `value`, or `None` if it falls outside every
    /// interval (or is NaN).
    #[must_use]
    pub fn assign(&self, value: f64) -> Option<usize> {
        if value.is_nan() {
            return None;
        }
        match self.edges.partition_point(|&e| e < value) {
            0 if self.include_lowest && value == self.edges[0] => Some(0),
            0 => None,
            i if i == self.edges.len() => None,
            i => Some(i - 1),
        }
    }

    /// Label of the bin holding `value`.
    #[must_use]
    pub fn label_of(&self, value: f64) -> Option<&str> {
        self.assign(value).map(|i| self.labels[i].as_str())
    }

    /// Assign every value to a bin.
    #[must_use]
    pub fn cut(&self, values: &[f64]) -> Vec<Option<usize>> {
        values.iter().map(|&v| self.assign(v)).collect()
    }

    /// Count assignments per bin, most populated first.
    ///
    /// Ties keep interval order; unbinned values are not counted.
    #[must_use]
    pub fn value_counts(&self, assignments: &[Option<usize>]) -> Vec<BinCount> {
        let mut counts = vec![0usize; self.labels.len()];
        for idx in assignments.iter().flatten() {
            counts[*idx] += 1;
        }
        let mut result: Vec<BinCount> = self
            .labels
            .iter()
            .zip(counts)
            .map(|(label, count)| BinCount {
                label: label.clone(),
                count,
            })
            .collect();
        result.sort_by(|a, b| b.count.cmp(&a.count));
        result
    }
}

/// Draw `count` normally distributed values from a generator seeded with `seed`.
///
/// # Errors
///
/// Returns [`Error::InvalidArgument`] if `std_dev` is not a positive finite
/// number. `Normal::new` alone accepts a negative `std_dev`.
pub fn normal_prices(count: usize, mean: f64, std_dev: f64, seed: u64) -> Result<Vec<f64>> {
    if !(std_dev.is_finite() && std_dev > 0.0) {
        return Err(Error::invalid_argument(format!(
            "std_dev must be positive, got {std_dev}"
        )));
    }
    let normal = Normal::new(mean, std_dev).map_err(|e| {
        Error::invalid_argument(format!("bad normal distribution ({mean}, {std_dev}): {e}"))
    })?;
    let mut rng = StdRng::seed_from_u64(seed);
    let values: Vec<f64> = normal.sample_iter(&mut rng).take(count).collect();
    debug!(count, mean, std_dev, seed, "Drew normal prices");
    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_price_categories_boundaries() {
        let bins = Bins::price_categories();
        assert_eq!(bins.label_of(0.0), Some("Low"));
        assert_eq!(bins.label_of(150.0), Some("Low"));
        assert_eq!(bins.label_of(200.0), Some("Low"));
        assert_eq!(bins.label_of(200.01), Some("Medium"));
        assert_eq!(bins.label_of(400.0), Some("Medium"));
        assert_eq!(bins.label_of(400.5), Some("High"));
        assert_eq!(bins.label_of(1e9), Some("High"));
    }

    #[test]
    fn test_values_outside_bins() {
        let bins = Bins::price_categories();
        assert_eq!(bins.assign(-0.01), None);
        assert_eq!(bins.assign(f64::NAN), None);
    }

    #[test]
    fn test_lowest_edge_excluded_without_include_lowest() {
        let bins = Bins::new(vec![0.0, 1.0, 2.0], ["a", "b"], false).unwrap();
        assert_eq!(bins.assign(0.0), None);
        assert_eq!(bins.assign(0.5), Some(0));
        assert_eq!(bins.assign(2.0), Some(1));
        assert_eq!(bins.assign(2.5), None);
    }

    #[test]
    fn test_invalid_bins_rejected() {
        assert!(Bins::new(vec![0.0], Vec::<String>::new(), true)
            .unwrap_err()
            .is_invalid_argument());
        assert!(Bins::new(vec![0.0, 2.0, 1.0], ["a", "b"], true)
            .unwrap_err()
            .is_invalid_argument());
        assert!(Bins::new(vec![0.0, 1.0, 1.0], ["a", "b"], true)
            .unwrap_err()
            .is_invalid_argument());
        assert!(Bins::new(vec![0.0, 1.0, 2.0], ["a"], true)
            .unwrap_err()
            .is_invalid_argument());
    }

    #[test]
    fn test_cut_and_value_counts() {
        let bins = Bins::price_categories();
        let values = [50.0, 250.0, 300.0, 350.0, 500.0, -5.0, 120.0];
        let assignments = bins.cut(&values);
        assert_eq!(
            assignments,
            vec![Some(0), Some(1), Some(1), Some(1), Some(2), None, Some(0)]
        );

        let counts = bins.value_counts(&assignments);
        let pairs: Vec<(&str, usize)> = counts.iter().map(|c| (c.label.as_str(), c.count)).collect();
        assert_eq!(pairs, vec![("Medium", 3), ("Low", 2), ("High", 1)]);
    }

    #[test]
    fn test_value_counts_ties_keep_interval_order() {
        let bins = Bins::price_categories();
        let counts = bins.value_counts(&[Some(2), Some(0)]);
        let labels: Vec<&str> = counts.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, vec!["Low", "High", "Medium"]);
    }

    #[test]
    fn test_normal_prices() {
        let prices = normal_prices(1000, 300.0, 100.0, 42).unwrap();
        assert_eq!(prices.len(), 1000);
        assert_eq!(prices, normal_prices(1000, 300.0, 100.0, 42).unwrap());

        let mean = crate::stats::mean(&prices).unwrap();
        assert!((mean - 300.0).abs() < 15.0, "mean {mean} far from 300");
    }

    #[test]
    fn test_normal_prices_bad_std_dev() {
        for std_dev in [-1.0, 0.0, f64::NAN, f64::INFINITY] {
            assert!(
                normal_prices(10, 300.0, std_dev, 42)
                    .unwrap_err()
                    .is_invalid_argument(),
                "std_dev {std_dev} accepted"
            );
        }
    }

    #[test]
    fn test_price_distribution_mostly_medium() {
        let bins = Bins::price_categories();
        let prices = normal_prices(1000, 300.0, 100.0, 42).unwrap();
        let counts = bins.value_counts(&bins.cut(&prices));
        assert_eq!(counts[0].label, "Medium");
    }
}
