//! Statistics Calculator Module
//! Descriptive statistics over CLTV values.

use serde::Serialize;
use statrs::statistics::Statistics;

/// Descriptive statistics for a set of values. All zeros when there are no values.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ValueSummary {
    pub count: usize,
    pub sum: f64,
    pub mean: f64,
    pub median: f64,
    pub std: f64,
    pub min: f64,
    pub max: f64,
    pub p05: f64,
    pub p95: f64,
}

pub struct StatsCalculator;

impl StatsCalculator {
    /// Mean of `values`, 0 for an empty slice.
    pub fn mean_or_zero(values: &[f64]) -> f64 {
        if values.is_empty() {
            0.0
        } else {
            values.mean()
        }
    }

    /// `numerator / denominator * 100`, 0 when the denominator is 0.
    pub fn percent(numerator: f64, denominator: f64) -> f64 {
        if denominator > 0.0 {
            numerator / denominator * 100.0
        } else {
            0.0
        }
    }

    /// Compute descriptive statistics for an array of values.
    pub fn compute_descriptive_stats(values: &[f64]) -> ValueSummary {
        let n = values.len();
        if n == 0 {
            return ValueSummary::default();
        }

        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        let median = if n % 2 == 0 {
            (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
        } else {
            sorted[n / 2]
        };

        // Sample standard deviation; a single value has none
        let std = if n > 1 { values.std_dev() } else { 0.0 };

        ValueSummary {
            count: n,
            sum: values.iter().sum(),
            mean: values.mean(),
            median,
            std,
            min: sorted[0],
            max: sorted[n - 1],
            p05: Self::percentile(&sorted, 5.0),
            p95: Self::percentile(&sorted, 95.0),
        }
    }

    /// Calculate percentile using linear interpolation (NumPy compatible).
    fn percentile(sorted_values: &[f64], p: f64) -> f64 {
        let n = sorted_values.len();
        if n == 0 {
            return 0.0;
        }
        if n == 1 {
            return sorted_values[0];
        }

        let rank = (p / 100.0) * (n - 1) as f64;
        let lower = rank.floor() as usize;
        let upper = (rank.ceil() as usize).min(n - 1);
        let frac = rank - lower as f64;

        if lower == upper {
            sorted_values[lower]
        } else {
            sorted_values[lower] * (1.0 - frac) + sorted_values[upper] * frac
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn empty_values_summarise_to_zero() {
        assert_eq!(
            StatsCalculator::compute_descriptive_stats(&[]),
            ValueSummary::default()
        );
        assert_eq!(StatsCalculator::mean_or_zero(&[]), 0.0);
    }

    #[test]
    fn summary_matches_hand_computed_values() {
        let s = StatsCalculator::compute_descriptive_stats(&[4.0, 1.0, 3.0, 2.0]);
        assert_eq!(s.count, 4);
        assert!(close(s.sum, 10.0));
        assert!(close(s.mean, 2.5));
        assert!(close(s.median, 2.5));
        assert!(close(s.min, 1.0));
        assert!(close(s.max, 4.0));
        // sample variance = 5/3
        assert!(close(s.std, (5.0f64 / 3.0).sqrt()));
        // rank 0.15 between 1 and 2
        assert!(close(s.p05, 1.15));
        assert!(close(s.p95, 3.85));
    }

    #[test]
    fn single_value_has_zero_spread() {
        let s = StatsCalculator::compute_descriptive_stats(&[7.0]);
        assert_eq!(s.std, 0.0);
        assert_eq!(s.p05, 7.0);
        assert_eq!(s.p95, 7.0);
    }

    #[test]
    fn percent_guards_zero_denominator() {
        assert_eq!(StatsCalculator::percent(5.0, 0.0), 0.0);
        assert!(close(StatsCalculator::percent(1.0, 4.0), 25.0));
    }
}
