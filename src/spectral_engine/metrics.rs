//! Population statistics shared by the spectral consumers
//!
//! All helpers use population moments (divide by N, not N-1), matching how the
//! dashboard's reference numbers were produced.

use statrs::statistics::Statistics;

pub use crate::types::round_to;

/// Arithmetic mean of a series.
///
/// Returns NaN for an empty series; callers that need a defined value for the
/// empty case must check for it first.
pub fn population_mean(values: &[f64]) -> f64 {
    values.iter().mean()
}

/// Population standard deviation (divide by N).
///
/// Two-pass over the running mean, so a constant series gives exactly 0.
/// Returns NaN for an empty series.
pub fn population_std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    let mean = population_mean(values);
    let variance = values.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_population_mean() {
        assert!((population_mean(&[1.0, 2.0, 3.0, 4.0]) - 2.5).abs() < 1e-12);
    }

    #[test]
    fn test_population_std_dev_divides_by_n() {
        // Sample std dev of this series is ~2.138; population is exactly 2.0
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert!((population_std_dev(&values) - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_constant_series_has_exactly_zero_spread() {
        let values = [0.3717; 43];
        assert_eq!(population_mean(&values), 0.3717);
        assert_eq!(population_std_dev(&values), 0.0);
    }

    #[test]
    fn test_empty_series_is_nan() {
        assert!(population_mean(&[]).is_nan());
        assert!(population_std_dev(&[]).is_nan());
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(0.123_456, 4), 0.1235);
        assert_eq!(round_to(12.345, 1), 12.3);
        assert_eq!(round_to(0.876, 2), 0.88);
    }
}
