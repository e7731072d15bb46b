//! Anomaly Detector - z-score screening of the fused band
//!
//! ```text
//! z_i   = |x_i - μ| / (σ + 1e-6)        (population μ, σ)
//! flag  : z_i > 2.0  -> Anomaly (HIGH if z_i > 3.0, else MEDIUM)
//! score : 100 * count(z_i > 1.5) / N    (clamped to [0, 100], 1 decimal)
//! ```
//!
//! The detection threshold (2.0) and the scoring threshold (1.5) are distinct.

use crate::types::Anomaly;
use crate::types::Severity;

use super::metrics::{population_mean, population_std_dev, round_to};
use super::synthesizer::{WAVELENGTH_START_NM, WAVELENGTH_STEP_NM};

/// Added to σ so a zero-variance series yields z = 0 instead of NaN.
pub const SIGMA_EPSILON: f64 = 1e-6;

/// Points above this z-score are reported as anomalies.
pub const DETECTION_Z: f64 = 2.0;

/// Anomalies above this z-score are HIGH severity.
pub const HIGH_SEVERITY_Z: f64 = 3.0;

/// Points above this z-score count towards the anomaly score.
pub const SCORING_Z: f64 = 1.5;

/// Output of a detection pass.
#[derive(Debug, Clone, PartialEq)]
pub struct AnomalyReport {
    /// Share of points beyond [`SCORING_Z`], percent, 1 decimal
    pub anomaly_score: f64,
    /// All anomalies in ascending index order
    pub anomalies: Vec<Anomaly>,
}

impl AnomalyReport {
    fn empty() -> Self {
        Self {
            anomaly_score: 0.0,
            anomalies: Vec::new(),
        }
    }
}

/// Severity for a z-score that has already passed [`DETECTION_Z`].
pub fn classify_severity(z_score: f64) -> Severity {
    if z_score > HIGH_SEVERITY_Z {
        Severity::High
    } else {
        Severity::Medium
    }
}

/// Epsilon-guarded absolute z-scores of a series.
pub fn z_scores(values: &[f64]) -> Vec<f64> {
    if values.is_empty() {
        return Vec::new();
    }
    let mean = population_mean(values);
    let sigma = population_std_dev(values);
    values
        .iter()
        .map(|v| (v - mean).abs() / (sigma + SIGMA_EPSILON))
        .collect()
}

/// Wavelength of the `index`-th scan position.
///
/// Derived from the position, not read from the point: the two agree only
/// because the scan is evenly spaced from 400 nm.
fn wavelength_for_index(index: usize) -> u32 {
    let index = u32::try_from(index).unwrap_or(u32::MAX);
    WAVELENGTH_START_NM.saturating_add(index.saturating_mul(WAVELENGTH_STEP_NM))
}

/// Screen a series of fused readings for statistical outliers.
pub fn detect_anomalies(values: &[f64]) -> AnomalyReport {
    if values.is_empty() {
        return AnomalyReport::empty();
    }

    let z = z_scores(values);

    let anomalies: Vec<Anomaly> = values
        .iter()
        .zip(&z)
        .enumerate()
        .filter_map(|(index, (&value, &z_score))| {
            (z_score > DETECTION_Z).then(|| Anomaly {
                index,
                wavelength_nm: wavelength_for_index(index),
                z_score,
                value,
                severity: classify_severity(z_score),
            })
        })
        .collect();

    let elevated = z.iter().filter(|&&z_score| z_score > SCORING_Z).count();
    let share = 100.0 * elevated as f64 / values.len() as f64;

    AnomalyReport {
        anomaly_score: round_to(share.clamp(0.0, 100.0), 1),
        anomalies,
    }
}
