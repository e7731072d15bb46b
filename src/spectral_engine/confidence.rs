//! Confidence Scorer - per-band stability proxy
//!
//! `confidence_band = clamp(100 - σ_band * 100, 0, 100)` with population σ.
//! Flatter bands score higher. This is a stability heuristic, not a
//! statistical estimate of correctness.

use crate::types::{Band, ConfidenceMap, SpectralSeries};

use super::metrics::{population_std_dev, round_to};

/// Confidence for one band's value sequence.
pub fn band_confidence(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    (100.0 - population_std_dev(values) * 100.0).clamp(0.0, 100.0)
}

/// Score every band of the scan.
///
/// Per-band values are clamped but not rounded; `overall` is the mean of the
/// four, rounded to 1 decimal. An empty scan scores zero everywhere.
pub fn score_confidence(series: &SpectralSeries) -> ConfidenceMap {
    let mut map = ConfidenceMap::default();
    if series.is_empty() {
        return map;
    }

    for band in Band::ALL {
        map.set(band, band_confidence(&series.band_values(band)));
    }

    let sum: f64 = Band::ALL.iter().map(|&b| map.get(b)).sum();
    map.overall = round_to(sum / Band::ALL.len() as f64, 1);
    map
}
