//! Geological Context Classifier
//!
//! Maps the scan's average fused and thermal readings onto a coarse terrain
//! label and a recommended sampling depth. The reported confidence is a
//! uniform draw from [0.70, 0.95] taken from a caller-supplied random source,
//! so tests can pin it with a seeded or mock generator.

use rand::Rng;
use rand_distr::Uniform;

use crate::types::{
    Band, ContextType, DepthRange, GeologicalContext, Location, SpectralSeries, CONTEXT_FEATURES,
};

use super::metrics::{population_mean, round_to};

/// Lower bound of the context confidence draw.
pub const CONFIDENCE_MIN: f64 = 0.70;

/// Upper bound of the context confidence draw.
pub const CONFIDENCE_MAX: f64 = 0.95;

const MINERALIZATION_FUSED_MIN: f64 = 0.6;
const MINERALIZATION_THERMAL_MIN: f64 = 0.5;
const SEDIMENTARY_FUSED_MAX: f64 = 0.4;
const SEDIMENTARY_THERMAL_MAX: f64 = 0.4;

/// Fused average above which the shallow depth range is recommended.
const SHALLOW_DEPTH_FUSED_MIN: f64 = 0.55;

/// Label a scan from its band averages.
///
/// NaN averages (empty scan) fail every comparison and land on
/// `MixedTerrain` / `Deep`.
pub fn classify_averages(fused_avg: f64, thermal_avg: f64) -> (ContextType, DepthRange) {
    let context_type =
        if fused_avg > MINERALIZATION_FUSED_MIN && thermal_avg > MINERALIZATION_THERMAL_MIN {
            ContextType::ActiveMineralization
        } else if fused_avg < SEDIMENTARY_FUSED_MAX && thermal_avg < SEDIMENTARY_THERMAL_MAX {
            ContextType::SedimentaryBasin
        } else {
            ContextType::MixedTerrain
        };

    let depth = if fused_avg > SHALLOW_DEPTH_FUSED_MIN {
        DepthRange::Shallow
    } else {
        DepthRange::Deep
    };

    (context_type, depth)
}

/// Draw the reported confidence, rounded to 2 decimals.
pub fn draw_confidence<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    let dist = Uniform::new_inclusive(CONFIDENCE_MIN, CONFIDENCE_MAX);
    round_to(rng.sample(dist), 2)
}

/// Interpret a scan.
///
/// `_location` is accepted for interface stability but does not take part in
/// the classification.
pub fn classify_context<R: Rng + ?Sized>(
    series: &SpectralSeries,
    _location: &Location,
    rng: &mut R,
) -> GeologicalContext {
    let fused_avg = population_mean(&series.fused_values());
    let thermal_avg = population_mean(&series.band_values(Band::Thermal));
    let (context_type, recommended_depth) = classify_averages(fused_avg, thermal_avg);

    GeologicalContext {
        context_type,
        confidence: draw_confidence(rng),
        features: CONTEXT_FEATURES,
        recommended_depth,
    }
}
