//! Spectral Sample Synthesizer
//!
//! Produces the 43-point multi-band scan (400..=2500 nm, 50 nm step) for a
//! location and hour of day. Each band is a baseline that ramps with the
//! wavelength modulo a band-specific period:
//!
//! ```text
//! optical = (0.35 + (w mod 300) * 0.0004)  * seasonal(hour)
//! sar     = (0.22 + (w mod 200) * 0.0003)  * seasonal(hour)
//! thermal = (0.45 + (w mod 400) * 0.0002)  * (1 + 0.05 * sin(w / 1000))
//! gravity =  0.30 + (w mod 500) * 0.00015
//! seasonal(hour) = 1 + 0.1 * sin(2π * hour / 24)
//! ```
//!
//! The output depends only on `(wavelength, hour)`. The location is accepted
//! and carried through to the response but does not perturb the signal.

use std::f64::consts::PI;

use crate::types::{Location, SpectralPoint, SpectralSeries, READING_DECIMALS};

use super::metrics::round_to;

/// First wavelength of the scan (nm).
pub const WAVELENGTH_START_NM: u32 = 400;

/// Last wavelength of the scan, inclusive (nm).
pub const WAVELENGTH_END_NM: u32 = 2500;

/// Spacing between consecutive samples (nm).
pub const WAVELENGTH_STEP_NM: u32 = 50;

/// Number of points in a full scan.
pub const SCAN_LENGTH: usize =
    ((WAVELENGTH_END_NM - WAVELENGTH_START_NM) / WAVELENGTH_STEP_NM + 1) as usize;

/// Amplitude of the diurnal modulation on optical and SAR.
const SEASONAL_AMPLITUDE: f64 = 0.1;

/// Amplitude of the wavelength modulation on thermal.
const THERMAL_AMPLITUDE: f64 = 0.05;

/// Linear ramp that restarts every `period_nm`.
struct BandBaseline {
    base: f64,
    slope: f64,
    period_nm: u32,
}

impl BandBaseline {
    fn at(&self, wavelength_nm: u32) -> f64 {
        self.base + f64::from(wavelength_nm % self.period_nm) * self.slope
    }
}

const OPTICAL: BandBaseline = BandBaseline { base: 0.35, slope: 0.0004, period_nm: 300 };
const SAR: BandBaseline = BandBaseline { base: 0.22, slope: 0.0003, period_nm: 200 };
const THERMAL: BandBaseline = BandBaseline { base: 0.45, slope: 0.0002, period_nm: 400 };
const GRAVITY: BandBaseline = BandBaseline { base: 0.30, slope: 0.00015, period_nm: 500 };

/// Diurnal factor applied to optical and SAR.
pub fn seasonal_factor(hour: u32) -> f64 {
    1.0 + SEASONAL_AMPLITUDE * (2.0 * PI * f64::from(hour) / 24.0).sin()
}

/// Wavelength-dependent factor applied to thermal (argument in radians).
pub fn thermal_modulation(wavelength_nm: u32) -> f64 {
    1.0 + THERMAL_AMPLITUDE * (f64::from(wavelength_nm) / 1000.0).sin()
}

/// Wavelengths of a full scan, ascending.
pub fn scan_wavelengths() -> impl Iterator<Item = u32> {
    (WAVELENGTH_START_NM..=WAVELENGTH_END_NM).step_by(WAVELENGTH_STEP_NM as usize)
}

/// Synthesize one reading.
pub fn synthesize_point(wavelength_nm: u32, hour: u32) -> SpectralPoint {
    let seasonal = seasonal_factor(hour);

    SpectralPoint::new(
        wavelength_nm,
        round_to(OPTICAL.at(wavelength_nm) * seasonal, READING_DECIMALS),
        round_to(SAR.at(wavelength_nm) * seasonal, READING_DECIMALS),
        round_to(
            THERMAL.at(wavelength_nm) * thermal_modulation(wavelength_nm),
            READING_DECIMALS,
        ),
        round_to(GRAVITY.at(wavelength_nm), READING_DECIMALS),
    )
}

/// Synthesize the full scan for a location and UTC hour.
///
/// `_location` is intentionally unused: lat/lon/radius do not influence the
/// synthesized values. Whether location should perturb the signal is an open
/// product question; do not wire it in without one being decided.
pub fn synthesize(_location: &Location, hour: u32) -> SpectralSeries {
    SpectralSeries::new(
        scan_wavelengths()
            .map(|w| synthesize_point(w, hour))
            .collect(),
    )
}
