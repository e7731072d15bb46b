//! Spectral Data Types
//!
//! Per-wavelength band readings, anomaly records, band confidences and the
//! geological interpretation. Everything here is created fresh per analysis
//! request and never mutated after it is returned.

use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};

// ============================================================================
// Bands
// ============================================================================

/// One of the four raw signal channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Band {
    Optical,
    Sar,
    Thermal,
    Gravity,
}

impl Band {
    /// All bands in reporting order.
    pub const ALL: [Band; 4] = [Band::Optical, Band::Sar, Band::Thermal, Band::Gravity];

    /// Lowercase key used in the confidence map.
    pub fn key(self) -> &'static str {
        match self {
            Band::Optical => "optical",
            Band::Sar => "sar",
            Band::Thermal => "thermal",
            Band::Gravity => "gravity",
        }
    }

    /// Column label used in the serialized spectral series.
    pub fn label(self) -> &'static str {
        match self {
            Band::Optical => "Optical",
            Band::Sar => "SAR",
            Band::Thermal => "Thermal",
            Band::Gravity => "Gravity",
        }
    }

    /// Weight of this band in the fused value (before the fusion scale).
    pub fn fusion_weight(self) -> f64 {
        match self {
            Band::Optical | Band::Sar => 0.3,
            Band::Thermal | Band::Gravity => 0.2,
        }
    }
}

impl std::fmt::Display for Band {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// Scale applied to the weighted band sum to obtain the fused value.
pub const FUSION_SCALE: f64 = 1.3;

/// Decimal places kept for every band reading and the fused value.
pub const READING_DECIMALS: i32 = 4;

/// Round half away from zero to a fixed number of decimal places.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round() / scale
}

// ============================================================================
// Spectral Point / Series
// ============================================================================

/// One sample of the scan.
///
/// Band reflectances are conceptually in [0, 1] but are not clamped.
/// `fused` is not stored: it is always recomputed from the four bands.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpectralPoint {
    pub wavelength_nm: u32,
    pub optical: f64,
    pub sar: f64,
    pub thermal: f64,
    pub gravity: f64,
}

impl SpectralPoint {
    pub fn new(wavelength_nm: u32, optical: f64, sar: f64, thermal: f64, gravity: f64) -> Self {
        Self {
            wavelength_nm,
            optical,
            sar,
            thermal,
            gravity,
        }
    }

    /// Read a single band.
    pub fn band(&self, band: Band) -> f64 {
        match band {
            Band::Optical => self.optical,
            Band::Sar => self.sar,
            Band::Thermal => self.thermal,
            Band::Gravity => self.gravity,
        }
    }

    /// Weighted combination of the four bands, rounded to 4 decimals.
    ///
    /// `(0.3*optical + 0.3*sar + 0.2*thermal + 0.2*gravity) * 1.3`
    pub fn fused(&self) -> f64 {
        let weighted: f64 = Band::ALL
            .iter()
            .map(|&b| b.fusion_weight() * self.band(b))
            .sum();
        round_to(weighted * FUSION_SCALE, READING_DECIMALS)
    }
}

impl Serialize for SpectralPoint {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("SpectralPoint", 6)?;
        s.serialize_field("wavelength", &self.wavelength_nm)?;
        s.serialize_field("Optical", &self.optical)?;
        s.serialize_field("SAR", &self.sar)?;
        s.serialize_field("Thermal", &self.thermal)?;
        s.serialize_field("Gravity", &self.gravity)?;
        s.serialize_field("Fused", &self.fused())?;
        s.end()
    }
}

/// Ordered scan of spectral points, strictly increasing in wavelength.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct SpectralSeries(Vec<SpectralPoint>);

impl SpectralSeries {
    pub fn new(points: Vec<SpectralPoint>) -> Self {
        Self(points)
    }

    pub fn points(&self) -> &[SpectralPoint] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Values of one band across the whole scan.
    pub fn band_values(&self, band: Band) -> Vec<f64> {
        self.0.iter().map(|p| p.band(band)).collect()
    }

    /// Fused values across the whole scan.
    pub fn fused_values(&self) -> Vec<f64> {
        self.0.iter().map(SpectralPoint::fused).collect()
    }

    pub fn first(&self) -> Option<&SpectralPoint> {
        self.0.first()
    }

    pub fn last(&self) -> Option<&SpectralPoint> {
        self.0.last()
    }
}

// ============================================================================
// Anomalies
// ============================================================================

/// Anomaly severity, derived from the z-score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    /// z-score in (2, 3]
    Medium,
    /// z-score above 3
    High,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Medium => write!(f, "MEDIUM"),
            Severity::High => write!(f, "HIGH"),
        }
    }
}

/// A fused reading that deviates from the scan mean by more than 2 sigma.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Anomaly {
    /// Position in the series
    pub index: usize,
    /// Reconstructed from the index as `400 + index * 50`
    #[serde(rename = "wavelength")]
    pub wavelength_nm: u32,
    pub z_score: f64,
    /// The fused reading that triggered the anomaly
    pub value: f64,
    pub severity: Severity,
}

// ============================================================================
// Confidence
// ============================================================================

/// Stability-derived confidence per band, each in [0, 100].
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ConfidenceMap {
    pub optical: f64,
    pub sar: f64,
    pub thermal: f64,
    pub gravity: f64,
    /// Mean of the four bands, rounded to 1 decimal
    pub overall: f64,
}

impl ConfidenceMap {
    pub fn get(&self, band: Band) -> f64 {
        match band {
            Band::Optical => self.optical,
            Band::Sar => self.sar,
            Band::Thermal => self.thermal,
            Band::Gravity => self.gravity,
        }
    }

    pub(crate) fn set(&mut self, band: Band, value: f64) {
        match band {
            Band::Optical => self.optical = value,
            Band::Sar => self.sar = value,
            Band::Thermal => self.thermal = value,
            Band::Gravity => self.gravity = value,
        }
    }
}

// ============================================================================
// Geological Context
// ============================================================================

/// Coarse categorical interpretation of the scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContextType {
    #[serde(rename = "Active Mineralization Zone")]
    ActiveMineralization,
    #[serde(rename = "Sedimentary Basin")]
    SedimentaryBasin,
    #[serde(rename = "Mixed Terrain")]
    MixedTerrain,
}

impl std::fmt::Display for ContextType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContextType::ActiveMineralization => write!(f, "Active Mineralization Zone"),
            ContextType::SedimentaryBasin => write!(f, "Sedimentary Basin"),
            ContextType::MixedTerrain => write!(f, "Mixed Terrain"),
        }
    }
}

/// Recommended sampling depth band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DepthRange {
    #[serde(rename = "50-200m")]
    Shallow,
    #[serde(rename = "100-300m")]
    Deep,
}

impl std::fmt::Display for DepthRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DepthRange::Shallow => write!(f, "50-200m"),
            DepthRange::Deep => write!(f, "100-300m"),
        }
    }
}

/// Descriptive features attached to every interpretation.
pub const CONTEXT_FEATURES: [&str; 3] = ["Spectral coherence", "Thermal signature", "Gradient patterns"];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeologicalContext {
    #[serde(rename = "type")]
    pub context_type: ContextType,
    /// Randomized, in [0.70, 0.95]
    pub confidence: f64,
    pub features: [&'static str; 3],
    pub recommended_depth: DepthRange,
}
