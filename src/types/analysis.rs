//! Analysis Request / Response Types
//!
//! The geographic query accepted at the HTTP boundary and the response
//! envelope assembled by the orchestrator.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::spectral::{Anomaly, ConfidenceMap, GeologicalContext, SpectralSeries};

/// Default sampling radius when the caller omits one.
pub const DEFAULT_RADIUS_KM: f64 = 25.0;

/// Rejected geographic query.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum QueryError {
    #[error("{field} must be a finite number, got {value}")]
    NonFinite { field: &'static str, value: f64 },

    #[error("lat = {0} is outside [-90, 90]")]
    LatitudeOutOfRange(f64),

    #[error("lon = {0} is outside [-180, 180]")]
    LongitudeOutOfRange(f64),

    #[error("radius_km = {value} must be > 0 and <= {max}")]
    RadiusOutOfRange { value: f64, max: f64 },

    #[error("hour = {0} must be in 0..24")]
    HourOutOfRange(u32),
}

/// Raw query string: `?lat=..&lon=..[&radius_km=..][&hour=..]`
#[derive(Debug, Clone, Deserialize)]
pub struct GeoQuery {
    pub lat: f64,
    pub lon: f64,
    #[serde(default)]
    pub radius_km: Option<f64>,
    /// UTC hour override; the wall clock is used when absent
    #[serde(default)]
    pub hour: Option<u32>,
}

impl GeoQuery {
    /// Validate the query and fill in the default radius.
    pub fn validate(
        &self,
        default_radius_km: f64,
        max_radius_km: f64,
    ) -> Result<AnalysisRequest, QueryError> {
        let radius_km = self.radius_km.unwrap_or(default_radius_km);

        for (field, value) in [("lat", self.lat), ("lon", self.lon), ("radius_km", radius_km)] {
            if !value.is_finite() {
                return Err(QueryError::NonFinite { field, value });
            }
        }
        if !(-90.0..=90.0).contains(&self.lat) {
            return Err(QueryError::LatitudeOutOfRange(self.lat));
        }
        if !(-180.0..=180.0).contains(&self.lon) {
            return Err(QueryError::LongitudeOutOfRange(self.lon));
        }
        if radius_km <= 0.0 || radius_km > max_radius_km {
            return Err(QueryError::RadiusOutOfRange {
                value: radius_km,
                max: max_radius_km,
            });
        }
        if let Some(hour) = self.hour {
            if hour >= 24 {
                return Err(QueryError::HourOutOfRange(hour));
            }
        }

        Ok(AnalysisRequest {
            location: Location {
                lat: self.lat,
                lon: self.lon,
                radius_km,
            },
            hour: self.hour,
        })
    }
}

/// Sampled location, echoed back in the response.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub lat: f64,
    pub lon: f64,
    pub radius_km: f64,
}

/// A validated analysis request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnalysisRequest {
    pub location: Location,
    pub hour: Option<u32>,
}

/// Full USHE analysis result.
#[derive(Debug, Clone, Serialize)]
pub struct UsheAnalysis {
    pub location: Location,
    pub spectral: SpectralSeries,
    /// Share of points beyond 1.5 sigma, in [0, 100]
    pub anomaly_score: f64,
    pub confidence: ConfidenceMap,
    /// First N anomalies in scan order
    pub anomalies: Vec<Anomaly>,
    pub geological_context: GeologicalContext,
    pub processing_time_ms: u64,
    pub source: String,
    pub engine: String,
    pub analyzed_at: DateTime<Utc>,
    /// Hour of day the scan was synthesized for
    pub hour_utc: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(lat: f64, lon: f64, radius_km: Option<f64>, hour: Option<u32>) -> GeoQuery {
        GeoQuery {
            lat,
            lon,
            radius_km,
            hour,
        }
    }

    #[test]
    fn test_default_radius_applied() {
        let req = query(10.0, 20.0, None, None)
            .validate(DEFAULT_RADIUS_KM, 500.0)
            .unwrap();
        assert_eq!(req.location.radius_km, 25.0);
        assert_eq!(req.hour, None);
    }

    #[test]
    fn test_rejects_non_finite_coordinates() {
        let err = query(f64::NAN, 20.0, None, None)
            .validate(DEFAULT_RADIUS_KM, 500.0)
            .unwrap_err();
        assert!(matches!(err, QueryError::NonFinite { field: "lat", .. }));
    }

    #[test]
    fn test_rejects_out_of_range_values() {
        assert_eq!(
            query(91.0, 0.0, None, None).validate(25.0, 500.0),
            Err(QueryError::LatitudeOutOfRange(91.0))
        );
        assert_eq!(
            query(0.0, -181.0, None, None).validate(25.0, 500.0),
            Err(QueryError::LongitudeOutOfRange(-181.0))
        );
        assert!(matches!(
            query(0.0, 0.0, Some(-5.0), None).validate(25.0, 500.0),
            Err(QueryError::RadiusOutOfRange { .. })
        ));
        assert!(matches!(
            query(0.0, 0.0, Some(501.0), None).validate(25.0, 500.0),
            Err(QueryError::RadiusOutOfRange { .. })
        ));
        assert_eq!(
            query(0.0, 0.0, None, Some(24)).validate(25.0, 500.0),
            Err(QueryError::HourOutOfRange(24))
        );
    }

    #[test]
    fn test_query_deserializes_from_urlencoded_shape() {
        let q: GeoQuery =
            serde_json::from_value(serde_json::json!({"lat": 1.5, "lon": -2.0})).unwrap();
        assert_eq!(q.radius_km, None);
        assert_eq!(q.hour, None);
    }
}
