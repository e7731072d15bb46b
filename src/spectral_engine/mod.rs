//! Spectral Engine - USHE spectral analysis pipeline
//!
//! Four pure, synchronous stages:
//!
//! 1. **Synthesizer**: 43-point multi-band scan for a location and hour
//! 2. **Anomaly Detector**: z-score screening of the fused band
//! 3. **Confidence Scorer**: per-band stability proxy
//! 4. **Context Classifier**: terrain label, depth range, randomized confidence
//!
//! Stages 2-4 depend only on the scan and run concurrently on the rayon pool.

pub mod anomaly;
pub mod confidence;
pub mod context;
pub mod metrics;
pub mod synthesizer;

pub use anomaly::{detect_anomalies, AnomalyReport};
pub use confidence::score_confidence;
pub use context::classify_context;
pub use synthesizer::{synthesize, SCAN_LENGTH};

use std::time::Instant;

use chrono::{DateTime, Timelike, Utc};
use rand::Rng;
use tracing::debug;

use crate::types::{AnalysisRequest, UsheAnalysis};

/// Default number of anomalies included in a response.
pub const DEFAULT_MAX_REPORTED_ANOMALIES: usize = 5;

/// Response-shaping options for the orchestrator.
#[derive(Debug, Clone)]
pub struct EngineOptions {
    /// Anomalies beyond this count are dropped (scan order is kept)
    pub max_reported_anomalies: usize,
    /// Data source label echoed in the response
    pub source: String,
    /// Engine label echoed in the response
    pub engine: String,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            max_reported_anomalies: DEFAULT_MAX_REPORTED_ANOMALIES,
            source: crate::config::defaults::SOURCE_LABEL.to_string(),
            engine: crate::config::defaults::ENGINE_LABEL.to_string(),
        }
    }
}

/// Runs the four stages and assembles the response.
#[derive(Debug, Clone, Default)]
pub struct UsheEngine {
    options: EngineOptions,
}

impl UsheEngine {
    pub fn new(options: EngineOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    /// Analyze one location.
    ///
    /// The scan is synthesized for `request.hour` when given, otherwise for
    /// the UTC hour of `now`. `rng` feeds the context confidence draw and is
    /// the only source of non-determinism.
    pub fn analyze<R: Rng + Send + ?Sized>(
        &self,
        request: &AnalysisRequest,
        now: DateTime<Utc>,
        rng: &mut R,
    ) -> UsheAnalysis {
        let started = Instant::now();
        let hour = request.hour.unwrap_or_else(|| now.hour());
        let location = request.location;

        let series = synthesize(&location, hour);
        let fused = series.fused_values();

        let (report, (confidence, geological_context)) = rayon::join(
            || detect_anomalies(&fused),
            || {
                rayon::join(
                    || score_confidence(&series),
                    || classify_context(&series, &location, rng),
                )
            },
        );

        let total_anomalies = report.anomalies.len();
        let mut anomalies = report.anomalies;
        anomalies.truncate(self.options.max_reported_anomalies);

        debug!(
            hour,
            anomaly_score = report.anomaly_score,
            total_anomalies,
            reported = anomalies.len(),
            overall_confidence = confidence.overall,
            context = %geological_context.context_type,
            "USHE analysis complete"
        );

        UsheAnalysis {
            location,
            spectral: series,
            anomaly_score: report.anomaly_score,
            confidence,
            anomalies,
            geological_context,
            processing_time_ms: u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
            source: self.options.source.clone(),
            engine: self.options.engine.clone(),
            analyzed_at: now,
            hour_utc: hour,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Location, Severity};
    use chrono::TimeZone;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn request(hour: Option<u32>) -> AnalysisRequest {
        AnalysisRequest {
            location: Location {
                lat: 10.0,
                lon: 20.0,
                radius_km: 25.0,
            },
            hour,
        }
    }

    fn noon() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 14, 12, 30, 0).unwrap()
    }

    #[test]
    fn test_hour_taken_from_clock_when_not_overridden() {
        let engine = UsheEngine::default();
        let result = engine.analyze(&request(None), noon(), &mut StdRng::seed_from_u64(1));
        assert_eq!(result.hour_utc, 12);

        let result = engine.analyze(&request(Some(3)), noon(), &mut StdRng::seed_from_u64(1));
        assert_eq!(result.hour_utc, 3);
    }

    #[test]
    fn test_response_carries_location_and_labels() {
        let engine = UsheEngine::default();
        let result = engine.analyze(&request(Some(12)), noon(), &mut StdRng::seed_from_u64(1));
        assert_eq!(result.location, request(None).location);
        assert_eq!(result.spectral.len(), SCAN_LENGTH);
        assert_eq!(result.engine, "Aurora USHE v1.1");
        assert_eq!(result.analyzed_at, noon());
    }

    #[test]
    fn test_matches_individual_stages() {
        let engine = UsheEngine::default();
        let result = engine.analyze(&request(Some(9)), noon(), &mut StdRng::seed_from_u64(5));

        let series = synthesize(&request(None).location, 9);
        let report = detect_anomalies(&series.fused_values());
        assert_eq!(result.spectral, series);
        assert_eq!(result.anomaly_score, report.anomaly_score);
        assert_eq!(result.confidence, score_confidence(&series));
        let expected: Vec<_> = report.anomalies.into_iter().take(5).collect();
        assert_eq!(result.anomalies, expected);
    }

    #[test]
    fn test_anomaly_list_truncated_in_scan_order() {
        let engine = UsheEngine::new(EngineOptions {
            max_reported_anomalies: 1,
            ..EngineOptions::default()
        });
        let full = detect_anomalies(&synthesize(&request(None).location, 12).fused_values());
        let result = engine.analyze(&request(Some(12)), noon(), &mut StdRng::seed_from_u64(1));

        assert!(result.anomalies.len() <= 1);
        if let Some(first) = full.anomalies.first() {
            assert_eq!(&result.anomalies[0], first);
        }
        for a in &result.anomalies {
            assert_eq!(a.severity == Severity::High, a.z_score > 3.0);
        }
    }
}
