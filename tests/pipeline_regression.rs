//! Pipeline Regression Tests
//!
//! Runs the full USHE analysis through `UsheEngine` with a seeded `StdRng`
//! and checks the result against closed-form band values, the stage
//! invariants, and run-to-run determinism.

use aurora_osi::spectral_engine::metrics::population_mean;
use aurora_osi::spectral_engine::synthesizer::seasonal_factor;
use aurora_osi::spectral_engine::{context, UsheEngine};
use aurora_osi::types::{AnalysisRequest, Band, ContextType, DepthRange, Location, Severity};
use chrono::{TimeZone, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn request(hour: u32) -> AnalysisRequest {
    AnalysisRequest {
        location: Location {
            lat: 10.0,
            lon: 20.0,
            radius_km: 25.0,
        },
        hour: Some(hour),
    }
}

fn round4(x: f64) -> f64 {
    (x * 1e4).round() / 1e4
}

fn run(hour: u32, seed: u64) -> aurora_osi::UsheAnalysis {
    let now = Utc.with_ymd_and_hms(2026, 6, 1, 0, 0, 0).unwrap();
    UsheEngine::default().analyze(&request(hour), now, &mut StdRng::seed_from_u64(seed))
}

#[test]
fn scan_endpoints_match_closed_form() {
    let result = run(12, 42);
    let seasonal = seasonal_factor(12);

    let first = result.spectral.first().unwrap();
    assert_eq!(first.wavelength_nm, 400);
    assert!((first.optical - round4(0.39 * seasonal)).abs() < 1e-9);
    assert!((first.sar - round4(0.22 * seasonal)).abs() < 1e-9);
    assert!((first.thermal - round4(0.45 * (1.0 + 0.05 * 0.4_f64.sin()))).abs() < 1e-9);
    assert!((first.gravity - 0.36).abs() < 1e-9);

    let last = result.spectral.last().unwrap();
    assert_eq!(last.wavelength_nm, 2500);
    assert!((last.optical - round4(0.39 * seasonal)).abs() < 1e-9);
    assert!((last.sar - round4(0.25 * seasonal)).abs() < 1e-9);
    assert!((last.thermal - round4(0.47 * (1.0 + 0.05 * 2.5_f64.sin()))).abs() < 1e-9);
    assert!((last.gravity - 0.30).abs() < 1e-9);
}

#[test]
fn every_point_is_finite_and_fused_is_consistent() {
    for hour in [0, 6, 12, 18, 23] {
        let result = run(hour, 1);
        assert_eq!(result.spectral.len(), 43);
        for p in result.spectral.points() {
            for band in Band::ALL {
                assert!(p.band(band).is_finite());
            }
            let expected =
                (0.3 * p.optical + 0.3 * p.sar + 0.2 * p.thermal + 0.2 * p.gravity) * 1.3;
            assert!((p.fused() - expected).abs() < 1e-4);
        }
    }
}

#[test]
fn anomalies_respect_thresholds_and_limit() {
    for hour in 0..24 {
        let result = run(hour, 7);
        assert!(result.anomalies.len() <= 5);
        assert!((0.0..=100.0).contains(&result.anomaly_score));
        for a in &result.anomalies {
            assert!(a.z_score > 2.0);
            assert_eq!(a.severity == Severity::High, a.z_score > 3.0);
            assert_eq!(a.wavelength_nm, 400 + a.index as u32 * 50);
            assert_eq!(a.value, result.spectral.points()[a.index].fused());
        }
        assert!(result
            .anomalies
            .windows(2)
            .all(|w| w[0].index < w[1].index));
    }
}

#[test]
fn confidence_overall_is_rounded_mean() {
    let result = run(12, 3);
    let c = &result.confidence;
    for band in Band::ALL {
        assert!((0.0..=100.0).contains(&c.get(band)));
    }
    let mean = (c.optical + c.sar + c.thermal + c.gravity) / 4.0;
    assert!((c.overall - (mean * 10.0).round() / 10.0).abs() < 1e-9);
}

#[test]
fn context_follows_band_averages() {
    let result = run(12, 9);
    let fused_avg = population_mean(&result.spectral.fused_values());
    let thermal_avg = population_mean(&result.spectral.band_values(Band::Thermal));

    let (expected_type, expected_depth) = context::classify_averages(fused_avg, thermal_avg);
    assert_eq!(result.geological_context.context_type, expected_type);
    assert_eq!(result.geological_context.recommended_depth, expected_depth);

    // The synthesized scan sits in the middle band at every hour
    assert_eq!(expected_type, ContextType::MixedTerrain);
    assert_eq!(expected_depth, DepthRange::Deep);

    let conf = result.geological_context.confidence;
    assert!((context::CONFIDENCE_MIN..=context::CONFIDENCE_MAX).contains(&conf));
}

#[test]
fn seeded_runs_are_identical() {
    let a = run(5, 1234);
    let b = run(5, 1234);

    assert_eq!(a.spectral, b.spectral);
    assert_eq!(a.anomaly_score, b.anomaly_score);
    assert_eq!(a.anomalies, b.anomalies);
    assert_eq!(a.confidence, b.confidence);
    assert_eq!(a.geological_context, b.geological_context);
}

#[test]
fn only_context_confidence_depends_on_the_seed() {
    let a = run(5, 1);
    let b = run(5, 2);

    assert_eq!(a.spectral, b.spectral);
    assert_eq!(a.anomalies, b.anomalies);
    assert_eq!(a.confidence, b.confidence);
    assert_eq!(
        a.geological_context.context_type,
        b.geological_context.context_type
    );
}
