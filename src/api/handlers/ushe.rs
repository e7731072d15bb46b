//! USHE analysis endpoints
//!
//! - `GET /api/v1/ushe/advanced` returns the flat analysis object the
//!   dashboard consumes
//! - `GET /api/v2/ushe/analysis` returns the same payload in the v2 envelope

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::api::envelope::{ApiErrorResponse, ApiResponse};
use crate::types::{GeoQuery, UsheAnalysis};

use super::ServiceState;

/// Validate the query, run the engine and record the outcome.
///
/// The analysis runs on the blocking pool: it fans out on rayon and holds
/// the RNG mutex for its whole duration. Returns a ready-made error response
/// on rejection.
async fn run_analysis(
    state: &ServiceState,
    query: Result<Query<GeoQuery>, QueryRejection>,
) -> Result<UsheAnalysis, Response> {
    let request = match query {
        Ok(Query(q)) => q.validate(state.default_radius_km, state.max_radius_km),
        Err(rejection) => {
            warn!(error = %rejection, "Malformed USHE query");
            state.app_state.write().await.record_rejection();
            return Err(ApiErrorResponse::bad_request(rejection.body_text()));
        }
    };

    let request = match request {
        Ok(r) => r,
        Err(e) => {
            warn!(error = %e, "Rejected USHE query");
            state.app_state.write().await.record_rejection();
            return Err(ApiErrorResponse::bad_request(e.to_string()));
        }
    };

    let engine = Arc::clone(&state.engine);
    let rng = Arc::clone(&state.rng);
    let analysis = tokio::task::spawn_blocking(move || {
        let mut rng = rng.lock().unwrap_or_else(|e| {
            warn!("Mutex poisoned on analysis RNG, recovering");
            e.into_inner()
        });
        engine.analyze(&request, Utc::now(), &mut *rng)
    })
    .await
    .map_err(|e| {
        error!(error = %e, "USHE analysis task failed");
        ApiErrorResponse::internal("analysis task failed")
    })?;

    info!(
        lat = request.location.lat,
        lon = request.location.lon,
        radius_km = request.location.radius_km,
        hour = analysis.hour_utc,
        anomaly_score = analysis.anomaly_score,
        anomalies = analysis.anomalies.len(),
        context = %analysis.geological_context.context_type,
        elapsed_ms = analysis.processing_time_ms,
        "USHE analysis served"
    );

    state.app_state.write().await.record_analysis(&analysis);
    Ok(analysis)
}

/// GET /api/v1/ushe/advanced - Spectral analysis with anomaly detection and confidence scoring
pub async fn ushe_advanced(
    State(state): State<ServiceState>,
    query: Result<Query<GeoQuery>, QueryRejection>,
) -> Response {
    match run_analysis(&state, query).await {
        Ok(analysis) => Json(analysis).into_response(),
        Err(resp) => resp,
    }
}

/// GET /api/v2/ushe/analysis - Same analysis inside the v2 envelope
pub async fn ushe_analysis_v2(
    State(state): State<ServiceState>,
    query: Result<Query<GeoQuery>, QueryRejection>,
) -> Response {
    match run_analysis(&state, query).await {
        Ok(analysis) => ApiResponse::ok(analysis),
        Err(resp) => resp,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::AppState;
    use crate::spectral_engine::UsheEngine;
    use crate::config::ServiceConfig;
    use axum::http::{StatusCode, Uri};
    use tokio::sync::RwLock;

    fn create_test_state() -> ServiceState {
        ServiceState::new(
            Arc::new(RwLock::new(AppState::default())),
            UsheEngine::default(),
            Some(42),
        )
    }

    fn query(uri: &str) -> Result<Query<GeoQuery>, QueryRejection> {
        let uri: Uri = uri.parse().unwrap();
        Query::try_from_uri(&uri)
    }

    #[tokio::test]
    async fn test_valid_query_records_analysis() {
        let state = create_test_state();
        let resp = ushe_advanced(
            State(state.clone()),
            query("/api/v1/ushe/advanced?lat=10&lon=20&hour=12"),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);

        let app = state.app_state.read().await;
        assert_eq!(app.total_analyses, 1);
        assert_eq!(app.rejected_queries, 0);
        assert!(app.last_context.is_some());
    }

    #[tokio::test]
    async fn test_invalid_query_records_rejection() {
        let state = create_test_state();
        let resp = ushe_advanced(
            State(state.clone()),
            query("/api/v1/ushe/advanced?lat=95&lon=20"),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let app = state.app_state.read().await;
        assert_eq!(app.total_analyses, 0);
        assert_eq!(app.rejected_queries, 1);
    }

    #[tokio::test]
    async fn test_missing_parameter_is_bad_request() {
        let state = create_test_state();
        let resp = ushe_analysis_v2(State(state), query("/api/v2/ushe/analysis?lat=10")).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_radius_limits_come_from_state_config() {
        let mut config = ServiceConfig::default();
        config.analysis.default_radius_km = 10.0;
        config.analysis.max_radius_km = 50.0;
        let state =
            ServiceState::from_config(&config, Arc::new(RwLock::new(AppState::default())));

        let resp = ushe_advanced(
            State(state.clone()),
            query("/api/v1/ushe/advanced?lat=10&lon=20&radius_km=100"),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let resp = ushe_advanced(State(state.clone()), query("/api/v1/ushe/advanced?lat=10&lon=20"))
            .await;
        assert_eq!(resp.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let v: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(v["location"]["radius_km"], 10.0);
    }

    #[tokio::test]
    async fn test_concurrent_requests_share_the_rng() {
        let state = create_test_state();
        let (a, b) = tokio::join!(
            ushe_advanced(State(state.clone()), query("/api/v1/ushe/advanced?lat=1&lon=2")),
            ushe_analysis_v2(State(state.clone()), query("/api/v2/ushe/analysis?lat=3&lon=4")),
        );
        assert_eq!(a.status(), StatusCode::OK);
        assert_eq!(b.status(), StatusCode::OK);
        assert_eq!(state.app_state.read().await.total_analyses, 2);
    }
}
