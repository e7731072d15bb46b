//! Service state endpoints: health, status

use axum::extract::State;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::pipeline::SystemStatus;
use crate::types::ContextType;

use super::ServiceState;

// ============================================================================
// Health Endpoint
// ============================================================================

/// Liveness response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: SystemStatus,
    pub version: String,
    pub uptime_seconds: u64,
}

/// GET /health - Liveness check
pub async fn health(State(state): State<ServiceState>) -> Json<HealthResponse> {
    let app_state = state.app_state.read().await;
    Json(HealthResponse {
        status: app_state.status,
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: app_state.uptime_secs(),
    })
}

// ============================================================================
// Status Endpoint
// ============================================================================

/// Service status with request counters and worker liveness
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    /// Service display name
    pub service: String,
    /// Engine label stamped on every analysis
    pub engine: String,
    /// Crate version
    pub version: String,
    /// Current system status
    pub system_status: SystemStatus,
    /// Uptime in seconds
    pub uptime_secs: u64,
    /// Wall-clock start time
    pub started_at: DateTime<Utc>,
    /// Total analyses served
    pub total_analyses: u64,
    /// Queries rejected by validation
    pub rejected_queries: u64,
    /// Last analysis timestamp
    pub last_analysis_time: Option<DateTime<Utc>>,
    /// Context label of the last analysis
    pub last_context: Option<ContextType>,
    /// Anomaly score of the last analysis
    pub last_anomaly_score: Option<f64>,
    /// Background worker heartbeats since startup
    pub worker_heartbeats: u64,
    /// Most recent worker heartbeat
    pub last_heartbeat: Option<DateTime<Utc>>,
}

/// GET /api/v1/status - Get service status
pub async fn get_status(State(state): State<ServiceState>) -> Json<StatusResponse> {
    let app_state = state.app_state.read().await;
    let cfg = crate::config::get();

    Json(StatusResponse {
        service: cfg.service.name.clone(),
        engine: state.engine.options().engine.clone(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        system_status: app_state.status,
        uptime_secs: app_state.uptime_secs(),
        started_at: app_state.started_at,
        total_analyses: app_state.total_analyses,
        rejected_queries: app_state.rejected_queries,
        last_analysis_time: app_state.last_analysis_time,
        last_context: app_state.last_context,
        last_anomaly_score: app_state.last_anomaly_score,
        worker_heartbeats: app_state.worker_heartbeats,
        last_heartbeat: app_state.last_heartbeat,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::AppState;
    use crate::spectral_engine::UsheEngine;
    use std::sync::Arc;
    use tokio::sync::RwLock;

    #[tokio::test]
    async fn test_status_reflects_counters() {
        let app_state = Arc::new(RwLock::new(AppState::default()));
        {
            let mut s = app_state.write().await;
            s.record_rejection();
            s.record_heartbeat(Utc::now());
        }
        let state = ServiceState::new(app_state, UsheEngine::default(), Some(1));

        let Json(status) = get_status(State(state)).await;
        assert_eq!(status.rejected_queries, 1);
        assert_eq!(status.worker_heartbeats, 1);
        assert_eq!(status.system_status, SystemStatus::Idle);
        assert!(status.last_context.is_none());
    }

    #[tokio::test]
    async fn test_health_reports_version() {
        let state = ServiceState::new(
            Arc::new(RwLock::new(AppState::default())),
            UsheEngine::default(),
            None,
        );
        let Json(health) = health(State(state)).await;
        assert_eq!(health.version, env!("CARGO_PKG_VERSION"));
        assert_eq!(health.status, SystemStatus::Initializing);
    }
}
