//! API route definitions
//!
//! - /api/v1/ushe/advanced - Flat USHE analysis
//! - /api/v1/status - Service status and counters
//! - /health - Liveness at root level
//! - /system/health, /system/status - Root-level paths polled by the dashboard

use axum::{routing::get, Router};

use super::handlers::{self, ServiceState};

/// Create the v1 API routes
pub fn api_routes(state: ServiceState) -> Router {
    Router::new()
        .route("/ushe/advanced", get(handlers::ushe_advanced))
        .route("/status", get(handlers::get_status))
        .with_state(state)
}

/// Root-level health and status endpoints
pub fn legacy_routes(state: ServiceState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/system/health", get(handlers::health))
        .route("/system/status", get(handlers::get_status))
        .with_state(state)
}
