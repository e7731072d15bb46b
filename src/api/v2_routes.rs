//! v2 API route table.

use axum::routing::get;
use axum::Router;

use super::handlers::{self, ServiceState};

/// Build the v2 API router.
pub fn v2_api_routes(state: ServiceState) -> Router {
    Router::new()
        .route("/ushe/analysis", get(handlers::ushe_analysis_v2))
        .with_state(state)
}
