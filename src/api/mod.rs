//! REST API module using Axum
//!
//! Provides HTTP endpoints for the Aurora OSI analysis service:
//! - v1 API returning the flat analysis object
//! - v2 API with the consistent `{data, meta}` envelope
//! - `/health` liveness at the root, plus `/system/health` and `/system/status`
//!   for the dashboard

pub mod envelope;
pub mod handlers;
mod routes;
mod v2_routes;

pub use handlers::ServiceState;

use axum::http::{header, Method, Uri};
use axum::response::Response;
use axum::Router;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use envelope::ApiErrorResponse;

/// Environment variable holding comma-separated allowed CORS origins.
pub const CORS_ORIGINS_ENV: &str = "AURORA_CORS_ORIGINS";

/// Unknown paths get the error envelope instead of an empty 404.
async fn not_found(uri: Uri) -> Response {
    ApiErrorResponse::not_found(format!("No route for {}", uri.path()))
}

/// Build a CORS layer that is restrictive by default (same-origin only).
///
/// Set `AURORA_CORS_ORIGINS` to a comma-separated list of allowed origins
/// (e.g. `http://localhost:3000` for a local dashboard).
fn build_cors_layer() -> CorsLayer {
    let base = CorsLayer::new()
        .allow_methods([Method::GET])
        .allow_headers([header::CONTENT_TYPE]);

    match std::env::var(CORS_ORIGINS_ENV) {
        Ok(origins) => {
            let allowed: Vec<_> = origins
                .split(',')
                .filter_map(|o| o.trim().parse().ok())
                .collect();
            tracing::info!(origins = %origins, "CORS: allowing configured origins");
            base.allow_origin(allowed)
        }
        Err(_) => base,
    }
}

/// Create the complete application router.
pub fn create_app(state: ServiceState) -> Router {
    let cors = build_cors_layer();

    Router::new()
        .nest("/api/v2", v2_routes::v2_api_routes(state.clone()))
        .nest("/api/v1", routes::api_routes(state.clone()))
        .merge(routes::legacy_routes(state))
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(cors)
}
