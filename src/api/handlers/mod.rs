//! API route handlers
//!
//! Request handling logic for all API endpoints including:
//! - USHE spectral analysis (flat v1 shape and enveloped v2 shape)
//! - Liveness and service status

mod status;
mod ushe;

pub use status::*;
pub use ushe::*;

use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::{Arc, Mutex};
use tokio::sync::RwLock;
use tracing::info;

use crate::config::{defaults, ServiceConfig};
use crate::pipeline::AppState;
use crate::spectral_engine::UsheEngine;

// ============================================================================
// API State
// ============================================================================

/// Shared state for API handlers
#[derive(Clone)]
pub struct ServiceState {
    /// Counters and status shared with the worker
    pub app_state: Arc<RwLock<AppState>>,
    /// Stateless analysis orchestrator
    pub engine: Arc<UsheEngine>,
    /// Random source for the context confidence draw
    pub rng: Arc<Mutex<StdRng>>,
    /// Radius applied when a query omits one (km)
    pub default_radius_km: f64,
    /// Largest radius a query may request (km)
    pub max_radius_km: f64,
}

impl ServiceState {
    /// Create state with an explicit engine and optional seed, using the
    /// built-in radius limits.
    ///
    /// `None` seeds from OS entropy; `Some(seed)` makes the confidence draws
    /// reproducible across restarts.
    pub fn new(app_state: Arc<RwLock<AppState>>, engine: UsheEngine, rng_seed: Option<u64>) -> Self {
        let rng = match rng_seed {
            Some(seed) => {
                info!(seed, "Context confidence draws seeded");
                StdRng::seed_from_u64(seed)
            }
            None => StdRng::from_entropy(),
        };
        Self {
            app_state,
            engine: Arc::new(engine),
            rng: Arc::new(Mutex::new(rng)),
            default_radius_km: defaults::DEFAULT_RADIUS_KM,
            max_radius_km: defaults::MAX_RADIUS_KM,
        }
    }

    /// Override the query radius limits.
    pub fn with_radius_limits(mut self, default_radius_km: f64, max_radius_km: f64) -> Self {
        self.default_radius_km = default_radius_km;
        self.max_radius_km = max_radius_km;
        self
    }

    /// Create state from the service config.
    ///
    /// Labels, anomaly limit, seed and radius limits all come from `config`;
    /// the global `config::get()` is not consulted.
    pub fn from_config(config: &ServiceConfig, app_state: Arc<RwLock<AppState>>) -> Self {
        Self::new(
            app_state,
            UsheEngine::new(config.engine_options()),
            config.analysis.rng_seed,
        )
        .with_radius_limits(config.analysis.default_radius_km, config.analysis.max_radius_km)
    }
}
