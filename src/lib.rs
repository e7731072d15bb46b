//! Aurora OSI: Spectral Analysis Service
//!
//! Synthesizes a multi-band spectral scan for a geographic point and
//! interprets it.
//!
//! ## Architecture
//!
//! - **Spectral Engine**: synthesizer, anomaly detector, confidence scorer,
//!   context classifier and the `UsheEngine` orchestrator
//! - **API**: axum routes exposing the analysis in flat (v1) and enveloped (v2) form
//! - **Background**: heartbeat worker supervised next to the HTTP server
//! - **Config**: TOML service configuration with typo detection

pub mod api;
pub mod background;
pub mod config;
pub mod pipeline;
pub mod spectral_engine;
pub mod types;

// Re-export service configuration
pub use config::ServiceConfig;

// Re-export the engine entry points
pub use spectral_engine::{EngineOptions, UsheEngine};

// Re-export commonly used types
pub use types::{
    AnalysisRequest, Anomaly, Band, ConfidenceMap, ContextType, DepthRange, GeoQuery,
    GeologicalContext, Location, QueryError, Severity, SpectralPoint, SpectralSeries,
    UsheAnalysis,
};

// Re-export API entry points
pub use api::{create_app, ServiceState};
pub use pipeline::{AppState, SystemStatus};
