//! System-wide default constants.
//!
//! Centralises the values the service falls back to when no config file sets
//! them. Grouped by subsystem for easy discovery.

// ============================================================================
// Config Loading
// ============================================================================

/// Environment variable holding an explicit config file path.
pub const CONFIG_PATH_ENV: &str = "AURORA_CONFIG";

/// Config file looked up in the current working directory.
pub const LOCAL_CONFIG_FILE: &str = "aurora.toml";

// ============================================================================
// Service Identity
// ============================================================================

pub const SERVICE_NAME: &str = "Aurora OSI";

/// Engine label echoed in every analysis response.
pub const ENGINE_LABEL: &str = "Aurora USHE v1.1";

/// Data source label echoed in every analysis response.
pub const SOURCE_LABEL: &str = "Sentinel-1/2 + USHE Physics Engine";

// ============================================================================
// HTTP Server
// ============================================================================

/// Default bind address. Overridden by `AURORA_SERVER_ADDR` or `--addr`.
pub const SERVER_ADDR: &str = "0.0.0.0:8000";

/// Environment variable overriding the bind address.
pub const SERVER_ADDR_ENV: &str = "AURORA_SERVER_ADDR";

// ============================================================================
// Analysis
// ============================================================================

/// Sampling radius used when a query omits `radius_km`.
pub const DEFAULT_RADIUS_KM: f64 = crate::types::DEFAULT_RADIUS_KM;

/// Largest accepted sampling radius (km).
pub const MAX_RADIUS_KM: f64 = 500.0;

/// Anomalies included in a response.
pub const MAX_REPORTED_ANOMALIES: usize = crate::spectral_engine::DEFAULT_MAX_REPORTED_ANOMALIES;

// ============================================================================
// Background Worker
// ============================================================================

/// Interval between idle worker heartbeats (seconds).
pub const WORKER_HEARTBEAT_INTERVAL_SECS: u64 = 60;
