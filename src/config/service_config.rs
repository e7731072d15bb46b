//! Service Configuration - operator-tunable TOML values
//!
//! Each struct implements `Default` with the values the service shipped with,
//! so running without a config file behaves exactly like the built-in setup.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

use super::defaults;
use crate::spectral_engine::EngineOptions;

// ============================================================================
// Top-Level Config
// ============================================================================

/// Root configuration for an Aurora deployment.
///
/// Load with `ServiceConfig::load()` which searches:
/// 1. `$AURORA_CONFIG` env var
/// 2. `./aurora.toml`
/// 3. Built-in defaults
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Service identity and response labels
    #[serde(default)]
    pub service: ServiceInfo,

    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Analysis query limits and response shaping
    #[serde(default)]
    pub analysis: AnalysisConfig,

    /// Background worker
    #[serde(default)]
    pub worker: WorkerConfig,
}

impl ServiceConfig {
    /// Load configuration using the standard search order:
    /// 1. `$AURORA_CONFIG` environment variable
    /// 2. `./aurora.toml` in the current working directory
    /// 3. Built-in defaults
    pub fn load() -> Self {
        if let Ok(path) = std::env::var(defaults::CONFIG_PATH_ENV) {
            let p = PathBuf::from(&path);
            if p.exists() {
                match Self::load_from_file(&p) {
                    Ok(config) => {
                        info!(path = %p.display(), "Loaded service config from AURORA_CONFIG");
                        return config;
                    }
                    Err(e) => {
                        warn!(path = %p.display(), error = %e, "Failed to load config from AURORA_CONFIG, falling back");
                    }
                }
            } else {
                warn!(path = %path, "AURORA_CONFIG points to non-existent file, falling back");
            }
        }

        let local = PathBuf::from(defaults::LOCAL_CONFIG_FILE);
        if local.exists() {
            match Self::load_from_file(&local) {
                Ok(config) => {
                    info!("Loaded service config from ./aurora.toml");
                    return config;
                }
                Err(e) => {
                    warn!(error = %e, "Failed to load ./aurora.toml, using defaults");
                }
            }
        }

        info!("No aurora.toml found, using built-in defaults");
        Self::default()
    }

    /// Load from a specific TOML file path.
    ///
    /// Unknown keys are reported as warnings; semantic problems are errors.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        Self::from_toml_str(&contents).map_err(|e| match e {
            ConfigError::Parse(_, inner) => ConfigError::Parse(path.to_path_buf(), inner),
            other => other,
        })
    }

    /// Parse and validate a TOML document.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        for w in super::validation::validate_unknown_keys(contents) {
            warn!("{}", w);
        }

        let config: Self =
            toml::from_str(contents).map_err(|e| ConfigError::Parse(PathBuf::new(), e))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the current config to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(ConfigError::Serialize)
    }

    /// Validate limits for internal consistency.
    ///
    /// Rules:
    /// - Radii must be finite and positive, default within max
    /// - At least one anomaly must be reportable
    /// - Worker heartbeat interval must be > 0
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = super::validation::validate_ranges(self);

        if self.server.addr.trim().is_empty() {
            errors.push("server.addr must not be empty".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    /// Orchestrator options derived from this config.
    pub fn engine_options(&self) -> EngineOptions {
        EngineOptions {
            max_reported_anomalies: self.analysis.max_reported_anomalies,
            source: self.service.source.clone(),
            engine: self.service.engine.clone(),
        }
    }
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config I/O error ({}): {}", .0.display(), .1)]
    Io(PathBuf, std::io::Error),

    #[error("Config parse error ({}): {}", .0.display(), .1)]
    Parse(PathBuf, toml::de::Error),

    #[error("Config serialization error: {0}")]
    Serialize(toml::ser::Error),

    #[error("Config validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),
}

// ============================================================================
// Service Info
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceInfo {
    /// Service name reported by `/api/v1/status`
    #[serde(default = "default_service_name")]
    pub name: String,

    /// Engine label echoed in analysis responses
    #[serde(default = "default_engine")]
    pub engine: String,

    /// Data source label echoed in analysis responses
    #[serde(default = "default_source")]
    pub source: String,
}

fn default_service_name() -> String {
    defaults::SERVICE_NAME.to_string()
}

fn default_engine() -> String {
    defaults::ENGINE_LABEL.to_string()
}

fn default_source() -> String {
    defaults::SOURCE_LABEL.to_string()
}

impl Default for ServiceInfo {
    fn default() -> Self {
        Self {
            name: default_service_name(),
            engine: default_engine(),
            source: default_source(),
        }
    }
}

// ============================================================================
// Server
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// HTTP server bind address.
    ///
    /// Can be overridden by `AURORA_SERVER_ADDR` env var or `--addr` CLI flag.
    #[serde(default = "default_server_addr")]
    pub addr: String,
}

fn default_server_addr() -> String {
    defaults::SERVER_ADDR.to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: default_server_addr(),
        }
    }
}

// ============================================================================
// Analysis
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Radius applied when a query omits `radius_km`
    #[serde(default = "default_radius_km")]
    pub default_radius_km: f64,

    /// Largest radius a query may request
    #[serde(default = "default_max_radius_km")]
    pub max_radius_km: f64,

    /// Anomalies included in each response (scan order)
    #[serde(default = "default_max_reported_anomalies")]
    pub max_reported_anomalies: usize,

    /// Seed for the context confidence draw. Unset means OS entropy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rng_seed: Option<u64>,
}

fn default_radius_km() -> f64 {
    defaults::DEFAULT_RADIUS_KM
}

fn default_max_radius_km() -> f64 {
    defaults::MAX_RADIUS_KM
}

fn default_max_reported_anomalies() -> usize {
    defaults::MAX_REPORTED_ANOMALIES
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            default_radius_km: default_radius_km(),
            max_radius_km: default_max_radius_km(),
            max_reported_anomalies: default_max_reported_anomalies(),
            rng_seed: None,
        }
    }
}

// ============================================================================
// Worker
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerConfig {
    /// Spawn the background worker
    #[serde(default = "default_worker_enabled")]
    pub enabled: bool,

    /// Seconds between idle heartbeats
    #[serde(default = "default_heartbeat_interval_secs")]
    pub heartbeat_interval_secs: u64,
}

fn default_worker_enabled() -> bool {
    true
}

fn default_heartbeat_interval_secs() -> u64 {
    defaults::WORKER_HEARTBEAT_INTERVAL_SECS
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            enabled: default_worker_enabled(),
            heartbeat_interval_secs: default_heartbeat_interval_secs(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
