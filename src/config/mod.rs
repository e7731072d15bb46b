//! Service Configuration Module
//!
//! Provides service configuration loaded from TOML files, replacing
//! hardcoded limits and response labels with operator-tunable values.
//!
//! ## Loading Order
//!
//! 1. `AURORA_CONFIG` environment variable (path to TOML file)
//! 2. `aurora.toml` in the current working directory
//! 3. Built-in defaults
//!
//! ## Usage
//!
//! Call `config::init()` once at startup, then `config::get()` anywhere:
//!
//! ```ignore
//! // In main():
//! config::init(ServiceConfig::load());
//!
//! // Anywhere in the codebase:
//! let max = config::get().analysis.max_radius_km;
//! ```

mod service_config;
pub mod defaults;
pub mod validation;

pub use service_config::*;

use std::sync::OnceLock;

/// Global service configuration, initialized once at startup.
static SERVICE_CONFIG: OnceLock<ServiceConfig> = OnceLock::new();

/// Initialize the global service configuration.
///
/// Later calls are ignored with a warning.
pub fn init(config: ServiceConfig) {
    if SERVICE_CONFIG.set(config).is_err() {
        tracing::warn!("config::init() called more than once, ignoring");
    }
}

/// Get a reference to the global service configuration.
///
/// Falls back to built-in defaults when `init()` has not been called, so
/// library users and tests can run the API without a startup sequence.
pub fn get() -> &'static ServiceConfig {
    SERVICE_CONFIG.get_or_init(ServiceConfig::default)
}

/// Check whether the config has been initialized.
pub fn is_initialized() -> bool {
    SERVICE_CONFIG.get().is_some()
}
