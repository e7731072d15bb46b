//! Application State and System Status
//!
//! Shared counters and latest-result bookkeeping, accessible from API
//! handlers and the background worker.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::types::{ContextType, UsheAnalysis};

// ============================================================================
// Application State
// ============================================================================

/// Shared application state accessible from API handlers and other components.
///
/// This struct is wrapped in `Arc<RwLock<>>` for thread-safe access across
/// the async runtime. Analysis results themselves are never stored here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppState {
    /// System uptime (serializes as seconds)
    #[serde(skip, default = "Instant::now")]
    pub uptime: Instant,

    /// Wall-clock start time
    pub started_at: DateTime<Utc>,

    /// Current system status
    pub status: SystemStatus,

    /// Total number of analyses served
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

    /// Time of the most recent worker heartbeat
    pub last_heartbeat: Option<DateTime<Utc>>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            uptime: Instant::now(),
            started_at: Utc::now(),
            status: SystemStatus::Initializing,
            total_analyses: 0,
            rejected_queries: 0,
            last_analysis_time: None,
            last_context: None,
            last_anomaly_score: None,
            worker_heartbeats: 0,
            last_heartbeat: None,
        }
    }
}

impl AppState {
    /// Record a completed analysis.
    ///
    /// `ShuttingDown` is sticky: requests drained during graceful shutdown
    /// still count but do not revive the status.
    pub fn record_analysis(&mut self, analysis: &UsheAnalysis) {
        self.total_analyses += 1;
        self.last_analysis_time = Some(analysis.analyzed_at);
        self.last_context = Some(analysis.geological_context.context_type);
        self.last_anomaly_score = Some(analysis.anomaly_score);
        if matches!(self.status, SystemStatus::Initializing | SystemStatus::Idle) {
            self.status = SystemStatus::Active;
        }
    }

    /// Record a query rejected at the boundary.
    pub fn record_rejection(&mut self) {
        self.rejected_queries += 1;
    }

    /// Record a worker heartbeat.
    pub fn record_heartbeat(&mut self, at: DateTime<Utc>) {
        self.worker_heartbeats += 1;
        self.last_heartbeat = Some(at);
        if self.status == SystemStatus::Initializing {
            self.status = SystemStatus::Idle;
        }
    }

    /// Get uptime in seconds
    pub fn uptime_secs(&self) -> u64 {
        self.uptime.elapsed().as_secs()
    }
}

/// System operational status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SystemStatus {
    /// Server is starting up
    Initializing,
    /// Running, no analysis served yet
    Idle,
    /// At least one analysis served
    Active,
    /// Shutdown requested
    ShuttingDown,
}

impl std::fmt::Display for SystemStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SystemStatus::Initializing => write!(f, "INITIALIZING"),
            SystemStatus::Idle => write!(f, "IDLE"),
            SystemStatus::Active => write!(f, "ACTIVE"),
            SystemStatus::ShuttingDown => write!(f, "SHUTTING_DOWN"),
        }
    }
}
