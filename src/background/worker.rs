//! Heartbeat worker
//!
//! Long-running task slot next to the HTTP server. It performs no analysis
//! today; each tick logs that the worker is alive and bumps the heartbeat
//! counters surfaced by `/api/v1/status`.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::pipeline::AppState;

/// Periodic heartbeat task bound to the shared application state.
pub struct HeartbeatWorker {
    app_state: Arc<RwLock<AppState>>,
    interval: Duration,
}

impl HeartbeatWorker {
    pub fn new(app_state: Arc<RwLock<AppState>>, interval: Duration) -> Self {
        Self {
            app_state,
            interval,
        }
    }

    /// Record one heartbeat.
    async fn beat(&self) -> u64 {
        let mut state = self.app_state.write().await;
        state.record_heartbeat(Utc::now());
        state.worker_heartbeats
    }

    /// Run until `cancel_token` fires. Returns the number of heartbeats sent.
    ///
    /// The first tick fires immediately so a fresh service reports `IDLE`
    /// without waiting a full interval.
    pub async fn run(self, cancel_token: CancellationToken) -> u64 {
        info!(
            interval_secs = self.interval.as_secs(),
            "[Worker] Task starting"
        );

        let mut interval = tokio::time::interval(self.interval);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        let mut beats = 0u64;

        loop {
            tokio::select! {
                _ = cancel_token.cancelled() => {
                    info!(heartbeats = beats, "[Worker] Received shutdown signal");
                    return beats;
                }
                _ = interval.tick() => {
                    let total = self.beat().await;
                    beats += 1;
                    if beats == 1 {
                        info!("[Worker] Background worker running");
                    } else {
                        debug!(total, "[Worker] Heartbeat");
                    }
                }
            }
        }
    }
}

/// Convenience wrapper for spawning the worker from the binary.
pub async fn run_worker(
    app_state: Arc<RwLock<AppState>>,
    interval: Duration,
    cancel_token: CancellationToken,
) -> u64 {
    HeartbeatWorker::new(app_state, interval)
        .run(cancel_token)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::SystemStatus;

    #[tokio::test]
    async fn test_worker_records_heartbeats_until_cancelled() {
        let app_state = Arc::new(RwLock::new(AppState::default()));
        let cancel = CancellationToken::new();

        let handle = tokio::spawn(run_worker(
            Arc::clone(&app_state),
            Duration::from_millis(10),
            cancel.clone(),
        ));

        tokio::time::sleep(Duration::from_millis(60)).await;
        cancel.cancel();
        let beats = handle.await.unwrap();

        assert!(beats >= 1);
        let state = app_state.read().await;
        assert_eq!(state.worker_heartbeats, beats);
        assert!(state.last_heartbeat.is_some());
        assert_eq!(state.status, SystemStatus::Idle);
    }

    #[tokio::test]
    async fn test_worker_stops_immediately_when_already_cancelled() {
        let app_state = Arc::new(RwLock::new(AppState::default()));
        let cancel = CancellationToken::new();
        cancel.cancel();

        let beats = run_worker(Arc::clone(&app_state), Duration::from_secs(60), cancel).await;
        // select! is unbiased, so the immediate first tick may win once
        assert!(beats <= 1);
    }
}
