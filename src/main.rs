//! Aurora OSI - USHE spectral analysis service
//!
//! Serves spectral anomaly and geological context analysis over HTTP.
//!
//! # Usage
//!
//! ```bash
//! # Run with defaults (0.0.0.0:8000)
//! cargo run --release
//!
//! # Reproducible context confidence draws
//! ./aurora-osi --seed 42
//!
//! # JSON logs for log shippers
//! ./aurora-osi --log-json
//! ```
//!
//! # Environment Variables
//!
//! - `AURORA_CONFIG`: Path to the service TOML (default: `./aurora.toml`)
//! - `AURORA_SERVER_ADDR`: Bind address override
//! - `AURORA_CORS_ORIGINS`: Comma-separated allowed origins
//! - `AURORA_LOG_FORMAT`: Set to `json` for JSON log lines
//! - `RUST_LOG`: Logging level (default: info)

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use aurora_osi::api::{create_app, ServiceState};
use aurora_osi::background::run_worker;
use aurora_osi::config::{self, defaults, ServiceConfig};
use aurora_osi::pipeline::{AppState, SystemStatus};
use axum::Router;

// ============================================================================
// CLI Arguments
// ============================================================================

#[derive(Parser, Debug)]
#[command(name = "aurora-osi")]
#[command(about = "Aurora OSI USHE Spectral Analysis Service")]
#[command(version)]
struct CliArgs {
    /// Override the server address (default: "0.0.0.0:8000")
    #[arg(short, long)]
    addr: Option<String>,

    /// Load service configuration from this TOML file instead of the search order
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Seed the context confidence RNG for reproducible responses
    #[arg(long)]
    seed: Option<u64>,

    /// Emit logs as JSON lines (also enabled by AURORA_LOG_FORMAT=json)
    #[arg(long)]
    log_json: bool,

    /// Do not start the background heartbeat worker
    #[arg(long)]
    no_worker: bool,
}

// ============================================================================
// Logging
// ============================================================================

const LOG_FORMAT_ENV: &str = "AURORA_LOG_FORMAT";

fn init_tracing(json: bool) {
    let json = json
        || std::env::var(LOG_FORMAT_ENV)
            .map(|v| v.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .init();
    }
}

// ============================================================================
// Task Names for Supervisor Logging
// ============================================================================

#[derive(Debug, Clone, Copy)]
enum TaskName {
    HttpServer,
    Worker,
}

impl std::fmt::Display for TaskName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaskName::HttpServer => write!(f, "HttpServer"),
            TaskName::Worker => write!(f, "Worker"),
        }
    }
}

// ============================================================================
// Configuration
// ============================================================================

/// Resolve the service config from `--config` or the standard search order,
/// then apply CLI overrides.
fn load_config(args: &CliArgs) -> Result<ServiceConfig> {
    let mut service_config = match &args.config {
        Some(path) => ServiceConfig::load_from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => ServiceConfig::load(),
    };

    if let Some(seed) = args.seed {
        service_config.analysis.rng_seed = Some(seed);
    }
    if args.no_worker {
        service_config.worker.enabled = false;
    }

    Ok(service_config)
}

/// Bind address precedence: `--addr`, then `AURORA_SERVER_ADDR`, then config.
fn resolve_server_addr(cli_addr: Option<String>, service_config: &ServiceConfig) -> String {
    cli_addr
        .or_else(|| std::env::var(defaults::SERVER_ADDR_ENV).ok())
        .unwrap_or_else(|| service_config.server.addr.clone())
}

// ============================================================================
// Tasks
// ============================================================================

/// Spawn the HTTP server task into the JoinSet.
fn spawn_http_server(
    task_set: &mut JoinSet<Result<TaskName>>,
    listener: tokio::net::TcpListener,
    app: Router,
    cancel_token: CancellationToken,
) {
    task_set.spawn(async move {
        info!("[HttpServer] Task starting");

        let result = axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                cancel_token.cancelled().await;
                info!("[HttpServer] Received shutdown signal");
            })
            .await;

        match result {
            Ok(()) => {
                info!("[HttpServer] Graceful shutdown complete");
                Ok(TaskName::HttpServer)
            }
            Err(e) => {
                error!("[HttpServer] Server error: {}", e);
                Err(anyhow::anyhow!("HTTP server error: {}", e))
            }
        }
    });
}

/// Spawn the background heartbeat worker.
fn spawn_worker(
    task_set: &mut JoinSet<Result<TaskName>>,
    app_state: Arc<RwLock<AppState>>,
    interval: Duration,
    cancel_token: CancellationToken,
) {
    task_set.spawn(async move {
        let beats = run_worker(app_state, interval, cancel_token).await;
        info!("[Worker] Stopped after {} heartbeats", beats);
        Ok(TaskName::Worker)
    });
}

/// Run the supervisor loop: monitor tasks, cancel on failure.
async fn run_supervisor(
    task_set: &mut JoinSet<Result<TaskName>>,
    cancel_token: CancellationToken,
) -> Result<()> {
    info!("Supervisor: all tasks spawned, monitoring...");

    loop {
        tokio::select! {
            _ = cancel_token.cancelled() => {
                info!("Supervisor: shutdown signal received");
                break;
            }
            result = task_set.join_next() => {
                match result {
                    Some(Ok(Ok(task_name))) => {
                        info!("Supervisor: task {} completed normally", task_name);
                    }
                    Some(Ok(Err(e))) => {
                        error!("Supervisor: task failed with error: {}", e);
                        cancel_token.cancel();
                        return Err(e);
                    }
                    Some(Err(e)) => {
                        error!("Supervisor: task panicked: {}", e);
                        cancel_token.cancel();
                        return Err(anyhow::anyhow!("Task panicked: {}", e));
                    }
                    None => {
                        info!("Supervisor: all tasks completed");
                        break;
                    }
                }
            }
        }
    }

    // Let in-flight requests drain before returning
    while let Some(result) = task_set.join_next().await {
        match result {
            Ok(Ok(task_name)) => info!("Supervisor: task {} stopped", task_name),
            Ok(Err(e)) => error!("Supervisor: task failed during shutdown: {}", e),
            Err(e) => error!("Supervisor: task panicked during shutdown: {}", e),
        }
    }

    Ok(())
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let args = CliArgs::parse();
    init_tracing(args.log_json);

    let service_config = load_config(&args)?;
    let server_addr = resolve_server_addr(args.addr.clone(), &service_config);

    info!("==============================================================");
    info!("  {}", service_config.service.name);
    info!("  Engine: {}", service_config.service.engine);
    info!("  Source: {}", service_config.service.source);
    info!("==============================================================");

    let worker_enabled = service_config.worker.enabled;
    let heartbeat_interval = Duration::from_secs(service_config.worker.heartbeat_interval_secs);

    let app_state = Arc::new(RwLock::new(AppState::default()));
    let state = ServiceState::from_config(&service_config, Arc::clone(&app_state));
    config::init(service_config);

    let listener = tokio::net::TcpListener::bind(&server_addr)
        .await
        .with_context(|| format!("Failed to bind HTTP server to {server_addr}"))?;
    info!("HTTP API listening on http://{}", server_addr);

    // Graceful shutdown via Ctrl+C
    let cancel_token = CancellationToken::new();
    let shutdown_token = cancel_token.clone();
    let shutdown_state = Arc::clone(&app_state);
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.ok();
        info!("Received Ctrl+C, initiating shutdown...");
        shutdown_state.write().await.status = SystemStatus::ShuttingDown;
        shutdown_token.cancel();
    });

    let mut task_set: JoinSet<Result<TaskName>> = JoinSet::new();
    spawn_http_server(&mut task_set, listener, create_app(state), cancel_token.clone());

    if worker_enabled {
        spawn_worker(
            &mut task_set,
            Arc::clone(&app_state),
            heartbeat_interval,
            cancel_token.clone(),
        );
    } else {
        info!("Background worker disabled");
    }

    run_supervisor(&mut task_set, cancel_token).await?;

    info!("Aurora OSI shutdown complete");
    Ok(())
}
