//! Background services
//!
//! Runs as a background tokio task alongside the HTTP server and reports
//! liveness into the shared application state on a fixed interval.

pub mod worker;

pub use worker::{run_worker, HeartbeatWorker};
