//! Shared Service State
//!
//! Request-independent bookkeeping: counters, timestamps and status. The
//! analysis pipeline itself lives in [`crate::spectral_engine`] and keeps no
//! state between requests.

mod state;

pub use state::*;
