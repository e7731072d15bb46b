//! Core data types for the Aurora OSI analysis service
//!
//! - `spectral`: scan points, bands, anomalies, confidence and context
//! - `analysis`: query boundary, validation errors and the response object

pub mod analysis;
pub mod spectral;

pub use analysis::*;
pub use spectral::*;
