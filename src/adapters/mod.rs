//! Adapters layer: Concrete implementations of ports.
//!
//! These modules hold the integration with the fitted artifacts and logging:
//! - `artifacts`: loading and integrity-checking the artifact files
//! - `linear`: linear classifiers and their explainer
//! - `scaler`: fitted feature scalers
//! - `sanitize`: PHI filtering for logs

pub mod artifacts;
pub mod linear;
pub mod sanitize;
pub mod scaler;

// Re-export artifact error for lib.rs
pub use artifacts::ArtifactError;
