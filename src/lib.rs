//! # Cardiosense
//!
//! Heart disease risk screening from 13 clinical attributes.
//!
//! This crate provides:
//! - Encoding and scaling of patient records for a fitted classifier
//! - Binary verdicts with per-feature attributions
//! - A keyword-matched help chat
//! - Terminal UI for local use
//!
//! ## Architecture
//!
//! The crate follows Hexagonal Architecture:
//! - `domain`: Core types (attribute schema, patient record, encoders, diagnosis, chat)
//! - `ports`: Trait definitions for the fitted artifacts (scaler, classifier)
//! - `adapters`: Concrete implementations (artifact loader, linear models, log sanitizing)
//! - `application`: Use cases orchestrating domain and ports
//! - `tui`: Terminal user interface

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod tui;

pub use domain::{Diagnosis, PatientRecord, Verdict};

/// Result type for Cardiosense operations
pub type Result<T> = std::result::Result<T, CardioError>;

/// Main error type for Cardiosense
#[derive(Debug, thiserror::Error)]
pub enum CardioError {
    #[error("Failed to load artifacts: {0}")]
    Artifact(#[from] adapters::ArtifactError),

    #[error("Rejected submission: {0}")]
    UnknownCategory(#[from] domain::UnknownCategoryError),

    #[error("Prediction failed: {0}")]
    Model(#[from] ports::ModelError),

    #[error("Invalid patient data: {0}")]
    Validation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl CardioError {
    /// Whether the error should be shown to the user as a rejected input
    /// rather than a generic failure.
    #[must_use]
    pub fn is_rejection(&self) -> bool {
        matches!(self, Self::UnknownCategory(_) | Self::Validation(_))
    }
}
