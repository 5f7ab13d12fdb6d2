//! Ports layer: Trait definitions for external operations.
//!
//! Following Hexagonal Architecture, these traits define the boundaries
//! between the application and the fitted artifacts (scaler, classifier).

mod classifier;
mod scaler;

pub use classifier::{Classifier, Explainer, ModelError};
pub use scaler::FeatureScaler;
