//! Scaler port: Trait for the fitted numeric transform.

use super::classifier::ModelError;

/// A fitted per-feature transform applied to encoded vectors before inference.
pub trait FeatureScaler: Send + Sync {
    /// Number of features the scaler was fitted on.
    fn n_features(&self) -> usize;

    /// Transform one encoded feature vector.
    ///
    /// # Errors
    /// Returns `ModelError::ShapeMismatch` if `input` has the wrong width.
    fn transform(&self, input: &[f64]) -> Result<Vec<f64>, ModelError>;
}
