//! Classifier port: Trait for the binary heart disease model.
//!
//! This trait abstracts the fitted model artifact from the application logic.

use crate::domain::Explanation;

/// Errors raised while scaling, predicting or explaining.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ModelError {
    #[error("expected {expected} features, got {actual}")]
    ShapeMismatch { expected: usize, actual: usize },

    #[error("non-finite value at feature {index}")]
    NonFinite { index: usize },

    #[error("model produced class {0}, expected 0 or 1")]
    InvalidVerdict(i64),

    #[error("explanation failed: {0}")]
    Explanation(String),
}

impl ModelError {
    /// Check that `input` has exactly `expected` finite values.
    ///
    /// # Errors
    /// Returns `ShapeMismatch` or `NonFinite`.
    pub fn check_input(input: &[f64], expected: usize) -> Result<(), ModelError> {
        if input.len() != expected {
            return Err(ModelError::ShapeMismatch {
                expected,
                actual: input.len(),
            });
        }
        match input.iter().position(|v| !v.is_finite()) {
            Some(index) => Err(ModelError::NonFinite { index }),
            None => Ok(()),
        }
    }
}

/// Trait for the binary classifier.
///
/// Implementations take a scaled feature vector and return the raw class
/// label. Mapping the label onto a verdict (and rejecting anything other than
/// 0 or 1) is the caller's job.
pub trait Classifier: Send + Sync {
    /// Number of features the model was fitted on.
    fn n_features(&self) -> usize;

    /// Predict the class label for one scaled vector.
    ///
    /// # Errors
    /// Returns `ModelError` if the input has the wrong shape.
    fn predict(&self, scaled: &[f64]) -> Result<i64, ModelError>;

    /// Probability of the positive class, if the model is probabilistic.
    ///
    /// # Errors
    /// Returns `ModelError` if the input has the wrong shape.
    fn predict_proba(&self, scaled: &[f64]) -> Result<Option<f64>, ModelError>;

    /// Build an explainer bound to this model.
    fn explainer(&self) -> Box<dyn Explainer + '_>;
}

/// Computes per-feature attributions for one prediction.
pub trait Explainer {
    /// Explain the model output for one scaled vector.
    ///
    /// The returned explanation has exactly one attribution per input feature.
    ///
    /// # Errors
    /// Returns `ModelError` if the input has the wrong shape.
    fn explain(&self, scaled: &[f64]) -> Result<Explanation, ModelError>;
}
