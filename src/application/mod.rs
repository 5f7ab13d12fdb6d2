//! Application layer: Use cases and services.
//!
//! This module orchestrates domain logic with ports to implement
//! the core use cases of the application.

mod assistant;
mod inference;
mod normalizer;

pub use assistant::ChatAssistant;
pub use inference::InferenceService;
pub use normalizer::{FeatureVector, InputNormalizer};
