//! Domain layer: Core business types and logic.
//!
//! This module contains pure Rust types with no I/O.
//! All types are serializable and validated at construction.

pub mod chat;
mod diagnosis;
mod encoding;
mod patient;
pub mod schema;

pub use chat::{ChatEntry, ChatLog};
pub use diagnosis::{Diagnosis, Explanation, FeatureAttribution, Verdict};
pub use encoding::{EncoderSet, LabelEncoder, SchemaError, UnknownCategoryError};
pub use patient::{PatientRecord, RawValue};
pub use schema::{Attribute, FieldKind, FEATURE_COUNT};

#[cfg(test)]
pub(crate) use encoding::tests::form_encoders;
