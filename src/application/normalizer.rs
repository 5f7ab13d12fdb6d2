//! Input normalizer: maps a raw patient record onto the encoded feature
//! vector the scaler and model were fitted on.

use crate::domain::{Attribute, EncoderSet, PatientRecord, UnknownCategoryError, FEATURE_COUNT};

/// Encoded, unscaled feature vector in schema order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector([f64; FEATURE_COUNT]);

impl FeatureVector {
    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    #[must_use]
    pub fn get(&self, attribute: Attribute) -> f64 {
        self.0[attribute.index()]
    }
}

/// Encodes categorical labels and passes numeric values through, unless the
/// loaded encoders cover that numeric attribute too.
pub struct InputNormalizer<'a> {
    encoders: &'a EncoderSet,
}

impl<'a> InputNormalizer<'a> {
    #[must_use]
    pub fn new(encoders: &'a EncoderSet) -> Self {
        Self { encoders }
    }

    /// Normalize one record.
    ///
    /// # Errors
    /// Returns `UnknownCategoryError` for the first value an encoder does not
    /// know. No partial vector is produced.
    pub fn normalize(&self, record: &PatientRecord) -> Result<FeatureVector, UnknownCategoryError> {
        let mut out = [0.0; FEATURE_COUNT];
        for (slot, attribute) in out.iter_mut().zip(Attribute::ALL) {
            *slot = self.encoders.encode_value(attribute, record.value(attribute))?;
        }
        Ok(FeatureVector(out))
    }
}
