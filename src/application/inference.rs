//! Inference service: runs one prediction cycle for a form submission.
//!
//! The cycle is strictly sequential:
//! 1. Validate numeric ranges
//! 2. Normalize (encode categorical labels)
//! 3. Scale
//! 4. Predict and check the verdict is 0 or 1
//! 5. Explain the same scaled vector
//!
//! Any failure ends the cycle. Nothing is retried and no partial result is
//! returned.

use std::sync::Arc;

use crate::adapters::artifacts::ArtifactSet;
use crate::adapters::linear::LinearModel;
use crate::adapters::scaler::Scaler;
use crate::application::normalizer::{FeatureVector, InputNormalizer};
use crate::domain::{Diagnosis, EncoderSet, PatientRecord, UnknownCategoryError, Verdict};
use crate::ports::{Classifier, FeatureScaler, ModelError};
use crate::CardioError;

/// Service for running inference against the loaded artifacts.
///
/// Holds shared, read-only handles to the encoders, scaler and model. All
/// three are loaded once at startup and never mutated.
pub struct InferenceService<C = LinearModel, S = Scaler>
where
    C: Classifier,
    S: FeatureScaler,
{
    encoders: Arc<EncoderSet>,
    scaler: Arc<S>,
    model: Arc<C>,
}

impl InferenceService<LinearModel, Scaler> {
    /// Build the service from a loaded artifact set.
    #[must_use]
    pub fn from_artifacts(artifacts: ArtifactSet) -> Self {
        Self::new(
            Arc::new(artifacts.encoders),
            Arc::new(artifacts.scaler),
            Arc::new(artifacts.model),
        )
    }
}

impl<C, S> InferenceService<C, S>
where
    C: Classifier,
    S: FeatureScaler,
{
    /// Create a new inference service.
    pub fn new(encoders: Arc<EncoderSet>, scaler: Arc<S>, model: Arc<C>) -> Self {
        Self {
            encoders,
            scaler,
            model,
        }
    }

    /// Encode a record without running the model.
    ///
    /// # Errors
    /// Returns `UnknownCategoryError` if a label is not known to its encoder.
    pub fn normalize(&self, record: &PatientRecord) -> Result<FeatureVector, UnknownCategoryError> {
        InputNormalizer::new(&self.encoders).normalize(record)
    }

    /// Run the full prediction cycle on one record.
    ///
    /// # Errors
    /// - `CardioError::Validation` if a numeric field is out of range
    /// - `CardioError::UnknownCategory` if a label cannot be encoded
    /// - `CardioError::Model` if scaling, prediction or explanation fails,
    ///   including a model that returns a class other than 0 or 1
    pub fn run_inference(&self, record: &PatientRecord) -> Result<Diagnosis, CardioError> {
        record
            .validate()
            .map_err(|errors| CardioError::Validation(errors.join(", ")))?;

        tracing::info!("Starting inference cycle...");

        tracing::debug!("Step 1: Encoding categorical attributes...");
        let encoded = self.normalize(record)?;

        tracing::debug!("Step 2: Scaling feature vector...");
        let scaled = self.scaler.transform(encoded.as_slice())?;

        tracing::debug!("Step 3: Predicting...");
        let label = self.model.predict(&scaled)?;
        let verdict = Verdict::try_from(label).map_err(ModelError::InvalidVerdict)?;
        let probability = self.model.predict_proba(&scaled)?;

        tracing::debug!("Step 4: Explaining prediction...");
        let explanation = self.model.explainer().explain(&scaled)?;
        if explanation.attributions.len() != scaled.len() {
            return Err(ModelError::Explanation(format!(
                "got {} attributions for {} features",
                explanation.attributions.len(),
                scaled.len()
            ))
            .into());
        }

        let diagnosis = Diagnosis::new(verdict, probability, explanation);

        tracing::info!(
            "Inference complete: verdict={}, probability={}",
            diagnosis.verdict,
            diagnosis
                .probability
                .map_or_else(|| "n/a".to_string(), |p| format!("{:.1}%", p * 100.0))
        );

        Ok(diagnosis)
    }
}

impl<C, S> Clone for InferenceService<C, S>
where
    C: Classifier,
    S: FeatureScaler,
{
    fn clone(&self) -> Self {
        Self {
            encoders: Arc::clone(&self.encoders),
            scaler: Arc::clone(&self.scaler),
            model: Arc::clone(&self.model),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::linear::tests::demo_model;
    use crate::domain::{form_encoders, Explanation, FeatureAttribution, FEATURE_COUNT};
    use crate::ports::Explainer;

    fn identity_scaler() -> Scaler {
        Scaler::Standard {
            mean: vec![0.0; FEATURE_COUNT],
            scale: vec![1.0; FEATURE_COUNT],
        }
    }

    fn service_with<C: Classifier>(model: C) -> InferenceService<C, Scaler> {
        InferenceService::new(
            Arc::new(form_encoders()),
            Arc::new(identity_scaler()),
            Arc::new(model),
        )
    }

    /// Classifier returning a fixed label and a configurable number of
    /// attributions.
    struct FixedClassifier {
        label: i64,
        attributions: usize,
    }

    struct FixedExplainer {
        attributions: usize,
    }

    impl Explainer for FixedExplainer {
        fn explain(&self, _scaled: &[f64]) -> Result<Explanation, ModelError> {
            Ok(Explanation {
                base_value: 0.0,
                attributions: (0..self.attributions)
                    .map(|i| FeatureAttribution {
                        feature: format!("f{i}"),
                        value: 0.0,
                        weight: 0.0,
                    })
                    .collect(),
            })
        }
    }

    impl Classifier for FixedClassifier {
        fn n_features(&self) -> usize {
            FEATURE_COUNT
        }

        fn predict(&self, _scaled: &[f64]) -> Result<i64, ModelError> {
            Ok(self.label)
        }

        fn predict_proba(&self, _scaled: &[f64]) -> Result<Option<f64>, ModelError> {
            Ok(None)
        }

        fn explainer(&self) -> Box<dyn Explainer + '_> {
            Box::new(FixedExplainer {
                attributions: self.attributions,
            })
        }
    }

    #[test]
    fn test_inference_pipeline() {
        let service = service_with(demo_model());
        let diagnosis = service
            .run_inference(&PatientRecord::default())
            .expect("Should run inference");

        assert!(matches!(
            diagnosis.verdict,
            Verdict::NoDisease | Verdict::Disease
        ));
        let p = diagnosis.probability.expect("logistic model");
        assert!((0.0..=1.0).contains(&p));
        assert_eq!(diagnosis.explanation.attributions.len(), FEATURE_COUNT);
    }

    #[test]
    fn test_verdict_agrees_with_probability() {
        let service = service_with(demo_model());
        for record in [PatientRecord::default(), PatientRecord::sample()] {
            let diagnosis = service.run_inference(&record).expect("inference");
            let p = diagnosis.probability.expect("probability");
            assert_eq!(diagnosis.verdict == Verdict::Disease, p > 0.5);
        }
    }

    #[test]
    fn test_unknown_category_rejects_submission() {
        let service = service_with(demo_model());
        let record = PatientRecord {
            sex: "Other".into(),
            ..PatientRecord::default()
        };
        let err = service.run_inference(&record).expect_err("rejected");
        assert!(matches!(err, CardioError::UnknownCategory(ref e) if e.label == "Other"));
    }

    #[test]
    fn test_out_of_range_rejected_before_encoding() {
        let service = service_with(demo_model());
        let record = PatientRecord {
            age: 130,
            sex: "Other".into(),
            ..PatientRecord::default()
        };
        assert!(matches!(
            service.run_inference(&record),
            Err(CardioError::Validation(_))
        ));
    }

    #[test]
    fn test_non_binary_verdict_is_contract_violation() {
        let service = service_with(FixedClassifier {
            label: 2,
            attributions: FEATURE_COUNT,
        });
        let err = service
            .run_inference(&PatientRecord::default())
            .expect_err("label 2");
        assert!(matches!(err, CardioError::Model(ModelError::InvalidVerdict(2))));
    }

    #[test]
    fn test_attribution_count_enforced() {
        let service = service_with(FixedClassifier {
            label: 1,
            attributions: 12,
        });
        let err = service
            .run_inference(&PatientRecord::default())
            .expect_err("short explanation");
        assert!(matches!(err, CardioError::Model(ModelError::Explanation(_))));

        let service = service_with(FixedClassifier {
            label: 1,
            attributions: FEATURE_COUNT,
        });
        let diagnosis = service
            .run_inference(&PatientRecord::default())
            .expect("full explanation");
        assert_eq!(diagnosis.verdict, Verdict::Disease);
        assert!(diagnosis.probability.is_none());
    }

    #[test]
    fn test_scaler_shape_failure_surfaces() {
        let service = InferenceService::new(
            Arc::new(form_encoders()),
            Arc::new(Scaler::Standard {
                mean: vec![0.0; 5],
                scale: vec![1.0; 5],
            }),
            Arc::new(demo_model()),
        );
        let err = service
            .run_inference(&PatientRecord::default())
            .expect_err("shape");
        assert!(matches!(
            err,
            CardioError::Model(ModelError::ShapeMismatch { expected: 5, actual: 13 })
        ));
    }
}
