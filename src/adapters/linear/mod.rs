//! Linear classifier adapter: Implementation of `Classifier` for fitted
//! linear models.
//!
//! Supports logistic regression (probabilistic) and linear SVC
//! (decision-function only). Both share the same decision function
//! `w·x + b`; the predicted label is `classes[1]` when it is positive.
//!
//! # Explanations
//!
//! For a linear model with independent features the exact attribution of
//! feature `i` is `w_i * (x_i - E[x_i])`. `E[x]` is the `background` vector
//! stored with the model (the mean of the scaled training data, which is all
//! zeros after standardization).

use serde::{Deserialize, Serialize};

use crate::domain::{schema::feature_keys, Explanation, FeatureAttribution, FEATURE_COUNT};
use crate::ports::{Classifier, Explainer, ModelError};

/// Which linear model family the parameters belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinearKind {
    LogisticRegression,
    LinearSvc,
}

/// Fitted linear model as exported by the training pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearModel {
    pub kind: LinearKind,
    pub coefficients: Vec<f64>,
    pub intercept: f64,
    /// Class labels: `[negative, positive]`
    #[serde(default = "default_classes")]
    pub classes: [i64; 2],
    /// Expected scaled input, used as the explanation reference point.
    #[serde(default)]
    pub background: Option<Vec<f64>>,
}

fn default_classes() -> [i64; 2] {
    [0, 1]
}

impl LinearModel {
    /// Check parameter consistency.
    ///
    /// # Errors
    /// Returns a description of the first inconsistency.
    pub fn check(&self) -> Result<(), String> {
        if self.coefficients.is_empty() {
            return Err("model has no coefficients".into());
        }
        if self.coefficients.iter().any(|c| !c.is_finite()) || !self.intercept.is_finite() {
            return Err("model parameters contain non-finite values".into());
        }
        if let Some(background) = &self.background {
            if background.len() != self.coefficients.len() {
                return Err(format!(
                    "background has {} values, expected {}",
                    background.len(),
                    self.coefficients.len()
                ));
            }
        }
        if self.classes[0] == self.classes[1] {
            return Err("model classes must be distinct".into());
        }
        Ok(())
    }

    /// Raw decision value `w·x + b`.
    fn decision(&self, scaled: &[f64]) -> Result<f64, ModelError> {
        ModelError::check_input(scaled, self.coefficients.len())?;
        Ok(dot(&self.coefficients, scaled) + self.intercept)
    }

    fn background_at(&self, i: usize) -> f64 {
        self.background
            .as_ref()
            .and_then(|b| b.get(i).copied())
            .unwrap_or(0.0)
    }
}

fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

impl Classifier for LinearModel {
    fn n_features(&self) -> usize {
        self.coefficients.len()
    }

    fn predict(&self, scaled: &[f64]) -> Result<i64, ModelError> {
        let decision = self.decision(scaled)?;
        let label = if decision > 0.0 {
            self.classes[1]
        } else {
            self.classes[0]
        };
        tracing::debug!("decision={decision:.4} label={label}");
        Ok(label)
    }

    fn predict_proba(&self, scaled: &[f64]) -> Result<Option<f64>, ModelError> {
        let decision = self.decision(scaled)?;
        Ok(match self.kind {
            LinearKind::LogisticRegression => Some(sigmoid(decision)),
            LinearKind::LinearSvc => None,
        })
    }

    fn explainer(&self) -> Box<dyn Explainer + '_> {
        Box::new(LinearExplainer::new(self))
    }
}

/// Exact attributions for a linear model.
pub struct LinearExplainer<'m> {
    model: &'m LinearModel,
}

impl<'m> LinearExplainer<'m> {
    #[must_use]
    pub fn new(model: &'m LinearModel) -> Self {
        Self { model }
    }
}

impl Explainer for LinearExplainer<'_> {
    fn explain(&self, scaled: &[f64]) -> Result<Explanation, ModelError> {
        let model = self.model;
        ModelError::check_input(scaled, model.coefficients.len())?;

        let n = model.coefficients.len();
        let names: Vec<String> = if n == FEATURE_COUNT {
            feature_keys().iter().map(|k| (*k).to_string()).collect()
        } else {
            (0..n).map(|i| format!("x{i}")).collect()
        };

        let base_value = (0..n)
            .map(|i| model.coefficients[i] * model.background_at(i))
            .sum::<f64>()
            + model.intercept;

        let attributions = names
            .into_iter()
            .enumerate()
            .map(|(i, feature)| FeatureAttribution {
                feature,
                value: scaled[i],
                weight: model.coefficients[i] * (scaled[i] - model.background_at(i)),
            })
            .collect();

        Ok(Explanation {
            base_value,
            attributions,
        })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Logistic model over the 13 schema features with distinct weights.
    pub(crate) fn demo_model() -> LinearModel {
        LinearModel {
            kind: LinearKind::LogisticRegression,
            coefficients: vec![
                0.25, 0.6, -0.8, 0.3, 0.2, 0.1, 0.15, -0.5, 0.7, 0.55, -0.45, 0.9, 0.65,
            ],
            intercept: -0.2,
            classes: [0, 1],
            background: None,
        }
    }

    #[test]
    fn test_predict_thresholds_on_decision() {
        let model = demo_model();
        let mut x = vec![0.0; 13];
        // decision = -0.2
        assert_eq!(model.predict(&x).expect("predict"), 0);
        x[11] = 1.0; // + 0.9
        assert_eq!(model.predict(&x).expect("predict"), 1);
    }

    #[test]
    fn test_probability_only_for_logistic() {
        let mut model = demo_model();
        let x = vec![0.0; 13];
        let p = model.predict_proba(&x).expect("proba").expect("logistic");
        assert!((p - sigmoid(-0.2)).abs() < 1e-12);

        model.kind = LinearKind::LinearSvc;
        assert_eq!(model.predict_proba(&x).expect("proba"), None);
    }

    #[test]
    fn test_custom_class_labels_are_returned_verbatim() {
        let mut model = demo_model();
        model.classes = [1, 2];
        assert_eq!(model.predict(&[0.0; 13]).expect("predict"), 1);
    }

    #[test]
    fn test_explanation_has_one_weight_per_feature() {
        let model = demo_model();
        let x: Vec<f64> = (0..13_i32).map(|i| f64::from(i) / 10.0 - 0.6).collect();
        let explanation = model.explainer().explain(&x).expect("explain");
        assert_eq!(explanation.attributions.len(), 13);
        assert_eq!(explanation.attributions[2].feature, "cp");
    }

    #[test]
    fn test_attributions_sum_to_decision() {
        let mut model = demo_model();
        model.background = Some(vec![0.1; 13]);
        let x: Vec<f64> = (0..13_i32).map(|i| f64::from(i) * 0.3 - 1.0).collect();

        let explanation = model.explainer().explain(&x).expect("explain");
        let decision = model.decision(&x).expect("decision");
        assert!((explanation.output_value() - decision).abs() < 1e-9);
    }

    #[test]
    fn test_wrong_width_rejected() {
        let model = demo_model();
        assert!(matches!(
            model.predict(&[0.0; 5]),
            Err(ModelError::ShapeMismatch { expected: 13, actual: 5 })
        ));
        assert!(model.explainer().explain(&[0.0; 14]).is_err());
    }

    #[test]
    fn test_check() {
        assert!(demo_model().check().is_ok());

        let mut bad = demo_model();
        bad.background = Some(vec![0.0; 3]);
        assert!(bad.check().is_err());

        let mut bad = demo_model();
        bad.classes = [1, 1];
        assert!(bad.check().is_err());
    }

    #[test]
    fn test_parse_json() {
        let json = r#"{"kind":"linear_svc","coefficients":[1.0,-1.0],"intercept":0.5}"#;
        let model: LinearModel = serde_json::from_str(json).expect("parse");
        assert_eq!(model.kind, LinearKind::LinearSvc);
        assert_eq!(model.classes, [0, 1]);
        assert!(model.background.is_none());
    }
}
