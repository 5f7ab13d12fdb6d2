//! Diagnosis result types.
//!
//! Represents the classifier verdict and its per-feature explanation.

use serde::{Deserialize, Serialize};

/// Binary classifier output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// Class 0: no disease
    NoDisease,
    /// Class 1: disease indicated
    Disease,
}

impl Verdict {
    /// Message shown to the user for this verdict.
    #[must_use]
    pub fn message(&self) -> &'static str {
        match self {
            Self::NoDisease => "No signs of heart disease detected.",
            Self::Disease => "Warning: Signs of possible heart disease.",
        }
    }

    /// Class label as emitted by the model.
    #[must_use]
    pub fn class_label(&self) -> i64 {
        match self {
            Self::NoDisease => 0,
            Self::Disease => 1,
        }
    }

    /// Get the associated color for TUI display (RGB).
    #[must_use]
    pub fn color(&self) -> (u8, u8, u8) {
        match self {
            Self::NoDisease => (16, 185, 129), // Emerald (#10B981)
            Self::Disease => (244, 63, 94),    // Rose (#F43F5E)
        }
    }
}

impl TryFrom<i64> for Verdict {
    type Error = i64;

    /// Only 0 and 1 are valid; anything else is handed back.
    fn try_from(label: i64) -> Result<Self, Self::Error> {
        match label {
            0 => Ok(Self::NoDisease),
            1 => Ok(Self::Disease),
            other => Err(other),
        }
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoDisease => write!(f, "NO DISEASE"),
            Self::Disease => write!(f, "DISEASE"),
        }
    }
}

/// Contribution of one feature to a single prediction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureAttribution {
    /// Column key of the feature
    pub feature: String,
    /// Scaled input value the model saw
    pub value: f64,
    /// Signed contribution to the decision value
    pub weight: f64,
}

/// Per-feature breakdown of one prediction.
///
/// `base_value + sum(weights)` reconstructs the model's decision value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Explanation {
    /// Model output for the reference (background) input
    pub base_value: f64,
    /// One attribution per input feature, in feature order
    pub attributions: Vec<FeatureAttribution>,
}

impl Explanation {
    /// Attributions ordered by absolute weight, largest first.
    #[must_use]
    pub fn ranked(&self) -> Vec<&FeatureAttribution> {
        let mut ranked: Vec<&FeatureAttribution> = self.attributions.iter().collect();
        ranked.sort_by(|a, b| b.weight.abs().total_cmp(&a.weight.abs()));
        ranked
    }

    /// Sum of base value and all attributions.
    #[must_use]
    pub fn output_value(&self) -> f64 {
        self.base_value + self.attributions.iter().map(|a| a.weight).sum::<f64>()
    }
}

/// Complete diagnosis record for one form submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Diagnosis {
    /// Unique identifier
    pub id: String,

    /// Classifier verdict
    pub verdict: Verdict,

    /// Positive-class probability, when the model is probabilistic
    pub probability: Option<f64>,

    /// Feature attribution breakdown
    pub explanation: Explanation,

    /// Timestamp of diagnosis
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl Diagnosis {
    #[must_use]
    pub fn new(verdict: Verdict, probability: Option<f64>, explanation: Explanation) -> Self {
        Self {
            id: uuid_v4(),
            verdict,
            probability,
            explanation,
            created_at: chrono::Utc::now(),
        }
    }
}

/// Generate a random UUID v4 string.
///
/// Uses ChaCha20Rng seeded from OS entropy so ids are not predictable.
fn uuid_v4() -> String {
    use rand::Rng;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    let mut rng = ChaCha20Rng::from_entropy();
    let bytes: [u8; 16] = rng.gen();

    format!(
        "{:02x}{:02x}{:02x}{:02x}-{:02x}{:02x}-{:02x}{:02x}-{:02x}{:02x}-{:02x}{:02x}{:02x}{:02x}{:02x}{:02x}",
        bytes[0], bytes[1], bytes[2], bytes[3],
        bytes[4], bytes[5],
        (bytes[6] & 0x0f) | 0x40, bytes[7],
        (bytes[8] & 0x3f) | 0x80, bytes[9],
        bytes[10], bytes[11], bytes[12], bytes[13], bytes[14], bytes[15]
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attribution(feature: &str, weight: f64) -> FeatureAttribution {
        FeatureAttribution {
            feature: feature.to_string(),
            value: 0.0,
            weight,
        }
    }

    #[test]
    fn test_verdict_accepts_only_binary_labels() {
        assert_eq!(Verdict::try_from(0), Ok(Verdict::NoDisease));
        assert_eq!(Verdict::try_from(1), Ok(Verdict::Disease));
        assert_eq!(Verdict::try_from(2), Err(2));
        assert_eq!(Verdict::try_from(-1), Err(-1));
    }

    #[test]
    fn test_verdict_messages() {
        assert!(Verdict::NoDisease.message().starts_with("No signs"));
        assert!(Verdict::Disease.message().starts_with("Warning"));
        assert_eq!(Verdict::Disease.class_label(), 1);
    }

    #[test]
    fn test_ranked_by_magnitude() {
        let explanation = Explanation {
            base_value: 0.5,
            attributions: vec![
                attribution("age", 0.1),
                attribution("cp", -0.9),
                attribution("thal", 0.4),
            ],
        };
        let order: Vec<&str> = explanation
            .ranked()
            .iter()
            .map(|a| a.feature.as_str())
            .collect();
        assert_eq!(order, vec!["cp", "thal", "age"]);
        assert!((explanation.output_value() - 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_uuid_generation() {
        let id1 = uuid_v4();
        let id2 = uuid_v4();
        assert_ne!(id1, id2);
        assert_eq!(id1.len(), 36);
        assert_eq!(&id1[14..15], "4");
    }
}
