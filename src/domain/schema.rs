//! Attribute schema for the 13-feature heart disease classifier.
//!
//! The declaration order of [`Attribute::ALL`] is the column order the scaler
//! and model were fitted with. Do not reorder.

use serde::{Deserialize, Serialize};

/// Number of input features expected by the scaler and model.
pub const FEATURE_COUNT: usize = 13;

/// How a field is entered and encoded.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldKind {
    /// Closed set of text labels, encoded by a label encoder.
    Categorical { options: &'static [&'static str] },
    /// Bounded number, passed through unless an encoder is loaded for it.
    Numeric { min: f64, max: f64, step: f64 },
}

/// One clinical attribute of a patient record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Attribute {
    Age,
    Sex,
    #[serde(rename = "cp")]
    ChestPain,
    #[serde(rename = "trestbps")]
    RestingBp,
    #[serde(rename = "chol")]
    Cholesterol,
    #[serde(rename = "fbs")]
    FastingBloodSugar,
    #[serde(rename = "restecg")]
    RestEcg,
    #[serde(rename = "thalach")]
    MaxHeartRate,
    #[serde(rename = "exang")]
    ExerciseAngina,
    Oldpeak,
    Slope,
    #[serde(rename = "ca")]
    MajorVessels,
    Thal,
}

pub const SEX_OPTIONS: &[&str] = &["Female", "Male"];
pub const CHEST_PAIN_OPTIONS: &[&str] = &[
    "Typical Angina",
    "Atypical Angina",
    "Non-anginal Pain",
    "Asymptomatic",
];
pub const FASTING_BLOOD_SUGAR_OPTIONS: &[&str] = &["≤ 120 mg/dl (False)", "> 120 mg/dl (True)"];
pub const REST_ECG_OPTIONS: &[&str] = &[
    "Normal",
    "ST-T Wave Abnormality",
    "Left Ventricular Hypertrophy",
];
pub const EXERCISE_ANGINA_OPTIONS: &[&str] = &["No", "Yes"];
pub const SLOPE_OPTIONS: &[&str] = &["Upsloping", "Flat", "Downsloping"];
pub const THAL_OPTIONS: &[&str] = &["Normal", "Fixed Defect", "Reversible Defect", "Unknown"];

impl Attribute {
    /// All attributes in feature-vector order.
    pub const ALL: [Attribute; FEATURE_COUNT] = [
        Attribute::Age,
        Attribute::Sex,
        Attribute::ChestPain,
        Attribute::RestingBp,
        Attribute::Cholesterol,
        Attribute::FastingBloodSugar,
        Attribute::RestEcg,
        Attribute::MaxHeartRate,
        Attribute::ExerciseAngina,
        Attribute::Oldpeak,
        Attribute::Slope,
        Attribute::MajorVessels,
        Attribute::Thal,
    ];

    /// Column key used by the training data and the artifact files.
    #[must_use]
    pub fn key(&self) -> &'static str {
        match self {
            Self::Age => "age",
            Self::Sex => "sex",
            Self::ChestPain => "cp",
            Self::RestingBp => "trestbps",
            Self::Cholesterol => "chol",
            Self::FastingBloodSugar => "fbs",
            Self::RestEcg => "restecg",
            Self::MaxHeartRate => "thalach",
            Self::ExerciseAngina => "exang",
            Self::Oldpeak => "oldpeak",
            Self::Slope => "slope",
            Self::MajorVessels => "ca",
            Self::Thal => "thal",
        }
    }

    /// Human-readable label for forms and charts.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Age => "Age",
            Self::Sex => "Sex",
            Self::ChestPain => "Chest Pain Type",
            Self::RestingBp => "Resting Blood Pressure (mm Hg)",
            Self::Cholesterol => "Cholesterol (mg/dl)",
            Self::FastingBloodSugar => "Fasting Blood Sugar",
            Self::RestEcg => "Resting ECG Results",
            Self::MaxHeartRate => "Max Heart Rate Achieved",
            Self::ExerciseAngina => "Exercise Induced Angina",
            Self::Oldpeak => "ST Depression",
            Self::Slope => "Slope of ST Segment",
            Self::MajorVessels => "# Major Vessels (Fluoroscopy)",
            Self::Thal => "Thalassemia",
        }
    }

    #[must_use]
    pub fn kind(&self) -> FieldKind {
        match self {
            Self::Age => FieldKind::Numeric { min: 1.0, max: 100.0, step: 1.0 },
            Self::Sex => FieldKind::Categorical { options: SEX_OPTIONS },
            Self::ChestPain => FieldKind::Categorical { options: CHEST_PAIN_OPTIONS },
            Self::RestingBp => FieldKind::Numeric { min: 80.0, max: 200.0, step: 1.0 },
            Self::Cholesterol => FieldKind::Numeric { min: 100.0, max: 600.0, step: 1.0 },
            Self::FastingBloodSugar => FieldKind::Categorical {
                options: FASTING_BLOOD_SUGAR_OPTIONS,
            },
            Self::RestEcg => FieldKind::Categorical { options: REST_ECG_OPTIONS },
            Self::MaxHeartRate => FieldKind::Numeric { min: 60.0, max: 220.0, step: 1.0 },
            Self::ExerciseAngina => FieldKind::Categorical {
                options: EXERCISE_ANGINA_OPTIONS,
            },
            Self::Oldpeak => FieldKind::Numeric { min: 0.0, max: 6.0, step: 0.1 },
            Self::Slope => FieldKind::Categorical { options: SLOPE_OPTIONS },
            // Entered from a fixed 0-3 list. Encoded when the artifacts ship an
            // encoder for it, passed through as the number otherwise.
            Self::MajorVessels => FieldKind::Numeric { min: 0.0, max: 3.0, step: 1.0 },
            Self::Thal => FieldKind::Categorical { options: THAL_OPTIONS },
        }
    }

    #[must_use]
    pub fn is_categorical(&self) -> bool {
        matches!(self.kind(), FieldKind::Categorical { .. })
    }

    /// Whether a label encoder may be fitted on this attribute: every
    /// categorical attribute, plus numeric ones that only take whole numbers.
    #[must_use]
    pub fn accepts_encoder(&self) -> bool {
        match self.kind() {
            FieldKind::Categorical { .. } => true,
            FieldKind::Numeric { step, .. } => step >= 1.0,
        }
    }

    /// Numeric attributes that take a fractional part when typed.
    #[must_use]
    pub fn is_fractional(&self) -> bool {
        matches!(self.kind(), FieldKind::Numeric { step, .. } if step < 1.0)
    }

    /// Message for a value outside this attribute's bounds.
    #[must_use]
    pub fn out_of_range_message(&self, value: f64) -> String {
        match self.kind() {
            FieldKind::Numeric { min, max, .. } => {
                format!("{} {} out of range [{}, {}]", self.label(), value, min, max)
            }
            FieldKind::Categorical { .. } => format!("{} {} out of range", self.label(), value),
        }
    }

    /// Position of this attribute in the feature vector.
    #[must_use]
    pub fn index(&self) -> usize {
        Self::ALL
            .iter()
            .position(|a| a == self)
            .unwrap_or_default()
    }

    /// Look up an attribute by its column key.
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|a| a.key() == key)
    }
}

impl std::fmt::Display for Attribute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// Column keys in feature-vector order.
#[must_use]
pub fn feature_keys() -> [&'static str; FEATURE_COUNT] {
    Attribute::ALL.map(|a| a.key())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_order_matches_training_layout() {
        assert_eq!(
            feature_keys(),
            [
                "age", "sex", "cp", "trestbps", "chol", "fbs", "restecg", "thalach", "exang",
                "oldpeak", "slope", "ca", "thal"
            ]
        );
    }

    #[test]
    fn test_index_and_key_lookup() {
        for (i, attr) in Attribute::ALL.iter().enumerate() {
            assert_eq!(attr.index(), i);
            assert_eq!(Attribute::from_key(attr.key()), Some(*attr));
        }
        assert_eq!(Attribute::from_key("bmi"), None);
    }

    #[test]
    fn test_categorical_split() {
        let categorical: Vec<_> = Attribute::ALL
            .iter()
            .filter(|a| a.is_categorical())
            .map(|a| a.key())
            .collect();
        assert_eq!(
            categorical,
            vec!["sex", "cp", "fbs", "restecg", "exang", "slope", "thal"]
        );
    }

    #[test]
    fn test_encoder_targets() {
        assert!(Attribute::Thal.accepts_encoder());
        assert!(Attribute::MajorVessels.accepts_encoder());
        assert!(!Attribute::Oldpeak.accepts_encoder());
        assert!(Attribute::Oldpeak.is_fractional());
        assert!(!Attribute::Age.is_fractional());
    }

    #[test]
    fn test_serde_uses_column_keys() {
        let json = serde_json::to_string(&Attribute::MaxHeartRate).expect("serialize");
        assert_eq!(json, "\"thalach\"");
        let back: Attribute = serde_json::from_str("\"cp\"").expect("deserialize");
        assert_eq!(back, Attribute::ChestPain);
    }
}
