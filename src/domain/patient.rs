//! Patient record for heart disease screening.
//!
//! Field names serialize to the column keys of the training data
//! (`age`, `sex`, `cp`, ...), so a record can be fed from JSON as-is.

use serde::{Deserialize, Serialize};

use super::schema::{
    Attribute, FieldKind, CHEST_PAIN_OPTIONS, EXERCISE_ANGINA_OPTIONS,
    FASTING_BLOOD_SUGAR_OPTIONS, REST_ECG_OPTIONS, SEX_OPTIONS, SLOPE_OPTIONS, THAL_OPTIONS,
};

/// A raw attribute value before encoding.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RawValue<'a> {
    /// Categorical text label, must be known to the attribute's encoder.
    Label(&'a str),
    /// Numeric value, passed through unless the attribute has an encoder.
    Number(f64),
}

/// Raw clinical attributes as entered by the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientRecord {
    /// Age in years (1-100)
    pub age: u8,

    /// "Female" or "Male"
    pub sex: String,

    /// Chest pain type label
    #[serde(rename = "cp")]
    pub chest_pain: String,

    /// Resting blood pressure in mm Hg (80-200)
    #[serde(rename = "trestbps")]
    pub resting_bp: u16,

    /// Serum cholesterol in mg/dl (100-600)
    #[serde(rename = "chol")]
    pub cholesterol: u16,

    /// Fasting blood sugar label
    #[serde(rename = "fbs")]
    pub fasting_blood_sugar: String,

    /// Resting ECG result label
    #[serde(rename = "restecg")]
    pub rest_ecg: String,

    /// Maximum heart rate achieved (60-220)
    #[serde(rename = "thalach")]
    pub max_heart_rate: u16,

    /// Exercise induced angina label ("No" / "Yes")
    #[serde(rename = "exang")]
    pub exercise_angina: String,

    /// ST depression induced by exercise relative to rest (0.0-6.0)
    pub oldpeak: f64,

    /// Slope of the peak exercise ST segment label
    pub slope: String,

    /// Number of major vessels colored by fluoroscopy (0-3)
    #[serde(rename = "ca")]
    pub major_vessels: u8,

    /// Thalassemia result label
    pub thal: String,
}

impl Default for PatientRecord {
    /// Form defaults: slider midpoints and the first option of every select box.
    fn default() -> Self {
        Self {
            age: 45,
            sex: SEX_OPTIONS[0].to_string(),
            chest_pain: CHEST_PAIN_OPTIONS[0].to_string(),
            resting_bp: 120,
            cholesterol: 240,
            fasting_blood_sugar: FASTING_BLOOD_SUGAR_OPTIONS[0].to_string(),
            rest_ecg: REST_ECG_OPTIONS[0].to_string(),
            max_heart_rate: 150,
            exercise_angina: EXERCISE_ANGINA_OPTIONS[0].to_string(),
            oldpeak: 1.0,
            slope: SLOPE_OPTIONS[0].to_string(),
            major_vessels: 0,
            thal: THAL_OPTIONS[0].to_string(),
        }
    }
}

impl PatientRecord {
    /// Raw value of one attribute.
    #[must_use]
    pub fn value(&self, attribute: Attribute) -> RawValue<'_> {
        match attribute {
            Attribute::Age => RawValue::Number(f64::from(self.age)),
            Attribute::Sex => RawValue::Label(&self.sex),
            Attribute::ChestPain => RawValue::Label(&self.chest_pain),
            Attribute::RestingBp => RawValue::Number(f64::from(self.resting_bp)),
            Attribute::Cholesterol => RawValue::Number(f64::from(self.cholesterol)),
            Attribute::FastingBloodSugar => RawValue::Label(&self.fasting_blood_sugar),
            Attribute::RestEcg => RawValue::Label(&self.rest_ecg),
            Attribute::MaxHeartRate => RawValue::Number(f64::from(self.max_heart_rate)),
            Attribute::ExerciseAngina => RawValue::Label(&self.exercise_angina),
            Attribute::Oldpeak => RawValue::Number(self.oldpeak),
            Attribute::Slope => RawValue::Label(&self.slope),
            Attribute::MajorVessels => RawValue::Number(f64::from(self.major_vessels)),
            Attribute::Thal => RawValue::Label(&self.thal),
        }
    }

    /// Check numeric attributes against their schema bounds.
    ///
    /// Categorical labels are not checked here: whether a label is acceptable
    /// is decided by the loaded encoders.
    ///
    /// # Errors
    /// Returns validation errors as a vector of strings.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        for attribute in Attribute::ALL {
            let (FieldKind::Numeric { min, max, .. }, RawValue::Number(v)) =
                (attribute.kind(), self.value(attribute))
            else {
                continue;
            };
            if !v.is_finite() || !(min..=max).contains(&v) {
                errors.push(attribute.out_of_range_message(v));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Typical elevated-risk presentation, used by the form's sample shortcut.
    #[must_use]
    pub fn sample() -> Self {
        Self {
            age: 63,
            sex: "Male".to_string(),
            chest_pain: "Asymptomatic".to_string(),
            resting_bp: 145,
            cholesterol: 286,
            fasting_blood_sugar: "> 120 mg/dl (True)".to_string(),
            rest_ecg: "Left Ventricular Hypertrophy".to_string(),
            max_heart_rate: 108,
            exercise_angina: "Yes".to_string(),
            oldpeak: 2.3,
            slope: "Flat".to_string(),
            major_vessels: 2,
            thal: "Reversible Defect".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_record_is_valid() {
        assert!(PatientRecord::default().validate().is_ok());
        assert!(PatientRecord::sample().validate().is_ok());
    }

    #[test]
    fn test_value_kinds_follow_schema() {
        let record = PatientRecord::default();
        for attribute in Attribute::ALL {
            match (attribute.kind(), record.value(attribute)) {
                (FieldKind::Categorical { .. }, RawValue::Label(_)) => {}
                (FieldKind::Numeric { .. }, RawValue::Number(_)) => {}
                (kind, value) => panic!("{attribute}: {kind:?} holds {value:?}"),
            }
        }
    }

    #[test]
    fn test_validation_reports_each_bad_field() {
        let record = PatientRecord {
            age: 0,
            cholesterol: 700,
            oldpeak: f64::NAN,
            major_vessels: 4,
            ..Default::default()
        };
        let errors = record.validate().expect_err("should be invalid");
        assert_eq!(errors.len(), 4);
        assert!(errors[0].starts_with("Age"));
    }

    #[test]
    fn test_json_uses_column_keys() {
        let json = serde_json::to_value(PatientRecord::default()).expect("serialize");
        assert_eq!(json["cp"], "Typical Angina");
        assert_eq!(json["thalach"], 150);
        assert_eq!(json["ca"], 0);

        let back: PatientRecord = serde_json::from_value(json).expect("deserialize");
        assert_eq!(back, PatientRecord::default());
    }
}
