//! Label encoders for categorical attributes.
//!
//! Encoders are learned at training time and loaded once at startup. An
//! [`EncoderSet`] is checked against the attribute schema when it is built,
//! so lookups at inference time only fail on unknown labels.
//!
//! Whole-number attributes such as `ca` may also carry an encoder. Their
//! value is looked up by its decimal text, so `2.0` matches class `"2"` or `2`.

use std::collections::{BTreeMap, HashMap, HashSet};

use serde::{Deserialize, Serialize};

use super::patient::RawValue;
use super::schema::{Attribute, FieldKind};

/// A raw label was not among the encoder's training-time classes.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown category {label:?} for {attribute} (known: {})", known.join(", "))]
pub struct UnknownCategoryError {
    pub attribute: Attribute,
    pub label: String,
    pub known: Vec<String>,
}

/// The encoder map does not fit the attribute schema.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    #[error("no encoder for categorical attribute {0}")]
    MissingEncoder(Attribute),

    #[error("encoder targets unknown attribute {0:?}")]
    UnknownAttribute(String),

    #[error("encoder targets fractional attribute {0}")]
    FractionalAttribute(Attribute),

    #[error("encoder for {0} has no classes")]
    EmptyClasses(Attribute),

    #[error("encoder for {attribute} lists class {class:?} more than once")]
    DuplicateClass { attribute: Attribute, class: String },
}

/// Label to integer mapping: a label encodes to its index in `classes`.
///
/// Classes may be written as JSON strings or numbers; numbers are kept as
/// their decimal text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelEncoder {
    #[serde(deserialize_with = "deserialize_classes")]
    pub classes: Vec<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ClassLabel {
    Text(String),
    Integer(i64),
    Float(f64),
}

fn deserialize_classes<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = Vec::<ClassLabel>::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .map(|label| match label {
            ClassLabel::Text(text) => text,
            ClassLabel::Integer(n) => n.to_string(),
            ClassLabel::Float(x) => x.to_string(),
        })
        .collect())
}

impl LabelEncoder {
    #[must_use]
    pub fn new<I, S>(classes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            classes: classes.into_iter().map(Into::into).collect(),
        }
    }

    /// Class index of `label`, or `None` if it was not seen during training.
    #[must_use]
    pub fn transform(&self, label: &str) -> Option<usize> {
        self.classes.iter().position(|c| c == label)
    }
}

/// Per-attribute encoders, immutable after construction.
#[derive(Debug, Clone)]
pub struct EncoderSet {
    encoders: BTreeMap<Attribute, LabelEncoder>,
}

impl EncoderSet {
    /// Build an encoder set from a column-key keyed map.
    ///
    /// # Errors
    /// Returns `SchemaError` if any categorical attribute lacks an encoder,
    /// an encoder names an unknown or fractional attribute, or an encoder's
    /// classes are empty or repeated.
    pub fn new(raw: HashMap<String, LabelEncoder>) -> Result<Self, SchemaError> {
        let mut encoders = BTreeMap::new();

        for (key, encoder) in raw {
            let attribute =
                Attribute::from_key(&key).ok_or_else(|| SchemaError::UnknownAttribute(key))?;
            if !attribute.accepts_encoder() {
                return Err(SchemaError::FractionalAttribute(attribute));
            }
            if encoder.classes.is_empty() {
                return Err(SchemaError::EmptyClasses(attribute));
            }
            let mut seen = HashSet::new();
            for class in &encoder.classes {
                if !seen.insert(class.as_str()) {
                    return Err(SchemaError::DuplicateClass {
                        attribute,
                        class: class.clone(),
                    });
                }
            }
            encoders.insert(attribute, encoder);
        }

        if let Some(missing) = Attribute::ALL
            .iter()
            .find(|a| a.is_categorical() && !encoders.contains_key(*a))
        {
            return Err(SchemaError::MissingEncoder(*missing));
        }

        Ok(Self { encoders })
    }

    #[must_use]
    pub fn get(&self, attribute: Attribute) -> Option<&LabelEncoder> {
        self.encoders.get(&attribute)
    }

    /// Encode one label for one attribute.
    ///
    /// # Errors
    /// Returns `UnknownCategoryError` if the label is not a known class (or the
    /// attribute has no encoder).
    pub fn encode(&self, attribute: Attribute, label: &str) -> Result<usize, UnknownCategoryError> {
        let encoder = self.encoders.get(&attribute);
        encoder
            .and_then(|e| e.transform(label))
            .ok_or_else(|| UnknownCategoryError {
                attribute,
                label: label.to_string(),
                known: encoder.map(|e| e.classes.clone()).unwrap_or_default(),
            })
    }

    /// Feature value for one raw attribute value.
    ///
    /// Labels always go through their encoder. Numbers go through one only if
    /// the set has an encoder for that attribute.
    ///
    /// # Errors
    /// Returns `UnknownCategoryError` if the encoder does not know the value.
    pub fn encode_value(
        &self,
        attribute: Attribute,
        value: RawValue<'_>,
    ) -> Result<f64, UnknownCategoryError> {
        match value {
            RawValue::Label(label) => self.encode(attribute, label).map(|i| i as f64),
            RawValue::Number(v) if self.encoders.contains_key(&attribute) => {
                self.encode(attribute, &v.to_string()).map(|i| i as f64)
            }
            RawValue::Number(v) => Ok(v),
        }
    }

    /// Form options that the loaded encoders cannot encode.
    ///
    /// A non-empty result means some form selections will be rejected.
    #[must_use]
    pub fn unencodable_form_options(&self) -> Vec<(Attribute, &'static str)> {
        let mut out = Vec::new();
        for attribute in Attribute::ALL {
            if let FieldKind::Categorical { options } = attribute.kind() {
                for option in options {
                    if self.encode(attribute, option).is_err() {
                        out.push((attribute, *option));
                    }
                }
            }
        }
        out
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Encoders as fitted on the form labels (classes sorted, as a fitted
    /// encoder stores them).
    pub(crate) fn form_encoders() -> EncoderSet {
        let mut raw = HashMap::new();
        for attribute in Attribute::ALL {
            if let FieldKind::Categorical { options } = attribute.kind() {
                let mut classes: Vec<&str> = options.to_vec();
                classes.sort_unstable();
                raw.insert(attribute.key().to_string(), LabelEncoder::new(classes));
            }
        }
        EncoderSet::new(raw).expect("form encoders fit the schema")
    }

    #[test]
    fn test_transform_uses_class_position() {
        let enc = LabelEncoder::new(["Downsloping", "Flat", "Upsloping"]);
        assert_eq!(enc.transform("Flat"), Some(1));
        assert_eq!(enc.transform("Upsloping"), Some(2));
        assert_eq!(enc.transform("flat"), None);
    }

    #[test]
    fn test_form_options_are_all_encodable() {
        let set = form_encoders();
        assert!(set.unencodable_form_options().is_empty());
        assert_eq!(set.encode(Attribute::Sex, "Male"), Ok(1));
    }

    #[test]
    fn test_unknown_label_is_an_error() {
        let set = form_encoders();
        let err = set.encode(Attribute::Thal, "Mild").expect_err("unknown label");
        assert_eq!(err.attribute, Attribute::Thal);
        assert_eq!(err.label, "Mild");
        assert_eq!(err.known.len(), 4);
        assert!(err.to_string().contains("thal"));
    }

    #[test]
    fn test_missing_encoder_rejected() {
        let mut raw = HashMap::new();
        raw.insert("sex".to_string(), LabelEncoder::new(["Female", "Male"]));
        let err = EncoderSet::new(raw).expect_err("incomplete");
        assert!(matches!(err, SchemaError::MissingEncoder(_)));
    }

    #[test]
    fn test_fractional_and_unknown_targets_rejected() {
        let mut raw = HashMap::new();
        raw.insert("oldpeak".to_string(), LabelEncoder::new(["1.5"]));
        assert_eq!(
            EncoderSet::new(raw).expect_err("fractional"),
            SchemaError::FractionalAttribute(Attribute::Oldpeak)
        );

        let mut raw = HashMap::new();
        raw.insert("bmi".to_string(), LabelEncoder::new(["x"]));
        assert_eq!(
            EncoderSet::new(raw).expect_err("unknown"),
            SchemaError::UnknownAttribute("bmi".into())
        );
    }

    #[test]
    fn test_duplicate_classes_rejected() {
        let mut raw = HashMap::new();
        raw.insert("exang".to_string(), LabelEncoder::new(["No", "No"]));
        assert!(matches!(
            EncoderSet::new(raw),
            Err(SchemaError::DuplicateClass { .. })
        ));
    }

    #[test]
    fn test_partial_encoder_reports_unencodable_options() {
        let set = form_encoders();
        let mut raw: HashMap<String, LabelEncoder> = Attribute::ALL
            .iter()
            .filter_map(|a| set.get(*a).map(|e| (a.key().to_string(), e.clone())))
            .collect();
        raw.insert("thal".to_string(), LabelEncoder::new(["Normal", "Fixed Defect"]));
        let set = EncoderSet::new(raw).expect("valid schema");

        let missing = set.unencodable_form_options();
        assert_eq!(
            missing,
            vec![(Attribute::Thal, "Reversible Defect"), (Attribute::Thal, "Unknown")]
        );
    }

    #[test]
    fn test_whole_number_attribute_takes_optional_encoder() {
        let json = r#"{"classes": [3, 2, 1, 0]}"#;
        let ca: LabelEncoder = serde_json::from_str(json).expect("numeric classes");
        assert_eq!(ca.classes, ["3", "2", "1", "0"]);

        let mut raw: HashMap<String, LabelEncoder> = Attribute::ALL
            .iter()
            .filter_map(|a| form_encoders().get(*a).map(|e| (a.key().to_string(), e.clone())))
            .collect();
        raw.insert("ca".to_string(), ca);
        let set = EncoderSet::new(raw).expect("ca encoder accepted");

        let value = set
            .encode_value(Attribute::MajorVessels, RawValue::Number(1.0))
            .expect("known vessel count");
        assert_eq!(value, 2.0);
        assert!(set
            .encode_value(Attribute::MajorVessels, RawValue::Number(4.0))
            .is_err());

        // Without an encoder the number passes through.
        assert_eq!(
            form_encoders().encode_value(Attribute::MajorVessels, RawValue::Number(2.0)),
            Ok(2.0)
        );
    }
}
