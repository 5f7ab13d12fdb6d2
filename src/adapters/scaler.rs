//! Fitted scaler artifacts.
//!
//! Two transforms are supported, matching the usual preprocessing choices:
//! standardization (`(x - mean) / scale`) and min-max scaling into a
//! feature range.

use serde::{Deserialize, Serialize};

use crate::ports::{FeatureScaler, ModelError};

/// Scaler parameters as exported next to the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Scaler {
    Standard {
        mean: Vec<f64>,
        scale: Vec<f64>,
    },
    MinMax {
        data_min: Vec<f64>,
        data_max: Vec<f64>,
        #[serde(default = "default_feature_range")]
        feature_range: (f64, f64),
    },
}

fn default_feature_range() -> (f64, f64) {
    (0.0, 1.0)
}

impl Scaler {
    /// Check that all parameter vectors agree in width and are finite.
    ///
    /// # Errors
    /// Returns a description of the first inconsistency.
    pub fn check(&self) -> Result<(), String> {
        let params: [(&str, &[f64]); 2] = match self {
            Self::Standard { mean, scale } => [("mean", mean.as_slice()), ("scale", scale.as_slice())],
            Self::MinMax {
                data_min, data_max, ..
            } => [
                ("data_min", data_min.as_slice()),
                ("data_max", data_max.as_slice()),
            ],
        };
        let width = params[0].1.len();
        if width == 0 {
            return Err("scaler has no features".into());
        }
        for (name, values) in params {
            if values.len() != width {
                return Err(format!(
                    "scaler {name} has {} values, expected {width}",
                    values.len()
                ));
            }
            if values.iter().any(|v| !v.is_finite()) {
                return Err(format!("scaler {name} contains non-finite values"));
            }
        }
        if let Self::MinMax {
            feature_range: (lo, hi),
            ..
        } = self
        {
            if !(lo < hi) {
                return Err(format!("invalid feature_range ({lo}, {hi})"));
            }
        }
        Ok(())
    }
}

/// Zero spread is treated as unit spread so constant features map to a constant.
fn nonzero(spread: f64) -> f64 {
    if spread == 0.0 {
        1.0
    } else {
        spread
    }
}

impl FeatureScaler for Scaler {
    fn n_features(&self) -> usize {
        match self {
            Self::Standard { mean, .. } => mean.len(),
            Self::MinMax { data_min, .. } => data_min.len(),
        }
    }

    fn transform(&self, input: &[f64]) -> Result<Vec<f64>, ModelError> {
        ModelError::check_input(input, self.n_features())?;

        let out = match self {
            Self::Standard { mean, scale } => input
                .iter()
                .zip(mean.iter().zip(scale))
                .map(|(x, (m, s))| (x - m) / nonzero(*s))
                .collect(),
            Self::MinMax {
                data_min,
                data_max,
                feature_range: (lo, hi),
            } => input
                .iter()
                .zip(data_min.iter().zip(data_max))
                .map(|(x, (min, max))| {
                    let unit = (x - min) / nonzero(max - min);
                    unit * (hi - lo) + lo
                })
                .collect(),
        };
        Ok(out)
    }
}
