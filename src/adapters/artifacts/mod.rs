//! Artifact loader: reads the fitted encoders, scaler and model from disk.
//!
//! Three JSON files are expected in the artifact directory:
//! - `best_model.json`: linear classifier parameters
//! - `scaler.json`: fitted scaler
//! - `label_encoders.json`: column key -> `{ "classes": [...] }`
//!
//! Loading is all-or-nothing: any missing, unreadable or mutually
//! incompatible artifact fails the whole load.
//!
//! # Integrity
//!
//! If `manifest.json` is present it must bind every artifact to its SHA-256
//! digest, and every digest must match. Without a manifest the load proceeds
//! with a warning, unless the caller requires one.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::adapters::linear::LinearModel;
use crate::adapters::scaler::Scaler;
use crate::domain::{EncoderSet, LabelEncoder, SchemaError, FEATURE_COUNT};
use crate::ports::{Classifier, FeatureScaler};

pub const MODEL_FILE: &str = "best_model.json";
pub const SCALER_FILE: &str = "scaler.json";
pub const ENCODERS_FILE: &str = "label_encoders.json";
pub const MANIFEST_FILE: &str = "manifest.json";

/// Artifact files in load order.
pub const ARTIFACT_FILES: [&str; 3] = [MODEL_FILE, SCALER_FILE, ENCODERS_FILE];

/// Errors that prevent the artifacts from loading.
#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    #[error("artifact directory not found: {0:?}")]
    DirectoryNotFound(PathBuf),

    #[error("missing artifact {0:?}")]
    Missing(PathBuf),

    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid {file}: {source}")]
    Parse {
        file: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("integrity check failed: {0}")]
    Integrity(String),

    #[error("incompatible artifacts: {0}")]
    Incompatible(String),

    #[error("encoders do not fit the attribute schema: {0}")]
    Schema(#[from] SchemaError),
}

/// Digest manifest written by `hash_artifacts`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactManifest {
    pub version: u32,
    /// File name -> lowercase hex SHA-256
    pub files: BTreeMap<String, String>,
}

impl ArtifactManifest {
    pub const VERSION: u32 = 1;

    /// Hash the artifact files in `dir`.
    ///
    /// # Errors
    /// Returns `ArtifactError` if any artifact is missing or unreadable.
    pub fn for_directory(dir: &Path) -> Result<Self, ArtifactError> {
        let mut files = BTreeMap::new();
        for name in ARTIFACT_FILES {
            let bytes = read_artifact(&dir.join(name))?;
            files.insert(name.to_string(), sha256_hex(&bytes));
        }
        Ok(Self {
            version: Self::VERSION,
            files,
        })
    }
}

/// Options controlling artifact loading.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoadOptions {
    /// Refuse to load when `manifest.json` is absent.
    pub require_manifest: bool,
}

/// The fitted encoders, scaler and model, immutable once loaded.
#[derive(Debug, Clone)]
pub struct ArtifactSet {
    pub encoders: EncoderSet,
    pub scaler: Scaler,
    pub model: LinearModel,
}

#[must_use]
pub fn sha256_hex(bytes: &[u8]) -> String {
    Sha256::digest(bytes)
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect()
}

// Constant-time compare for ASCII strings (used for SHA-256 hex digests).
fn constant_time_eq_str(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.bytes()
        .zip(b.bytes())
        .fold(0u8, |diff, (x, y)| diff | (x ^ y))
        == 0
}

fn read_artifact(path: &Path) -> Result<Vec<u8>, ArtifactError> {
    if !path.exists() {
        return Err(ArtifactError::Missing(path.to_path_buf()));
    }
    fs::read(path).map_err(|source| ArtifactError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn parse<T: serde::de::DeserializeOwned>(
    file: &'static str,
    bytes: &[u8],
) -> Result<T, ArtifactError> {
    serde_json::from_slice(bytes).map_err(|source| ArtifactError::Parse { file, source })
}

fn verify_manifest(
    dir: &Path,
    contents: &[(&'static str, Vec<u8>)],
    options: LoadOptions,
) -> Result<(), ArtifactError> {
    let manifest_path = dir.join(MANIFEST_FILE);
    if !manifest_path.exists() {
        if options.require_manifest {
            return Err(ArtifactError::Integrity(format!(
                "{MANIFEST_FILE} required but not found in {dir:?}"
            )));
        }
        tracing::warn!("No {MANIFEST_FILE} in {:?}; loading artifacts unverified", dir);
        return Ok(());
    }

    let manifest: ArtifactManifest = parse(MANIFEST_FILE, &read_artifact(&manifest_path)?)?;
    if manifest.version != ArtifactManifest::VERSION {
        return Err(ArtifactError::Integrity(format!(
            "unsupported manifest version {}",
            manifest.version
        )));
    }

    for (name, bytes) in contents {
        let expected = manifest
            .files
            .get(*name)
            .ok_or_else(|| ArtifactError::Integrity(format!("{name} not listed in manifest")))?;
        if !constant_time_eq_str(&sha256_hex(bytes), &expected.to_ascii_lowercase()) {
            return Err(ArtifactError::Integrity(format!("hash mismatch for {name}")));
        }
    }

    tracing::info!("Verified {} artifacts against {MANIFEST_FILE}", contents.len());
    Ok(())
}

/// Load and cross-check all artifacts from `dir`.
///
/// # Errors
/// Returns `ArtifactError` if any artifact is missing, malformed, fails the
/// integrity check, or disagrees with the 13-attribute schema.
pub fn load_artifacts(dir: &Path, options: LoadOptions) -> Result<ArtifactSet, ArtifactError> {
    if !dir.is_dir() {
        return Err(ArtifactError::DirectoryNotFound(dir.to_path_buf()));
    }

    let mut contents = Vec::with_capacity(ARTIFACT_FILES.len());
    for name in ARTIFACT_FILES {
        contents.push((name, read_artifact(&dir.join(name))?));
    }
    verify_manifest(dir, &contents, options)?;

    let model: LinearModel = parse(MODEL_FILE, &contents[0].1)?;
    let scaler: Scaler = parse(SCALER_FILE, &contents[1].1)?;
    let raw_encoders: HashMap<String, LabelEncoder> = parse(ENCODERS_FILE, &contents[2].1)?;

    model
        .check()
        .map_err(|e| ArtifactError::Incompatible(format!("{MODEL_FILE}: {e}")))?;
    scaler
        .check()
        .map_err(|e| ArtifactError::Incompatible(format!("{SCALER_FILE}: {e}")))?;

    if scaler.n_features() != FEATURE_COUNT {
        return Err(ArtifactError::Incompatible(format!(
            "scaler expects {} features, schema has {FEATURE_COUNT}",
            scaler.n_features()
        )));
    }
    if model.n_features() != FEATURE_COUNT {
        return Err(ArtifactError::Incompatible(format!(
            "model expects {} features, schema has {FEATURE_COUNT}",
            model.n_features()
        )));
    }

    let encoders = EncoderSet::new(raw_encoders)?;
    for (attribute, option) in encoders.unencodable_form_options() {
        tracing::warn!("Form option {option:?} for {attribute} is unknown to its encoder");
    }

    tracing::info!(
        "Loaded artifacts from {:?} (model={:?}, n_features={})",
        dir,
        model.kind,
        FEATURE_COUNT
    );

    Ok(ArtifactSet {
        encoders,
        scaler,
        model,
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::adapters::linear::tests::demo_model;
    use crate::domain::{Attribute, FieldKind};
    use tempfile::tempdir;

    pub(crate) fn write_demo_artifacts(dir: &Path) {
        let model = serde_json::to_vec(&demo_model()).expect("serialize model");
        let scaler = Scaler::Standard {
            mean: vec![
                54.4, 0.68, 1.1, 131.7, 246.7, 0.15, 0.99, 149.6, 0.33, 1.04, 1.4, 0.73, 1.7,
            ],
            scale: vec![
                9.0, 0.47, 1.0, 17.5, 51.6, 0.36, 0.9, 22.9, 0.47, 1.16, 0.6, 1.02, 1.1,
            ],
        };
        let scaler = serde_json::to_vec(&scaler).expect("serialize scaler");

        let mut encoders = BTreeMap::new();
        for attribute in Attribute::ALL {
            if let FieldKind::Categorical { options } = attribute.kind() {
                encoders.insert(attribute.key(), LabelEncoder::new(options.iter().copied()));
            }
        }
        let encoders = serde_json::to_vec(&encoders).expect("serialize encoders");

        fs::write(dir.join(MODEL_FILE), model).expect("write model");
        fs::write(dir.join(SCALER_FILE), scaler).expect("write scaler");
        fs::write(dir.join(ENCODERS_FILE), encoders).expect("write encoders");
    }

    fn write_manifest(dir: &Path) {
        let manifest = ArtifactManifest::for_directory(dir).expect("hash artifacts");
        fs::write(
            dir.join(MANIFEST_FILE),
            serde_json::to_vec_pretty(&manifest).expect("serialize manifest"),
        )
        .expect("write manifest");
    }

    #[test]
    fn test_load_unverified() {
        let temp = tempdir().expect("tempdir");
        write_demo_artifacts(temp.path());

        let set = load_artifacts(temp.path(), LoadOptions::default()).expect("load");
        assert_eq!(set.model.n_features(), FEATURE_COUNT);
        assert_eq!(set.scaler.n_features(), FEATURE_COUNT);
        assert!(set.encoders.get(Attribute::Thal).is_some());
    }

    #[test]
    fn test_missing_manifest_rejected_when_required() {
        let temp = tempdir().expect("tempdir");
        write_demo_artifacts(temp.path());

        let err = load_artifacts(
            temp.path(),
            LoadOptions {
                require_manifest: true,
            },
        )
        .expect_err("manifest required");
        assert!(matches!(err, ArtifactError::Integrity(_)));
    }

    #[test]
    fn test_load_with_manifest() {
        let temp = tempdir().expect("tempdir");
        write_demo_artifacts(temp.path());
        write_manifest(temp.path());

        let options = LoadOptions {
            require_manifest: true,
        };
        assert!(load_artifacts(temp.path(), options).is_ok());
    }

    #[test]
    fn test_tampered_artifact_rejected() {
        let temp = tempdir().expect("tempdir");
        write_demo_artifacts(temp.path());
        write_manifest(temp.path());

        let mut model = demo_model();
        model.intercept = 5.0;
        fs::write(
            temp.path().join(MODEL_FILE),
            serde_json::to_vec(&model).expect("serialize"),
        )
        .expect("overwrite model");

        let err = load_artifacts(temp.path(), LoadOptions::default()).expect_err("tampered");
        assert!(err.to_string().contains("hash mismatch for best_model.json"));
    }

    #[test]
    fn test_missing_artifact_fails_whole_load() {
        let temp = tempdir().expect("tempdir");
        write_demo_artifacts(temp.path());
        fs::remove_file(temp.path().join(SCALER_FILE)).expect("remove scaler");

        let err = load_artifacts(temp.path(), LoadOptions::default()).expect_err("missing");
        assert!(matches!(err, ArtifactError::Missing(p) if p.ends_with(SCALER_FILE)));
    }

    #[test]
    fn test_incompatible_width_rejected() {
        let temp = tempdir().expect("tempdir");
        write_demo_artifacts(temp.path());
        let scaler = Scaler::Standard {
            mean: vec![0.0; 12],
            scale: vec![1.0; 12],
        };
        fs::write(
            temp.path().join(SCALER_FILE),
            serde_json::to_vec(&scaler).expect("serialize"),
        )
        .expect("overwrite scaler");

        let err = load_artifacts(temp.path(), LoadOptions::default()).expect_err("width");
        assert!(matches!(err, ArtifactError::Incompatible(_)));
    }

    #[test]
    fn test_encoder_schema_checked_at_load() {
        let temp = tempdir().expect("tempdir");
        write_demo_artifacts(temp.path());
        fs::write(
            temp.path().join(ENCODERS_FILE),
            r#"{"sex":{"classes":["Female","Male"]}}"#,
        )
        .expect("overwrite encoders");

        let err = load_artifacts(temp.path(), LoadOptions::default()).expect_err("schema");
        assert!(matches!(err, ArtifactError::Schema(SchemaError::MissingEncoder(_))));
    }

    #[test]
    fn test_optional_vessel_encoder_loads() {
        let temp = tempdir().expect("tempdir");
        write_demo_artifacts(temp.path());
        let path = temp.path().join(ENCODERS_FILE);
        let mut encoders: serde_json::Value =
            serde_json::from_slice(&fs::read(&path).expect("read encoders")).expect("parse");
        encoders["ca"] = serde_json::json!({ "classes": [0, 1, 2, 3] });
        fs::write(&path, serde_json::to_vec(&encoders).expect("serialize")).expect("write");

        let set = load_artifacts(temp.path(), LoadOptions::default()).expect("load");
        let ca = set.encoders.get(Attribute::MajorVessels).expect("ca encoder");
        assert_eq!(ca.classes, ["0", "1", "2", "3"]);
    }

    #[test]
    fn test_malformed_json_reports_file() {
        let temp = tempdir().expect("tempdir");
        write_demo_artifacts(temp.path());
        fs::write(temp.path().join(MODEL_FILE), "{not json").expect("overwrite model");

        let err = load_artifacts(temp.path(), LoadOptions::default()).expect_err("parse");
        assert!(matches!(err, ArtifactError::Parse { file: MODEL_FILE, .. }));
    }

    #[test]
    fn test_missing_directory() {
        let err = load_artifacts(Path::new("/nonexistent/cardiosense"), LoadOptions::default())
            .expect_err("no dir");
        assert!(matches!(err, ArtifactError::DirectoryNotFound(_)));
    }

    #[test]
    fn test_bundled_artifacts_verify() {
        let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("models");
        let set = load_artifacts(
            &dir,
            LoadOptions {
                require_manifest: true,
            },
        )
        .expect("bundled artifacts");
        assert!(set.encoders.unencodable_form_options().is_empty());
    }

    #[test]
    fn test_constant_time_eq() {
        assert!(constant_time_eq_str("abc", "abc"));
        assert!(!constant_time_eq_str("abc", "abd"));
        assert!(!constant_time_eq_str("abc", "ab"));
    }
}
