//! Artifact manifest utility.
//!
//! Writes `manifest.json` binding the model, scaler and encoder files to
//! their SHA-256 digests. With `CARDIOSENSE_REQUIRE_MANIFEST=1` the app
//! refuses to start unless the digests match.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin hash_artifacts -- [<artifact_dir>] [--check]
//! ```

use std::env;
use std::fs;
use std::path::PathBuf;

use cardiosense::adapters::artifacts::{
    load_artifacts, ArtifactManifest, LoadOptions, MANIFEST_FILE,
};
use cardiosense::config::AppConfig;

fn usage() -> String {
    "Usage: hash_artifacts [<artifact_dir>] [--check]".to_string()
}

fn parse_args() -> Result<(Option<PathBuf>, bool), String> {
    let mut dir: Option<PathBuf> = None;
    let mut check = false;

    for arg in env::args().skip(1) {
        match arg.as_str() {
            "--check" => check = true,
            "-h" | "--help" => return Err(usage()),
            _ => {
                if dir.is_none() {
                    dir = Some(PathBuf::from(arg));
                } else {
                    return Err(usage());
                }
            }
        }
    }

    Ok((dir, check))
}

fn main() -> Result<(), String> {
    let (dir, check) = parse_args()?;
    let dir = dir.unwrap_or_else(|| AppConfig::from_env().artifact_dir);

    if check {
        load_artifacts(
            &dir,
            LoadOptions {
                require_manifest: true,
            },
        )
        .map_err(|e| e.to_string())?;
        println!("Manifest OK: {}", dir.join(MANIFEST_FILE).display());
        return Ok(());
    }

    let manifest = ArtifactManifest::for_directory(&dir).map_err(|e| e.to_string())?;
    let bytes = serde_json::to_vec_pretty(&manifest)
        .map_err(|e| format!("Failed to serialize {MANIFEST_FILE}: {e}"))?;

    let manifest_path = dir.join(MANIFEST_FILE);
    fs::write(&manifest_path, &bytes)
        .map_err(|e| format!("Failed to write {}: {e}", manifest_path.display()))?;

    println!("Wrote manifest: {}", manifest_path.display());
    for (name, digest) in &manifest.files {
        println!("  {digest}  {name}");
    }

    Ok(())
}
