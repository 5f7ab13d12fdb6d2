//! Headless predictor.
//!
//! Reads one patient record as JSON (from a file argument or stdin), runs a
//! single prediction against the configured artifacts and prints the
//! diagnosis as JSON. Exits non-zero on any failure.
//!
//! # Usage
//!
//! ```bash
//! echo '{"age":63,"sex":"Male",...}' | cargo run --bin predict
//! cargo run --bin predict -- record.json
//! ```

use std::io::Read;

use anyhow::{bail, Context, Result};
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use cardiosense::adapters::artifacts::load_artifacts;
use cardiosense::adapters::sanitize::SanitizingMakeWriter;
use cardiosense::application::InferenceService;
use cardiosense::config::AppConfig;
use cardiosense::domain::FeatureAttribution;
use cardiosense::PatientRecord;

#[derive(Debug, Serialize)]
struct PredictionOutput<'a> {
    id: &'a str,
    verdict: i64,
    message: &'static str,
    probability: Option<f64>,
    base_value: f64,
    /// Largest magnitude first
    attributions: Vec<&'a FeatureAttribution>,
}

fn read_input() -> Result<String> {
    let mut args = std::env::args().skip(1);
    let input = match (args.next(), args.next()) {
        (None, _) => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read record from stdin")?;
            buf
        }
        (Some(path), None) if path != "-h" && path != "--help" => std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read record from {path}"))?,
        _ => bail!("Usage: predict [<record.json>]"),
    };
    Ok(input)
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(SanitizingMakeWriter::new(std::io::stderr)),
        )
        .init();

    let config = AppConfig::from_env();
    let record: PatientRecord =
        serde_json::from_str(&read_input()?).context("Input is not a valid patient record")?;

    let artifacts = load_artifacts(&config.artifact_dir, config.load_options())
        .with_context(|| format!("Failed to load artifacts from {}", config.artifact_dir.display()))?;
    let service = InferenceService::from_artifacts(artifacts);

    let diagnosis = service.run_inference(&record)?;

    let output = PredictionOutput {
        id: &diagnosis.id,
        verdict: diagnosis.verdict.class_label(),
        message: diagnosis.verdict.message(),
        probability: diagnosis.probability,
        base_value: diagnosis.explanation.base_value,
        attributions: diagnosis.explanation.ranked(),
    };
    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}
