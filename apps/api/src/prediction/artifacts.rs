//! Ensemble artifact loading.
//!
//! The training pipeline (out of scope here) exports one JSON document with
//! the career label list, the fitted standard-scaler parameters, and the
//! linear soft-max classifiers that make up the ensemble:
//!
//! ```json
//! {
//!   "labels": ["Software Engineer", "..."],
//!   "scaler": { "mean": [13 floats], "scale": [13 floats] },
//!   "models": [
//!     { "coefficients": [[13 floats] per class], "intercepts": [per class] }
//!   ]
//! }
//! ```
//!
//! Loaded once at startup. A missing or malformed file leaves the predictor
//! absent and prediction endpoints answering 503; the rest of the API keeps
//! working.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::Deserialize;

use crate::prediction::ensemble::FEATURE_ORDER;

#[derive(Debug, Clone, Deserialize)]
pub struct ScalerParams {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

/// One member of the ensemble: a multinomial linear classifier.
/// `coefficients` is a classes × features matrix.
#[derive(Debug, Clone, Deserialize)]
pub struct LinearModel {
    pub coefficients: Vec<Vec<f64>>,
    pub intercepts: Vec<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EnsembleArtifacts {
    pub labels: Vec<String>,
    pub scaler: ScalerParams,
    pub models: Vec<LinearModel>,
}

pub fn load_artifacts(path: &Path) -> Result<EnsembleArtifacts> {
    let file = File::open(path)
        .with_context(|| format!("Cannot open ensemble artifacts at {}", path.display()))?;
    let artifacts: EnsembleArtifacts = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Malformed ensemble artifacts at {}", path.display()))?;
    validate(&artifacts)?;
    Ok(artifacts)
}

/// Dimension checks; rejects artifacts that could never produce a valid
/// top-3 prediction.
pub fn validate(artifacts: &EnsembleArtifacts) -> Result<()> {
    let n_features = FEATURE_ORDER.len();
    let n_classes = artifacts.labels.len();

    if n_classes < 3 {
        bail!("ensemble must distinguish at least 3 careers, found {n_classes}");
    }
    if artifacts.models.is_empty() {
        bail!("ensemble contains no models");
    }
    if artifacts.scaler.mean.len() != n_features || artifacts.scaler.scale.len() != n_features {
        bail!(
            "scaler dimensions ({}/{}) do not match the {} expected features",
            artifacts.scaler.mean.len(),
            artifacts.scaler.scale.len(),
            n_features
        );
    }
    if artifacts.scaler.scale.iter().any(|s| *s == 0.0) {
        bail!("scaler contains a zero scale entry");
    }

    for (i, model) in artifacts.models.iter().enumerate() {
        if model.coefficients.len() != n_classes || model.intercepts.len() != n_classes {
            bail!(
                "model {i} has {} coefficient rows and {} intercepts for {} classes",
                model.coefficients.len(),
                model.intercepts.len(),
                n_classes
            );
        }
        if let Some(row) = model.coefficients.iter().find(|r| r.len() != n_features) {
            bail!(
                "model {i} has a coefficient row of width {} (expected {})",
                row.len(),
                n_features
            );
        }
    }
    Ok(())
}
