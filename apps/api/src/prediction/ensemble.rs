//! Soft-voting ensemble inference.
//!
//! Prediction path: fixed-order feature vector (missing fields default to
//! the neutral midpoint 5.0) → standardize → per-model soft-max class
//! probabilities → element-wise average across the ensemble → top 3 classes
//! as (career, percentage) pairs, percentages rounded to 2 decimals.

use std::collections::HashMap;
use std::path::Path;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::prediction::artifacts::{load_artifacts, EnsembleArtifacts, LinearModel};

/// Feature keys in the order the ensemble was trained on.
pub const FEATURE_ORDER: &[&str] = &[
    "O_score",
    "C_score",
    "E_score",
    "A_score",
    "N_score",
    "Numerical_Aptitude",
    "Verbal_Aptitude",
    "Abstract_Reasoning",
    "Logical_Reasoning",
    "Spatial_Aptitude",
    "Enjoy_Teamwork",
    "Creative_Thinking",
    "Attention_to_Detail",
];

/// Default for features the caller did not supply: the midpoint of the
/// 1–10 answer scale.
pub const NEUTRAL_MIDPOINT: f64 = 5.0;

const TOP_N: usize = 3;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CareerPrediction {
    pub career: String,
    /// Match probability as a percentage, rounded to 2 decimals.
    pub probability: f64,
}

/// Process-wide, read-only inference state shared across all requests.
pub struct CareerPredictor {
    artifacts: EnsembleArtifacts,
}

impl CareerPredictor {
    pub fn new(artifacts: EnsembleArtifacts) -> Self {
        Self { artifacts }
    }

    pub fn load(path: &Path) -> Result<Self> {
        Ok(Self::new(load_artifacts(path)?))
    }

    /// Ranks the top 3 careers for a named feature score mapping.
    pub fn predict(&self, scores: &HashMap<String, f64>) -> Vec<CareerPrediction> {
        let input: Vec<f64> = FEATURE_ORDER
            .iter()
            .map(|key| scores.get(*key).copied().unwrap_or(NEUTRAL_MIDPOINT))
            .collect();

        let scaled: Vec<f64> = input
            .iter()
            .zip(&self.artifacts.scaler.mean)
            .zip(&self.artifacts.scaler.scale)
            .map(|((x, mean), scale)| (x - mean) / scale)
            .collect();

        // Soft voting: average class probabilities across the ensemble.
        let n_classes = self.artifacts.labels.len();
        let mut avg_probas = vec![0.0; n_classes];
        for model in &self.artifacts.models {
            let probas = predict_proba(model, &scaled);
            for (avg, p) in avg_probas.iter_mut().zip(&probas) {
                *avg += p;
            }
        }
        let n_models = self.artifacts.models.len() as f64;
        for p in &mut avg_probas {
            *p /= n_models;
        }

        let mut ranked: Vec<usize> = (0..n_classes).collect();
        ranked.sort_by(|a, b| avg_probas[*b].total_cmp(&avg_probas[*a]));

        ranked
            .into_iter()
            .take(TOP_N)
            .map(|i| CareerPrediction {
                career: self.artifacts.labels[i].clone(),
                probability: round2(avg_probas[i] * 100.0),
            })
            .collect()
    }
}

/// Class probabilities for one linear model: soft-max over `W·x + b`.
fn predict_proba(model: &LinearModel, scaled: &[f64]) -> Vec<f64> {
    let logits: Vec<f64> = model
        .coefficients
        .iter()
        .zip(&model.intercepts)
        .map(|(row, b)| row.iter().zip(scaled).map(|(w, x)| w * x).sum::<f64>() + b)
        .collect();
    softmax(&logits)
}

fn softmax(logits: &[f64]) -> Vec<f64> {
    // Shift by the max logit for numerical stability.
    let max = logits.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = logits.iter().map(|l| (l - max).exp()).collect();
    let sum: f64 = exps.iter().sum();
    exps.iter().map(|e| e / sum).collect()
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
