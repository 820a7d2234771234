//! Axum route handlers for the Prediction API.

use std::collections::HashMap;

use axum::{extract::State, Json};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::errors::{AppError, AppJson};
use crate::prediction::ensemble::{CareerPrediction, FEATURE_ORDER};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct PredictResponse {
    pub predictions: Vec<CareerPrediction>,
}

/// POST /api/v1/predict
///
/// Accepts a feature score mapping and returns the top-3 career matches.
/// Missing features default to the neutral midpoint; unknown keys are
/// ignored. 503 if the ensemble artifacts were not loaded at startup.
pub async fn handle_predict(
    State(state): State<AppState>,
    AppJson(body): AppJson<Value>,
) -> Result<Json<PredictResponse>, AppError> {
    let predictor = state
        .predictor
        .as_ref()
        .ok_or_else(|| AppError::ServiceUnavailable("Prediction models are not loaded".to_string()))?;

    let object = body
        .as_object()
        .ok_or_else(|| AppError::Validation("Request body must be a JSON object".to_string()))?;

    let scores = coerce_feature_scores(object)?;
    let predictions = predictor.predict(&scores);

    Ok(Json(PredictResponse { predictions }))
}

/// Pulls the known feature keys out of a JSON object, converting each present
/// value to f64. A present-but-non-numeric value is a client error; absent
/// keys are left to the predictor's midpoint default.
pub fn coerce_feature_scores(object: &Map<String, Value>) -> Result<HashMap<String, f64>, AppError> {
    let mut scores = HashMap::new();
    for key in FEATURE_ORDER {
        let Some(value) = object.get(*key) else {
            continue;
        };
        let score = numeric_value(value).ok_or_else(|| {
            AppError::Validation(format!("Field '{key}' must be a number, got {value}"))
        })?;
        scores.insert(key.to_string(), score);
    }
    Ok(scores)
}

fn numeric_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        // Quiz frontends submit scores as strings; accept numeric strings.
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        value.as_object().unwrap().clone()
    }

    #[test]
    fn test_coerce_numbers_and_numeric_strings() {
        let scores = coerce_feature_scores(&object(json!({
            "O_score": 7,
            "C_score": "4.5",
            "E_score": 9.25
        })))
        .unwrap();
        assert_eq!(scores["O_score"], 7.0);
        assert_eq!(scores["C_score"], 4.5);
        assert_eq!(scores["E_score"], 9.25);
    }

    #[test]
    fn test_missing_fields_are_omitted_not_errors() {
        let scores = coerce_feature_scores(&object(json!({"O_score": 3}))).unwrap();
        assert_eq!(scores.len(), 1);
        assert!(!scores.contains_key("N_score"));
    }

    #[test]
    fn test_unknown_keys_ignored() {
        let scores =
            coerce_feature_scores(&object(json!({"O_score": 3, "favorite_color": "blue"})))
                .unwrap();
        assert_eq!(scores.len(), 1);
    }

    #[test]
    fn test_non_numeric_known_field_is_validation_error() {
        let err = coerce_feature_scores(&object(json!({"O_score": "very high"}))).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        let err = coerce_feature_scores(&object(json!({"N_score": [1, 2]}))).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }
}
