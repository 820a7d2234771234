//! Axum route handler for the downloadable career report.

use std::collections::HashMap;

use axum::{extract::State, http::header, response::IntoResponse};
use bytes::Bytes;
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::{AppError, AppJson};
use crate::prediction::ensemble::CareerPrediction;
use crate::report::pdf::render_report;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ReportRequest {
    #[serde(default)]
    pub predictions: Vec<CareerPrediction>,
    /// Assessment scores to profile in the report. When absent, the scores
    /// are pulled from the counseling session named by `session_id`.
    pub scores: Option<HashMap<String, f64>>,
    pub session_id: Option<Uuid>,
}

/// POST /api/v1/report
///
/// Renders the career report PDF and returns it as an attachment.
pub async fn handle_download_report(
    State(state): State<AppState>,
    AppJson(request): AppJson<ReportRequest>,
) -> Result<impl IntoResponse, AppError> {
    let scores = match request.scores {
        Some(scores) => scores,
        None => match request.session_id {
            Some(id) => state
                .sessions
                .load(id)
                .await?
                .map(|s| s.answers)
                .unwrap_or_default(),
            None => HashMap::new(),
        },
    };

    let bytes = render_report(&request.predictions, &scores)?;
    let filename = format!(
        "compass_career_report_{}.pdf",
        Utc::now().format("%Y%m%d_%H%M%S")
    );

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        Bytes::from(bytes),
    ))
}
