//! Axum route handlers for the Counseling API.

use std::collections::HashMap;

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, info};
use uuid::Uuid;

use crate::counseling::session::{Step, TranscriptTurn};
use crate::counseling::stepper::{self, CounselorTurn};
use crate::errors::{AppError, AppJson};
use crate::prediction::ensemble::CareerPrediction;
use crate::state::AppState;
use crate::surveys::insert_survey;

/// Category tag for surveys persisted from completed counseling sessions.
pub const COUNSELING_CATEGORY: &str = "AI_Counseling";

#[derive(Debug, Serialize)]
pub struct CounselingTurnResponse {
    pub success: bool,
    pub session_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub next_question: Option<String>,
    pub field: Option<&'static str>,
    pub conversation_step: Step,
    pub completed: bool,
    pub show_edit_option: bool,
    pub collected_data: HashMap<String, f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub edit_options: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub predictions: Option<Vec<CareerPrediction>>,
}

#[derive(Debug, Deserialize)]
pub struct AnswerRequest {
    pub session_id: Uuid,
    pub answer: String,
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub history: Vec<TranscriptTurn>,
}

/// POST /api/v1/counseling/start
///
/// Initializes a fresh session and returns the greeting plus the first
/// question. The returned `session_id` must accompany every answer.
pub async fn handle_start(
    State(state): State<AppState>,
) -> Result<Json<CounselingTurnResponse>, AppError> {
    let (session, turn) = stepper::start();
    state.sessions.save(&session).await?;
    info!("Started counseling session {}", session.id);

    Ok(Json(build_response(session.id, &session.answers, turn, None)))
}

/// POST /api/v1/counseling/answer
///
/// Advances the session by one answer. On completion, runs the ensemble
/// over the collected answers and persists the session as a survey record.
pub async fn handle_answer(
    State(state): State<AppState>,
    AppJson(request): AppJson<AnswerRequest>,
) -> Result<Json<CounselingTurnResponse>, AppError> {
    let mut session = state
        .sessions
        .load(request.session_id)
        .await?
        .ok_or_else(|| {
            AppError::NotFound(format!(
                "Counseling session {} not found or expired",
                request.session_id
            ))
        })?;

    let already_complete = session.completed;
    let turn = stepper::process_answer(&mut session, &request.answer);

    let mut predictions = None;
    if turn.completed && !already_complete {
        predictions = match &state.predictor {
            Some(predictor) => Some(predictor.predict(&session.answers)),
            None => {
                error!("Counseling session {} completed without loaded models", session.id);
                None
            }
        };
        persist_completed_session(&state, &session, predictions.as_deref()).await;
    }

    state.sessions.save(&session).await?;

    Ok(Json(build_response(
        session.id,
        &session.answers,
        turn,
        predictions,
    )))
}

/// GET /api/v1/counseling/:session_id/history
pub async fn handle_history(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<HistoryResponse>, AppError> {
    let session = state.sessions.load(session_id).await?.ok_or_else(|| {
        AppError::NotFound(format!("Counseling session {session_id} not found or expired"))
    })?;

    Ok(Json(HistoryResponse {
        history: session.transcript,
    }))
}

fn build_response(
    session_id: Uuid,
    answers: &HashMap<String, f64>,
    turn: CounselorTurn,
    predictions: Option<Vec<CareerPrediction>>,
) -> CounselingTurnResponse {
    CounselingTurnResponse {
        success: true,
        session_id,
        message: turn.message,
        next_question: turn.next_question,
        field: turn.field,
        conversation_step: turn.step,
        completed: turn.completed,
        show_edit_option: turn.show_edit_option,
        collected_data: answers.clone(),
        edit_options: turn.edit_options,
        predictions,
    }
}

/// Saves the completed session as an append-only survey record. Failure to
/// persist is logged but does not fail the turn — the user still gets their
/// predictions.
async fn persist_completed_session(
    state: &AppState,
    session: &crate::counseling::session::CounselingSession,
    predictions: Option<&[CareerPrediction]>,
) {
    let responses = json!({
        "counseling_data": session.answers,
        "predictions": predictions,
        "conversation_history": session.transcript,
    });

    match insert_survey(&state.db, COUNSELING_CATEGORY, &responses).await {
        Ok(row) => info!(
            "Persisted counseling session {} as survey {}",
            session.id, row.id
        ),
        Err(e) => error!("Failed to persist counseling session {}: {e}", session.id),
    }
}
