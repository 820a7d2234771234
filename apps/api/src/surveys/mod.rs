//! Survey persistence and its Axum handlers.
//!
//! Survey records are append-only: INSERT on creation, never UPDATE.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::Value;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::errors::{AppError, AppJson};
use crate::models::survey::SurveyRow;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateSurveyRequest {
    pub category: String,
    pub responses: Value,
}

/// Inserts one survey record and returns the stored row.
pub async fn insert_survey(
    pool: &PgPool,
    category: &str,
    responses: &Value,
) -> Result<SurveyRow, sqlx::Error> {
    sqlx::query_as::<_, SurveyRow>(
        r#"
        INSERT INTO career_surveys (id, category, responses)
        VALUES ($1, $2, $3)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(category)
    .bind(responses)
    .fetch_one(pool)
    .await
}

/// POST /api/v1/surveys
pub async fn handle_create_survey(
    State(state): State<AppState>,
    AppJson(request): AppJson<CreateSurveyRequest>,
) -> Result<(StatusCode, Json<SurveyRow>), AppError> {
    if request.category.trim().is_empty() {
        return Err(AppError::Validation("category cannot be empty".to_string()));
    }
    if !request.responses.is_object() {
        return Err(AppError::Validation(
            "responses must be a JSON object".to_string(),
        ));
    }

    let row = insert_survey(&state.db, request.category.trim(), &request.responses).await?;
    info!("Saved survey {} ({})", row.id, row.category);

    Ok((StatusCode::CREATED, Json(row)))
}

/// GET /api/v1/surveys/:id
pub async fn handle_get_survey(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SurveyRow>, AppError> {
    let row = sqlx::query_as::<_, SurveyRow>("SELECT * FROM career_surveys WHERE id = $1")
        .bind(id)
        .fetch_optional(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Survey {id} not found")))?;

    Ok(Json(row))
}
