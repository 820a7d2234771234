//! Institution catalog — read-only list/detail endpoints over reference data.

use axum::{
    extract::{Path, State},
    Json,
};

use crate::errors::AppError;
use crate::models::institution::InstitutionRow;
use crate::state::AppState;

/// GET /api/v1/universities
pub async fn handle_list_universities(
    State(state): State<AppState>,
) -> Result<Json<Vec<InstitutionRow>>, AppError> {
    let rows = sqlx::query_as::<_, InstitutionRow>(
        "SELECT * FROM public_universities ORDER BY name",
    )
    .fetch_all(&state.db)
    .await?;
    Ok(Json(rows))
}

/// GET /api/v1/universities/:id
pub async fn handle_get_university(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<InstitutionRow>, AppError> {
    let row = sqlx::query_as::<_, InstitutionRow>(
        "SELECT * FROM public_universities WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(&state.db)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("University {id} not found")))?;
    Ok(Json(row))
}

/// GET /api/v1/colleges
pub async fn handle_list_colleges(
    State(state): State<AppState>,
) -> Result<Json<Vec<InstitutionRow>>, AppError> {
    let rows =
        sqlx::query_as::<_, InstitutionRow>("SELECT * FROM private_colleges ORDER BY name")
            .fetch_all(&state.db)
            .await?;
    Ok(Json(rows))
}

/// GET /api/v1/colleges/:id
pub async fn handle_get_college(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<InstitutionRow>, AppError> {
    let row =
        sqlx::query_as::<_, InstitutionRow>("SELECT * FROM private_colleges WHERE id = $1")
            .bind(id)
            .fetch_optional(&state.db)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("College {id} not found")))?;
    Ok(Json(row))
}
