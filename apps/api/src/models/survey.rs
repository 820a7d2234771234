use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

/// An append-only survey record: quiz submissions and completed counseling
/// sessions both land here, distinguished by `category`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SurveyRow {
    pub id: Uuid,
    pub category: String,
    pub responses: Value,
    pub created_at: DateTime<Utc>,
}
