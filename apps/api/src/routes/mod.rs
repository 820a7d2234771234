pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::counseling::handlers as counseling;
use crate::institutions;
use crate::prediction::handlers as prediction;
use crate::report::handlers as report;
use crate::state::AppState;
use crate::surveys;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Surveys
        .route("/api/v1/surveys", post(surveys::handle_create_survey))
        .route("/api/v1/surveys/:id", get(surveys::handle_get_survey))
        // Prediction
        .route("/api/v1/predict", post(prediction::handle_predict))
        // Counseling
        .route("/api/v1/counseling/start", post(counseling::handle_start))
        .route("/api/v1/counseling/answer", post(counseling::handle_answer))
        .route(
            "/api/v1/counseling/:session_id/history",
            get(counseling::handle_history),
        )
        // Report
        .route("/api/v1/report", post(report::handle_download_report))
        // Institution catalog
        .route(
            "/api/v1/universities",
            get(institutions::handle_list_universities),
        )
        .route(
            "/api/v1/universities/:id",
            get(institutions::handle_get_university),
        )
        .route("/api/v1/colleges", get(institutions::handle_list_colleges))
        .route(
            "/api/v1/colleges/:id",
            get(institutions::handle_get_college),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use axum::response::Response;
    use serde_json::Value;
    use tower::ServiceExt;

    use crate::config::Config;
    use crate::counseling::store::MemorySessionStore;

    fn test_state() -> AppState {
        let config = Config {
            database_url: "postgres://localhost/compass_test".to_string(),
            redis_url: None,
            model_path: "artifacts/ensemble.json".to_string(),
            session_ttl_secs: 3600,
            port: 0,
            rust_log: "info".to_string(),
        };
        AppState {
            // Lazy pool: no connection is made until a query runs, and these
            // tests never reach the database.
            db: sqlx::postgres::PgPoolOptions::new()
                .connect_lazy(&config.database_url)
                .unwrap(),
            sessions: Arc::new(MemorySessionStore::new(Duration::from_secs(
                config.session_ttl_secs,
            ))),
            predictor: None,
            config,
        }
    }

    fn json_post(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn error_body(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_truncated_json_body_answers_400_error_payload() {
        let app = build_router(test_state());
        let response = app
            .oneshot(json_post("/api/v1/counseling/answer", "{\"session_id\": \"ab"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = error_body(response).await;
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert!(body["error"]["message"].is_string());
    }

    #[tokio::test]
    async fn test_json_body_missing_fields_answers_400() {
        let app = build_router(test_state());
        // Well-formed JSON that does not deserialize into the request type.
        let response = app
            .oneshot(json_post("/api/v1/counseling/answer", "{}"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = error_body(response).await;
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_malformed_predict_body_answers_400_even_without_models() {
        // Body validation runs before the predictor check, so a broken
        // payload is a 400, never a 503 or 500.
        let app = build_router(test_state());
        let response = app
            .oneshot(json_post("/api/v1/predict", "not json"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = error_body(response).await;
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }
}
