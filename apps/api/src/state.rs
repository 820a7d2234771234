use std::sync::Arc;

use sqlx::PgPool;

use crate::config::Config;
use crate::counseling::store::SessionStore;
use crate::prediction::ensemble::CareerPredictor;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    /// Pluggable counseling session store. Default: in-memory. Swapped to
    /// Redis at startup when `REDIS_URL` is set.
    pub sessions: Arc<dyn SessionStore>,
    /// Ensemble loaded once at startup and shared read-only across requests.
    /// `None` when the artifacts failed to load — prediction endpoints then
    /// answer 503 while the rest of the API stays up.
    pub predictor: Option<Arc<CareerPredictor>>,
    pub config: Config,
}
