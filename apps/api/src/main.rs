mod config;
mod counseling;
mod db;
mod errors;
mod institutions;
mod models;
mod prediction;
mod report;
mod routes;
mod state;
mod surveys;

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::counseling::store::{MemorySessionStore, RedisSessionStore, SessionStore};
use crate::db::create_pool;
use crate::prediction::ensemble::CareerPredictor;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Compass API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let db = create_pool(&config.database_url).await?;

    // Counseling session store: Redis when configured, in-memory otherwise
    let sessions: Arc<dyn SessionStore> = match &config.redis_url {
        Some(url) => {
            let client = redis::Client::open(url.clone())?;
            info!("Session store: Redis (TTL {}s)", config.session_ttl_secs);
            Arc::new(RedisSessionStore::new(client, config.session_ttl_secs))
        }
        None => {
            info!("Session store: in-memory (TTL {}s)", config.session_ttl_secs);
            Arc::new(MemorySessionStore::new(Duration::from_secs(
                config.session_ttl_secs,
            )))
        }
    };

    // Load the prediction ensemble once; shared read-only across requests.
    // A failed load leaves prediction endpoints answering 503.
    let predictor = match CareerPredictor::load(Path::new(&config.model_path)) {
        Ok(p) => {
            info!("Career prediction ensemble loaded from {}", config.model_path);
            Some(Arc::new(p))
        }
        Err(e) => {
            error!(
                "Failed to load ensemble artifacts from {}: {e:#}. \
                 Prediction endpoints will return 503.",
                config.model_path
            );
            None
        }
    };

    // Build app state
    let state = AppState {
        db,
        sessions,
        predictor,
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: tighten CORS in production

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
