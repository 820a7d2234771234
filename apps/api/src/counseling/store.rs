//! Session persistence — pluggable, trait-based store for counseling state.
//!
//! Default: `MemorySessionStore` (per-process, lost on restart).
//! With `REDIS_URL` set: `RedisSessionStore`, JSON-encoded.
//!
//! Both stores apply the configured session TTL so abandoned sessions expire
//! on their own: Redis via `SET EX`, the memory store by evicting expired
//! entries on access.
//!
//! `AppState` holds an `Arc<dyn SessionStore>`, swapped at startup via config.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use redis::AsyncCommands;
use tokio::sync::RwLock;
use tokio::time::Instant;
use uuid::Uuid;

use crate::counseling::session::CounselingSession;
use crate::errors::AppError;

#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn load(&self, id: Uuid) -> Result<Option<CounselingSession>, AppError>;
    async fn save(&self, session: &CounselingSession) -> Result<(), AppError>;
}

// ────────────────────────────────────────────────────────────────────────────
// In-memory store
// ────────────────────────────────────────────────────────────────────────────

pub struct MemorySessionStore {
    ttl: Duration,
    sessions: RwLock<HashMap<Uuid, (CounselingSession, Instant)>>,
}

impl MemorySessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            sessions: RwLock::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn load(&self, id: Uuid) -> Result<Option<CounselingSession>, AppError> {
        let mut sessions = self.sessions.write().await;
        match sessions.get(&id) {
            Some((session, expires_at)) if *expires_at > Instant::now() => {
                Ok(Some(session.clone()))
            }
            Some(_) => {
                sessions.remove(&id);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn save(&self, session: &CounselingSession) -> Result<(), AppError> {
        let now = Instant::now();
        let mut sessions = self.sessions.write().await;
        // Sweep expired entries so the map stays bounded by live sessions.
        sessions.retain(|_, (_, expires_at)| *expires_at > now);
        sessions.insert(session.id, (session.clone(), now + self.ttl));
        Ok(())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Redis store
// ────────────────────────────────────────────────────────────────────────────

pub struct RedisSessionStore {
    client: redis::Client,
    ttl_secs: u64,
}

impl RedisSessionStore {
    pub fn new(client: redis::Client, ttl_secs: u64) -> Self {
        Self { client, ttl_secs }
    }

    fn key(id: Uuid) -> String {
        format!("counseling:{id}")
    }

    async fn connection(&self) -> Result<redis::aio::MultiplexedConnection, AppError> {
        self.client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| AppError::Session(format!("Redis connection failed: {e}")))
    }
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn load(&self, id: Uuid) -> Result<Option<CounselingSession>, AppError> {
        let mut conn = self.connection().await?;
        let raw: Option<String> = conn
            .get(Self::key(id))
            .await
            .map_err(|e| AppError::Session(format!("Redis GET failed: {e}")))?;

        match raw {
            Some(json) => {
                let session = serde_json::from_str(&json).map_err(|e| {
                    AppError::Session(format!("Corrupt session payload for {id}: {e}"))
                })?;
                Ok(Some(session))
            }
            None => Ok(None),
        }
    }

    async fn save(&self, session: &CounselingSession) -> Result<(), AppError> {
        let json = serde_json::to_string(session)
            .map_err(|e| AppError::Session(format!("Session serialization failed: {e}")))?;
        let mut conn = self.connection().await?;
        conn.set_ex::<_, _, ()>(Self::key(session.id), json, self.ttl_secs)
            .await
            .map_err(|e| AppError::Session(format!("Redis SET failed: {e}")))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::counseling::session::Step;

    const TTL: Duration = Duration::from_secs(3600);

    #[tokio::test]
    async fn test_memory_store_round_trip() {
        let store = MemorySessionStore::new(TTL);
        let mut session = CounselingSession::new();
        session.answers.insert("O_score".to_string(), 7.0);
        session.step = Step::Aptitude;

        store.save(&session).await.unwrap();
        let loaded = store.load(session.id).await.unwrap().unwrap();
        assert_eq!(loaded.answers["O_score"], 7.0);
        assert_eq!(loaded.step, Step::Aptitude);
    }

    #[tokio::test]
    async fn test_memory_store_missing_is_none() {
        let store = MemorySessionStore::new(TTL);
        assert!(store.load(Uuid::new_v4()).await.unwrap().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_memory_store_expires_after_ttl() {
        let store = MemorySessionStore::new(TTL);
        let session = CounselingSession::new();
        store.save(&session).await.unwrap();

        tokio::time::advance(TTL / 2).await;
        assert!(store.load(session.id).await.unwrap().is_some());

        tokio::time::advance(TTL).await;
        assert!(store.load(session.id).await.unwrap().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_memory_store_save_sweeps_expired_sessions() {
        let store = MemorySessionStore::new(TTL);
        let stale = CounselingSession::new();
        store.save(&stale).await.unwrap();

        tokio::time::advance(TTL * 2).await;
        let fresh = CounselingSession::new();
        store.save(&fresh).await.unwrap();

        let sessions = store.sessions.read().await;
        assert_eq!(sessions.len(), 1);
        assert!(sessions.contains_key(&fresh.id));
    }

    #[test]
    fn test_session_json_round_trip() {
        // The Redis store persists sessions as JSON; the shape must survive.
        let mut session = CounselingSession::new();
        session.answers.insert("C_score".to_string(), 4.5);
        session.log_bot("hello");
        session.log_user("4.5");

        let json = serde_json::to_string(&session).unwrap();
        let back: CounselingSession = serde_json::from_str(&json).unwrap();
        assert_eq!(back.id, session.id);
        assert_eq!(back.answers["C_score"], 4.5);
        assert_eq!(back.transcript.len(), 2);
    }
}
