use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use dashmap::DashMap;
use redis::{AsyncCommands, aio::ConnectionManager};
use tracing::{debug, info};

use super::Session;
use crate::error::{Result, ServiceError};

/// Persistence for sessions, keyed by session id.
#[async_trait]
pub trait SessionStore: Send + Sync + fmt::Debug {
    async fn load(&self, session_id: &str) -> Result<Option<Session>>;

    async fn save(&self, session: &Session) -> Result<()>;
}

/// Redis-backed store. Sessions are stored as JSON with a sliding expiry that
/// is refreshed on every save.
#[derive(Clone)]
pub struct RedisSessionStore {
    conn: ConnectionManager,
    ttl: Duration,
}

impl fmt::Debug for RedisSessionStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedisSessionStore")
            .field("connection", &"ConnectionManager")
            .field("ttl", &self.ttl)
            .finish()
    }
}

impl RedisSessionStore {
    pub async fn new(redis_url: &str, ttl: Duration) -> Result<Self> {
        info!("Connecting to Redis session store at {}", redis_url);

        let client = redis::Client::open(redis_url)
            .map_err(|e| ServiceError::Session(format!("Failed to create Redis client: {e}")))?;

        let conn = ConnectionManager::new(client)
            .await
            .map_err(|e| ServiceError::Session(format!("Failed to connect to Redis: {e}")))?;

        info!("Successfully connected to Redis session store");

        Ok(Self { conn, ttl })
    }
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn load(&self, session_id: &str) -> Result<Option<Session>> {
        debug!("Session GET: {}", session_id);

        let mut conn = self.conn.clone();
        let data: Option<String> = conn.get(session_id).await?;

        match data {
            Some(json) => {
                let mut session: Session = serde_json::from_str(&json)?;
                session.set_id(session_id);
                Ok(Some(session))
            }
            None => {
                debug!("Session MISS: {}", session_id);
                Ok(None)
            }
        }
    }

    async fn save(&self, session: &Session) -> Result<()> {
        debug!("Session SET: {} (TTL: {:?})", session.id(), self.ttl);

        let json = serde_json::to_string(session)?;
        let mut conn = self.conn.clone();
        conn.set_ex::<_, _, ()>(session.id(), json, self.ttl.as_secs())
            .await?;

        Ok(())
    }
}

/// Process-local store for development and tests.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    sessions: DashMap<String, Session>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a session directly, bypassing the request cycle.
    pub fn insert(&self, session: Session) {
        self.sessions.insert(session.id().to_string(), session);
    }

    pub fn get(&self, session_id: &str) -> Option<Session> {
        self.sessions.get(session_id).map(|entry| entry.clone())
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn load(&self, session_id: &str) -> Result<Option<Session>> {
        Ok(self.get(session_id))
    }

    async fn save(&self, session: &Session) -> Result<()> {
        self.insert(session.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_store_round_trip() {
        let store = MemorySessionStore::new();
        let mut session = Session::with_id("session-1");
        session.extra_mut().company_number = Some("01234567".into());

        store.save(&session).await.unwrap();
        let loaded = store.load("session-1").await.unwrap().unwrap();
        assert_eq!(loaded.extra().company_number.as_deref(), Some("01234567"));
        assert_eq!(store.len(), 1);
        assert!(store.load("missing").await.unwrap().is_none());
    }
}
