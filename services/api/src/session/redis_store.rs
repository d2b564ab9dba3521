//! Redis-backed sessions.
//!
//! Each session lives under `session:{id}` as JSON with a Redis TTL matching
//! its expiry. `user_sessions:{user_id}` is a set of that user's session ids
//! so all of them can be revoked together.

use async_trait::async_trait;
use models::Session;
use redis::aio::ConnectionManager;
use uuid::Uuid;

use super::SessionStore;
use crate::store::StoreResult;

#[derive(Clone)]
pub struct RedisSessionStore {
    conn: ConnectionManager,
}

fn session_key(id: Uuid) -> String {
    format!("session:{}", id.as_hyphenated())
}

fn user_index_key(user_id: Uuid) -> String {
    format!("user_sessions:{}", user_id.as_hyphenated())
}

impl RedisSessionStore {
    pub fn new(conn: ConnectionManager) -> Self {
        Self { conn }
    }

    pub async fn connect(url: &str) -> redis::RedisResult<Self> {
        let client = redis::Client::open(url)?;
        let conn = client.get_tokio_connection_manager().await?;
        Ok(Self::new(conn))
    }
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn create(&self, user_id: Uuid, ttl: chrono::Duration) -> StoreResult<Session> {
        let session = Session::new(user_id, ttl);
        let payload = serde_json::to_string(&session)?;
        let ttl_secs = ttl.num_seconds().max(1);
        let index = user_index_key(user_id);

        let mut conn = self.conn.clone();
        redis::pipe()
            .atomic()
            .cmd("SET")
            .arg(session_key(session.id))
            .arg(payload)
            .arg("EX")
            .arg(ttl_secs)
            .ignore()
            .cmd("SADD")
            .arg(&index)
            .arg(session.id.to_string())
            .ignore()
            .cmd("EXPIRE")
            .arg(&index)
            .arg(ttl_secs)
            .ignore()
            .query_async::<_, ()>(&mut conn)
            .await?;

        Ok(session)
    }

    async fn get(&self, id: Uuid) -> StoreResult<Option<Session>> {
        let mut conn = self.conn.clone();
        let payload = redis::cmd("GET")
            .arg(session_key(id))
            .query_async::<_, Option<String>>(&mut conn)
            .await?;

        let Some(payload) = payload else {
            return Ok(None);
        };
        let session: Session = serde_json::from_str(&payload)?;
        Ok(Some(session).filter(|s| !s.is_expired()))
    }

    async fn destroy(&self, id: Uuid) -> StoreResult<bool> {
        let mut conn = self.conn.clone();
        let payload = redis::cmd("GETDEL")
            .arg(session_key(id))
            .query_async::<_, Option<String>>(&mut conn)
            .await?;

        let Some(payload) = payload else {
            return Ok(false);
        };
        match serde_json::from_str::<Session>(&payload) {
            Ok(session) => {
                redis::cmd("SREM")
                    .arg(user_index_key(session.user_id))
                    .arg(id.to_string())
                    .query_async::<_, ()>(&mut conn)
                    .await?;
            }
            Err(error) => {
                tracing::warn!(%error, session_id = %id, "undecodable session payload removed");
            }
        }
        Ok(true)
    }

    async fn destroy_for_user(&self, user_id: Uuid) -> StoreResult<u64> {
        let index = user_index_key(user_id);
        let mut conn = self.conn.clone();
        let ids = redis::cmd("SMEMBERS")
            .arg(&index)
            .query_async::<_, Vec<String>>(&mut conn)
            .await?;

        let mut pipe = redis::pipe();
        pipe.atomic();
        for id in &ids {
            pipe.cmd("DEL").arg(format!("session:{id}"));
        }
        pipe.cmd("DEL").arg(&index).ignore();
        let removed: Vec<u64> = pipe.query_async(&mut conn).await?;

        Ok(removed.into_iter().sum())
    }
}
