//! Server-side session storage: opaque session id → user id, with expiry.

mod memory;
mod redis_store;

pub use self::memory::MemorySessionStore;
pub use self::redis_store::RedisSessionStore;

use async_trait::async_trait;
use models::Session;
use uuid::Uuid;

use crate::store::StoreResult;

#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn create(&self, user_id: Uuid, ttl: chrono::Duration) -> StoreResult<Session>;

    /// Returns `None` for unknown or expired sessions.
    async fn get(&self, id: Uuid) -> StoreResult<Option<Session>>;

    /// Returns `false` when the session did not exist.
    async fn destroy(&self, id: Uuid) -> StoreResult<bool>;

    /// Destroys every session bound to the user and returns how many were removed.
    async fn destroy_for_user(&self, user_id: Uuid) -> StoreResult<u64>;
}
