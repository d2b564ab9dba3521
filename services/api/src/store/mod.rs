//! Record storage for users, properties and tenants.
//!
//! All access goes through a [`Transaction`] opened with [`Store::begin`].
//! Writes become visible only after [`Transaction::commit`]; dropping a
//! transaction without committing discards everything it did. Multi-record
//! cascades rely on this for all-or-nothing behaviour.

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

use async_trait::async_trait;
use models::{
    NewProperty, NewTenant, NewUser, Property, PropertyChanges, Tenant, TenantChanges, User,
    UserChanges,
};
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A unique constraint rejected the write.
    #[error("{0} already exists")]
    Conflict(&'static str),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("session store error: {0}")]
    Session(#[from] redis::RedisError),

    #[error("session encoding error: {0}")]
    Codec(#[from] serde_json::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait Store: Send + Sync {
    async fn begin(&self) -> StoreResult<Box<dyn Transaction>>;
}

#[async_trait]
pub trait Transaction: Send {
    /// Fails with [`StoreError::Conflict`] when the email is taken.
    async fn insert_user(&mut self, user: NewUser) -> StoreResult<User>;
    async fn user_by_id(&mut self, id: Uuid) -> StoreResult<Option<User>>;
    async fn user_by_email(&mut self, email: &str) -> StoreResult<Option<User>>;
    async fn update_user(&mut self, id: Uuid, changes: UserChanges) -> StoreResult<Option<User>>;
    async fn delete_user(&mut self, id: Uuid) -> StoreResult<bool>;

    async fn insert_property(&mut self, property: NewProperty) -> StoreResult<Property>;
    async fn property_by_id(&mut self, id: Uuid) -> StoreResult<Option<Property>>;
    /// Properties of one manager, oldest first.
    async fn properties_by_manager(&mut self, manager_id: Uuid) -> StoreResult<Vec<Property>>;
    async fn update_property(
        &mut self,
        id: Uuid,
        changes: PropertyChanges,
    ) -> StoreResult<Option<Property>>;
    async fn delete_properties(&mut self, ids: &[Uuid]) -> StoreResult<u64>;

    async fn insert_tenant(&mut self, tenant: NewTenant) -> StoreResult<Tenant>;
    async fn tenant_by_id(&mut self, id: Uuid) -> StoreResult<Option<Tenant>>;
    /// Tenants of one property, oldest first.
    async fn tenants_by_property(&mut self, property_id: Uuid) -> StoreResult<Vec<Tenant>>;
    async fn update_tenant(
        &mut self,
        id: Uuid,
        changes: TenantChanges,
    ) -> StoreResult<Option<Tenant>>;
    async fn delete_tenants(&mut self, ids: &[Uuid]) -> StoreResult<u64>;

    /// Appends a tenant id to the property's tenant set. Returns `false` when
    /// the property does not exist.
    async fn attach_tenant(&mut self, property_id: Uuid, tenant_id: Uuid) -> StoreResult<bool>;
    /// Removes a tenant id from the property's tenant set.
    async fn detach_tenant(&mut self, property_id: Uuid, tenant_id: Uuid) -> StoreResult<()>;

    async fn commit(self: Box<Self>) -> StoreResult<()>;
}
