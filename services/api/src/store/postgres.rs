//! Postgres-backed store. Every [`Transaction`] wraps a `sqlx::Transaction`,
//! which rolls back when dropped uncommitted.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use models::{
    NewProperty, NewTenant, NewUser, Property, PropertyChanges, Tenant, TenantChanges, User,
    UserChanges,
};
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use super::{Store, StoreError, StoreResult, Transaction};

#[derive(Clone)]
pub struct PgStore {
    pool: Pool<Postgres>,
}

impl PgStore {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    pub async fn migrate(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(&self.pool).await
    }
}

#[async_trait]
impl Store for PgStore {
    async fn begin(&self) -> StoreResult<Box<dyn Transaction>> {
        let tx = self.pool.begin().await?;
        Ok(Box::new(PgTransaction { tx }))
    }
}

struct PgTransaction {
    tx: sqlx::Transaction<'static, Postgres>,
}

#[derive(sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    username: String,
    email: String,
    password_hash: String,
    created_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            username: row.username,
            email: row.email,
            password_hash: row.password_hash,
            created_at: row.created_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct PropertyRow {
    id: Uuid,
    property_name: String,
    address: String,
    description: String,
    property_type: Option<String>,
    number_of_rooms: i32,
    manager_id: Uuid,
    tenant_ids: Vec<Uuid>,
    created_at: DateTime<Utc>,
}

impl From<PropertyRow> for Property {
    fn from(row: PropertyRow) -> Self {
        Self {
            id: row.id,
            property_name: row.property_name,
            address: row.address,
            description: row.description,
            property_type: row.property_type,
            number_of_rooms: row.number_of_rooms,
            manager_id: row.manager_id,
            tenant_ids: row.tenant_ids,
            created_at: row.created_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct TenantRow {
    id: Uuid,
    property_id: Uuid,
    name: String,
    email: String,
    phone: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<TenantRow> for Tenant {
    fn from(row: TenantRow) -> Self {
        Self {
            id: row.id,
            property_id: row.property_id,
            name: row.name,
            email: row.email,
            phone: row.phone,
            created_at: row.created_at,
        }
    }
}

const USER_COLUMNS: &str = "id, username, email, password_hash, created_at";
const PROPERTY_COLUMNS: &str = "id, property_name, address, description, property_type, \
     number_of_rooms, manager_id, tenant_ids, created_at";
const TENANT_COLUMNS: &str = "id, property_id, name, email, phone, created_at";

fn unique_violation(error: sqlx::Error, what: &'static str) -> StoreError {
    match &error {
        sqlx::Error::Database(db) if db.is_unique_violation() => StoreError::Conflict(what),
        _ => StoreError::Database(error),
    }
}

#[async_trait]
impl Transaction for PgTransaction {
    async fn insert_user(&mut self, user: NewUser) -> StoreResult<User> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "INSERT INTO users (id, username, email, password_hash) \
             VALUES ($1, $2, $3, $4) RETURNING {USER_COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .fetch_one(&mut *self.tx)
        .await
        .map_err(|e| unique_violation(e, "email"))?;
        Ok(row.into())
    }

    async fn user_by_id(&mut self, id: Uuid) -> StoreResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&mut *self.tx)
        .await?;
        Ok(row.map(User::from))
    }

    async fn user_by_email(&mut self, email: &str) -> StoreResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&mut *self.tx)
        .await?;
        Ok(row.map(User::from))
    }

    async fn update_user(&mut self, id: Uuid, changes: UserChanges) -> StoreResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "UPDATE users SET \
                 username = COALESCE($2, username), \
                 password_hash = COALESCE($3, password_hash), \
                 updated_at = NOW() \
             WHERE id = $1 RETURNING {USER_COLUMNS}"
        ))
        .bind(id)
        .bind(changes.username)
        .bind(changes.password_hash)
        .fetch_optional(&mut *self.tx)
        .await?;
        Ok(row.map(User::from))
    }

    async fn delete_user(&mut self, id: Uuid) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&mut *self.tx)
            .await?;
        Ok(result.rows_affected() == 1)
    }

    async fn insert_property(&mut self, property: NewProperty) -> StoreResult<Property> {
        let row = sqlx::query_as::<_, PropertyRow>(&format!(
            "INSERT INTO properties \
                 (id, property_name, address, description, property_type, \
                  number_of_rooms, manager_id) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING {PROPERTY_COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(&property.property_name)
        .bind(&property.address)
        .bind(&property.description)
        .bind(&property.property_type)
        .bind(property.number_of_rooms)
        .bind(property.manager_id)
        .fetch_one(&mut *self.tx)
        .await?;
        Ok(row.into())
    }

    async fn property_by_id(&mut self, id: Uuid) -> StoreResult<Option<Property>> {
        let row = sqlx::query_as::<_, PropertyRow>(&format!(
            "SELECT {PROPERTY_COLUMNS} FROM properties WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&mut *self.tx)
        .await?;
        Ok(row.map(Property::from))
    }

    async fn properties_by_manager(&mut self, manager_id: Uuid) -> StoreResult<Vec<Property>> {
        let rows = sqlx::query_as::<_, PropertyRow>(&format!(
            "SELECT {PROPERTY_COLUMNS} FROM properties \
             WHERE manager_id = $1 ORDER BY created_at, id"
        ))
        .bind(manager_id)
        .fetch_all(&mut *self.tx)
        .await?;
        Ok(rows.into_iter().map(Property::from).collect())
    }

    async fn update_property(
        &mut self,
        id: Uuid,
        changes: PropertyChanges,
    ) -> StoreResult<Option<Property>> {
        let row = sqlx::query_as::<_, PropertyRow>(&format!(
            "UPDATE properties SET \
                 property_name = COALESCE($2, property_name), \
                 address = COALESCE($3, address), \
                 description = COALESCE($4, description), \
                 property_type = COALESCE($5, property_type), \
                 number_of_rooms = COALESCE($6, number_of_rooms), \
                 updated_at = NOW() \
             WHERE id = $1 RETURNING {PROPERTY_COLUMNS}"
        ))
        .bind(id)
        .bind(changes.property_name)
        .bind(changes.address)
        .bind(changes.description)
        .bind(changes.property_type)
        .bind(changes.number_of_rooms)
        .fetch_optional(&mut *self.tx)
        .await?;
        Ok(row.map(Property::from))
    }

    async fn delete_properties(&mut self, ids: &[Uuid]) -> StoreResult<u64> {
        let result = sqlx::query("DELETE FROM properties WHERE id = ANY($1)")
            .bind(ids.to_vec())
            .execute(&mut *self.tx)
            .await?;
        Ok(result.rows_affected())
    }

    async fn insert_tenant(&mut self, tenant: NewTenant) -> StoreResult<Tenant> {
        let row = sqlx::query_as::<_, TenantRow>(&format!(
            "INSERT INTO tenants (id, property_id, name, email, phone) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {TENANT_COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(tenant.property_id)
        .bind(&tenant.name)
        .bind(&tenant.email)
        .bind(&tenant.phone)
        .fetch_one(&mut *self.tx)
        .await?;
        Ok(row.into())
    }

    async fn tenant_by_id(&mut self, id: Uuid) -> StoreResult<Option<Tenant>> {
        let row = sqlx::query_as::<_, TenantRow>(&format!(
            "SELECT {TENANT_COLUMNS} FROM tenants WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&mut *self.tx)
        .await?;
        Ok(row.map(Tenant::from))
    }

    async fn tenants_by_property(&mut self, property_id: Uuid) -> StoreResult<Vec<Tenant>> {
        let rows = sqlx::query_as::<_, TenantRow>(&format!(
            "SELECT {TENANT_COLUMNS} FROM tenants \
             WHERE property_id = $1 ORDER BY created_at, id"
        ))
        .bind(property_id)
        .fetch_all(&mut *self.tx)
        .await?;
        Ok(rows.into_iter().map(Tenant::from).collect())
    }

    async fn update_tenant(
        &mut self,
        id: Uuid,
        changes: TenantChanges,
    ) -> StoreResult<Option<Tenant>> {
        let row = sqlx::query_as::<_, TenantRow>(&format!(
            "UPDATE tenants SET \
                 name = COALESCE($2, name), \
                 email = COALESCE($3, email), \
                 phone = COALESCE($4, phone), \
                 updated_at = NOW() \
             WHERE id = $1 RETURNING {TENANT_COLUMNS}"
        ))
        .bind(id)
        .bind(changes.name)
        .bind(changes.email)
        .bind(changes.phone)
        .fetch_optional(&mut *self.tx)
        .await?;
        Ok(row.map(Tenant::from))
    }

    async fn delete_tenants(&mut self, ids: &[Uuid]) -> StoreResult<u64> {
        let result = sqlx::query("DELETE FROM tenants WHERE id = ANY($1)")
            .bind(ids.to_vec())
            .execute(&mut *self.tx)
            .await?;
        Ok(result.rows_affected())
    }

    async fn attach_tenant(&mut self, property_id: Uuid, tenant_id: Uuid) -> StoreResult<bool> {
        let result = sqlx::query(
            "UPDATE properties SET tenant_ids = array_append(tenant_ids, $2), updated_at = NOW() \
             WHERE id = $1",
        )
        .bind(property_id)
        .bind(tenant_id)
        .execute(&mut *self.tx)
        .await?;
        Ok(result.rows_affected() == 1)
    }

    async fn detach_tenant(&mut self, property_id: Uuid, tenant_id: Uuid) -> StoreResult<()> {
        sqlx::query(
            "UPDATE properties SET tenant_ids = array_remove(tenant_ids, $2), updated_at = NOW() \
             WHERE id = $1",
        )
        .bind(property_id)
        .bind(tenant_id)
        .execute(&mut *self.tx)
        .await?;
        Ok(())
    }

    async fn commit(self: Box<Self>) -> StoreResult<()> {
        self.tx.commit().await?;
        Ok(())
    }
}
