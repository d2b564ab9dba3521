//! In-process store used by tests and local runs without Postgres.
//!
//! Transactions are serialized behind one async mutex. Each transaction
//! works on a private copy of the tables which replaces the shared copy on
//! commit.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use models::{
    NewProperty, NewTenant, NewUser, Property, PropertyChanges, Tenant, TenantChanges, User,
    UserChanges,
};
use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

use super::{Store, StoreError, StoreResult, Transaction};

#[derive(Debug, Clone, Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    properties: HashMap<Uuid, Property>,
    tenants: HashMap<Uuid, Tenant>,
}

#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn user_count(&self) -> usize {
        self.tables.lock().await.users.len()
    }

    pub async fn property_count(&self) -> usize {
        self.tables.lock().await.properties.len()
    }

    pub async fn tenant_count(&self) -> usize {
        self.tables.lock().await.tenants.len()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn begin(&self) -> StoreResult<Box<dyn Transaction>> {
        let committed = Arc::clone(&self.tables).lock_owned().await;
        let staged = committed.clone();
        Ok(Box::new(MemoryTransaction { committed, staged }))
    }
}

struct MemoryTransaction {
    committed: OwnedMutexGuard<Tables>,
    staged: Tables,
}

fn oldest_first<T>(mut rows: Vec<T>, key: impl Fn(&T) -> (DateTime<Utc>, Uuid)) -> Vec<T> {
    rows.sort_by_key(|row| key(row));
    rows
}

#[async_trait]
impl Transaction for MemoryTransaction {
    async fn insert_user(&mut self, user: NewUser) -> StoreResult<User> {
        if self.staged.users.values().any(|u| u.email == user.email) {
            return Err(StoreError::Conflict("email"));
        }
        let user = User {
            id: Uuid::new_v4(),
            username: user.username,
            email: user.email,
            password_hash: user.password_hash,
            created_at: Utc::now(),
        };
        self.staged.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn user_by_id(&mut self, id: Uuid) -> StoreResult<Option<User>> {
        Ok(self.staged.users.get(&id).cloned())
    }

    async fn user_by_email(&mut self, email: &str) -> StoreResult<Option<User>> {
        Ok(self.staged.users.values().find(|u| u.email == email).cloned())
    }

    async fn update_user(&mut self, id: Uuid, changes: UserChanges) -> StoreResult<Option<User>> {
        Ok(self.staged.users.get_mut(&id).map(|user| {
            changes.apply(user);
            user.clone()
        }))
    }

    async fn delete_user(&mut self, id: Uuid) -> StoreResult<bool> {
        Ok(self.staged.users.remove(&id).is_some())
    }

    async fn insert_property(&mut self, property: NewProperty) -> StoreResult<Property> {
        let property = Property {
            id: Uuid::new_v4(),
            property_name: property.property_name,
            address: property.address,
            description: property.description,
            property_type: property.property_type,
            number_of_rooms: property.number_of_rooms,
            manager_id: property.manager_id,
            tenant_ids: Vec::new(),
            created_at: Utc::now(),
        };
        self.staged.properties.insert(property.id, property.clone());
        Ok(property)
    }

    async fn property_by_id(&mut self, id: Uuid) -> StoreResult<Option<Property>> {
        Ok(self.staged.properties.get(&id).cloned())
    }

    async fn properties_by_manager(&mut self, manager_id: Uuid) -> StoreResult<Vec<Property>> {
        let rows = self
            .staged
            .properties
            .values()
            .filter(|p| p.manager_id == manager_id)
            .cloned()
            .collect();
        Ok(oldest_first(rows, |p| (p.created_at, p.id)))
    }

    async fn update_property(
        &mut self,
        id: Uuid,
        changes: PropertyChanges,
    ) -> StoreResult<Option<Property>> {
        Ok(self.staged.properties.get_mut(&id).map(|property| {
            changes.apply(property);
            property.clone()
        }))
    }

    async fn delete_properties(&mut self, ids: &[Uuid]) -> StoreResult<u64> {
        Ok(ids
            .iter()
            .filter(|id| self.staged.properties.remove(*id).is_some())
            .count() as u64)
    }

    async fn insert_tenant(&mut self, tenant: NewTenant) -> StoreResult<Tenant> {
        let tenant = Tenant {
            id: Uuid::new_v4(),
            property_id: tenant.property_id,
            name: tenant.name,
            email: tenant.email,
            phone: tenant.phone,
            created_at: Utc::now(),
        };
        self.staged.tenants.insert(tenant.id, tenant.clone());
        Ok(tenant)
    }

    async fn tenant_by_id(&mut self, id: Uuid) -> StoreResult<Option<Tenant>> {
        Ok(self.staged.tenants.get(&id).cloned())
    }

    async fn tenants_by_property(&mut self, property_id: Uuid) -> StoreResult<Vec<Tenant>> {
        let rows = self
            .staged
            .tenants
            .values()
            .filter(|t| t.property_id == property_id)
            .cloned()
            .collect();
        Ok(oldest_first(rows, |t| (t.created_at, t.id)))
    }

    async fn update_tenant(
        &mut self,
        id: Uuid,
        changes: TenantChanges,
    ) -> StoreResult<Option<Tenant>> {
        Ok(self.staged.tenants.get_mut(&id).map(|tenant| {
            changes.apply(tenant);
            tenant.clone()
        }))
    }

    async fn delete_tenants(&mut self, ids: &[Uuid]) -> StoreResult<u64> {
        Ok(ids
            .iter()
            .filter(|id| self.staged.tenants.remove(*id).is_some())
            .count() as u64)
    }

    async fn attach_tenant(&mut self, property_id: Uuid, tenant_id: Uuid) -> StoreResult<bool> {
        match self.staged.properties.get_mut(&property_id) {
            Some(property) => {
                property.tenant_ids.push(tenant_id);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn detach_tenant(&mut self, property_id: Uuid, tenant_id: Uuid) -> StoreResult<()> {
        if let Some(property) = self.staged.properties.get_mut(&property_id) {
            property.tenant_ids.retain(|id| *id != tenant_id);
        }
        Ok(())
    }

    async fn commit(self: Box<Self>) -> StoreResult<()> {
        let MemoryTransaction {
            mut committed,
            staged,
        } = *self;
        *committed = staged;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(email: &str) -> NewUser {
        NewUser {
            username: "ana".into(),
            email: email.into(),
            password_hash: "hash".into(),
        }
    }

    fn new_property(manager_id: Uuid) -> NewProperty {
        NewProperty {
            property_name: "Flat".into(),
            address: "1 Rd".into(),
            description: "d".into(),
            property_type: None,
            number_of_rooms: 2,
            manager_id,
        }
    }

    #[tokio::test]
    async fn committed_writes_are_visible() {
        let store = MemoryStore::new();
        let mut tx = store.begin().await.unwrap();
        let user = tx.insert_user(new_user("a@x.com")).await.unwrap();
        tx.commit().await.unwrap();

        let mut tx = store.begin().await.unwrap();
        assert_eq!(tx.user_by_id(user.id).await.unwrap(), Some(user));
    }

    #[tokio::test]
    async fn dropped_transaction_rolls_back() {
        let store = MemoryStore::new();
        {
            let mut tx = store.begin().await.unwrap();
            tx.insert_user(new_user("a@x.com")).await.unwrap();
        }
        assert_eq!(store.user_count().await, 0);
    }

    #[tokio::test]
    async fn duplicate_email_conflicts() {
        let store = MemoryStore::new();
        let mut tx = store.begin().await.unwrap();
        tx.insert_user(new_user("a@x.com")).await.unwrap();
        let err = tx.insert_user(new_user("a@x.com")).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict("email")));
    }

    #[tokio::test]
    async fn attach_keeps_insertion_order() {
        let store = MemoryStore::new();
        let mut tx = store.begin().await.unwrap();
        let user = tx.insert_user(new_user("a@x.com")).await.unwrap();
        let property = tx.insert_property(new_property(user.id)).await.unwrap();
        let first = Uuid::new_v4();
        let second = Uuid::new_v4();
        assert!(tx.attach_tenant(property.id, first).await.unwrap());
        assert!(tx.attach_tenant(property.id, second).await.unwrap());
        assert!(!tx.attach_tenant(Uuid::new_v4(), first).await.unwrap());

        tx.detach_tenant(property.id, first).await.unwrap();
        let property = tx.property_by_id(property.id).await.unwrap().unwrap();
        assert_eq!(property.tenant_ids, vec![second]);
    }

    #[tokio::test]
    async fn bulk_delete_counts_only_existing_rows() {
        let store = MemoryStore::new();
        let mut tx = store.begin().await.unwrap();
        let user = tx.insert_user(new_user("a@x.com")).await.unwrap();
        let p1 = tx.insert_property(new_property(user.id)).await.unwrap();
        let p2 = tx.insert_property(new_property(user.id)).await.unwrap();
        let deleted = tx
            .delete_properties(&[p1.id, p2.id, Uuid::new_v4()])
            .await
            .unwrap();
        assert_eq!(deleted, 2);
    }
}
