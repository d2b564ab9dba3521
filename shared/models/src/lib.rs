//! Domain records shared by the API service and its storage backends.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A registered manager account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
}

#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub username: Option<String>,
    pub password_hash: Option<String>,
}

impl UserChanges {
    pub fn apply(self, user: &mut User) {
        if let Some(username) = self.username {
            user.username = username;
        }
        if let Some(password_hash) = self.password_hash {
            user.password_hash = password_hash;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    pub id: Uuid,
    pub property_name: String,
    pub address: String,
    pub description: String,
    #[serde(rename = "type")]
    pub property_type: Option<String>,
    pub number_of_rooms: i32,
    pub manager_id: Uuid,
    /// Tenant ids in the order they were attached.
    pub tenant_ids: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl Property {
    pub fn is_managed_by(&self, user_id: Uuid) -> bool {
        self.manager_id == user_id
    }
}

#[derive(Debug, Clone)]
pub struct NewProperty {
    pub property_name: String,
    pub address: String,
    pub description: String,
    pub property_type: Option<String>,
    pub number_of_rooms: i32,
    pub manager_id: Uuid,
}

/// Partial update for a property. `None` leaves the column untouched.
#[derive(Debug, Clone, Default)]
pub struct PropertyChanges {
    pub property_name: Option<String>,
    pub address: Option<String>,
    pub description: Option<String>,
    pub property_type: Option<String>,
    pub number_of_rooms: Option<i32>,
}

impl PropertyChanges {
    pub fn apply(self, property: &mut Property) {
        if let Some(property_name) = self.property_name {
            property.property_name = property_name;
        }
        if let Some(address) = self.address {
            property.address = address;
        }
        if let Some(description) = self.description {
            property.description = description;
        }
        if let Some(property_type) = self.property_type {
            property.property_type = Some(property_type);
        }
        if let Some(number_of_rooms) = self.number_of_rooms {
            property.number_of_rooms = number_of_rooms;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tenant {
    pub id: Uuid,
    pub property_id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewTenant {
    pub property_id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct TenantChanges {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl TenantChanges {
    pub fn apply(self, tenant: &mut Tenant) {
        if let Some(name) = self.name {
            tenant.name = name;
        }
        if let Some(email) = self.email {
            tenant.email = email;
        }
        if let Some(phone) = self.phone {
            tenant.phone = Some(phone);
        }
    }
}

/// Server-side login session. The id is the opaque handle handed to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: Uuid,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn new(user_id: Uuid, ttl: chrono::Duration) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            created_at: now,
            expires_at: now + ttl,
        }
    }

    pub fn is_expired(&self) -> bool {
        self.expires_at <= Utc::now()
    }
}
