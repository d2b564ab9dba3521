//! Partial-update payloads.
//!
//! Each patch type declares the set of field names a client may change.
//! [`parse_patch`] rejects any other key by name before the payload is
//! deserialized, so a request naming `managerId` or `id` never reaches the
//! store.

use models::{PropertyChanges, TenantChanges};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use crate::validation::{
    Checker, FieldError, PASSWORD_MAX, PASSWORD_MIN, USERNAME_MAX, USERNAME_MIN,
};

pub trait Patch: DeserializeOwned {
    /// Wire names of the mutable fields.
    const FIELDS: &'static [&'static str];

    fn validate(&self) -> Vec<FieldError>;

    fn is_empty(&self) -> bool;
}

#[derive(Debug, thiserror::Error)]
pub enum PatchError {
    #[error("update payload must be a JSON object")]
    NotAnObject,

    #[error("{0} is not a field that can be updated")]
    InvalidField(String),

    #[error("update payload is invalid")]
    Invalid(Vec<FieldError>),
}

pub fn parse_patch<P: Patch>(payload: Value) -> Result<P, PatchError> {
    let Value::Object(fields) = &payload else {
        return Err(PatchError::NotAnObject);
    };
    if let Some(field) = fields.keys().find(|key| !P::FIELDS.contains(&key.as_str())) {
        return Err(PatchError::InvalidField(field.clone()));
    }
    let nulls: Vec<FieldError> = fields
        .iter()
        .filter(|(_, value)| value.is_null())
        .map(|(field, _)| FieldError::new(field, format!("{field} cannot be null")))
        .collect();
    if !nulls.is_empty() {
        return Err(PatchError::Invalid(nulls));
    }

    let patch: P = serde_json::from_value(payload)
        .map_err(|error| PatchError::Invalid(vec![FieldError::new("body", error.to_string())]))?;

    let errors = patch.validate();
    if errors.is_empty() {
        Ok(patch)
    } else {
        Err(PatchError::Invalid(errors))
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PropertyPatch {
    pub property_name: Option<String>,
    pub address: Option<String>,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub property_type: Option<String>,
    pub number_of_rooms: Option<i32>,
}

impl Patch for PropertyPatch {
    const FIELDS: &'static [&'static str] = &[
        "propertyName",
        "address",
        "description",
        "type",
        "numberOfRooms",
    ];

    fn validate(&self) -> Vec<FieldError> {
        let mut check = Checker::default();
        if let Some(value) = &self.property_name {
            check.required("propertyName", value);
        }
        if let Some(value) = &self.address {
            check.required("address", value);
        }
        if let Some(value) = &self.description {
            check.required("description", value);
        }
        if let Some(value) = &self.property_type {
            check.required("type", value);
        }
        if let Some(rooms) = self.number_of_rooms {
            check.rooms("numberOfRooms", rooms);
        }
        check.errors()
    }

    fn is_empty(&self) -> bool {
        self.property_name.is_none()
            && self.address.is_none()
            && self.description.is_none()
            && self.property_type.is_none()
            && self.number_of_rooms.is_none()
    }
}

impl From<PropertyPatch> for PropertyChanges {
    fn from(patch: PropertyPatch) -> Self {
        Self {
            property_name: patch.property_name,
            address: patch.address,
            description: patch.description,
            property_type: patch.property_type,
            number_of_rooms: patch.number_of_rooms,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TenantPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl Patch for TenantPatch {
    const FIELDS: &'static [&'static str] = &["name", "email", "phone"];

    fn validate(&self) -> Vec<FieldError> {
        let mut check = Checker::default();
        if let Some(value) = &self.name {
            check.required("name", value);
        }
        if let Some(value) = &self.email {
            check.email("email", value);
        }
        check.errors()
    }

    fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.phone.is_none()
    }
}

/// A blank phone is treated as absent, as on create.
impl From<TenantPatch> for TenantChanges {
    fn from(patch: TenantPatch) -> Self {
        Self {
            name: patch.name,
            email: patch.email,
            phone: patch.phone.filter(|phone| !phone.trim().is_empty()),
        }
    }
}

/// Self-service account update. The password arrives in plaintext and is
/// hashed by the caller before it becomes a `UserChanges`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UserPatch {
    pub username: Option<String>,
    pub password: Option<String>,
}

impl Patch for UserPatch {
    const FIELDS: &'static [&'static str] = &["username", "password"];

    fn validate(&self) -> Vec<FieldError> {
        let mut check = Checker::default();
        if let Some(value) = &self.username {
            check.length("username", value, USERNAME_MIN, USERNAME_MAX);
        }
        if let Some(value) = &self.password {
            check.length("password", value, PASSWORD_MIN, PASSWORD_MAX);
        }
        check.errors()
    }

    fn is_empty(&self) -> bool {
        self.username.is_none() && self.password.is_none()
    }
}
