//! Request bodies. Missing string fields deserialize as empty so that
//! validation can report every absent field at once.

use models::{NewProperty, NewTenant};
use serde::Deserialize;
use uuid::Uuid;

use crate::validation::{
    Checker, FieldError, PASSWORD_MAX, PASSWORD_MIN, USERNAME_MAX, USERNAME_MIN,
};

#[derive(Debug, Clone, Deserialize)]
pub struct SignupRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl SignupRequest {
    pub fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut check = Checker::default();
        if check.required("username", &self.username) {
            check.length("username", &self.username, USERNAME_MIN, USERNAME_MAX);
        }
        check.email("email", &self.email);
        if check.required("password", &self.password) {
            check.length("password", &self.password, PASSWORD_MIN, PASSWORD_MAX);
        }
        check.finish()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl LoginRequest {
    pub fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut check = Checker::default();
        check.required("email", &self.email);
        check.required("password", &self.password);
        check.finish()
    }
}

/// Body of the account deletion call: the caller re-types their email.
#[derive(Debug, Clone, Deserialize)]
pub struct DeleteAccountRequest {
    #[serde(default)]
    pub email: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePropertyRequest {
    #[serde(default)]
    pub property_name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "type")]
    pub property_type: Option<String>,
    pub number_of_rooms: Option<i32>,
}

impl CreatePropertyRequest {
    pub fn into_new_property(self, manager_id: Uuid) -> Result<NewProperty, Vec<FieldError>> {
        let mut check = Checker::default();
        check.required("propertyName", &self.property_name);
        check.required("address", &self.address);
        check.required("description", &self.description);
        if let Some(property_type) = &self.property_type {
            check.required("type", property_type);
        }
        match self.number_of_rooms {
            Some(rooms) => check.rooms("numberOfRooms", rooms),
            None => check.fail("numberOfRooms", "numberOfRooms is required"),
        }
        check.finish()?;

        Ok(NewProperty {
            property_name: self.property_name,
            address: self.address,
            description: self.description,
            property_type: self.property_type,
            number_of_rooms: self.number_of_rooms.unwrap_or_default(),
            manager_id,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTenantRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub property_id: String,
    pub phone: Option<String>,
}

impl CreateTenantRequest {
    pub fn into_new_tenant(self) -> Result<NewTenant, Vec<FieldError>> {
        let mut check = Checker::default();
        check.required("name", &self.name);
        check.email("email", &self.email);
        let property_id = if check.required("propertyId", &self.property_id) {
            match Uuid::parse_str(self.property_id.trim()) {
                Ok(id) => Some(id),
                Err(_) => {
                    check.fail("propertyId", "propertyId must be a valid id");
                    None
                }
            }
        } else {
            None
        };
        check.finish()?;

        Ok(NewTenant {
            property_id: property_id.unwrap_or_default(),
            name: self.name,
            email: self.email,
            phone: self.phone.filter(|phone| !phone.trim().is_empty()),
        })
    }
}
