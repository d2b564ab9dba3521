//! Scoped CRUD and cascade workflows. Every operation takes the caller's
//! [`RequestContext`](crate::context::RequestContext) explicitly.

pub mod accounts;
pub mod auth;
pub mod properties;
pub mod tenants;

use models::{Property, Tenant, User};
use uuid::Uuid;

use crate::error::ApiError;
use crate::store::Transaction;

/// Load a property the actor manages.
pub(crate) async fn owned_property(
    tx: &mut dyn Transaction,
    actor: &User,
    property_id: Uuid,
) -> Result<Property, ApiError> {
    let property = tx
        .property_by_id(property_id)
        .await?
        .ok_or(ApiError::NotFound("Property"))?;
    if !property.is_managed_by(actor.id) {
        tracing::warn!(%property_id, user_id = %actor.id, "property access by non-manager refused");
        return Err(ApiError::Forbidden("property"));
    }
    Ok(property)
}

/// Load a tenant whose parent property the actor manages.
pub(crate) async fn owned_tenant(
    tx: &mut dyn Transaction,
    actor: &User,
    tenant_id: Uuid,
) -> Result<Tenant, ApiError> {
    let tenant = tx
        .tenant_by_id(tenant_id)
        .await?
        .ok_or(ApiError::NotFound("Tenant"))?;
    owned_property(tx, actor, tenant.property_id).await?;
    Ok(tenant)
}
