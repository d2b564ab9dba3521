use dto::{parse_patch, CreateTenantRequest, Patch, TenantPatch};
use models::Tenant;
use serde_json::Value;
use uuid::Uuid;

use super::{owned_property, owned_tenant};
use crate::context::RequestContext;
use crate::error::ApiError;
use crate::state::AppState;

/// Create a tenant and append it to its parent's tenant set in one
/// transaction. If the parent cannot take the tenant, nothing is written.
pub async fn add_tenant(
    state: &AppState,
    ctx: &RequestContext,
    request: CreateTenantRequest,
) -> Result<Tenant, ApiError> {
    let actor = ctx.require_user()?;
    let new_tenant = request.into_new_tenant()?;

    let mut tx = state.store().begin().await?;
    owned_property(tx.as_mut(), actor, new_tenant.property_id).await?;
    let tenant = tx.insert_tenant(new_tenant).await?;
    if !tx.attach_tenant(tenant.property_id, tenant.id).await? {
        return Err(ApiError::NotFound("Property"));
    }
    tx.commit().await?;

    tracing::info!(tenant_id = %tenant.id, property_id = %tenant.property_id, "tenant added");
    Ok(tenant)
}

pub async fn tenants_for_property(
    state: &AppState,
    ctx: &RequestContext,
    property_id: Uuid,
) -> Result<Vec<Tenant>, ApiError> {
    let actor = ctx.require_user()?;
    let mut tx = state.store().begin().await?;
    owned_property(tx.as_mut(), actor, property_id).await?;
    let tenants = tx.tenants_by_property(property_id).await?;
    tx.commit().await?;
    Ok(tenants)
}

pub async fn get_tenant(
    state: &AppState,
    ctx: &RequestContext,
    tenant_id: Uuid,
) -> Result<Tenant, ApiError> {
    let actor = ctx.require_user()?;
    let mut tx = state.store().begin().await?;
    let tenant = owned_tenant(tx.as_mut(), actor, tenant_id).await?;
    tx.commit().await?;
    Ok(tenant)
}

/// Remove a tenant and detach it from the parent property.
pub async fn delete_tenant(
    state: &AppState,
    ctx: &RequestContext,
    tenant_id: Uuid,
) -> Result<(), ApiError> {
    let actor = ctx.require_user()?;

    let mut tx = state.store().begin().await?;
    let tenant = owned_tenant(tx.as_mut(), actor, tenant_id).await?;
    tx.detach_tenant(tenant.property_id, tenant.id).await?;
    tx.delete_tenants(&[tenant.id]).await?;
    tx.commit().await?;

    tracing::info!(%tenant_id, property_id = %tenant.property_id, "tenant deleted");
    Ok(())
}

pub async fn update_tenant(
    state: &AppState,
    ctx: &RequestContext,
    tenant_id: Uuid,
    payload: Value,
) -> Result<Tenant, ApiError> {
    let actor = ctx.require_user()?;
    let patch: TenantPatch = parse_patch(payload)?;

    let mut tx = state.store().begin().await?;
    let current = owned_tenant(tx.as_mut(), actor, tenant_id).await?;
    if patch.is_empty() {
        return Ok(current);
    }
    let updated = tx
        .update_tenant(tenant_id, patch.into())
        .await?
        .ok_or(ApiError::NotFound("Tenant"))?;
    tx.commit().await?;

    tracing::info!(%tenant_id, "tenant updated");
    Ok(updated)
}
