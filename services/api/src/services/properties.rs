use dto::{parse_patch, CreatePropertyRequest, Patch, PropertyPatch};
use models::Property;
use serde_json::Value;
use uuid::Uuid;

use super::owned_property;
use crate::context::RequestContext;
use crate::error::ApiError;
use crate::state::AppState;

pub async fn create_property(
    state: &AppState,
    ctx: &RequestContext,
    request: CreatePropertyRequest,
) -> Result<Property, ApiError> {
    let actor = ctx.require_user()?;
    let new_property = request.into_new_property(actor.id)?;

    let mut tx = state.store().begin().await?;
    if tx.user_by_id(actor.id).await?.is_none() {
        return Err(ApiError::Unauthenticated);
    }
    let property = tx.insert_property(new_property).await?;
    tx.commit().await?;

    tracing::info!(property_id = %property.id, manager_id = %actor.id, "property created");
    Ok(property)
}

pub async fn list_properties(
    state: &AppState,
    ctx: &RequestContext,
) -> Result<Vec<Property>, ApiError> {
    let actor = ctx.require_user()?;
    let mut tx = state.store().begin().await?;
    let properties = tx.properties_by_manager(actor.id).await?;
    tx.commit().await?;
    Ok(properties)
}

/// Delete a property the caller manages, together with its tenants.
pub async fn delete_property(
    state: &AppState,
    ctx: &RequestContext,
    property_id: Uuid,
) -> Result<(), ApiError> {
    let actor = ctx.require_user()?;

    let mut tx = state.store().begin().await?;
    let property = owned_property(tx.as_mut(), actor, property_id).await?;
    let tenants = tx.delete_tenants(&property.tenant_ids).await?;
    tx.delete_properties(&[property.id]).await?;
    tx.commit().await?;

    tracing::info!(%property_id, manager_id = %actor.id, tenants, "property deleted");
    Ok(())
}

pub async fn update_property(
    state: &AppState,
    ctx: &RequestContext,
    property_id: Uuid,
    payload: Value,
) -> Result<Property, ApiError> {
    let actor = ctx.require_user()?;
    let patch: PropertyPatch = parse_patch(payload)?;

    let mut tx = state.store().begin().await?;
    let current = owned_property(tx.as_mut(), actor, property_id).await?;
    if patch.is_empty() {
        return Ok(current);
    }
    let updated = tx
        .update_property(property_id, patch.into())
        .await?
        .ok_or(ApiError::NotFound("Property"))?;
    tx.commit().await?;

    tracing::info!(%property_id, manager_id = %actor.id, "property updated");
    Ok(updated)
}
