use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use dto::{CreateTenantRequest, TenantSummary};
use models::Tenant;
use serde_json::Value;

use super::parse_id;
use crate::context::RequestContext;
use crate::error::ApiError;
use crate::services::tenants;
use crate::state::AppState;

pub(super) async fn create(
    State(state): State<AppState>,
    ctx: RequestContext,
    payload: Result<Json<CreateTenantRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<TenantSummary>), ApiError> {
    ctx.require_user()?;
    let Json(request) = payload?;
    let tenant = tenants::add_tenant(&state, &ctx, request).await?;
    Ok((StatusCode::CREATED, Json(TenantSummary::from(&tenant))))
}

/// `id` is the parent property here.
pub(super) async fn list_for_property(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<String>,
) -> Result<Json<Vec<Tenant>>, ApiError> {
    ctx.require_user()?;
    let property_id = parse_id("property id", &id)?;
    Ok(Json(
        tenants::tenants_for_property(&state, &ctx, property_id).await?,
    ))
}

pub(super) async fn get_one(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<String>,
) -> Result<Json<Tenant>, ApiError> {
    ctx.require_user()?;
    let tenant_id = parse_id("tenant id", &id)?;
    Ok(Json(tenants::get_tenant(&state, &ctx, tenant_id).await?))
}

pub(super) async fn delete(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    ctx.require_user()?;
    let tenant_id = parse_id("tenant id", &id)?;
    tenants::delete_tenant(&state, &ctx, tenant_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub(super) async fn update(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Tenant>, ApiError> {
    ctx.require_user()?;
    let tenant_id = parse_id("tenant id", &id)?;
    let Json(payload) = payload?;
    Ok(Json(
        tenants::update_tenant(&state, &ctx, tenant_id, payload).await?,
    ))
}
