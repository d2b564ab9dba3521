use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use dto::CreatePropertyRequest;
use models::Property;
use serde_json::Value;

use super::parse_id;
use crate::context::RequestContext;
use crate::error::ApiError;
use crate::services::properties;
use crate::state::AppState;

pub(super) async fn create(
    State(state): State<AppState>,
    ctx: RequestContext,
    payload: Result<Json<CreatePropertyRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Property>), ApiError> {
    ctx.require_user()?;
    let Json(request) = payload?;
    let property = properties::create_property(&state, &ctx, request).await?;
    Ok((StatusCode::CREATED, Json(property)))
}

pub(super) async fn list(
    State(state): State<AppState>,
    ctx: RequestContext,
) -> Result<Json<Vec<Property>>, ApiError> {
    Ok(Json(properties::list_properties(&state, &ctx).await?))
}

pub(super) async fn delete(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    ctx.require_user()?;
    let property_id = parse_id("property id", &id)?;
    properties::delete_property(&state, &ctx, property_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub(super) async fn update(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Property>, ApiError> {
    ctx.require_user()?;
    let property_id = parse_id("property id", &id)?;
    let Json(payload) = payload?;
    Ok(Json(
        properties::update_property(&state, &ctx, property_id, payload).await?,
    ))
}
