use axum::{extract::rejection::JsonRejection, extract::State, http::StatusCode, Json};
use axum_extra::extract::cookie::CookieJar;
use dto::{DeleteAccountRequest, SignupRequest, UserSummary};
use serde_json::Value;

use super::auth::cleared_cookie;
use crate::context::RequestContext;
use crate::error::ApiError;
use crate::services::accounts;
use crate::state::AppState;

pub(super) async fn signup(
    State(state): State<AppState>,
    payload: Result<Json<SignupRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<UserSummary>), ApiError> {
    let Json(request) = payload?;
    let user = accounts::signup(&state, request).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

pub(super) async fn update_account(
    State(state): State<AppState>,
    ctx: RequestContext,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<UserSummary>), ApiError> {
    ctx.require_user()?;
    let Json(payload) = payload?;
    let user = accounts::update_account(&state, &ctx, payload).await?;
    Ok((StatusCode::ACCEPTED, Json(user)))
}

pub(super) async fn delete_account(
    State(state): State<AppState>,
    ctx: RequestContext,
    jar: CookieJar,
    payload: Result<Json<DeleteAccountRequest>, JsonRejection>,
) -> Result<(CookieJar, StatusCode), ApiError> {
    ctx.require_user()?;
    let Json(request) = payload?;
    accounts::delete_account(&state, &ctx, request).await?;
    Ok((jar.remove(cleared_cookie(state.config())), StatusCode::NO_CONTENT))
}
