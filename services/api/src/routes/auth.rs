use axum::{extract::rejection::JsonRejection, extract::State, Json};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use dto::{AuthStatus, LoginRequest, Message, UserSummary};
use models::Session;
use serde_json::json;

use crate::config::Config;
use crate::context::RequestContext;
use crate::error::ApiError;
use crate::services::auth;
use crate::state::AppState;

fn session_cookie(config: &Config, session: &Session) -> Cookie<'static> {
    Cookie::build((config.session_cookie.clone(), session.id.to_string()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

pub(super) fn cleared_cookie(config: &Config) -> Cookie<'static> {
    Cookie::build((config.session_cookie.clone(), String::new()))
        .path("/")
        .build()
}

pub(super) async fn login(
    State(state): State<AppState>,
    ctx: RequestContext,
    jar: CookieJar,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<(CookieJar, Json<serde_json::Value>), ApiError> {
    let Json(request) = payload?;
    let (session, user) = auth::authenticate(&state, &ctx, request).await?;
    let jar = jar.add(session_cookie(state.config(), &session));
    Ok((
        jar,
        Json(json!({
            "msg": "Logged in",
            "user": UserSummary::from(&user),
            "expiresAt": session.expires_at,
        })),
    ))
}

pub(super) async fn status(ctx: RequestContext) -> Json<AuthStatus> {
    Json(auth::status(&ctx))
}

pub(super) async fn logout(
    State(state): State<AppState>,
    ctx: RequestContext,
    jar: CookieJar,
) -> Result<(CookieJar, Json<Message>), ApiError> {
    auth::logout(&state, &ctx).await?;
    Ok((
        jar.remove(cleared_cookie(state.config())),
        Json(Message::new("Logged Out")),
    ))
}
