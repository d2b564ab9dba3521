//! Per-request identity.
//!
//! Every handler receives a [`RequestContext`] built from the session handle
//! the client presents. Services call [`RequestContext::require_user`] before
//! touching storage, so an anonymous request never reaches the store.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};
use axum_extra::extract::cookie::CookieJar;
use models::{Session, User};
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Clone)]
struct Authenticated {
    session: Session,
    user: User,
}

#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    auth: Option<Authenticated>,
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(|s| s.trim().to_string())
}

/// The session id from the session cookie, or from a bearer token when no
/// cookie is present.
fn session_handle(headers: &HeaderMap, cookie_name: &str) -> Option<Uuid> {
    let raw = CookieJar::from_headers(headers)
        .get(cookie_name)
        .map(|cookie| cookie.value().to_string())
        .or_else(|| bearer_token(headers))?;
    Uuid::parse_str(&raw).ok()
}

impl RequestContext {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn authenticated(session: Session, user: User) -> Self {
        Self {
            auth: Some(Authenticated { session, user }),
        }
    }

    pub fn user(&self) -> Option<&User> {
        self.auth.as_ref().map(|auth| &auth.user)
    }

    pub fn session(&self) -> Option<&Session> {
        self.auth.as_ref().map(|auth| &auth.session)
    }

    pub fn require_user(&self) -> Result<&User, ApiError> {
        self.user().ok_or(ApiError::Unauthenticated)
    }

    pub fn require_session(&self) -> Result<&Session, ApiError> {
        self.session().ok_or(ApiError::Unauthenticated)
    }

    /// Resolve the caller from request headers. Unknown, expired or orphaned
    /// sessions yield an anonymous context rather than an error.
    pub async fn resolve(state: &AppState, headers: &HeaderMap) -> Result<Self, ApiError> {
        let Some(session_id) = session_handle(headers, &state.config().session_cookie) else {
            return Ok(Self::anonymous());
        };
        let Some(session) = state.sessions().get(session_id).await? else {
            return Ok(Self::anonymous());
        };

        let mut tx = state.store().begin().await?;
        let user = tx.user_by_id(session.user_id).await?;
        tx.commit().await?;

        match user {
            Some(user) => Ok(Self::authenticated(session, user)),
            None => {
                tracing::warn!(
                    session_id = %session.id,
                    user_id = %session.user_id,
                    "session for missing user dropped"
                );
                state.sessions().destroy(session.id).await?;
                Ok(Self::anonymous())
            }
        }
    }
}

#[async_trait]
impl FromRequestParts<AppState> for RequestContext {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Self::resolve(state, &parts.headers).await
    }
}
