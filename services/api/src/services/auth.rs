use dto::{AuthStatus, LoginRequest, UserSummary};
use models::{Session, User};

use crate::context::RequestContext;
use crate::error::ApiError;
use crate::password;
use crate::state::AppState;

/// Verify email and password and open a new session.
///
/// A session already attached to the request is replaced.
pub async fn authenticate(
    state: &AppState,
    ctx: &RequestContext,
    request: LoginRequest,
) -> Result<(Session, User), ApiError> {
    request.validate()?;

    let mut tx = state.store().begin().await?;
    let user = tx.user_by_email(&request.email).await?;
    tx.commit().await?;

    let Some(user) = user else {
        password::verify_dummy(&request.password);
        tracing::info!("login for unknown email refused");
        return Err(ApiError::InvalidCredentials);
    };
    if !password::verify_password(&request.password, &user.password_hash)? {
        tracing::info!(user_id = %user.id, "login with wrong password refused");
        return Err(ApiError::InvalidCredentials);
    }

    if let Some(previous) = ctx.session() {
        state.sessions().destroy(previous.id).await?;
    }
    let session = state
        .sessions()
        .create(user.id, state.config().session_ttl())
        .await?;

    tracing::info!(user_id = %user.id, session_id = %session.id, "logged in");
    Ok((session, user))
}

pub async fn logout(state: &AppState, ctx: &RequestContext) -> Result<(), ApiError> {
    let session = ctx.require_session()?;
    if !state.sessions().destroy(session.id).await? {
        return Err(ApiError::AlreadyLoggedOut);
    }
    tracing::info!(user_id = %session.user_id, session_id = %session.id, "logged out");
    Ok(())
}

pub fn status(ctx: &RequestContext) -> AuthStatus {
    AuthStatus {
        authenticated: ctx.user().is_some(),
        user: ctx.user().map(UserSummary::from),
        expires_at: ctx.session().map(|session| session.expires_at),
    }
}
