//! Account lifecycle: signup, self-update and the cascading account delete.

use std::collections::BTreeSet;

use dto::{parse_patch, DeleteAccountRequest, Patch, SignupRequest, UserPatch, UserSummary};
use models::{NewUser, UserChanges};
use serde_json::Value;
use uuid::Uuid;

use crate::context::RequestContext;
use crate::error::ApiError;
use crate::password;
use crate::state::AppState;

/// What an account deletion removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeletionResult {
    pub tenants: u64,
    pub properties: u64,
    pub sessions: u64,
}

pub async fn signup(state: &AppState, request: SignupRequest) -> Result<UserSummary, ApiError> {
    request.validate()?;
    let password_hash = password::hash_password(&request.password)?;

    let mut tx = state.store().begin().await?;
    let user = tx
        .insert_user(NewUser {
            username: request.username,
            email: request.email,
            password_hash,
        })
        .await?;
    tx.commit().await?;

    tracing::info!(user_id = %user.id, "user created");
    Ok(UserSummary::from(&user))
}

/// Change the caller's username and/or password.
pub async fn update_account(
    state: &AppState,
    ctx: &RequestContext,
    payload: Value,
) -> Result<UserSummary, ApiError> {
    let actor = ctx.require_user()?;
    let patch: UserPatch = parse_patch(payload)?;
    if patch.is_empty() {
        return Err(ApiError::NothingToUpdate);
    }

    let password_hash = patch
        .password
        .as_deref()
        .map(password::hash_password)
        .transpose()?;
    let changes = UserChanges {
        username: patch.username,
        password_hash,
    };

    let mut tx = state.store().begin().await?;
    let user = tx
        .update_user(actor.id, changes)
        .await?
        .ok_or(ApiError::Unauthenticated)?;
    tx.commit().await?;

    tracing::info!(user_id = %user.id, "account updated");
    Ok(UserSummary::from(&user))
}

/// Delete the caller's account and everything it owns.
///
/// Tenants, then properties, then the user are removed inside one
/// transaction; any failure leaves all of them in place. Sessions are
/// revoked after the commit.
pub async fn delete_account(
    state: &AppState,
    ctx: &RequestContext,
    request: DeleteAccountRequest,
) -> Result<DeletionResult, ApiError> {
    let actor = ctx.require_user()?;
    if request.email != actor.email {
        return Err(ApiError::ConfirmationMismatch);
    }

    let mut tx = state.store().begin().await?;
    let properties = tx.properties_by_manager(actor.id).await?;
    let property_ids: Vec<Uuid> = properties.iter().map(|p| p.id).collect();
    let tenant_ids: Vec<Uuid> = properties
        .iter()
        .flat_map(|p| p.tenant_ids.iter().copied())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let tenants = tx.delete_tenants(&tenant_ids).await?;
    let deleted_properties = tx.delete_properties(&property_ids).await?;
    if !tx.delete_user(actor.id).await? {
        return Err(ApiError::NotFound("User"));
    }
    tx.commit().await?;

    let sessions = revoke_sessions(state, ctx, actor.id).await;

    tracing::info!(
        user_id = %actor.id,
        tenants,
        properties = deleted_properties,
        sessions,
        "account deleted"
    );
    Ok(DeletionResult {
        tenants,
        properties: deleted_properties,
        sessions,
    })
}

/// Session revocation cannot be rolled back with the store transaction.
/// Failures are logged only: the guard already rejects sessions whose user
/// no longer exists.
async fn revoke_sessions(state: &AppState, ctx: &RequestContext, user_id: Uuid) -> u64 {
    let mut revoked = 0;
    if let Some(session) = ctx.session() {
        match state.sessions().destroy(session.id).await {
            Ok(true) => revoked += 1,
            Ok(false) => {}
            Err(error) => {
                tracing::error!(%error, session_id = %session.id, "failed to destroy session");
            }
        }
    }
    match state.sessions().destroy_for_user(user_id).await {
        Ok(count) => revoked += count,
        Err(error) => tracing::error!(%error, %user_id, "failed to revoke user sessions"),
    }
    revoked
}
