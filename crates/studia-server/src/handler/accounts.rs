//! Profile and account management handlers.

use axum::Json;
use axum::Router;
use axum::extract::State;
use axum::routing::{delete, get, put};
use studia_opendal::FileStore;
use studia_postgres::PgClient;
use studia_postgres::model::UpdateAccount;
use studia_postgres::query::{AccountRepository, AnalysisRepository};

use crate::extract::{AuthState, ValidateJson};
use crate::handler::request::{ChangePasswordRequest, UpdateProfileRequest};
use crate::handler::response::{AckResponse, ProfileResponse};
use crate::handler::{ErrorKind, Result};
use crate::service::{AuthHasher, ServiceState};

/// Tracing target for account operations.
const TRACING_TARGET: &str = "studia_server::handler::accounts";

/// Returns the authenticated account's profile.
async fn get_profile(
    State(pg_client): State<PgClient>,
    AuthState(claims): AuthState,
) -> Result<Json<ProfileResponse>> {
    let mut conn = pg_client.get_connection().await?;

    let account = conn
        .find_account_by_id(claims.account_id)
        .await?
        .ok_or_else(|| ErrorKind::NotFound.with_message("Account not found"))?;

    Ok(Json(ProfileResponse {
        success: true,
        user: account.into(),
    }))
}

/// Updates display name and/or email.
#[tracing::instrument(skip_all, fields(account_id = %claims.account_id))]
async fn update_profile(
    State(pg_client): State<PgClient>,
    AuthState(claims): AuthState,
    ValidateJson(request): ValidateJson<UpdateProfileRequest>,
) -> Result<Json<ProfileResponse>> {
    if request.name.is_none() && request.email.is_none() {
        return Err(ErrorKind::BadRequest.with_message("Nothing to update"));
    }

    let mut conn = pg_client.get_connection().await?;

    if let Some(ref email) = request.email {
        if conn.email_taken_by_other(email, claims.account_id).await? {
            return Err(ErrorKind::Conflict.with_message("Email already in use"));
        }
    }

    let account = conn
        .update_account(
            claims.account_id,
            UpdateAccount {
                display_name: request.name,
                email: request.email,
                ..Default::default()
            },
        )
        .await?;

    tracing::debug!(target: TRACING_TARGET, "profile updated");

    Ok(Json(ProfileResponse {
        success: true,
        user: account.into(),
    }))
}

/// Changes the password after verifying the current one.
#[tracing::instrument(skip_all, fields(account_id = %claims.account_id))]
async fn change_password(
    State(pg_client): State<PgClient>,
    State(auth_hasher): State<AuthHasher>,
    AuthState(claims): AuthState,
    ValidateJson(request): ValidateJson<ChangePasswordRequest>,
) -> Result<Json<AckResponse>> {
    let mut conn = pg_client.get_connection().await?;

    let account = conn
        .find_account_by_id(claims.account_id)
        .await?
        .ok_or_else(|| ErrorKind::NotFound.with_message("Account not found"))?;

    if !auth_hasher.verify(&request.current_password, &account.password_hash) {
        return Err(ErrorKind::BadRequest.with_message("Current password is incorrect"));
    }

    let password_hash = auth_hasher.hash(&request.new_password)?;
    conn.update_account(
        claims.account_id,
        UpdateAccount {
            password_hash: Some(password_hash),
            ..Default::default()
        },
    )
    .await?;

    tracing::info!(target: TRACING_TARGET, "password changed");

    Ok(Json(AckResponse::new("Password changed successfully")))
}

/// Deletes the account with everything it owns.
///
/// Analyses and chats cascade in the schema; stored image files are removed
/// best-effort afterwards.
#[tracing::instrument(skip_all, fields(account_id = %claims.account_id))]
async fn delete_account(
    State(pg_client): State<PgClient>,
    State(file_store): State<FileStore>,
    AuthState(claims): AuthState,
) -> Result<Json<AckResponse>> {
    let mut conn = pg_client.get_connection().await?;

    let image_paths = conn.list_image_paths(claims.account_id).await?;
    conn.delete_account(claims.account_id).await?;

    for path in image_paths {
        if let Err(err) = file_store.delete(&path).await {
            tracing::warn!(
                target: TRACING_TARGET,
                path = %path,
                error = %err,
                "failed to remove stored image during account deletion"
            );
        }
    }

    tracing::info!(target: TRACING_TARGET, "account deleted");

    Ok(Json(AckResponse::new("Account deleted successfully")))
}

/// Returns a [`Router`] with all related routes.
pub fn routes() -> Router<ServiceState> {
    Router::new()
        .route("/auth/profile", get(get_profile).put(update_profile))
        .route("/auth/change-password", put(change_password))
        .route("/auth/account", delete(delete_account))
}
