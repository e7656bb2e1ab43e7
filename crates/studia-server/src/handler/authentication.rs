//! Registration and login handlers.

use axum::Json;
use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use studia_postgres::PgClient;
use studia_postgres::model::NewAccount;
use studia_postgres::query::AccountRepository;

use crate::extract::{AuthKeys, AuthState, ValidateJson};
use crate::handler::request::{LoginRequest, RegisterRequest};
use crate::handler::response::{AckResponse, AuthResponse};
use crate::handler::{ErrorKind, Result};
use crate::service::{AuthHasher, ServiceState};

/// Tracing target for authentication operations.
const TRACING_TARGET: &str = "studia_server::handler::authentication";

/// Creates an account and returns a bearer token.
#[tracing::instrument(skip_all, fields(email = %request.email))]
async fn register(
    State(pg_client): State<PgClient>,
    State(auth_hasher): State<AuthHasher>,
    State(auth_keys): State<AuthKeys>,
    ValidateJson(request): ValidateJson<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>)> {
    let mut conn = pg_client.get_connection().await?;

    if conn.find_account_by_email(&request.email).await?.is_some() {
        return Err(ErrorKind::Conflict.with_message("User already exists with this email"));
    }

    let password_hash = auth_hasher.hash(&request.password)?;
    let account = conn
        .create_account(NewAccount {
            email: request.email,
            password_hash,
            display_name: request.name,
        })
        .await?;

    let token = auth_keys.issue(account.id)?;

    tracing::info!(
        target: TRACING_TARGET,
        account_id = %account.id,
        "account registered"
    );

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            success: true,
            message: "User registered successfully".to_string(),
            token,
            user: account.into(),
        }),
    ))
}

/// Verifies credentials and returns a bearer token.
#[tracing::instrument(skip_all, fields(email = %request.email))]
async fn login(
    State(pg_client): State<PgClient>,
    State(auth_hasher): State<AuthHasher>,
    State(auth_keys): State<AuthKeys>,
    ValidateJson(request): ValidateJson<LoginRequest>,
) -> Result<Json<AuthResponse>> {
    let mut conn = pg_client.get_connection().await?;

    let account = conn.find_account_by_email(&request.email).await?;
    let account = match account {
        Some(account) if auth_hasher.verify(&request.password, &account.password_hash) => account,
        // Same response for unknown email and wrong password.
        _ => return Err(ErrorKind::Unauthorized.with_message("Invalid email or password")),
    };

    let token = auth_keys.issue(account.id)?;

    tracing::debug!(
        target: TRACING_TARGET,
        account_id = %account.id,
        "login successful"
    );

    Ok(Json(AuthResponse {
        success: true,
        message: "Login successful".to_string(),
        token,
        user: account.into(),
    }))
}

/// Logout acknowledgement; bearer tokens are dropped client-side.
async fn logout(_auth: AuthState) -> Json<AckResponse> {
    Json(AckResponse::new("Logged out successfully"))
}

/// Returns a [`Router`] with all related routes.
pub fn routes() -> Router<ServiceState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
}
