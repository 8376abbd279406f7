// handlers/public/auth/register.rs - POST /api/auth/register handler

use axum::{body::Bytes, extract::State};
use serde::Deserialize;

use crate::app::AppState;
use crate::auth::hash_password;
use crate::database::models::{NewUser, User};
use crate::error::ApiError;
use crate::messages::Message;
use crate::middleware::{ApiResponse, ApiResult};
use crate::validation::{parse_body, schemas};

/// Registration form. `confirmPassword` and `acceptTerms` are enforced by the
/// schema and carry nothing further.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

/**
 * POST /api/auth/register - Create a user account
 *
 * Expected Input:
 * ```json
 * {
 *   "name": "Ana Souza",
 *   "email": "ana@example.com",
 *   "password": "s3cret!",
 *   "confirmPassword": "s3cret!",
 *   "acceptTerms": true
 * }
 * ```
 *
 * Expected Output (201):
 * ```json
 * {
 *   "success": true,
 *   "data": { "id": "...", "nome": "Ana Souza", "email": "ana@example.com", "tipo": "PESSOA_FISICA", ... }
 * }
 * ```
 *
 * The password hash never leaves the server. A taken email answers 409.
 */
pub async fn register(State(state): State<AppState>, body: Bytes) -> ApiResult<User> {
    let request: RegisterRequest = parse_body(&body, &schemas::REGISTER)?;
    let email = request.email.to_lowercase();

    let password = request.password;
    let senha = tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| {
            tracing::error!("Password hashing task failed: {}", e);
            ApiError::internal_server_error(Message::RegistrationFailed.text())
        })?
        .map_err(|e| {
            tracing::error!("Password hashing failed: {}", e);
            ApiError::internal_server_error(Message::RegistrationFailed.text())
        })?;

    let new_user = NewUser {
        nome: request.name,
        email,
        senha,
    };

    match state.store.create_user(new_user).await {
        Ok(user) => {
            tracing::info!("Registered user {} ({})", user.email, user.id);
            Ok(ApiResponse::created(user))
        }
        Err(e) if e.is_unique_violation() => Err(ApiError::conflict(Message::EmailInUse.text())),
        Err(e) => Err(e.into_internal(Message::RegistrationFailed)),
    }
}
