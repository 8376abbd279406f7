// handlers/public/auth/login.rs - POST /api/auth/login handler

use axum::{
    body::Bytes,
    extract::State,
    http::header,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use super::session_cookie;
use crate::app::AppState;
use crate::auth::{generate_jwt, verify_password, verify_unknown_account, Claims};
use crate::database::models::User;
use crate::error::ApiError;
use crate::messages::Message;
use crate::middleware::ApiResponse;
use crate::validation::{parse_body, schemas};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub expires_in: i64,
    pub user: User,
}

/**
 * POST /api/auth/login - Exchange credentials for a token
 *
 * Expected Input:
 * ```json
 * { "email": "ana@example.com", "password": "s3cret!" }
 * ```
 *
 * Expected Output:
 * ```json
 * {
 *   "success": true,
 *   "data": { "token": "eyJhbGciOiJIUzI1NiI...", "expiresIn": 86400, "user": { ... } }
 * }
 * ```
 *
 * The token is also set as an HttpOnly cookie so browser pages can call the
 * API without handling it. Unknown email and wrong password answer the same
 * 401.
 */
pub async fn login(State(state): State<AppState>, body: Bytes) -> Result<Response, ApiError> {
    let request: LoginRequest = parse_body(&body, &schemas::LOGIN)?;
    let email = request.email.to_lowercase();

    let user = state
        .store
        .find_user_by_email(&email)
        .await
        .map_err(|e| e.into_internal(Message::AuthenticationFailed))?;

    // Unknown emails still run one bcrypt verify
    let password = request.password;
    let hash = user.as_ref().map(|u| u.senha.clone());
    let valid = tokio::task::spawn_blocking(move || match hash {
        Some(hash) => verify_password(&password, &hash),
        None => verify_unknown_account(&password),
    })
    .await
    .map_err(|e| {
        tracing::error!("Password verification task failed: {}", e);
        ApiError::internal_server_error(Message::AuthenticationFailed.text())
    })?;

    let user = match user {
        Some(user) if valid => user,
        Some(user) => {
            tracing::warn!("Wrong password for {}", user.email);
            return Err(ApiError::unauthorized(Message::InvalidCredentials.text()));
        }
        None => {
            tracing::warn!("Login attempt for unknown email {}", email);
            return Err(ApiError::unauthorized(Message::InvalidCredentials.text()));
        }
    };

    let claims = Claims::new(user.id, &user.email);
    let token = generate_jwt(&claims).map_err(|e| {
        tracing::error!("Token generation failed: {}", e);
        ApiError::internal_server_error(Message::AuthenticationFailed.text())
    })?;

    tracing::info!("User {} logged in", user.id);

    let cookie = session_cookie(&token, claims.expires_in());
    let body = ApiResponse::success(LoginResponse {
        token,
        expires_in: claims.expires_in(),
        user,
    });

    Ok(([(header::SET_COOKIE, cookie)], body).into_response())
}
