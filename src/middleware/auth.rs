use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::app::AppState;
use crate::auth::verify_jwt;
use crate::config;
use crate::database::models::User;
use crate::error::ApiError;
use crate::messages::Message;

/// Authenticated caller, attached to the request once the token checks out
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub id: Uuid,
    pub email: String,
    pub display_name: String,
}

impl From<&User> for Identity {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            display_name: user.nome.clone(),
        }
    }
}

/// Guard for protected routes.
///
/// On success the [`Identity`] is inserted into request extensions and the
/// wrapped handler's response is returned untouched. On failure the request
/// never reaches the handler.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let identity = match authenticate(&state, request.headers()).await {
        Ok(identity) => identity,
        Err(e) => return e.into_response(),
    };

    tracing::debug!("Authenticated request as {} ({})", identity.email, identity.id);
    request.extensions_mut().insert(identity);

    next.run(request).await
}

/// Resolve the caller from request headers
pub async fn authenticate(state: &AppState, headers: &HeaderMap) -> Result<Identity, ApiError> {
    let cookie_name = &config::config().security.cookie_name;

    let token = extract_token(headers, cookie_name)
        .ok_or_else(|| ApiError::unauthorized(Message::AccessTokenMissing.text()))?;

    let claims = verify_jwt(&token).map_err(|e| {
        tracing::warn!("Rejected token: {}", e);
        ApiError::unauthorized(e.client_message())
    })?;

    let user = state
        .store
        .find_user_by_id(claims.sub)
        .await
        .map_err(|e| e.into_internal(Message::AuthenticationFailed))?
        .ok_or_else(|| {
            tracing::warn!("Token for unknown user {}", claims.sub);
            ApiError::unauthorized(Message::UserNotFound.text())
        })?;

    Ok(Identity::from(&user))
}

/// Bearer token from `Authorization`, falling back to the named cookie
pub fn extract_token(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    bearer_token(headers).or_else(|| cookie_value(headers, cookie_name))
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }

    let token = token.trim();
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}

/// Value of a cookie from any `Cookie` header
pub fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
