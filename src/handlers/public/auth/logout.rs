// handlers/public/auth/logout.rs - POST /api/auth/logout handler

use axum::{
    http::header,
    response::{IntoResponse, Response},
};
use serde_json::json;

use super::cleared_cookie;
use crate::messages::Message;
use crate::middleware::ApiResponse;

/// POST /api/auth/logout - Clear the session cookie
///
/// Tokens are stateless, so this only drops the browser copy. Always 200.
pub async fn logout() -> Response {
    let body = ApiResponse::success(json!({ "message": Message::LoggedOut.text() }));
    ([(header::SET_COOKIE, cleared_cookie())], body).into_response()
}
