use axum::{
    extract::Request,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};

use super::auth::cookie_value;
use crate::config;

const PROTECTED_PREFIX: &str = "/dashboard";
const LOGIN_PATH: &str = "/login";
const GUEST_ONLY: &[&str] = &["/login", "/register"];

/// Where a UI request should be sent instead, if anywhere.
///
/// Only cookie presence matters here; the API verifies the token itself.
pub fn redirect_target(path: &str, has_token: bool) -> Option<&'static str> {
    if path.starts_with("/api") {
        return None;
    }
    if !has_token && path.starts_with(PROTECTED_PREFIX) {
        return Some(LOGIN_PATH);
    }
    if has_token && GUEST_ONLY.iter().any(|p| path.starts_with(p)) {
        return Some(PROTECTED_PREFIX);
    }
    None
}

pub async fn ui_redirect(request: Request, next: Next) -> Response {
    let has_token = cookie_value(request.headers(), &config::config().security.cookie_name).is_some();

    match redirect_target(request.uri().path(), has_token) {
        Some(target) => {
            tracing::debug!("Redirecting {} to {}", request.uri().path(), target);
            Redirect::temporary(target).into_response()
        }
        None => next.run(request).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guests_are_sent_to_login() {
        assert_eq!(redirect_target("/dashboard", false), Some("/login"));
        assert_eq!(redirect_target("/dashboard/categories", false), Some("/login"));
        assert_eq!(redirect_target("/dashboard", true), None);
    }

    #[test]
    fn signed_in_users_skip_login_and_register() {
        assert_eq!(redirect_target("/login", true), Some("/dashboard"));
        assert_eq!(redirect_target("/register", true), Some("/dashboard"));
        assert_eq!(redirect_target("/login", false), None);
    }

    #[test]
    fn api_paths_are_untouched() {
        assert_eq!(redirect_target("/api/expenses", false), None);
        assert_eq!(redirect_target("/", false), None);
    }
}
