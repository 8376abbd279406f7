// handlers/public/auth/mod.rs - Account and session endpoints
mod login;
mod logout;
mod register;

pub use login::{login, LoginRequest, LoginResponse};
pub use logout::logout;
pub use register::{register, RegisterRequest};

use crate::config;

/// `Set-Cookie` value carrying a freshly issued token
pub(crate) fn session_cookie(token: &str, max_age_secs: i64) -> String {
    let security = &config::config().security;
    let mut cookie = format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        security.cookie_name, token, max_age_secs
    );
    if security.secure_cookies {
        cookie.push_str("; Secure");
    }
    cookie
}

/// `Set-Cookie` value that expires the session cookie immediately
pub(crate) fn cleared_cookie() -> String {
    let security = &config::config().security;
    let mut cookie = format!("{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0", security.cookie_name);
    if security.secure_cookies {
        cookie.push_str("; Secure");
    }
    cookie
}
