use axum::{
    extract::Request,
    http::{header, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::error::ApiError;
use crate::messages::Message;

/// Failure envelope for a framework rejection with this status, if it has one
pub fn rejection_for(status: StatusCode) -> Option<ApiError> {
    match status {
        StatusCode::METHOD_NOT_ALLOWED => Some(ApiError::method_not_allowed(Message::MethodNotAllowed.text())),
        StatusCode::PAYLOAD_TOO_LARGE => Some(ApiError::payload_too_large(Message::PayloadTooLarge.text())),
        _ => None,
    }
}

/// Rewrite plain-text rejections produced by axum itself (unsupported method,
/// body over `DefaultBodyLimit`) into the failure envelope. `Allow` is kept.
pub async fn envelope_rejections(request: Request, next: Next) -> Response {
    let response = next.run(request).await;
    if is_json(&response) {
        return response;
    }

    match rejection_for(response.status()) {
        Some(error) => {
            let allow = response.headers().get(header::ALLOW).cloned();
            let mut rewritten = error.into_response();
            if let Some(allow) = allow {
                rewritten.headers_mut().insert(header::ALLOW, allow);
            }
            rewritten
        }
        None => response,
    }
}

fn is_json(response: &Response) -> bool {
    response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value: &HeaderValue| value.to_str().ok())
        .map_or(false, |value| value.starts_with("application/json"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_framework_statuses_are_rewritten() {
        assert_eq!(
            rejection_for(StatusCode::METHOD_NOT_ALLOWED).map(|e| e.status_code()),
            Some(StatusCode::METHOD_NOT_ALLOWED)
        );
        assert_eq!(
            rejection_for(StatusCode::PAYLOAD_TOO_LARGE).map(|e| e.status_code()),
            Some(StatusCode::PAYLOAD_TOO_LARGE)
        );
        assert!(rejection_for(StatusCode::NOT_FOUND).is_none());
        assert!(rejection_for(StatusCode::TEMPORARY_REDIRECT).is_none());
    }
}
