use axum::Extension;

use crate::middleware::{ApiResponse, Identity};

/// GET /api/auth/me - The authenticated caller
///
/// ```json
/// { "success": true, "data": { "id": "...", "email": "ana@example.com", "displayName": "Ana Souza" } }
/// ```
pub async fn me(Extension(identity): Extension<Identity>) -> ApiResponse<Identity> {
    ApiResponse::success(identity)
}
