pub mod auth;
pub mod redirect;
pub mod rejection;
pub mod response;

pub use auth::{require_auth, Identity};
pub use redirect::ui_redirect;
pub use rejection::envelope_rejections;
pub use response::{ApiResponse, ApiResult};
