// handlers/protected/mod.rs - Protected handlers (token required)
//
// Every handler here runs behind `require_auth` and receives the caller as
// `Extension<Identity>`. All store access is scoped to `identity.id`; a record
// owned by someone else is indistinguishable from one that does not exist.
pub mod auth;
pub mod categories;
pub mod expenses;

use uuid::Uuid;

use crate::error::ApiError;
use crate::messages::Message;

/// Path ids that are not UUIDs cannot name an owned record
pub(crate) fn parse_id(raw: &str, not_found: Message) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::not_found(not_found.text()))
}
