use kernel::id::Id;

use crate::error::{AuthError, AuthResult};

pub struct UserMarker;
pub type UserId = Id<UserMarker>;

/// Parse a user id from external input (path segment, token subject)
pub fn parse_user_id(raw: &str) -> AuthResult<UserId> {
    UserId::parse_str(raw).map_err(|e| AuthError::Validation(format!("Invalid user id: {e}")))
}
