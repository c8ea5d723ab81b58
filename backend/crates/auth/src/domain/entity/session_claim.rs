//! Session Claim
//!
//! Identity carried inside a signed session token. Never persisted.

use crate::domain::entity::user::User;
use crate::domain::value_object::{email::Email, user_id::UserId, user_role::UserRole};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionClaim {
    pub subject: UserId,
    pub email: Email,
    /// `None` when the token carried no role or an unknown one
    pub role: Option<UserRole>,
}

impl SessionClaim {
    pub fn for_user(user: &User) -> Self {
        Self {
            subject: user.user_id(),
            email: user.email().clone(),
            role: Some(user.user_role()),
        }
    }

    /// Only an explicit `ADMIN` role counts
    pub fn is_admin(&self) -> bool {
        matches!(self.role, Some(UserRole::Admin))
    }
}
