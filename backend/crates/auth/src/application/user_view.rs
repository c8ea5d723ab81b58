//! Public projection of a user (never includes the credential)

use crate::domain::entity::user::User;
use crate::domain::value_object::{
    email::Email, registration_status::RegistrationStatus, user_id::UserId, user_role::UserRole,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserView {
    pub user_id: UserId,
    pub email: Email,
    pub registration_status: RegistrationStatus,
    pub user_role: UserRole,
}

impl From<&User> for UserView {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.user_id(),
            email: user.email().clone(),
            registration_status: user.registration_status(),
            user_role: user.user_role(),
        }
    }
}
