//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in infrastructure layer.

use crate::domain::entity::{registration_request::RegistrationRequest, user::User};
use crate::domain::value_object::{
    email::Email, registration_status::RegistrationStatus, user_id::UserId,
};
use crate::error::AuthResult;

/// Read side of user persistence
///
/// Every returned `User` carries the status of its latest registration
/// record; a user without any record reads as `PENDING`.
#[trait_variant::make(UserQueryRepository: Send)]
pub trait LocalUserQueryRepository {
    /// Find user by normalized email
    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>>;

    /// Find user by ID
    async fn find_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>>;

    /// All users, oldest first
    async fn find_all(&self) -> AuthResult<Vec<User>>;

    /// Registration records of a user, oldest first
    async fn registration_history(&self, user_id: &UserId) -> AuthResult<Vec<RegistrationRequest>>;
}

/// Write side of user persistence
#[trait_variant::make(UserCommandRepository: Send)]
pub trait LocalUserCommandRepository {
    /// Upsert the user by id and append a record of its current status
    ///
    /// A duplicate email must surface as `AuthError::AlreadyExists`.
    async fn save(&self, user: &User) -> AuthResult<User>;

    /// Append a new registration record with the user's current status
    ///
    /// The latest stored status must still be `expected`, checked atomically
    /// with the append; otherwise `AuthError::InvalidStateTransition` from
    /// the stored status.
    async fn update_registration_status(
        &self,
        user: &User,
        expected: RegistrationStatus,
    ) -> AuthResult<User>;
}
