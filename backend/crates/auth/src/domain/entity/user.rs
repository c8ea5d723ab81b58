//! User Entity
//!
//! Identity, credential hash, registration status and role.
//! Role and registration status are independent axes.

use chrono::{DateTime, Utc};

use crate::domain::value_object::{
    email::Email, registration_status::RegistrationStatus, user_id::UserId,
    user_password::PasswordCredential, user_role::UserRole,
};
use crate::error::{AuthError, AuthResult};

/// User entity
///
/// Immutable per transition: [`User::approve`] and [`User::reject`] return a
/// new value and leave `self` untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    user_id: UserId,
    email: Email,
    credential: PasswordCredential,
    registration_status: RegistrationStatus,
    user_role: UserRole,
    created_at: DateTime<Utc>,
}

impl User {
    /// Create a freshly signed-up user (new identity, `PENDING`, role `USER`)
    pub fn create_new(email: Email, credential: PasswordCredential) -> Self {
        Self {
            user_id: UserId::new(),
            email,
            credential,
            registration_status: RegistrationStatus::Pending,
            user_role: UserRole::User,
            created_at: Utc::now(),
        }
    }

    /// Rebuild a user from storage in any status
    pub fn restore(
        user_id: UserId,
        email: Email,
        credential: PasswordCredential,
        registration_status: RegistrationStatus,
        user_role: UserRole,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            user_id,
            email,
            credential,
            registration_status,
            user_role,
            created_at,
        }
    }

    /// `PENDING -> APPROVED`
    pub fn approve(&self) -> AuthResult<Self> {
        self.transition_to(RegistrationStatus::Approved)
    }

    /// `PENDING -> REJECTED`
    pub fn reject(&self) -> AuthResult<Self> {
        self.transition_to(RegistrationStatus::Rejected)
    }

    fn transition_to(&self, next: RegistrationStatus) -> AuthResult<Self> {
        if !self.registration_status.can_transition_to(next) {
            return Err(AuthError::InvalidStateTransition {
                from: self.registration_status,
                to: next,
            });
        }

        Ok(Self {
            registration_status: next,
            ..self.clone()
        })
    }

    pub fn can_login(&self) -> bool {
        self.registration_status.can_login()
    }

    pub fn is_admin(&self) -> bool {
        self.user_role.is_admin()
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    pub fn email(&self) -> &Email {
        &self.email
    }

    pub fn credential(&self) -> &PasswordCredential {
        &self.credential
    }

    pub fn registration_status(&self) -> RegistrationStatus {
        self.registration_status
    }

    pub fn user_role(&self) -> UserRole {
        self.user_role
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
