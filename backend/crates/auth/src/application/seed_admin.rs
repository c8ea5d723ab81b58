//! Seed Admin Use Case
//!
//! Ensures an approved admin account exists at startup.

use std::sync::Arc;

use chrono::Utc;

use crate::application::config::AuthConfig;
use crate::domain::entity::user::User;
use crate::domain::repository::{UserCommandRepository, UserQueryRepository};
use crate::domain::value_object::{
    email::Email, registration_status::RegistrationStatus, user_id::UserId,
    user_password::PasswordCredential, user_role::UserRole,
};
use crate::error::AuthResult;

/// What seeding did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    Created(UserId),
    AlreadyPresent,
}

pub struct SeedAdminUseCase<R>
where
    R: UserQueryRepository + UserCommandRepository,
{
    repo: Arc<R>,
    config: Arc<AuthConfig>,
}

impl<R> SeedAdminUseCase<R>
where
    R: UserQueryRepository + UserCommandRepository,
{
    pub fn new(repo: Arc<R>, config: Arc<AuthConfig>) -> Self {
        Self { repo, config }
    }

    /// Existing accounts are left alone, whatever their role or status
    pub async fn execute(&self, email: &str, password: String) -> AuthResult<SeedOutcome> {
        let email = Email::new(email)?;

        if self.repo.find_by_email(&email).await?.is_some() {
            tracing::info!(email = %email, "Admin user already exists, skipping seed");
            return Ok(SeedOutcome::AlreadyPresent);
        }

        let credential =
            PasswordCredential::from_plaintext(password, &self.config.password_hashing).await?;

        let admin = User::restore(
            UserId::new(),
            email,
            credential,
            RegistrationStatus::Approved,
            UserRole::Admin,
            Utc::now(),
        );
        let saved = self.repo.save(&admin).await?;

        tracing::info!(user_id = %saved.user_id(), email = %saved.email(), "Admin user seeded");
        Ok(SeedOutcome::Created(saved.user_id()))
    }
}
