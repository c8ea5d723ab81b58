//! Sign Up Use Case
//!
//! Creates a new user account in `PENDING` status. No session is issued;
//! an admin must approve the account first.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::user_view::UserView;
use crate::domain::entity::user::User;
use crate::domain::repository::{UserCommandRepository, UserQueryRepository};
use crate::domain::value_object::{email::Email, user_password::PasswordCredential};
use crate::error::{AuthError, AuthResult};

/// Sign up input
pub struct SignUpInput {
    pub email: String,
    pub password: String,
}

/// Sign up use case
pub struct SignUpUseCase<R>
where
    R: UserQueryRepository + UserCommandRepository,
{
    repo: Arc<R>,
    config: Arc<AuthConfig>,
}

impl<R> SignUpUseCase<R>
where
    R: UserQueryRepository + UserCommandRepository,
{
    pub fn new(repo: Arc<R>, config: Arc<AuthConfig>) -> Self {
        Self { repo, config }
    }

    /// Check-then-act is racy under concurrent signups for one email; the
    /// repository's unique constraint turns the loser into `AlreadyExists`.
    pub async fn execute(&self, input: SignUpInput) -> AuthResult<UserView> {
        let email = Email::new(&input.email)?;

        if self.repo.find_by_email(&email).await?.is_some() {
            return Err(AuthError::AlreadyExists);
        }

        let credential =
            PasswordCredential::from_plaintext(input.password, &self.config.password_hashing)
                .await?;

        let user = User::create_new(email, credential);
        let saved = self.repo.save(&user).await?;

        tracing::info!(
            user_id = %saved.user_id(),
            email = %saved.email(),
            "User signed up"
        );

        Ok(UserView::from(&saved))
    }
}
