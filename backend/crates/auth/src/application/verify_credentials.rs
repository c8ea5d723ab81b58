//! Credential Verification
//!
//! Email + password -> authenticated `User`. Unknown email and wrong
//! password fail identically with `InvalidCredentials`.

use std::sync::Arc;

use platform::password::HashingParams;
use tokio::sync::OnceCell;

use crate::application::config::AuthConfig;
use crate::domain::entity::user::User;
use crate::domain::repository::UserQueryRepository;
use crate::domain::value_object::{email::Email, user_password::PasswordCredential};
use crate::error::{AuthError, AuthResult};

/// Compared against when the email is unknown so both failure branches
/// pay for one hash comparison.
static DUMMY_CREDENTIAL: OnceCell<PasswordCredential> = OnceCell::const_new();

async fn dummy_credential(params: HashingParams) -> AuthResult<&'static PasswordCredential> {
    DUMMY_CREDENTIAL
        .get_or_try_init(|| async move {
            let seed = platform::crypto::random_token(24);
            PasswordCredential::from_plaintext(seed, &params).await
        })
        .await
}

/// Hash the dummy credential ahead of the first sign-in
pub async fn warm_up(config: &AuthConfig) -> AuthResult<()> {
    dummy_credential(config.password_hashing).await?;
    tracing::debug!("Dummy credential ready");
    Ok(())
}

pub struct CredentialVerifier<R>
where
    R: UserQueryRepository,
{
    repo: Arc<R>,
    config: Arc<AuthConfig>,
}

impl<R> CredentialVerifier<R>
where
    R: UserQueryRepository,
{
    pub fn new(repo: Arc<R>, config: Arc<AuthConfig>) -> Self {
        Self { repo, config }
    }

    pub async fn verify(&self, email: &str, password: String) -> AuthResult<User> {
        // Malformed email is reported as a credential failure
        let email = Email::new(email).map_err(|_| AuthError::InvalidCredentials)?;

        let Some(user) = self.repo.find_by_email(&email).await? else {
            let dummy = dummy_credential(self.config.password_hashing).await?;
            let _ = dummy.compare(password).await?;
            return Err(AuthError::InvalidCredentials);
        };

        if !user.credential().compare(password).await? {
            return Err(AuthError::InvalidCredentials);
        }

        if !user.can_login() {
            tracing::info!(
                user_id = %user.user_id(),
                status = %user.registration_status(),
                "Login refused by registration status"
            );
            return Err(AuthError::AccountNotEligible);
        }

        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_warm_up_initializes_dummy_credential() {
        let config = AuthConfig::with_secret(b"warm-up-secret".to_vec())
            .unwrap()
            .password_hashing(HashingParams::minimal());

        warm_up(&config).await.unwrap();
        assert!(DUMMY_CREDENTIAL.initialized());

        // Idempotent
        let first = dummy_credential(config.password_hashing).await.unwrap();
        warm_up(&config).await.unwrap();
        let second = dummy_credential(config.password_hashing).await.unwrap();
        assert!(std::ptr::eq(first, second));
    }
}
