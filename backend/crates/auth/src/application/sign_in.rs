//! Sign In Use Case
//!
//! Verifies credentials, issues a session token and a fresh CSRF token.
//! The caller places them in their respective cookies.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::issue_session::SessionTokenIssuer;
use crate::application::verify_credentials::CredentialVerifier;
use crate::domain::repository::UserQueryRepository;
use crate::domain::service::SessionTokenService;
use crate::domain::value_object::user_id::UserId;
use crate::error::AuthResult;

/// Random bytes behind each CSRF token
const CSRF_TOKEN_BYTES: usize = 32;

/// Sign in input
pub struct SignInInput {
    pub email: String,
    pub password: String,
}

/// Sign in output
pub struct SignInOutput {
    pub user_id: UserId,
    /// Signed session token for the http-only cookie
    pub access_token: String,
    /// Not derived from the session token
    pub csrf_token: String,
}

/// Sign in use case
pub struct SignInUseCase<R>
where
    R: UserQueryRepository,
{
    verifier: CredentialVerifier<R>,
    issuer: SessionTokenIssuer,
}

impl<R> SignInUseCase<R>
where
    R: UserQueryRepository,
{
    pub fn new(repo: Arc<R>, tokens: Arc<dyn SessionTokenService>, config: Arc<AuthConfig>) -> Self {
        Self {
            verifier: CredentialVerifier::new(repo, config),
            issuer: SessionTokenIssuer::new(tokens),
        }
    }

    pub async fn execute(&self, input: SignInInput) -> AuthResult<SignInOutput> {
        let user = self.verifier.verify(&input.email, input.password).await?;
        let access_token = self.issuer.issue(&user)?;
        let csrf_token = platform::crypto::random_token(CSRF_TOKEN_BYTES);

        tracing::info!(user_id = %user.user_id(), "User signed in");

        Ok(SignInOutput {
            user_id: user.user_id(),
            access_token,
            csrf_token,
        })
    }
}
