//! Session Token Issuer

use std::sync::Arc;

use crate::domain::entity::{session_claim::SessionClaim, user::User};
use crate::domain::service::SessionTokenService;
use crate::error::{AuthError, AuthResult};

pub struct SessionTokenIssuer {
    tokens: Arc<dyn SessionTokenService>,
}

impl SessionTokenIssuer {
    pub fn new(tokens: Arc<dyn SessionTokenService>) -> Self {
        Self { tokens }
    }

    /// Sign a token for an eligible user
    ///
    /// Eligibility is checked here as well as in `CredentialVerifier`.
    pub fn issue(&self, user: &User) -> AuthResult<String> {
        if !user.can_login() {
            return Err(AuthError::AccountNotEligible);
        }

        self.tokens.sign(&SessionClaim::for_user(user))
    }
}
