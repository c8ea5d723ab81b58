//! Session Verification
//!
//! Reads the session token from its http-only cookie only, never from an
//! `Authorization` header.

use std::sync::Arc;

use axum_extra::extract::cookie::CookieJar;

use crate::application::config::AuthConfig;
use crate::domain::entity::session_claim::SessionClaim;
use crate::domain::service::SessionTokenService;
use crate::error::{AuthError, AuthResult};

pub struct SessionVerifier {
    tokens: Arc<dyn SessionTokenService>,
    config: Arc<AuthConfig>,
}

impl SessionVerifier {
    pub fn new(tokens: Arc<dyn SessionTokenService>, config: Arc<AuthConfig>) -> Self {
        Self { tokens, config }
    }

    /// Session token from the cookie jar, if any
    pub fn extract<'a>(&self, jar: &'a CookieJar) -> Option<&'a str> {
        self.config.session_cookie.read(jar).filter(|t| !t.is_empty())
    }

    /// No cookie is `SessionMissing`; a bad or expired token is `SessionInvalid`.
    ///
    /// The claim is trusted once its signature verifies; registration status
    /// is not re-read here.
    pub fn verify(&self, jar: &CookieJar) -> AuthResult<SessionClaim> {
        let token = self.extract(jar).ok_or(AuthError::SessionMissing)?;
        self.tokens.verify(token)
    }
}
