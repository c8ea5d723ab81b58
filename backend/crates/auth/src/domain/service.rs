//! Domain Service Ports

use crate::domain::entity::session_claim::SessionClaim;
use crate::error::AuthResult;

/// Signs and verifies session tokens
///
/// Synchronous and object-safe: signing is cheap and runs inline.
pub trait SessionTokenService: Send + Sync {
    fn sign(&self, claim: &SessionClaim) -> AuthResult<String>;

    /// Any signature, expiry or shape failure is `AuthError::SessionInvalid`
    fn verify(&self, token: &str) -> AuthResult<SessionClaim>;
}
