//! Password Credential Value Object
//!
//! One-way password hash with a comparison operation. Delegates to
//! `platform::password` for cryptographic operations.
//!
//! Hashing and comparison are CPU-heavy, so both run on the blocking
//! thread pool and are `async` here.
//!
//! ## Usage
//! ```rust,ignore
//! let credential = PasswordCredential::from_plaintext("Secr3tPW!".into(), &params).await?;
//! assert!(credential.compare("Secr3tPW!".into()).await?);
//!
//! let restored = PasswordCredential::from_hash(credential.as_phc_string())?;
//! ```

use platform::password::{ClearTextPassword, HashedPassword, HashingParams, PasswordHashError};
use std::fmt;

use crate::error::{AuthError, AuthResult};

/// Hashed credential; never holds plaintext
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordCredential(HashedPassword);

impl PasswordCredential {
    /// Hash a plaintext password with a fresh random salt
    ///
    /// ## Errors
    /// `Validation` on empty plaintext, `Internal` when hashing fails
    pub async fn from_plaintext(plaintext: String, params: &HashingParams) -> AuthResult<Self> {
        let clear_text = ClearTextPassword::new(plaintext).map_err(map_hash_error)?;
        let params = *params;

        let hashed = tokio::task::spawn_blocking(move || clear_text.hash(&params))
            .await?
            .map_err(map_hash_error)?;

        Ok(Self(hashed))
    }

    /// Restore from a stored PHC string without re-hashing
    pub fn from_hash(phc_string: impl Into<String>) -> AuthResult<Self> {
        let hashed = HashedPassword::from_phc_string(phc_string).map_err(|e| match e {
            PasswordHashError::Empty => {
                AuthError::Validation("Password hash cannot be empty".to_string())
            }
            other => map_hash_error(other),
        })?;

        Ok(Self(hashed))
    }

    /// Compare a plaintext password against this hash
    ///
    /// Empty plaintext never matches.
    pub async fn compare(&self, plaintext: String) -> AuthResult<bool> {
        let Ok(clear_text) = ClearTextPassword::new(plaintext) else {
            return Ok(false);
        };
        let hashed = self.0.clone();

        let matched = tokio::task::spawn_blocking(move || hashed.verify(&clear_text)).await?;
        Ok(matched)
    }

    /// Get PHC string for database storage
    pub fn as_phc_string(&self) -> &str {
        self.0.as_phc_string()
    }
}

fn map_hash_error(err: PasswordHashError) -> AuthError {
    match err {
        PasswordHashError::Empty => AuthError::Validation("Password cannot be empty".to_string()),
        PasswordHashError::InvalidParams(msg) | PasswordHashError::HashingFailed(msg) => {
            AuthError::Internal(format!("Password hashing failed: {msg}"))
        }
    }
}

impl fmt::Debug for PasswordCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PasswordCredential")
            .field("hash", &"[HASH]")
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================
