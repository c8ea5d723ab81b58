//! JWT Session Token Service
//!
//! HS256 tokens with claims `{sub, email, role, iat, exp}`. Stateless: there
//! is no server-side record of issued tokens.

use std::time::Duration;

use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::application::config::{AuthConfig, ConfigError, MAX_TOKEN_TTL};
use crate::domain::entity::session_claim::SessionClaim;
use crate::domain::service::SessionTokenService;
use crate::domain::value_object::{email::Email, user_id::UserId, user_role::UserRole};
use crate::error::{AuthError, AuthResult};

#[derive(Debug, Serialize, Deserialize)]
struct WireClaims {
    sub: String,
    email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    iat: i64,
    exp: i64,
}

pub struct JwtTokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl JwtTokenService {
    /// ## Errors
    /// `MissingSecret` for an empty key, `InvalidValue` for a lifetime
    /// outside `1s..=MAX_TOKEN_TTL`
    pub fn new(secret: &[u8], ttl: Duration) -> Result<Self, ConfigError> {
        if secret.is_empty() {
            return Err(ConfigError::MissingSecret);
        }
        if ttl.as_secs() == 0 || ttl > MAX_TOKEN_TTL {
            return Err(ConfigError::InvalidValue {
                name: "JWT_EXPIRES_IN_SECS",
                value: ttl.as_secs().to_string(),
            });
        }
        Ok(Self::build(secret, ttl))
    }

    /// `AuthConfig` already holds a validated secret and lifetime
    pub fn from_config(config: &AuthConfig) -> Self {
        Self::build(config.jwt_secret(), config.token_ttl())
    }

    fn build(secret: &[u8], ttl: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            ttl,
        }
    }

    fn encode_claims(&self, claims: &WireClaims) -> AuthResult<String> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(|e| AuthError::Internal(format!("token signing failed: {e}")))
    }
}

impl SessionTokenService for JwtTokenService {
    fn sign(&self, claim: &SessionClaim) -> AuthResult<String> {
        let iat = Utc::now().timestamp();
        let exp = i64::try_from(self.ttl.as_secs())
            .ok()
            .and_then(|ttl| iat.checked_add(ttl))
            .ok_or_else(|| AuthError::Internal("token expiry out of range".to_string()))?;
        let claims = WireClaims {
            sub: claim.subject.to_string(),
            email: claim.email.as_str().to_string(),
            role: claim.role.map(|r| r.code().to_string()),
            iat,
            exp,
        };

        self.encode_claims(&claims)
    }

    fn verify(&self, token: &str) -> AuthResult<SessionClaim> {
        let data = decode::<WireClaims>(token, &self.decoding_key, &self.validation).map_err(|e| {
            tracing::debug!(error = %e, "Session token rejected");
            AuthError::SessionInvalid
        })?;
        let claims = data.claims;

        let subject = UserId::parse_str(&claims.sub).map_err(|_| AuthError::SessionInvalid)?;
        let email = Email::new(&claims.email).map_err(|_| AuthError::SessionInvalid)?;
        let role = claims.role.as_deref().and_then(UserRole::from_code);

        Ok(SessionClaim {
            subject,
            email,
            role,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TTL: Duration = Duration::from_secs(3600);

    fn claim(role: Option<UserRole>) -> SessionClaim {
        SessionClaim {
            subject: UserId::new(),
            email: Email::new("alice@example.com").unwrap(),
            role,
        }
    }

    #[test]
    fn test_sign_and_verify() {
        let service = JwtTokenService::new(b"secret-one", TTL).unwrap();
        let original = claim(Some(UserRole::Admin));

        let token = service.sign(&original).unwrap();
        assert_eq!(token.split('.').count(), 3);
        assert_eq!(service.verify(&token).unwrap(), original);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = JwtTokenService::new(b"secret-one", TTL)
            .unwrap()
            .sign(&claim(None))
            .unwrap();

        let other = JwtTokenService::new(b"secret-two", TTL).unwrap();
        assert!(matches!(other.verify(&token), Err(AuthError::SessionInvalid)));
    }

    #[test]
    fn test_expired_rejected() {
        let service = JwtTokenService::new(b"secret-one", TTL).unwrap();
        let now = Utc::now().timestamp();
        let token = service
            .encode_claims(&WireClaims {
                sub: UserId::new().to_string(),
                email: "alice@example.com".to_string(),
                role: None,
                iat: now - 120,
                exp: now - 60,
            })
            .unwrap();

        assert!(matches!(service.verify(&token), Err(AuthError::SessionInvalid)));
    }

    #[test]
    fn test_garbage_rejected() {
        let service = JwtTokenService::new(b"secret-one", TTL).unwrap();
        assert!(matches!(service.verify("abc.def.ghi"), Err(AuthError::SessionInvalid)));
        assert!(matches!(service.verify(""), Err(AuthError::SessionInvalid)));
    }

    #[test]
    fn test_bad_subject_rejected() {
        let service = JwtTokenService::new(b"secret-one", TTL).unwrap();
        let now = Utc::now().timestamp();
        let token = service
            .encode_claims(&WireClaims {
                sub: "not-a-uuid".to_string(),
                email: "alice@example.com".to_string(),
                role: Some("ADMIN".to_string()),
                iat: now,
                exp: now + 60,
            })
            .unwrap();

        assert!(matches!(service.verify(&token), Err(AuthError::SessionInvalid)));
    }

    #[test]
    fn test_empty_secret_rejected() {
        assert!(matches!(
            JwtTokenService::new(b"", TTL),
            Err(ConfigError::MissingSecret)
        ));
    }

    #[test]
    fn test_token_signed_with_empty_key_rejected() {
        // Forged by anyone who guesses the key is empty
        let forger = JwtTokenService::build(b"", TTL);
        let token = forger.sign(&claim(Some(UserRole::Admin))).unwrap();

        let service = JwtTokenService::new(b"secret-one", TTL).unwrap();
        assert!(matches!(service.verify(&token), Err(AuthError::SessionInvalid)));
    }

    #[test]
    fn test_ttl_out_of_range_rejected() {
        for ttl in [
            Duration::ZERO,
            MAX_TOKEN_TTL + Duration::from_secs(1),
            Duration::from_secs(u64::MAX),
        ] {
            assert!(matches!(
                JwtTokenService::new(b"secret-one", ttl),
                Err(ConfigError::InvalidValue { .. })
            ));
        }
    }

    #[test]
    fn test_expiry_overflow_is_an_error() {
        let service = JwtTokenService::build(b"secret-one", Duration::from_secs(u64::MAX));
        assert!(matches!(service.sign(&claim(None)), Err(AuthError::Internal(_))));

        let service = JwtTokenService::build(b"secret-one", Duration::from_secs(i64::MAX as u64));
        assert!(matches!(service.sign(&claim(None)), Err(AuthError::Internal(_))));
    }

    #[test]
    fn test_longest_ttl_sets_future_expiry() {
        let service = JwtTokenService::new(b"secret-one", MAX_TOKEN_TTL).unwrap();
        let token = service.sign(&claim(None)).unwrap();
        assert!(service.verify(&token).is_ok());
    }

    #[test]
    fn test_missing_or_unknown_role_is_none() {
        let service = JwtTokenService::new(b"secret-one", TTL).unwrap();
        let now = Utc::now().timestamp();

        for role in [None, Some("SUPERUSER".to_string())] {
            let token = service
                .encode_claims(&WireClaims {
                    sub: UserId::new().to_string(),
                    email: "alice@example.com".to_string(),
                    role,
                    iat: now,
                    exp: now + 60,
                })
                .unwrap();

            let verified = service.verify(&token).unwrap();
            assert_eq!(verified.role, None);
            assert!(!verified.is_admin());
        }
    }
}
