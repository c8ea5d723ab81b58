//! Application Configuration
//!
//! Configuration for the Auth application layer. Built once at startup and
//! shared as `Arc<AuthConfig>`; never mutated afterwards.
//!
//! The signing secret and token lifetime are private and validated on the
//! way in: an `AuthConfig` always holds a non-empty secret and a lifetime
//! within [`MAX_TOKEN_TTL`].

use std::borrow::Cow;
use std::fmt;
use std::time::Duration;

use http::HeaderName;
use platform::cookie::{CookieConfig, SameSite};
use platform::password::HashingParams;
use thiserror::Error;

/// Default token lifetime (7 days)
pub const DEFAULT_TOKEN_TTL: Duration = Duration::from_secs(7 * 24 * 3600);

/// Longest accepted token lifetime (365 days)
pub const MAX_TOKEN_TTL: Duration = Duration::from_secs(365 * 24 * 3600);

/// Session cookie name
pub const SESSION_COOKIE_NAME: &str = "accessToken";

/// CSRF cookie name
pub const CSRF_COOKIE_NAME: &str = "csrf-token";

/// Header the client echoes the CSRF cookie into
pub const CSRF_HEADER_NAME: &str = "x-csrf-token";

/// Startup configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("JWT_SECRET must be set")]
    MissingSecret,

    #[error("invalid value for {name}: {value}")]
    InvalidValue { name: &'static str, value: String },
}

/// Auth application configuration
#[derive(Clone)]
pub struct AuthConfig {
    /// HMAC key for session tokens; never empty
    jwt_secret: Vec<u8>,
    /// Session token lifetime; `1s..=MAX_TOKEN_TTL`
    token_ttl: Duration,
    /// http-only cookie carrying the session token
    pub session_cookie: CookieConfig,
    /// Script-readable cookie carrying the CSRF token
    pub csrf_cookie: CookieConfig,
    pub csrf_header_name: HeaderName,
    /// Argon2id work factor for new password hashes
    pub password_hashing: HashingParams,
}

impl AuthConfig {
    /// Secure defaults around the given signing secret
    ///
    /// ## Errors
    /// `MissingSecret` when the secret is empty
    pub fn with_secret(secret: impl Into<Vec<u8>>) -> Result<Self, ConfigError> {
        let jwt_secret = secret.into();
        if jwt_secret.is_empty() {
            return Err(ConfigError::MissingSecret);
        }

        let max_age = DEFAULT_TOKEN_TTL.as_secs() as i64;

        Ok(Self {
            jwt_secret,
            token_ttl: DEFAULT_TOKEN_TTL,
            session_cookie: CookieConfig {
                name: Cow::Borrowed(SESSION_COOKIE_NAME),
                secure: true,
                http_only: true,
                same_site: SameSite::Lax,
                path: Cow::Borrowed("/api"),
                max_age_secs: Some(max_age),
            },
            csrf_cookie: CookieConfig {
                name: Cow::Borrowed(CSRF_COOKIE_NAME),
                secure: true,
                http_only: false,
                same_site: SameSite::Lax,
                path: Cow::Borrowed("/"),
                max_age_secs: Some(max_age),
            },
            csrf_header_name: HeaderName::from_static(CSRF_HEADER_NAME),
            password_hashing: HashingParams::default(),
        })
    }

    /// Read configuration from process environment
    ///
    /// | env | meaning |
    /// |---|---|
    /// | `JWT_SECRET` | required signing secret |
    /// | `JWT_EXPIRES_IN_SECS` | token lifetime, default 7 days, at most 365 days |
    /// | `COOKIE_SECURE` | `false` to drop the `Secure` attribute |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`AuthConfig::from_env`] over an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let secret = lookup("JWT_SECRET")
            .filter(|s| !s.trim().is_empty())
            .ok_or(ConfigError::MissingSecret)?;

        let mut config = Self::with_secret(secret.into_bytes())?;

        if let Some(raw) = lookup("JWT_EXPIRES_IN_SECS") {
            let ttl = raw
                .trim()
                .parse::<u64>()
                .ok()
                .map(Duration::from_secs)
                .ok_or(ConfigError::InvalidValue {
                    name: "JWT_EXPIRES_IN_SECS",
                    value: raw.clone(),
                })?;
            config = config.with_token_ttl(ttl)?;
        }

        if let Some(raw) = lookup("COOKIE_SECURE") {
            let secure = match raw.trim().to_ascii_lowercase().as_str() {
                "true" | "1" | "yes" => true,
                "false" | "0" | "no" => false,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        name: "COOKIE_SECURE",
                        value: raw,
                    });
                }
            };
            config = config.cookie_secure(secure);
        }

        Ok(config)
    }

    pub fn jwt_secret(&self) -> &[u8] {
        &self.jwt_secret
    }

    pub fn token_ttl(&self) -> Duration {
        self.token_ttl
    }

    /// Set token lifetime; cookie Max-Age follows it
    ///
    /// ## Errors
    /// `InvalidValue` unless `1s <= ttl <= MAX_TOKEN_TTL`
    pub fn with_token_ttl(mut self, ttl: Duration) -> Result<Self, ConfigError> {
        let secs = ttl.as_secs();
        if secs == 0 || ttl > MAX_TOKEN_TTL {
            return Err(ConfigError::InvalidValue {
                name: "JWT_EXPIRES_IN_SECS",
                value: secs.to_string(),
            });
        }

        // Bounded by MAX_TOKEN_TTL, fits in i64
        let max_age = secs as i64;
        self.token_ttl = ttl;
        self.session_cookie.max_age_secs = Some(max_age);
        self.csrf_cookie.max_age_secs = Some(max_age);
        Ok(self)
    }

    /// Set the `Secure` attribute on both cookies
    pub fn cookie_secure(mut self, secure: bool) -> Self {
        self.session_cookie.secure = secure;
        self.csrf_cookie.secure = secure;
        self
    }

    pub fn password_hashing(mut self, params: HashingParams) -> Self {
        self.password_hashing = params;
        self
    }
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"[REDACTED]")
            .field("token_ttl", &self.token_ttl)
            .field("session_cookie", &self.session_cookie)
            .field("csrf_cookie", &self.csrf_cookie)
            .field("csrf_header_name", &self.csrf_header_name)
            .field("password_hashing", &self.password_hashing)
            .finish()
    }
}
