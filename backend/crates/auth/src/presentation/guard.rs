//! Route Guards
//!
//! Each guard is a pure predicate over a [`RequestContext`]. A [`GuardChain`]
//! is attached to a route when the router is built and always evaluates in
//! the order CSRF -> session -> role, whatever order the builder was called in.

use axum::http::{HeaderMap, Method};
use axum_extra::extract::cookie::CookieJar;

use crate::application::config::AuthConfig;
use crate::application::verify_session::SessionVerifier;
use crate::domain::entity::session_claim::SessionClaim;
use crate::error::{AuthError, AuthResult};

pub const CSRF_MISSING: &str = "CSRF token missing";
pub const CSRF_MISMATCH: &str = "CSRF token mismatch";
pub const ADMIN_REQUIRED: &str = "admin role required";

/// Normalized view of an inbound request
pub struct RequestContext<'a> {
    pub method: &'a Method,
    pub cookies: &'a CookieJar,
    pub headers: &'a HeaderMap,
    /// Filled by the session guard
    pub identity: Option<SessionClaim>,
}

impl<'a> RequestContext<'a> {
    pub fn new(method: &'a Method, cookies: &'a CookieJar, headers: &'a HeaderMap) -> Self {
        Self {
            method,
            cookies,
            headers,
            identity: None,
        }
    }
}

// ============================================================================
// Predicates
// ============================================================================

/// `GET`, `HEAD` and `OPTIONS` are never CSRF-checked
pub fn is_safe_method(method: &Method) -> bool {
    matches!(*method, Method::GET | Method::HEAD | Method::OPTIONS)
}

/// Double-submit check: cookie token and header token must both be present
/// and byte-equal
pub fn check_csrf(
    method: &Method,
    cookies: &CookieJar,
    headers: &HeaderMap,
    config: &AuthConfig,
) -> AuthResult<()> {
    if is_safe_method(method) {
        return Ok(());
    }

    let cookie_token = config.csrf_cookie.read(cookies).filter(|t| !t.is_empty());
    let header_token = headers
        .get(&config.csrf_header_name)
        .and_then(|v| v.to_str().ok())
        .filter(|t| !t.is_empty());

    match (cookie_token, header_token) {
        (Some(cookie), Some(header)) => {
            if platform::crypto::constant_time_eq(cookie.as_bytes(), header.as_bytes()) {
                Ok(())
            } else {
                Err(AuthError::Forbidden(CSRF_MISMATCH))
            }
        }
        _ => Err(AuthError::Forbidden(CSRF_MISSING)),
    }
}

/// Fails closed: no identity, no role, or any role but `ADMIN` is rejected
pub fn require_admin(identity: Option<&SessionClaim>) -> AuthResult<()> {
    match identity {
        Some(claim) if claim.is_admin() => Ok(()),
        _ => Err(AuthError::Forbidden(ADMIN_REQUIRED)),
    }
}

// ============================================================================
// Chain
// ============================================================================

/// Per-route guard list
///
/// CSRF is enforced unless the route carries the [`GuardChain::skip_csrf`]
/// marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GuardChain {
    skip_csrf: bool,
    session: bool,
    admin: bool,
}

impl Default for GuardChain {
    fn default() -> Self {
        Self::new()
    }
}

impl GuardChain {
    pub const fn new() -> Self {
        Self {
            skip_csrf: false,
            session: false,
            admin: false,
        }
    }

    /// Exempt the route from the CSRF check (routes used before a session exists)
    pub const fn skip_csrf(mut self) -> Self {
        self.skip_csrf = true;
        self
    }

    /// Require a verified session
    pub const fn session(mut self) -> Self {
        self.session = true;
        self
    }

    /// Require the `ADMIN` role; implies [`GuardChain::session`]
    pub const fn admin(mut self) -> Self {
        self.session = true;
        self.admin = true;
        self
    }

    pub fn requires_session(&self) -> bool {
        self.session
    }

    /// Run every guard and return the verified identity, if one was required
    pub fn evaluate(
        &self,
        mut ctx: RequestContext<'_>,
        verifier: &SessionVerifier,
        config: &AuthConfig,
    ) -> AuthResult<Option<SessionClaim>> {
        if !self.skip_csrf {
            check_csrf(ctx.method, ctx.cookies, ctx.headers, config)?;
        }

        if self.session {
            ctx.identity = Some(verifier.verify(ctx.cookies)?);
        }

        if self.admin {
            require_admin(ctx.identity.as_ref())?;
        }

        Ok(ctx.identity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::service::SessionTokenService;
    use crate::domain::value_object::{email::Email, user_id::UserId, user_role::UserRole};
    use crate::infra::jwt::JwtTokenService;
    use axum::http::HeaderValue;
    use axum_extra::extract::cookie::Cookie;
    use std::sync::Arc;

    fn config() -> AuthConfig {
        AuthConfig::with_secret(b"guard-test-secret".to_vec()).unwrap()
    }

    fn jar(csrf: Option<&'static str>) -> CookieJar {
        match csrf {
            Some(token) => CookieJar::new().add(Cookie::new("csrf-token", token)),
            None => CookieJar::new(),
        }
    }

    fn headers(csrf: Option<&'static str>) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if let Some(token) = csrf {
            headers.insert("x-csrf-token", HeaderValue::from_static(token));
        }
        headers
    }

    fn claim(role: Option<UserRole>) -> SessionClaim {
        SessionClaim {
            subject: UserId::new(),
            email: Email::new("alice@example.com").unwrap(),
            role,
        }
    }

    #[test]
    fn test_safe_methods_always_pass() {
        let config = config();
        for method in [Method::GET, Method::HEAD, Method::OPTIONS] {
            assert!(check_csrf(&method, &jar(None), &headers(None), &config).is_ok());
            assert!(check_csrf(&method, &jar(Some("a")), &headers(Some("b")), &config).is_ok());
        }
    }

    #[test]
    fn test_unsafe_methods_need_matching_tokens() {
        let config = config();
        for method in [Method::POST, Method::PUT, Method::PATCH, Method::DELETE] {
            assert!(
                check_csrf(&method, &jar(Some("abc123")), &headers(Some("abc123")), &config)
                    .is_ok()
            );

            let mismatch =
                check_csrf(&method, &jar(Some("abc123")), &headers(Some("xyz999")), &config);
            assert!(matches!(mismatch, Err(AuthError::Forbidden(CSRF_MISMATCH))));

            let no_header = check_csrf(&method, &jar(Some("abc123")), &headers(None), &config);
            assert!(matches!(no_header, Err(AuthError::Forbidden(CSRF_MISSING))));

            let no_cookie = check_csrf(&method, &jar(None), &headers(Some("abc123")), &config);
            assert!(matches!(no_cookie, Err(AuthError::Forbidden(CSRF_MISSING))));
        }
    }

    #[test]
    fn test_mismatch_and_missing_share_status() {
        let a = AuthError::Forbidden(CSRF_MISSING);
        let b = AuthError::Forbidden(CSRF_MISMATCH);
        assert_eq!(a.status_code(), b.status_code());
        assert_eq!(a.code(), b.code());
    }

    #[test]
    fn test_require_admin() {
        assert!(require_admin(Some(&claim(Some(UserRole::Admin)))).is_ok());

        for identity in [Some(claim(Some(UserRole::User))), Some(claim(None)), None] {
            let result = require_admin(identity.as_ref());
            assert!(matches!(result, Err(AuthError::Forbidden(ADMIN_REQUIRED))));
        }
    }

    #[test]
    fn test_admin_implies_session() {
        assert!(GuardChain::new().admin().requires_session());
        assert!(!GuardChain::new().requires_session());
    }

    #[test]
    fn test_chain_order_csrf_before_session() {
        let config = Arc::new(config());
        let tokens: Arc<dyn SessionTokenService> = Arc::new(JwtTokenService::from_config(&config));
        let verifier = SessionVerifier::new(tokens, config.clone());

        // No session cookie and no CSRF token: CSRF is reported first
        let (jar, headers) = (jar(None), headers(None));
        let ctx = RequestContext::new(&Method::POST, &jar, &headers);
        let result = GuardChain::new().session().evaluate(ctx, &verifier, &config);
        assert!(matches!(result, Err(AuthError::Forbidden(CSRF_MISSING))));

        // Same request on a GET reaches the session guard
        let ctx = RequestContext::new(&Method::GET, &jar, &headers);
        let result = GuardChain::new().session().evaluate(ctx, &verifier, &config);
        assert!(matches!(result, Err(AuthError::SessionMissing)));
    }

    #[test]
    fn test_chain_session_before_role() {
        let config = Arc::new(config());
        let tokens: Arc<dyn SessionTokenService> = Arc::new(JwtTokenService::from_config(&config));
        let verifier = SessionVerifier::new(tokens.clone(), config.clone());

        let (empty, headers) = (CookieJar::new(), headers(None));
        let ctx = RequestContext::new(&Method::GET, &empty, &headers);
        let result = GuardChain::new().admin().evaluate(ctx, &verifier, &config);
        assert!(matches!(result, Err(AuthError::SessionMissing)));

        let token = tokens.sign(&claim(Some(UserRole::User))).unwrap();
        let user_jar = CookieJar::new().add(Cookie::new("accessToken", token));
        let ctx = RequestContext::new(&Method::GET, &user_jar, &headers);
        let result = GuardChain::new().admin().evaluate(ctx, &verifier, &config);
        assert!(matches!(result, Err(AuthError::Forbidden(ADMIN_REQUIRED))));

        let admin = claim(Some(UserRole::Admin));
        let token = tokens.sign(&admin).unwrap();
        let admin_jar = CookieJar::new().add(Cookie::new("accessToken", token));
        let ctx = RequestContext::new(&Method::GET, &admin_jar, &headers);
        let identity = GuardChain::new()
            .admin()
            .evaluate(ctx, &verifier, &config)
            .unwrap();
        assert_eq!(identity, Some(admin));
    }

    #[test]
    fn test_skip_csrf_marker() {
        let config = Arc::new(config());
        let tokens: Arc<dyn SessionTokenService> = Arc::new(JwtTokenService::from_config(&config));
        let verifier = SessionVerifier::new(tokens, config.clone());

        let (jar, headers) = (jar(None), headers(None));
        let ctx = RequestContext::new(&Method::POST, &jar, &headers);
        let result = GuardChain::new().skip_csrf().evaluate(ctx, &verifier, &config);
        assert!(matches!(result, Ok(None)));
    }
}
