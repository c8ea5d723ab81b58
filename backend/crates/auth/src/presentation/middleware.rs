//! Guard Middleware
//!
//! Runs a route's [`GuardChain`] before the handler and hands the verified
//! identity to it through request extensions.

use axum::extract::{FromRequestParts, Request, State};
use axum::http::request::Parts;
use axum::middleware::Next;
use axum::response::Response;
use axum_extra::extract::cookie::CookieJar;
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::verify_session::SessionVerifier;
use crate::domain::entity::session_claim::SessionClaim;
use crate::error::AuthError;
use crate::presentation::guard::{GuardChain, RequestContext};

/// Middleware state
#[derive(Clone)]
pub struct GuardState {
    pub chain: GuardChain,
    pub verifier: Arc<SessionVerifier>,
    pub config: Arc<AuthConfig>,
}

impl GuardState {
    pub fn new(chain: GuardChain, verifier: Arc<SessionVerifier>, config: Arc<AuthConfig>) -> Self {
        Self {
            chain,
            verifier,
            config,
        }
    }
}

/// Middleware that rejects the request on the first failing guard
pub async fn enforce_guards(
    State(state): State<GuardState>,
    jar: CookieJar,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let ctx = RequestContext::new(req.method(), &jar, req.headers());

    let identity = match state.chain.evaluate(ctx, &state.verifier, &state.config) {
        Ok(identity) => identity,
        Err(e) => {
            tracing::debug!(
                method = %req.method(),
                path = %req.uri().path(),
                code = e.code(),
                "Request rejected by guard"
            );
            return Err(e);
        }
    };

    if let Some(claim) = identity {
        req.extensions_mut().insert(claim);
    }

    Ok(next.run(req).await)
}

/// Identity verified by the session guard
///
/// Only valid on routes whose chain requires a session; elsewhere it rejects
/// with `SessionMissing`.
#[derive(Debug, Clone)]
pub struct CurrentIdentity(pub SessionClaim);

impl<S> FromRequestParts<S> for CurrentIdentity
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<SessionClaim>()
            .cloned()
            .map(CurrentIdentity)
            .ok_or(AuthError::SessionMissing)
    }
}
