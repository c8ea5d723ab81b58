//! HTTP Handlers

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum_extra::extract::cookie::CookieJar;
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::{
    GetCurrentUserUseCase, ListUsersUseCase, ReviewRegistrationUseCase, SessionVerifier,
    SignInUseCase, SignUpUseCase,
};
use crate::domain::repository::{UserCommandRepository, UserQueryRepository};
use crate::domain::service::SessionTokenService;
use crate::domain::value_object::user_id::parse_user_id;
use crate::error::{AuthError, AuthResult};
use crate::infra::jwt::JwtTokenService;
use crate::presentation::dto::{SignInRequest, SignInResponse, SignUpRequest, UserResponse};
use crate::presentation::guard::GuardChain;
use crate::presentation::middleware::{CurrentIdentity, GuardState};

/// Shared state for auth handlers
#[derive(Clone)]
pub struct AuthAppState<R>
where
    R: UserQueryRepository + UserCommandRepository + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub tokens: Arc<dyn SessionTokenService>,
    pub config: Arc<AuthConfig>,
}

impl<R> AuthAppState<R>
where
    R: UserQueryRepository + UserCommandRepository + Clone + Send + Sync + 'static,
{
    /// State with JWT session tokens signed with the configured secret
    pub fn new(repo: R, config: AuthConfig) -> Self {
        let tokens: Arc<dyn SessionTokenService> = Arc::new(JwtTokenService::from_config(&config));
        Self {
            repo: Arc::new(repo),
            tokens,
            config: Arc::new(config),
        }
    }

    pub fn guard_state(&self, chain: GuardChain) -> GuardState {
        let verifier = SessionVerifier::new(self.tokens.clone(), self.config.clone());
        GuardState::new(chain, Arc::new(verifier), self.config.clone())
    }
}

/// Malformed JSON is a client error, reported like any other validation failure
fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> AuthResult<T> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| AuthError::Validation(rejection.body_text()))
}

// ============================================================================
// Sign Up
// ============================================================================

/// POST /api/auth/signup
pub async fn sign_up<R>(
    State(state): State<AuthAppState<R>>,
    payload: Result<Json<SignUpRequest>, JsonRejection>,
) -> AuthResult<impl IntoResponse>
where
    R: UserQueryRepository + UserCommandRepository + Clone + Send + Sync + 'static,
{
    let input = json_body(payload)?.validate()?;

    let use_case = SignUpUseCase::new(state.repo.clone(), state.config.clone());
    let view = use_case.execute(input).await?;

    Ok((StatusCode::CREATED, Json(UserResponse::from(view))))
}

// ============================================================================
// Sign In
// ============================================================================

/// POST /api/auth/signin
///
/// Sets the http-only session cookie and the script-readable CSRF cookie.
pub async fn sign_in<R>(
    State(state): State<AuthAppState<R>>,
    jar: CookieJar,
    payload: Result<Json<SignInRequest>, JsonRejection>,
) -> AuthResult<impl IntoResponse>
where
    R: UserQueryRepository + UserCommandRepository + Clone + Send + Sync + 'static,
{
    let req = json_body(payload)?;

    let use_case = SignInUseCase::new(
        state.repo.clone(),
        state.tokens.clone(),
        state.config.clone(),
    );
    let output = use_case.execute(req.into()).await?;

    let jar = jar
        .add(state.config.session_cookie.build(output.access_token))
        .add(state.config.csrf_cookie.build(output.csrf_token));

    Ok((
        jar,
        Json(SignInResponse {
            user_id: output.user_id.to_string(),
        }),
    ))
}

// ============================================================================
// Sign Out
// ============================================================================

/// POST /api/auth/signout
///
/// Tokens are stateless; signing out only clears both cookies.
pub async fn sign_out<R>(
    State(state): State<AuthAppState<R>>,
    CurrentIdentity(identity): CurrentIdentity,
    jar: CookieJar,
) -> AuthResult<impl IntoResponse>
where
    R: UserQueryRepository + UserCommandRepository + Clone + Send + Sync + 'static,
{
    let jar = jar
        .add(state.config.session_cookie.removal())
        .add(state.config.csrf_cookie.removal());

    tracing::info!(user_id = %identity.subject, "User signed out");

    Ok((StatusCode::NO_CONTENT, jar))
}

// ============================================================================
// Current User
// ============================================================================

/// GET /api/auth/me
pub async fn me<R>(
    State(state): State<AuthAppState<R>>,
    CurrentIdentity(identity): CurrentIdentity,
) -> AuthResult<Json<UserResponse>>
where
    R: UserQueryRepository + UserCommandRepository + Clone + Send + Sync + 'static,
{
    let use_case = GetCurrentUserUseCase::new(state.repo.clone());
    let view = use_case.execute(&identity.subject).await?;

    Ok(Json(UserResponse::from(view)))
}

// ============================================================================
// Admin: Users
// ============================================================================

/// GET /api/admin/users
pub async fn list_users<R>(
    State(state): State<AuthAppState<R>>,
) -> AuthResult<Json<Vec<UserResponse>>>
where
    R: UserQueryRepository + UserCommandRepository + Clone + Send + Sync + 'static,
{
    let use_case = ListUsersUseCase::new(state.repo.clone());
    let views = use_case.execute().await?;

    Ok(Json(views.into_iter().map(UserResponse::from).collect()))
}

/// GET /api/admin/users/{id}
pub async fn get_user<R>(
    State(state): State<AuthAppState<R>>,
    Path(id): Path<String>,
) -> AuthResult<Json<UserResponse>>
where
    R: UserQueryRepository + UserCommandRepository + Clone + Send + Sync + 'static,
{
    let user_id = parse_user_id(&id)?;

    let use_case = GetCurrentUserUseCase::new(state.repo.clone());
    let view = use_case.execute(&user_id).await?;

    Ok(Json(UserResponse::from(view)))
}

// ============================================================================
// Admin: Registration Review
// ============================================================================

/// PATCH /api/admin/users/{id}/approve
pub async fn approve_user<R>(
    State(state): State<AuthAppState<R>>,
    CurrentIdentity(admin): CurrentIdentity,
    Path(id): Path<String>,
) -> AuthResult<StatusCode>
where
    R: UserQueryRepository + UserCommandRepository + Clone + Send + Sync + 'static,
{
    let user_id = parse_user_id(&id)?;

    let use_case = ReviewRegistrationUseCase::new(state.repo.clone());
    use_case.approve(&user_id).await?;

    tracing::info!(admin_id = %admin.subject, user_id = %user_id, "Approval recorded");
    Ok(StatusCode::NO_CONTENT)
}

/// PATCH /api/admin/users/{id}/reject
pub async fn reject_user<R>(
    State(state): State<AuthAppState<R>>,
    CurrentIdentity(admin): CurrentIdentity,
    Path(id): Path<String>,
) -> AuthResult<StatusCode>
where
    R: UserQueryRepository + UserCommandRepository + Clone + Send + Sync + 'static,
{
    let user_id = parse_user_id(&id)?;

    let use_case = ReviewRegistrationUseCase::new(state.repo.clone());
    use_case.reject(&user_id).await?;

    tracing::info!(admin_id = %admin.subject, user_id = %user_id, "Rejection recorded");
    Ok(StatusCode::NO_CONTENT)
}
