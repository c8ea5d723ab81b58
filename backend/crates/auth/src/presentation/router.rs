//! Auth Router
//!
//! Every route declares its guard chain here, next to its path.

use axum::{
    Router, middleware,
    routing::{MethodRouter, get, patch, post},
};

use crate::application::config::AuthConfig;
use crate::domain::repository::{UserCommandRepository, UserQueryRepository};
use crate::infra::postgres::PgUserRepository;
use crate::presentation::guard::GuardChain;
use crate::presentation::handlers::{self, AuthAppState};
use crate::presentation::middleware::enforce_guards;

fn guarded<R>(
    state: &AuthAppState<R>,
    chain: GuardChain,
    route: MethodRouter<AuthAppState<R>>,
) -> MethodRouter<AuthAppState<R>>
where
    R: UserQueryRepository + UserCommandRepository + Clone + Send + Sync + 'static,
{
    route.route_layer(middleware::from_fn_with_state(
        state.guard_state(chain),
        enforce_guards,
    ))
}

/// Routes under `/api/auth`
pub fn auth_router<R>(state: AuthAppState<R>) -> Router
where
    R: UserQueryRepository + UserCommandRepository + Clone + Send + Sync + 'static,
{
    let public = GuardChain::new().skip_csrf();
    let session = GuardChain::new().session();

    Router::new()
        .route(
            "/signup",
            guarded(&state, public, post(handlers::sign_up::<R>)),
        )
        .route(
            "/signin",
            guarded(&state, public, post(handlers::sign_in::<R>)),
        )
        .route(
            "/signout",
            guarded(&state, session, post(handlers::sign_out::<R>)),
        )
        .route("/me", guarded(&state, session, get(handlers::me::<R>)))
        .with_state(state)
}

/// Routes under `/api/admin`
pub fn admin_router<R>(state: AuthAppState<R>) -> Router
where
    R: UserQueryRepository + UserCommandRepository + Clone + Send + Sync + 'static,
{
    let admin = GuardChain::new().admin();

    Router::new()
        .route(
            "/users",
            guarded(&state, admin, get(handlers::list_users::<R>)),
        )
        .route(
            "/users/{id}",
            guarded(&state, admin, get(handlers::get_user::<R>)),
        )
        .route(
            "/users/{id}/approve",
            guarded(&state, admin, patch(handlers::approve_user::<R>)),
        )
        .route(
            "/users/{id}/reject",
            guarded(&state, admin, patch(handlers::reject_user::<R>)),
        )
        .with_state(state)
}

/// `/auth` and `/admin` together, for mounting under `/api`
pub fn api_router<R>(state: AuthAppState<R>) -> Router
where
    R: UserQueryRepository + UserCommandRepository + Clone + Send + Sync + 'static,
{
    Router::new()
        .nest("/auth", auth_router(state.clone()))
        .nest("/admin", admin_router(state))
}

/// [`api_router`] over PostgreSQL
pub fn pg_api_router(repo: PgUserRepository, config: AuthConfig) -> Router {
    api_router(AuthAppState::new(repo, config))
}
