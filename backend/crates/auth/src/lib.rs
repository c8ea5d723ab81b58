//! Auth (Authentication) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Business logic, entities, repository traits
//! - `application/` - Use cases and application services
//! - `infra/` - Database and token implementations
//! - `presentation/` - HTTP handlers, DTOs, guards, router
//!
//! ## Features
//! - Email + password signup; accounts start `PENDING`
//! - Admin approval or rejection of registrations
//! - Stateless JWT sessions in an http-only cookie
//! - Double-submit CSRF protection for state-changing requests
//! - Role-based access (User, Admin)
//!
//! ## Security Model
//! - Passwords hashed with Argon2id
//! - Sign-in failures for unknown email and wrong password are identical
//! - Only `APPROVED` accounts may sign in

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;


// Re-exports for convenience
pub use application::config::{AuthConfig, ConfigError};
pub use application::seed_admin::{SeedAdminUseCase, SeedOutcome};
pub use application::verify_credentials::warm_up;
pub use error::{AuthError, AuthResult};
pub use infra::{InMemoryUserRepository, JwtTokenService, PgUserRepository};
pub use presentation::handlers::AuthAppState;
pub use presentation::router::{admin_router, api_router, auth_router, pg_api_router};

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};
