//! Application Layer
//!
//! Use cases and application services.

pub mod config;
pub mod get_current_user;
pub mod issue_session;
pub mod list_users;
pub mod review_registration;
pub mod seed_admin;
pub mod sign_in;
pub mod sign_up;
pub mod user_view;
pub mod verify_credentials;
pub mod verify_session;

// Re-exports
pub use config::{AuthConfig, ConfigError};
pub use get_current_user::GetCurrentUserUseCase;
pub use issue_session::SessionTokenIssuer;
pub use list_users::ListUsersUseCase;
pub use review_registration::ReviewRegistrationUseCase;
pub use seed_admin::{SeedAdminUseCase, SeedOutcome};
pub use sign_in::{SignInInput, SignInOutput, SignInUseCase};
pub use sign_up::{SignUpInput, SignUpUseCase};
pub use user_view::UserView;
pub use verify_credentials::{CredentialVerifier, warm_up};
pub use verify_session::SessionVerifier;
