//! Domain Layer
//!
//! Contains entities, value objects, repository traits and service ports.

pub mod entity;
pub mod repository;
pub mod service;
pub mod value_object;

// Re-exports
pub use entity::{registration_request::RegistrationRequest, session_claim::SessionClaim, user::User};
pub use repository::{UserCommandRepository, UserQueryRepository};
pub use service::SessionTokenService;
