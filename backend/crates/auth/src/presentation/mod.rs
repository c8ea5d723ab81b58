//! Presentation Layer
//!
//! HTTP handlers, DTOs, guards, router, and middleware.

pub mod dto;
pub mod guard;
pub mod handlers;
pub mod middleware;
pub mod router;

pub use guard::{GuardChain, RequestContext, check_csrf, require_admin};
pub use handlers::AuthAppState;
pub use middleware::{CurrentIdentity, GuardState, enforce_guards};
pub use router::{admin_router, api_router, auth_router, pg_api_router};
