//! Entity Module

pub mod registration_request;
pub mod session_claim;
pub mod user;
