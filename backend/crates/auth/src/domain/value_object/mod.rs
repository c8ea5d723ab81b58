//! Value Object Module

pub mod email;
pub mod registration_status;
pub mod user_id;
pub mod user_password;
pub mod user_role;
