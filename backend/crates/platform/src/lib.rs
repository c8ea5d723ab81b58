//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Cryptographic utilities (random tokens, constant-time equality)
//! - Password hashing (Argon2id with zeroized clear text)
//! - Cookie construction for session and CSRF cookies

pub mod cookie;
pub mod crypto;
pub mod password;
