//! Registration Status Value Object
//!
//! State of a user's registration request. Drives login eligibility.
//!
//! ```text
//! PENDING ──approve──▶ APPROVED
//!    │
//!    └────reject────▶ REJECTED
//! ```
//!
//! `BANNED` exists as a stored state but no transition leads into or out of it.

use derive_more::Display;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(i16)]
pub enum RegistrationStatus {
    /// Awaiting admin review
    #[default]
    #[display("PENDING")]
    Pending = 0,

    /// Approved by an admin; the only status that may log in
    #[display("APPROVED")]
    Approved = 1,

    #[display("REJECTED")]
    Rejected = 2,

    #[display("BANNED")]
    Banned = 3,
}

impl RegistrationStatus {
    /// Get numeric ID for database storage
    #[inline]
    pub const fn id(&self) -> i16 {
        *self as i16
    }

    /// Get string code for serialization/API
    #[inline]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Approved => "APPROVED",
            Self::Rejected => "REJECTED",
            Self::Banned => "BANNED",
        }
    }

    #[inline]
    pub const fn can_login(&self) -> bool {
        matches!(self, Self::Approved)
    }

    /// Whether `self -> next` is a legal transition
    #[inline]
    pub const fn can_transition_to(&self, next: Self) -> bool {
        matches!(
            (*self, next),
            (Self::Pending, Self::Approved) | (Self::Pending, Self::Rejected)
        )
    }

    /// Create from numeric ID
    #[inline]
    pub fn from_id(id: i16) -> Option<Self> {
        match id {
            0 => Some(Self::Pending),
            1 => Some(Self::Approved),
            2 => Some(Self::Rejected),
            3 => Some(Self::Banned),
            _ => None,
        }
    }

    /// Create from string code
    #[inline]
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "PENDING" => Some(Self::Pending),
            "APPROVED" => Some(Self::Approved),
            "REJECTED" => Some(Self::Rejected),
            "BANNED" => Some(Self::Banned),
            _ => None,
        }
    }
}
