//! Registration Request Record
//!
//! One append-only row per status change. The current status of a user is
//! the status of its most recent record.

use chrono::{DateTime, Utc};
use kernel::id::Id;

use crate::domain::entity::user::User;
use crate::domain::value_object::{registration_status::RegistrationStatus, user_id::UserId};

pub struct RegistrationRequestMarker;
pub type RegistrationRequestId = Id<RegistrationRequestMarker>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationRequest {
    pub request_id: RegistrationRequestId,
    pub user_id: UserId,
    pub status: RegistrationStatus,
    pub created_at: DateTime<Utc>,
}

impl RegistrationRequest {
    /// Record the user's current status
    pub fn record(user: &User) -> Self {
        Self {
            request_id: RegistrationRequestId::new(),
            user_id: user.user_id(),
            status: user.registration_status(),
            created_at: Utc::now(),
        }
    }
}
