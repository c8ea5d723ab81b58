//! Registration Review Use Case
//!
//! Admin approval or rejection of a `PENDING` registration. Each decision
//! is stored as a new registration record.

use std::sync::Arc;

use crate::application::user_view::UserView;
use crate::domain::entity::user::User;
use crate::domain::repository::{UserCommandRepository, UserQueryRepository};
use crate::domain::value_object::user_id::UserId;
use crate::error::{AuthError, AuthResult};

pub struct ReviewRegistrationUseCase<R>
where
    R: UserQueryRepository + UserCommandRepository,
{
    repo: Arc<R>,
}

impl<R> ReviewRegistrationUseCase<R>
where
    R: UserQueryRepository + UserCommandRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn approve(&self, user_id: &UserId) -> AuthResult<UserView> {
        let user = self.load(user_id).await?;
        let approved = user.approve()?;
        let saved = self
            .repo
            .update_registration_status(&approved, user.registration_status())
            .await?;

        tracing::info!(user_id = %saved.user_id(), "Registration approved");
        Ok(UserView::from(&saved))
    }

    pub async fn reject(&self, user_id: &UserId) -> AuthResult<UserView> {
        let user = self.load(user_id).await?;
        let rejected = user.reject()?;
        let saved = self
            .repo
            .update_registration_status(&rejected, user.registration_status())
            .await?;

        tracing::info!(user_id = %saved.user_id(), "Registration rejected");
        Ok(UserView::from(&saved))
    }

    async fn load(&self, user_id: &UserId) -> AuthResult<User> {
        self.repo
            .find_by_id(user_id)
            .await?
            .ok_or(AuthError::NotFound)
    }
}
