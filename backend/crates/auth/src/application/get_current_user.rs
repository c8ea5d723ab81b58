//! Get Current User Use Case

use std::sync::Arc;

use crate::application::user_view::UserView;
use crate::domain::repository::UserQueryRepository;
use crate::domain::value_object::user_id::UserId;
use crate::error::{AuthError, AuthResult};

pub struct GetCurrentUserUseCase<R>
where
    R: UserQueryRepository,
{
    repo: Arc<R>,
}

impl<R> GetCurrentUserUseCase<R>
where
    R: UserQueryRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn execute(&self, user_id: &UserId) -> AuthResult<UserView> {
        let user = self
            .repo
            .find_by_id(user_id)
            .await?
            .ok_or(AuthError::NotFound)?;

        Ok(UserView::from(&user))
    }
}
