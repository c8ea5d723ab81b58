//! List Users Use Case
//!
//! Every user, projected. No pagination or filtering.

use std::sync::Arc;

use crate::application::user_view::UserView;
use crate::domain::repository::UserQueryRepository;
use crate::error::AuthResult;

pub struct ListUsersUseCase<R>
where
    R: UserQueryRepository,
{
    repo: Arc<R>,
}

impl<R> ListUsersUseCase<R>
where
    R: UserQueryRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn execute(&self) -> AuthResult<Vec<UserView>> {
        let users = self.repo.find_all().await?;
        Ok(users.iter().map(UserView::from).collect())
    }
}
