//! In-Memory Repository
//!
//! Same contract as the PostgreSQL adapter, including email uniqueness and
//! append-only registration history. Used by tests and database-less runs.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::domain::entity::{registration_request::RegistrationRequest, user::User};
use crate::domain::repository::{UserCommandRepository, UserQueryRepository};
use crate::domain::value_object::{
    email::Email, registration_status::RegistrationStatus, user_id::UserId,
    user_password::PasswordCredential, user_role::UserRole,
};
use crate::error::{AuthError, AuthResult};

/// Stored user row (no status: that lives in the history)
#[derive(Clone)]
struct StoredUser {
    user_id: UserId,
    email: Email,
    credential: PasswordCredential,
    user_role: UserRole,
    created_at: DateTime<Utc>,
}

#[derive(Default)]
struct Store {
    users: HashMap<UserId, StoredUser>,
    /// Append-only, in insertion order
    requests: Vec<RegistrationRequest>,
}

impl Store {
    fn current_status(&self, user_id: &UserId) -> RegistrationStatus {
        self.requests
            .iter()
            .rev()
            .find(|r| r.user_id == *user_id)
            .map(|r| r.status)
            .unwrap_or_default()
    }

    fn materialize(&self, stored: &StoredUser) -> User {
        User::restore(
            stored.user_id,
            stored.email.clone(),
            stored.credential.clone(),
            self.current_status(&stored.user_id),
            stored.user_role,
            stored.created_at,
        )
    }
}

/// Cloning shares the underlying store
#[derive(Clone, Default)]
pub struct InMemoryUserRepository {
    store: Arc<RwLock<Store>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl UserQueryRepository for InMemoryUserRepository {
    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>> {
        let store = self.store.read().await;
        Ok(store
            .users
            .values()
            .find(|u| u.email == *email)
            .map(|u| store.materialize(u)))
    }

    async fn find_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>> {
        let store = self.store.read().await;
        Ok(store.users.get(user_id).map(|u| store.materialize(u)))
    }

    async fn find_all(&self) -> AuthResult<Vec<User>> {
        let store = self.store.read().await;
        let mut users: Vec<&StoredUser> = store.users.values().collect();
        users.sort_by_key(|u| (u.created_at, *u.user_id.as_uuid()));
        Ok(users.into_iter().map(|u| store.materialize(u)).collect())
    }

    async fn registration_history(&self, user_id: &UserId) -> AuthResult<Vec<RegistrationRequest>> {
        let store = self.store.read().await;
        Ok(store
            .requests
            .iter()
            .filter(|r| r.user_id == *user_id)
            .cloned()
            .collect())
    }
}

impl UserCommandRepository for InMemoryUserRepository {
    async fn save(&self, user: &User) -> AuthResult<User> {
        let mut store = self.store.write().await;

        let email_taken = store
            .users
            .values()
            .any(|u| u.email == *user.email() && u.user_id != user.user_id());
        if email_taken {
            return Err(AuthError::AlreadyExists);
        }

        store.users.insert(
            user.user_id(),
            StoredUser {
                user_id: user.user_id(),
                email: user.email().clone(),
                credential: user.credential().clone(),
                user_role: user.user_role(),
                created_at: user.created_at(),
            },
        );
        store.requests.push(RegistrationRequest::record(user));

        Ok(user.clone())
    }

    async fn update_registration_status(
        &self,
        user: &User,
        expected: RegistrationStatus,
    ) -> AuthResult<User> {
        let mut store = self.store.write().await;

        if !store.users.contains_key(&user.user_id()) {
            return Err(AuthError::NotFound);
        }
        let current = store.current_status(&user.user_id());
        if current != expected {
            return Err(AuthError::InvalidStateTransition {
                from: current,
                to: user.registration_status(),
            });
        }
        store.requests.push(RegistrationRequest::record(user));

        Ok(user.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(email: &str) -> User {
        User::create_new(
            Email::new(email).unwrap(),
            PasswordCredential::from_hash("$argon2id$stub").unwrap(),
        )
    }

    #[tokio::test]
    async fn test_save_and_find() {
        let repo = InMemoryUserRepository::new();
        let alice = user("alice@example.com");
        repo.save(&alice).await.unwrap();

        let by_email = repo
            .find_by_email(&Email::new("ALICE@example.com").unwrap())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(by_email.user_id(), alice.user_id());
        assert_eq!(by_email.registration_status(), RegistrationStatus::Pending);

        let by_id = repo.find_by_id(&alice.user_id()).await.unwrap();
        assert_eq!(by_id, Some(alice));
        assert_eq!(repo.find_by_id(&UserId::new()).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_duplicate_email_is_conflict() {
        let repo = InMemoryUserRepository::new();
        repo.save(&user("alice@example.com")).await.unwrap();

        let result = repo.save(&user("alice@example.com")).await;
        assert!(matches!(result, Err(AuthError::AlreadyExists)));
        assert_eq!(repo.find_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_status_updates_append() {
        let repo = InMemoryUserRepository::new();
        let alice = user("alice@example.com");
        repo.save(&alice).await.unwrap();

        let approved = alice.approve().unwrap();
        repo.update_registration_status(&approved, RegistrationStatus::Pending)
            .await
            .unwrap();

        let current = repo.find_by_id(&alice.user_id()).await.unwrap().unwrap();
        assert_eq!(current.registration_status(), RegistrationStatus::Approved);

        let history = repo.registration_history(&alice.user_id()).await.unwrap();
        let statuses: Vec<_> = history.iter().map(|r| r.status).collect();
        assert_eq!(
            statuses,
            vec![RegistrationStatus::Pending, RegistrationStatus::Approved]
        );
    }

    #[tokio::test]
    async fn test_status_update_for_unknown_user() {
        let repo = InMemoryUserRepository::new();
        let result = repo
            .update_registration_status(&user("ghost@example.com"), RegistrationStatus::Pending)
            .await;
        assert!(matches!(result, Err(AuthError::NotFound)));
    }

    #[tokio::test]
    async fn test_stale_decision_is_refused() {
        let repo = InMemoryUserRepository::new();
        let alice = user("alice@example.com");
        repo.save(&alice).await.unwrap();

        // Both reviewers loaded alice while PENDING
        let rejected = alice.reject().unwrap();
        let approved = alice.approve().unwrap();
        repo.update_registration_status(&rejected, RegistrationStatus::Pending)
            .await
            .unwrap();

        let result = repo
            .update_registration_status(&approved, RegistrationStatus::Pending)
            .await;
        assert!(matches!(
            result,
            Err(AuthError::InvalidStateTransition {
                from: RegistrationStatus::Rejected,
                to: RegistrationStatus::Approved,
            })
        ));

        let current = repo.find_by_id(&alice.user_id()).await.unwrap().unwrap();
        assert_eq!(current.registration_status(), RegistrationStatus::Rejected);
        assert_eq!(repo.registration_history(&alice.user_id()).await.unwrap().len(), 2);
    }
}
