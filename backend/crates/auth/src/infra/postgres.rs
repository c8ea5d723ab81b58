//! PostgreSQL Repository Implementations
//!
//! `users` holds identity and credential; `user_registration_requests` is
//! append-only and the row with the highest `request_seq` is the current
//! status.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entity::{
    registration_request::{RegistrationRequest, RegistrationRequestId},
    user::User,
};
use crate::domain::repository::{UserCommandRepository, UserQueryRepository};
use crate::domain::value_object::{
    email::Email, registration_status::RegistrationStatus, user_id::UserId,
    user_password::PasswordCredential, user_role::UserRole,
};
use crate::error::{AuthError, AuthResult};

/// User row joined with its latest registration record
macro_rules! select_user {
    () => {
        r#"
        SELECT
            u.user_id,
            u.email,
            u.password_hash,
            u.user_role,
            COALESCE(r.status, 0::smallint) AS registration_status,
            u.created_at
        FROM users u
        LEFT JOIN LATERAL (
            SELECT q.status
            FROM user_registration_requests q
            WHERE q.user_id = u.user_id
            ORDER BY q.request_seq DESC
            LIMIT 1
        ) r ON TRUE
        "#
    };
}

/// PostgreSQL-backed user repository
#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn append_registration_record(
        &self,
        conn: &mut sqlx::PgConnection,
        user: &User,
    ) -> AuthResult<()> {
        let record = RegistrationRequest::record(user);

        sqlx::query(
            r#"
            INSERT INTO user_registration_requests (
                request_id,
                user_id,
                status,
                created_at
            ) VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(record.request_id.as_uuid())
        .bind(record.user_id.as_uuid())
        .bind(record.status.id())
        .bind(record.created_at)
        .execute(conn)
        .await?;

        Ok(())
    }
}

// ============================================================================
// Query Side
// ============================================================================

impl UserQueryRepository for PgUserRepository {
    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(concat!(select_user!(), "WHERE u.email = $1"))
            .bind(email.as_str())
            .fetch_optional(&self.pool)
            .await?;

        row.map(|r| r.into_user()).transpose()
    }

    async fn find_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(concat!(select_user!(), "WHERE u.user_id = $1"))
            .bind(user_id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;

        row.map(|r| r.into_user()).transpose()
    }

    async fn find_all(&self) -> AuthResult<Vec<User>> {
        let rows = sqlx::query_as::<_, UserRow>(concat!(
            select_user!(),
            "ORDER BY u.created_at ASC, u.user_id ASC"
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(|r| r.into_user()).collect()
    }

    async fn registration_history(&self, user_id: &UserId) -> AuthResult<Vec<RegistrationRequest>> {
        let rows = sqlx::query_as::<_, RegistrationRow>(
            r#"
            SELECT
                request_id,
                user_id,
                status,
                created_at
            FROM user_registration_requests
            WHERE user_id = $1
            ORDER BY request_seq ASC
            "#,
        )
        .bind(user_id.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(|r| r.into_request()).collect()
    }
}

// ============================================================================
// Command Side
// ============================================================================

impl UserCommandRepository for PgUserRepository {
    async fn save(&self, user: &User) -> AuthResult<User> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO users (
                user_id,
                email,
                password_hash,
                user_role,
                created_at
            ) VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (user_id) DO UPDATE SET
                email = EXCLUDED.email,
                password_hash = EXCLUDED.password_hash,
                user_role = EXCLUDED.user_role
            "#,
        )
        .bind(user.user_id().as_uuid())
        .bind(user.email().as_str())
        .bind(user.credential().as_phc_string())
        .bind(user.user_role().id())
        .bind(user.created_at())
        .execute(&mut *tx)
        .await
        .map_err(map_unique_violation)?;

        self.append_registration_record(&mut tx, user).await?;
        tx.commit().await?;

        Ok(user.clone())
    }

    async fn update_registration_status(
        &self,
        user: &User,
        expected: RegistrationStatus,
    ) -> AuthResult<User> {
        let mut tx = self.pool.begin().await?;

        // Row lock serializes concurrent decisions on the same user
        let locked: Option<(Uuid,)> =
            sqlx::query_as("SELECT user_id FROM users WHERE user_id = $1 FOR UPDATE")
                .bind(user.user_id().as_uuid())
                .fetch_optional(&mut *tx)
                .await?;
        if locked.is_none() {
            return Err(AuthError::NotFound);
        }

        let latest: Option<(i16,)> = sqlx::query_as(
            r#"
            SELECT status
            FROM user_registration_requests
            WHERE user_id = $1
            ORDER BY request_seq DESC
            LIMIT 1
            "#,
        )
        .bind(user.user_id().as_uuid())
        .fetch_optional(&mut *tx)
        .await?;

        ensure_current_status(latest.map(|(status,)| status), expected, user)?;

        self.append_registration_record(&mut tx, user).await?;
        tx.commit().await?;

        Ok(user.clone())
    }
}

/// Latest stored status must match what the caller decided from
fn ensure_current_status(
    latest: Option<i16>,
    expected: RegistrationStatus,
    user: &User,
) -> AuthResult<()> {
    let current = match latest {
        Some(id) => RegistrationStatus::from_id(id)
            .ok_or_else(|| AuthError::Internal(format!("Invalid registration status: {}", id)))?,
        None => RegistrationStatus::default(),
    };

    if current != expected {
        return Err(AuthError::InvalidStateTransition {
            from: current,
            to: user.registration_status(),
        });
    }
    Ok(())
}

/// Email uniqueness is the only unique constraint `save` can hit
fn map_unique_violation(err: sqlx::Error) -> AuthError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => AuthError::AlreadyExists,
        _ => AuthError::Database(err),
    }
}

// ============================================================================
// Row Types
// ============================================================================

#[derive(sqlx::FromRow)]
struct UserRow {
    user_id: Uuid,
    email: String,
    password_hash: String,
    user_role: i16,
    registration_status: i16,
    created_at: DateTime<Utc>,
}

impl UserRow {
    fn into_user(self) -> AuthResult<User> {
        let email = Email::new(&self.email)
            .map_err(|e| AuthError::Internal(format!("Invalid stored email: {}", e)))?;

        let credential = PasswordCredential::from_hash(self.password_hash)
            .map_err(|e| AuthError::Internal(format!("Invalid stored password hash: {}", e)))?;

        let user_role = UserRole::from_id(self.user_role)
            .ok_or_else(|| AuthError::Internal(format!("Invalid user_role: {}", self.user_role)))?;

        let registration_status = RegistrationStatus::from_id(self.registration_status)
            .ok_or_else(|| {
                AuthError::Internal(format!(
                    "Invalid registration status: {}",
                    self.registration_status
                ))
            })?;

        Ok(User::restore(
            UserId::from_uuid(self.user_id),
            email,
            credential,
            registration_status,
            user_role,
            self.created_at,
        ))
    }
}

#[derive(sqlx::FromRow)]
struct RegistrationRow {
    request_id: Uuid,
    user_id: Uuid,
    status: i16,
    created_at: DateTime<Utc>,
}

impl RegistrationRow {
    fn into_request(self) -> AuthResult<RegistrationRequest> {
        let status = RegistrationStatus::from_id(self.status).ok_or_else(|| {
            AuthError::Internal(format!("Invalid registration status: {}", self.status))
        })?;

        Ok(RegistrationRequest {
            request_id: RegistrationRequestId::from_uuid(self.request_id),
            user_id: UserId::from_uuid(self.user_id),
            status,
            created_at: self.created_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(user_role: i16, registration_status: i16) -> UserRow {
        UserRow {
            user_id: Uuid::new_v4(),
            email: "alice@example.com".to_string(),
            password_hash: "$argon2id$v=19$m=8,t=1,p=1$c2FsdHNhbHQ$aGFzaA".to_string(),
            user_role,
            registration_status,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_row_maps_to_user() {
        let user = row(1, 1).into_user().unwrap();
        assert_eq!(user.user_role(), UserRole::Admin);
        assert_eq!(user.registration_status(), RegistrationStatus::Approved);
        assert_eq!(user.email().as_str(), "alice@example.com");
    }

    #[test]
    fn test_unknown_codes_are_internal_errors() {
        assert!(matches!(row(9, 0).into_user(), Err(AuthError::Internal(_))));
        assert!(matches!(row(0, 9).into_user(), Err(AuthError::Internal(_))));
    }

    #[test]
    fn test_stale_expected_status_is_refused() {
        let approved = row(0, 1).into_user().unwrap();

        assert!(ensure_current_status(Some(0), RegistrationStatus::Pending, &approved).is_ok());
        assert!(ensure_current_status(None, RegistrationStatus::Pending, &approved).is_ok());
        assert!(matches!(
            ensure_current_status(Some(2), RegistrationStatus::Pending, &approved),
            Err(AuthError::InvalidStateTransition {
                from: RegistrationStatus::Rejected,
                to: RegistrationStatus::Approved,
            })
        ));
        assert!(matches!(
            ensure_current_status(Some(9), RegistrationStatus::Pending, &approved),
            Err(AuthError::Internal(_))
        ));
    }

    #[test]
    fn test_non_unique_errors_stay_database_errors() {
        let err = map_unique_violation(sqlx::Error::RowNotFound);
        assert!(matches!(err, AuthError::Database(_)));
    }
}
