//! PostgreSQL user repository implementation

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::domain::user::{NewUserAccount, UserAccount, UserId, UserRepository};
use crate::domain::DomainError;

/// PostgreSQL implementation of UserRepository
///
/// IDs and creation timestamps come from column defaults; email uniqueness
/// is enforced by the `users_email_key` constraint.
#[derive(Debug, Clone)]
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    /// Create a new repository with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn get(&self, id: &UserId) -> Result<Option<UserAccount>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT id, name, email, avatar, password_hash, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to get user: {}", e)))?;

        row.as_ref().map(row_to_user).transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserAccount>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT id, name, email, avatar, password_hash, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to get user by email: {}", e)))?;

        row.as_ref().map(row_to_user).transpose()
    }

    async fn create(&self, account: NewUserAccount) -> Result<UserAccount, DomainError> {
        let row = sqlx::query(
            r#"
            INSERT INTO users (name, email, avatar, password_hash)
            VALUES ($1, $2, $3, $4)
            RETURNING id, created_at
            "#,
        )
        .bind(account.name())
        .bind(account.email())
        .bind(account.avatar())
        .bind(account.password_hash())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_insert_error(e, account.email()))?;

        let id: Uuid = row
            .try_get("id")
            .map_err(|e| DomainError::storage(format!("Missing id in insert result: {}", e)))?;
        let created_at: DateTime<Utc> = row
            .try_get("created_at")
            .map_err(|e| DomainError::storage(format!("Missing created_at in insert result: {}", e)))?;

        Ok(UserAccount::assign(UserId::from_uuid(id), account, created_at))
    }

    async fn count(&self) -> Result<usize, DomainError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to count users: {}", e)))?;

        usize::try_from(count)
            .map_err(|e| DomainError::storage(format!("Invalid user count {}: {}", count, e)))
    }
}

fn map_insert_error(err: sqlx::Error, email: &str) -> DomainError {
    if is_unique_violation(&err) {
        DomainError::conflict(format!("Email '{}' already registered", email))
    } else {
        DomainError::storage(format!("Failed to create user: {}", err))
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.is_unique_violation(),
        _ => false,
    }
}

fn row_to_user(row: &sqlx::postgres::PgRow) -> Result<UserAccount, DomainError> {
    let read_error = |e: sqlx::Error| DomainError::storage(format!("Invalid user row: {}", e));

    let id: Uuid = row.try_get("id").map_err(read_error)?;
    let name: String = row.try_get("name").map_err(read_error)?;
    let email: String = row.try_get("email").map_err(read_error)?;
    let avatar: String = row.try_get("avatar").map_err(read_error)?;
    let password_hash: String = row.try_get("password_hash").map_err(read_error)?;
    let created_at: DateTime<Utc> = row.try_get("created_at").map_err(read_error)?;

    Ok(UserAccount::assign(
        UserId::from_uuid(id),
        NewUserAccount::new(name, email, avatar, password_hash),
        created_at,
    ))
}
