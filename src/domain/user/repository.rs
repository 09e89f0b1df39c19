//! User repository trait

use async_trait::async_trait;
use std::fmt::Debug;

use super::entity::{NewUserAccount, UserAccount, UserId};
use crate::domain::DomainError;

/// Repository trait for user account storage
///
/// Implementations own ID assignment and must enforce email uniqueness
/// atomically inside `create`, reporting a violation as
/// [`DomainError::Conflict`].
#[async_trait]
pub trait UserRepository: Send + Sync + Debug {
    /// Get an account by its ID
    async fn get(&self, id: &UserId) -> Result<Option<UserAccount>, DomainError>;

    /// Get an account by its email address (exact match)
    async fn find_by_email(&self, email: &str) -> Result<Option<UserAccount>, DomainError>;

    /// Persist a new account, assigning its ID
    async fn create(&self, account: NewUserAccount) -> Result<UserAccount, DomainError>;

    /// Count stored accounts
    async fn count(&self) -> Result<usize, DomainError>;

    /// Check if an email is already registered
    async fn email_exists(&self, email: &str) -> Result<bool, DomainError> {
        Ok(self.find_by_email(email).await?.is_some())
    }
}
