//! In-memory user repository implementation

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::user::{NewUserAccount, UserAccount, UserId, UserRepository};
use crate::domain::DomainError;

/// In-memory implementation of UserRepository
#[derive(Debug)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<HashMap<UserId, UserAccount>>>,
    /// Index for email -> user ID lookup
    email_index: Arc<RwLock<HashMap<String, UserId>>>,
}

impl InMemoryUserRepository {
    /// Create a new empty repository
    pub fn new() -> Self {
        Self {
            users: Arc::new(RwLock::new(HashMap::new())),
            email_index: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl Default for InMemoryUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn get(&self, id: &UserId) -> Result<Option<UserAccount>, DomainError> {
        let users = self.users.read().await;
        Ok(users.get(id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserAccount>, DomainError> {
        // Lock order matches `create`: users, then index
        let users = self.users.read().await;
        let email_index = self.email_index.read().await;

        Ok(email_index
            .get(email)
            .and_then(|user_id| users.get(user_id))
            .cloned())
    }

    async fn create(&self, account: NewUserAccount) -> Result<UserAccount, DomainError> {
        let mut users = self.users.write().await;
        let mut email_index = self.email_index.write().await;

        if email_index.contains_key(account.email()) {
            return Err(DomainError::conflict(format!(
                "Email '{}' already registered",
                account.email()
            )));
        }

        let user = UserAccount::assign(UserId::generate(), account, Utc::now());

        email_index.insert(user.email().to_string(), *user.id());
        users.insert(*user.id(), user.clone());

        Ok(user)
    }

    async fn count(&self) -> Result<usize, DomainError> {
        let users = self.users.read().await;
        Ok(users.len())
    }
}
