//! User account entity and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// User identifier assigned by the store when an account is created
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(Uuid);

impl UserId {
    /// Generate a fresh random identifier
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Account data ready to be written, before the store assigns an ID
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUserAccount {
    name: String,
    email: String,
    avatar: String,
    password_hash: String,
}

impl NewUserAccount {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        avatar: impl Into<String>,
        password_hash: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            avatar: avatar.into(),
            password_hash: password_hash.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn avatar(&self) -> &str {
        &self.avatar
    }

    pub fn password_hash(&self) -> &str {
        &self.password_hash
    }
}

/// Persisted user account
#[derive(Debug, Clone, Serialize)]
pub struct UserAccount {
    /// Store-assigned identifier
    id: UserId,
    /// Display name
    name: String,
    /// Login email, unique across all accounts
    email: String,
    /// Avatar URL derived from the email at creation
    avatar: String,
    /// Password hash in PHC string format - never exposed in serialization
    #[serde(skip_serializing)]
    password_hash: String,
    /// Creation timestamp
    created_at: DateTime<Utc>,
}

impl UserAccount {
    /// Attach a store-assigned ID and creation time to new account data
    pub fn assign(id: UserId, account: NewUserAccount, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            name: account.name,
            email: account.email,
            avatar: account.avatar,
            password_hash: account.password_hash,
            created_at,
        }
    }

    // Getters

    pub fn id(&self) -> &UserId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn avatar(&self) -> &str {
        &self.avatar
    }

    pub fn password_hash(&self) -> &str {
        &self.password_hash
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_account() -> UserAccount {
        let new = NewUserAccount::new(
            "Ann",
            "ann@x.com",
            "//www.gravatar.com/avatar/abc?s=200&r=pg&d=mm",
            "hashed_password",
        );
        UserAccount::assign(UserId::generate(), new, Utc::now())
    }

    #[test]
    fn test_user_id_round_trips_through_uuid() {
        let id = UserId::generate();
        assert_eq!(UserId::from_uuid(*id.as_uuid()), id);
    }

    #[test]
    fn test_generated_ids_are_distinct() {
        assert_ne!(UserId::generate(), UserId::generate());
    }

    #[test]
    fn test_assign_keeps_fields() {
        let account = create_test_account();

        assert_eq!(account.name(), "Ann");
        assert_eq!(account.email(), "ann@x.com");
        assert!(account.avatar().contains("s=200"));
        assert_eq!(account.password_hash(), "hashed_password");
    }

    #[test]
    fn test_serialization_excludes_password_hash() {
        let account = create_test_account();

        let json = serde_json::to_string(&account).unwrap();
        assert!(!json.contains("hashed_password"));
        assert!(!json.contains("password_hash"));
        assert!(json.contains("ann@x.com"));
    }

    #[test]
    fn test_user_id_serializes_as_plain_string() {
        let id = UserId::generate();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", id));
    }
}
