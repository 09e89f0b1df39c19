//! User service for account registration

use std::sync::Arc;

use thiserror::Error;
use tracing::{info, warn};

use crate::domain::user::{
    validate_registration, NewUserAccount, RegistrationValidationError, UserAccount,
    UserRepository,
};
use crate::domain::DomainError;
use crate::infrastructure::auth::JwtGenerator;
use crate::infrastructure::avatar::AvatarUrlProvider;

use super::password::PasswordHasher;

/// Request for registering a new account
#[derive(Debug, Clone)]
pub struct RegisterUserRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// A freshly created account together with its session token
#[derive(Debug, Clone)]
pub struct RegisteredUser {
    pub user: UserAccount,
    pub token: String,
}

/// Outcome of a failed registration
#[derive(Debug, Error)]
pub enum RegistrationError {
    /// Input broke one or more rules; nothing was written
    #[error("Invalid registration request: {0:?}")]
    Validation(Vec<RegistrationValidationError>),

    /// The email is already registered; nothing was written
    #[error("User already exists")]
    Conflict,

    /// A collaborator failed; the account may already be stored
    #[error(transparent)]
    Infrastructure(#[from] DomainError),
}

/// User service for registration
#[derive(Debug)]
pub struct UserService<R: UserRepository, H: PasswordHasher> {
    repository: Arc<R>,
    hasher: Arc<H>,
    avatars: Arc<dyn AvatarUrlProvider>,
    tokens: Arc<dyn JwtGenerator>,
}

impl<R: UserRepository, H: PasswordHasher + 'static> UserService<R, H> {
    /// Create a new user service
    pub fn new(
        repository: Arc<R>,
        hasher: Arc<H>,
        avatars: Arc<dyn AvatarUrlProvider>,
        tokens: Arc<dyn JwtGenerator>,
    ) -> Self {
        Self {
            repository,
            hasher,
            avatars,
            tokens,
        }
    }

    /// Register a new account and issue its session token
    ///
    /// Steps run strictly in order: validate, uniqueness pre-check, avatar,
    /// hash, write, sign. Validation and conflict failures happen before the
    /// write. A signing failure after the write leaves the account stored.
    pub async fn register(
        &self,
        request: RegisterUserRequest,
    ) -> Result<RegisteredUser, RegistrationError> {
        let RegisterUserRequest {
            name,
            email,
            password,
        } = request;

        validate_registration(&name, &email, &password).map_err(RegistrationError::Validation)?;

        // Fast path only; `create` is the authoritative uniqueness check
        if self.repository.email_exists(&email).await? {
            warn!("Registration rejected: email already registered");
            return Err(RegistrationError::Conflict);
        }

        let avatar = self.avatars.url_for(&email);
        let password_hash = self.hash_password(password).await?;

        let user = self
            .repository
            .create(NewUserAccount::new(name, email, avatar, password_hash))
            .await
            .map_err(|e| {
                if e.is_conflict() {
                    warn!("Registration rejected by store uniqueness constraint");
                    RegistrationError::Conflict
                } else {
                    RegistrationError::Infrastructure(e)
                }
            })?;

        info!(user_id = %user.id(), "User registered");

        let token = self.tokens.generate(&user)?;

        Ok(RegisteredUser { user, token })
    }

    /// Count registered accounts
    pub async fn count(&self) -> Result<usize, DomainError> {
        self.repository.count().await
    }

    async fn hash_password(&self, password: String) -> Result<String, DomainError> {
        let hasher = self.hasher.clone();

        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| DomainError::internal(format!("Password hashing task failed: {}", e)))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::user::MockUserRepository;
    use crate::infrastructure::auth::{JwtConfig, JwtService, SessionClaims};
    use crate::infrastructure::avatar::GravatarUrlBuilder;
    use crate::infrastructure::user::password::Argon2Hasher;
    use crate::infrastructure::user::repository::InMemoryUserRepository;

    const SECRET: &str = "test-secret-key-12345";

    /// Token generator that always fails, for post-write failure paths
    #[derive(Debug)]
    struct FailingJwtGenerator;

    impl JwtGenerator for FailingJwtGenerator {
        fn generate(&self, _user: &UserAccount) -> Result<String, DomainError> {
            Err(DomainError::internal("signing key unavailable"))
        }

        fn validate(&self, _token: &str) -> Result<SessionClaims, DomainError> {
            Err(DomainError::internal("signing key unavailable"))
        }
    }

    fn jwt_service() -> Arc<JwtService> {
        Arc::new(JwtService::new(JwtConfig::new(SECRET, 3600)).unwrap())
    }

    fn create_service<R: UserRepository>(repository: Arc<R>) -> UserService<R, Argon2Hasher> {
        UserService::new(
            repository,
            Arc::new(Argon2Hasher::default()),
            Arc::new(GravatarUrlBuilder::default()),
            jwt_service(),
        )
    }

    fn make_request(name: &str, email: &str, password: &str) -> RegisterUserRequest {
        RegisterUserRequest {
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    fn ann() -> RegisterUserRequest {
        make_request("Ann", "ann@x.com", "secret1")
    }

    #[tokio::test]
    async fn test_register_creates_account() {
        let repository = Arc::new(InMemoryUserRepository::new());
        let service = create_service(repository.clone());

        let registered = service.register(ann()).await.unwrap();
        let user = &registered.user;

        assert_eq!(user.name(), "Ann");
        assert_eq!(user.email(), "ann@x.com");
        assert_eq!(user.avatar(), GravatarUrlBuilder::default().url_for("ann@x.com"));
        assert_ne!(user.password_hash(), "secret1");
        assert!(Argon2Hasher::default().verify("secret1", user.password_hash()));
        assert_eq!(repository.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_register_token_carries_account_id() {
        let repository = Arc::new(InMemoryUserRepository::new());
        let service = create_service(repository.clone());

        let registered = service.register(ann()).await.unwrap();

        let claims = jwt_service().validate(&registered.token).unwrap();
        assert_eq!(claims.user_id(), registered.user.id());

        let stored = repository.get(claims.user_id()).await.unwrap();
        assert!(stored.is_some());
    }

    #[tokio::test]
    async fn test_register_duplicate_email() {
        let repository = Arc::new(MockUserRepository::new());
        let service = create_service(repository.clone());

        service.register(ann()).await.unwrap();

        let result = service
            .register(make_request("Another Ann", "ann@x.com", "different1"))
            .await;

        assert!(matches!(result, Err(RegistrationError::Conflict)));
        assert_eq!(repository.create_calls().await, 1);
        assert_eq!(repository.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_register_invalid_input_reports_every_rule() {
        let repository = Arc::new(MockUserRepository::new());
        let service = create_service(repository.clone());

        let result = service.register(make_request("", "bad", "123")).await;

        match result {
            Err(RegistrationError::Validation(errors)) => {
                assert_eq!(
                    errors,
                    vec![
                        RegistrationValidationError::NameRequired,
                        RegistrationValidationError::InvalidEmail,
                        RegistrationValidationError::PasswordTooShort(6),
                    ]
                );
            }
            other => panic!("expected validation error, got {:?}", other),
        }

        assert_eq!(repository.create_calls().await, 0);
    }

    #[tokio::test]
    async fn test_repeated_invalid_request_has_no_effect() {
        let repository = Arc::new(MockUserRepository::new());
        let service = create_service(repository.clone());

        for _ in 0..3 {
            let result = service.register(make_request("Ann", "bad", "secret1")).await;

            assert!(matches!(
                result,
                Err(RegistrationError::Validation(ref errors))
                    if errors == &vec![RegistrationValidationError::InvalidEmail]
            ));
        }

        assert_eq!(repository.create_calls().await, 0);
        assert_eq!(repository.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_store_write_failure_is_infrastructure_error() {
        let repository = Arc::new(MockUserRepository::new());
        repository.set_fail_on_create(true).await;
        let service = create_service(repository.clone());

        let result = service.register(ann()).await;

        assert!(matches!(
            result,
            Err(RegistrationError::Infrastructure(DomainError::Storage { .. }))
        ));
        assert_eq!(repository.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_store_lookup_failure_is_infrastructure_error() {
        let repository = Arc::new(MockUserRepository::new());
        repository.set_should_fail(true).await;
        let service = create_service(repository.clone());

        let result = service.register(ann()).await;

        assert!(matches!(result, Err(RegistrationError::Infrastructure(_))));
        assert_eq!(repository.create_calls().await, 0);
    }

    #[tokio::test]
    async fn test_store_conflict_on_write_maps_to_conflict() {
        let repository = Arc::new(MockUserRepository::new());
        let service = create_service(repository.clone());

        service.register(ann()).await.unwrap();

        // Simulate a concurrent registration whose pre-check saw no account
        repository.set_skip_lookup(true).await;
        let result = service.register(ann()).await;

        assert!(matches!(result, Err(RegistrationError::Conflict)));
        assert_eq!(repository.create_calls().await, 2);
        assert_eq!(repository.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_signing_failure_keeps_stored_account() {
        let repository = Arc::new(InMemoryUserRepository::new());
        let service = UserService::new(
            repository.clone(),
            Arc::new(Argon2Hasher::default()),
            Arc::new(GravatarUrlBuilder::default()),
            Arc::new(FailingJwtGenerator),
        );

        let result = service.register(ann()).await;

        assert!(matches!(
            result,
            Err(RegistrationError::Infrastructure(DomainError::Internal { .. }))
        ));
        assert!(repository.find_by_email("ann@x.com").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_count() {
        let service = create_service(Arc::new(InMemoryUserRepository::new()));

        service.register(ann()).await.unwrap();
        service
            .register(make_request("Bob", "bob@x.com", "secret2"))
            .await
            .unwrap();

        assert_eq!(service.count().await.unwrap(), 2);
    }
}
