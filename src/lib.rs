//! DevConnector API
//!
//! User registration service: validates sign-up input, stores the account
//! with a salted password hash and Gravatar avatar, and returns a signed
//! session token.

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use api::state::{AppState, UserServiceTrait};
use domain::user::UserRepository;
use infrastructure::{
    auth::{JwtConfig, JwtGenerator, JwtService},
    avatar::{AvatarOptions, GravatarUrlBuilder},
    storage::{connect_postgres, run_migrations, StorageType},
    user::{Argon2Hasher, InMemoryUserRepository, PostgresUserRepository, UserService},
};
use rand::Rng;
use tracing::info;

/// Create the application state with custom configuration
pub async fn create_app_state_with_config(config: &AppConfig) -> anyhow::Result<AppState> {
    let storage_backend = StorageType::parse(&config.storage.backend).ok_or_else(|| {
        anyhow::anyhow!("Unknown storage backend: {}", config.storage.backend)
    })?;

    info!("Storage backend: {:?}", storage_backend);

    let user_service = match storage_backend {
        StorageType::InMemory => {
            build_user_service(Arc::new(InMemoryUserRepository::new()), config)?
        }
        StorageType::Postgres => {
            let database_url = resolve_database_url(config)?;
            let pool = connect_postgres(&database_url, config.storage.max_connections).await?;
            run_migrations(&pool).await?;

            build_user_service(Arc::new(PostgresUserRepository::new(pool)), config)?
        }
    };

    Ok(AppState::new(user_service))
}

/// Wire the registration service around a repository
pub fn build_user_service<R: UserRepository + 'static>(
    repository: Arc<R>,
    config: &AppConfig,
) -> anyhow::Result<Arc<dyn UserServiceTrait>> {
    let avatars = GravatarUrlBuilder::new(AvatarOptions {
        size: config.avatar.size,
        rating: config.avatar.rating.clone(),
        default_style: config.avatar.default_style.clone(),
    });

    let hasher = Argon2Hasher::with_cost(config.auth.password_cost)?;

    Ok(Arc::new(UserService::new(
        repository,
        Arc::new(hasher),
        Arc::new(avatars),
        create_jwt_service(config)?,
    )))
}

/// Database URL from config, falling back to `DATABASE_URL`
pub fn resolve_database_url(config: &AppConfig) -> anyhow::Result<String> {
    config
        .storage
        .database_url
        .clone()
        .or_else(|| std::env::var("DATABASE_URL").ok())
        .ok_or_else(|| {
            anyhow::anyhow!("storage.database_url or DATABASE_URL is required for postgres")
        })
}

/// Generate a random JWT secret
fn generate_random_secret() -> String {
    use rand::distributions::Alphanumeric;

    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(64)
        .map(char::from)
        .collect()
}

/// Create JWT service from secret (config, env var, or random)
fn create_jwt_service(config: &AppConfig) -> anyhow::Result<Arc<dyn JwtGenerator>> {
    let jwt_secret = config
        .auth
        .jwt_secret
        .clone()
        .filter(|s| !s.is_empty())
        .or_else(|| std::env::var("JWT_SECRET").ok().filter(|s| !s.is_empty()))
        .unwrap_or_else(|| {
            tracing::warn!(
                "No JWT_SECRET configured. Generating random secret. \
                Issued tokens will NOT verify after a restart."
            );
            generate_random_secret()
        });

    let service = JwtService::new(JwtConfig::new(
        jwt_secret,
        config.auth.jwt_expiration_seconds,
    ))?;

    Ok(Arc::new(service))
}
