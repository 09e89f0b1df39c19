use serde::Deserialize;

use crate::infrastructure::auth::DEFAULT_EXPIRATION_SECONDS;
use crate::infrastructure::user::DEFAULT_PASSWORD_COST;

/// Application configuration
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub auth: AuthConfig,
    pub avatar: AvatarConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Session token and password hashing settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Signing secret; `JWT_SECRET` is consulted when unset
    pub jwt_secret: Option<String>,
    pub jwt_expiration_seconds: u64,
    /// Argon2 iteration count for new password hashes
    pub password_cost: u32,
}

/// Gravatar URL parameters
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AvatarConfig {
    pub size: u32,
    pub rating: String,
    pub default_style: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// `memory` or `postgres`
    pub backend: String,
    /// Connection string; `DATABASE_URL` is consulted when unset
    pub database_url: Option<String>,
    pub max_connections: u32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: None,
            jwt_expiration_seconds: DEFAULT_EXPIRATION_SECONDS,
            password_cost: DEFAULT_PASSWORD_COST,
        }
    }
}

impl Default for AvatarConfig {
    fn default() -> Self {
        Self {
            size: 200,
            rating: "pg".to_string(),
            default_style: "mm".to_string(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: "memory".to_string(),
            database_url: None,
            max_connections: 5,
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}
