//! Application configuration

mod app_config;

pub use app_config::{
    AppConfig, AuthConfig, AvatarConfig, LogFormat, LoggingConfig, ServerConfig, StorageConfig,
};
