//! Infrastructure layer - External service implementations

pub mod auth;
pub mod avatar;
pub mod logging;
pub mod storage;
pub mod user;
