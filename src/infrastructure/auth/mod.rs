//! Authentication infrastructure module
//!
//! This module provides JWT session token management.

mod jwt;

pub use jwt::{
    JwtConfig, JwtGenerator, JwtService, SessionClaims, SessionUser, DEFAULT_EXPIRATION_SECONDS,
};
