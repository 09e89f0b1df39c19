//! User infrastructure module
//!
//! Password hashing with Argon2, in-memory and PostgreSQL repositories, and
//! the registration service that ties them together.

mod password;
mod postgres_repository;
mod repository;
mod service;

pub use password::{Argon2Hasher, PasswordHasher, DEFAULT_PASSWORD_COST};
pub use postgres_repository::PostgresUserRepository;
pub use repository::InMemoryUserRepository;
pub use service::{RegisterUserRequest, RegisteredUser, RegistrationError, UserService};
