//! User domain
//!
//! This module provides domain types and traits for user registration,
//! including the account entity, input validation, and the repository trait.

mod entity;
mod repository;
mod validation;

pub use entity::{NewUserAccount, UserAccount, UserId};
pub use repository::UserRepository;
pub use validation::{
    validate_email, validate_name, validate_password, validate_registration,
    RegistrationValidationError, MIN_PASSWORD_LENGTH,
};

#[cfg(test)]
pub use repository::mock::MockUserRepository;
