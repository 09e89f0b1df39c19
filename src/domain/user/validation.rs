//! Registration input validation

use thiserror::Error;
use validator::ValidateEmail;

/// A single rule violated by a registration request
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistrationValidationError {
    #[error("Name is required")]
    NameRequired,

    #[error("Please include a valid email")]
    InvalidEmail,

    #[error("Please enter a password with {0} or more characters")]
    PasswordTooShort(usize),
}

impl RegistrationValidationError {
    /// Name of the request field the violation refers to
    pub fn field(&self) -> &'static str {
        match self {
            Self::NameRequired => "name",
            Self::InvalidEmail => "email",
            Self::PasswordTooShort(_) => "password",
        }
    }
}

pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Validate a display name
///
/// Only the empty string is rejected; whitespace counts as content.
pub fn validate_name(name: &str) -> Result<(), RegistrationValidationError> {
    if name.is_empty() {
        return Err(RegistrationValidationError::NameRequired);
    }

    Ok(())
}

/// Validate the syntax of an email address
///
/// The domain must end in a top-level label, so `ann@localhost` is rejected.
pub fn validate_email(email: &str) -> Result<(), RegistrationValidationError> {
    if !email.validate_email() || !has_top_level_domain(email) {
        return Err(RegistrationValidationError::InvalidEmail);
    }

    Ok(())
}

/// Last domain label: two or more letters, or an `xn--` punycode label
fn has_top_level_domain(email: &str) -> bool {
    let Some((_, domain)) = email.rsplit_once('@') else {
        return false;
    };
    let Some((_, tld)) = domain.rsplit_once('.') else {
        return false;
    };

    if let Some(encoded) = tld.strip_prefix("xn--") {
        return !encoded.is_empty()
            && encoded.chars().all(|c| c.is_ascii_alphanumeric() || c == '-');
    }

    tld.chars().count() >= 2 && tld.chars().all(char::is_alphabetic)
}

/// Validate a password
///
/// Length is counted in characters, not bytes.
pub fn validate_password(password: &str) -> Result<(), RegistrationValidationError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(RegistrationValidationError::PasswordTooShort(
            MIN_PASSWORD_LENGTH,
        ));
    }

    Ok(())
}

/// Validate all registration fields, collecting every violation in field order
pub fn validate_registration(
    name: &str,
    email: &str,
    password: &str,
) -> Result<(), Vec<RegistrationValidationError>> {
    let errors: Vec<RegistrationValidationError> = [
        validate_name(name),
        validate_email(email),
        validate_password(password),
    ]
    .into_iter()
    .filter_map(Result::err)
    .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_names() {
        assert!(validate_name("Ann").is_ok());
        assert!(validate_name("A").is_ok());
        assert!(validate_name(" ").is_ok());
    }

    #[test]
    fn test_empty_name() {
        assert_eq!(
            validate_name(""),
            Err(RegistrationValidationError::NameRequired)
        );
    }

    #[test]
    fn test_valid_emails() {
        assert!(validate_email("ann@x.com").is_ok());
        assert!(validate_email("first.last+tag@example.co.uk").is_ok());
    }

    #[test]
    fn test_invalid_emails() {
        assert_eq!(
            validate_email("bad"),
            Err(RegistrationValidationError::InvalidEmail)
        );
        assert!(validate_email("").is_err());
        assert!(validate_email("ann@").is_err());
        assert!(validate_email("@x.com").is_err());
        assert!(validate_email("ann x@x.com").is_err());
    }

    #[test]
    fn test_email_requires_top_level_domain() {
        assert_eq!(
            validate_email("ann@x"),
            Err(RegistrationValidationError::InvalidEmail)
        );
        assert!(validate_email("ann@localhost").is_err());
        assert!(validate_email("a@b").is_err());
        assert!(validate_email("ann@x.").is_err());
        assert!(validate_email("ann@x.c").is_err());
        assert!(validate_email("ann@x.123").is_err());
        assert!(validate_email("ann@x.io").is_ok());
        assert!(validate_email("ann@example.xn--p1ai").is_ok());
    }

    #[test]
    fn test_valid_passwords() {
        assert!(validate_password("secret1").is_ok());
        assert!(validate_password("123456").is_ok());
    }

    #[test]
    fn test_password_too_short() {
        assert_eq!(
            validate_password("12345"),
            Err(RegistrationValidationError::PasswordTooShort(6))
        );
        assert!(validate_password("").is_err());
    }

    #[test]
    fn test_password_length_counts_characters() {
        // Five characters but more than six bytes
        assert!(validate_password("ééééé").is_err());
        assert!(validate_password("éééééé").is_ok());
    }

    #[test]
    fn test_messages() {
        assert_eq!(
            RegistrationValidationError::NameRequired.to_string(),
            "Name is required"
        );
        assert_eq!(
            RegistrationValidationError::InvalidEmail.to_string(),
            "Please include a valid email"
        );
        assert_eq!(
            RegistrationValidationError::PasswordTooShort(6).to_string(),
            "Please enter a password with 6 or more characters"
        );
    }

    #[test]
    fn test_validate_registration_ok() {
        assert!(validate_registration("Ann", "ann@x.com", "secret1").is_ok());
    }

    #[test]
    fn test_validate_registration_collects_all_errors() {
        let errors = validate_registration("", "bad", "123").unwrap_err();

        assert_eq!(
            errors,
            vec![
                RegistrationValidationError::NameRequired,
                RegistrationValidationError::InvalidEmail,
                RegistrationValidationError::PasswordTooShort(6),
            ]
        );

        let fields: Vec<&str> = errors.iter().map(|e| e.field()).collect();
        assert_eq!(fields, vec!["name", "email", "password"]);
    }

    #[test]
    fn test_validate_registration_single_error() {
        let errors = validate_registration("Ann", "ann@x.com", "123").unwrap_err();
        assert_eq!(errors, vec![RegistrationValidationError::PasswordTooShort(6)]);
    }
}
