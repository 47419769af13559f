//! User validation utilities

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

use crate::domain::DomainError;

/// Errors that can occur during user validation
#[derive(Debug, Error, Clone, PartialEq)]
pub enum UserValidationError {
    #[error("username must start with a letter and contain only alphanumeric characters")]
    InvalidUsername,

    #[error("username must be at most {max} characters")]
    UsernameTooLong { max: usize },

    #[error("password must be between {min} and {max} characters")]
    PasswordLength { min: usize, max: usize },
}

impl From<UserValidationError> for DomainError {
    fn from(err: UserValidationError) -> Self {
        match err {
            UserValidationError::InvalidUsername | UserValidationError::UsernameTooLong { .. } => {
                DomainError::invalid_username(err.to_string())
            }
            UserValidationError::PasswordLength { .. } => {
                DomainError::invalid_password(err.to_string())
            }
        }
    }
}

/// Width of the `users.username` column
pub const MAX_USERNAME_LENGTH: usize = 50;
pub const MIN_PASSWORD_LENGTH: usize = 6;
pub const MAX_PASSWORD_LENGTH: usize = 20;

static USERNAME_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9]*$").unwrap());

/// Validate a username
///
/// Rules:
/// - Starts with an ASCII letter
/// - Followed by zero or more ASCII letters or digits
/// - At most 50 characters
pub fn validate_username(username: &str) -> Result<(), UserValidationError> {
    if !USERNAME_PATTERN.is_match(username) {
        return Err(UserValidationError::InvalidUsername);
    }

    // The pattern admits ASCII only, so bytes and characters agree
    if username.len() > MAX_USERNAME_LENGTH {
        return Err(UserValidationError::UsernameTooLong {
            max: MAX_USERNAME_LENGTH,
        });
    }

    Ok(())
}

/// Validate a password
///
/// Length must be within 6..=20 characters. No composition rules apply.
pub fn validate_password(password: &str) -> Result<(), UserValidationError> {
    let length = password.chars().count();

    if !(MIN_PASSWORD_LENGTH..=MAX_PASSWORD_LENGTH).contains(&length) {
        return Err(UserValidationError::PasswordLength {
            min: MIN_PASSWORD_LENGTH,
            max: MAX_PASSWORD_LENGTH,
        });
    }

    Ok(())
}
