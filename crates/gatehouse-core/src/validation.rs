//! Input validation rules shared by request DTOs.
//!
//! The functions here plug into `validator` as custom validators:
//!
//! ```ignore
//! #[derive(Deserialize, Validate)]
//! struct RegisterRequest {
//!     #[validate(custom(function = "gatehouse_core::validation::validate_email_shape"))]
//!     email: String,
//!     #[validate(custom(function = "gatehouse_core::validation::validate_password_strength"))]
//!     password: String,
//! }
//! ```

use std::borrow::Cow;

use validator::{ValidateEmail, ValidationError};

pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Characters that satisfy the "special character" rule.
pub const PASSWORD_SPECIAL_CHARS: &str = "!@#$%^&*()_+{}|:\"<>?~";

/// Address syntax as accepted by `validator`, plus a final domain label of
/// at least two ASCII letters.
pub fn is_valid_email(email: &str) -> bool {
    if !email.validate_email() {
        return false;
    }
    email
        .rsplit_once('.')
        .is_some_and(|(_, tld)| tld.len() >= 2 && tld.chars().all(|c| c.is_ascii_alphabetic()))
}

pub fn validate_email_shape(email: &str) -> Result<(), ValidationError> {
    if email.is_empty() {
        return Err(ValidationError::new("email_empty")
            .with_message(Cow::Borrowed("email cannot be empty")));
    }
    if !is_valid_email(email) {
        return Err(ValidationError::new("email_invalid")
            .with_message(Cow::Owned(format!("invalid email: {email}"))));
    }
    Ok(())
}

/// Requires at least [`MIN_PASSWORD_LENGTH`] characters with an uppercase
/// letter, a lowercase letter, a digit and one of [`PASSWORD_SPECIAL_CHARS`].
pub fn validate_password_strength(password: &str) -> Result<(), ValidationError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(ValidationError::new("password_too_short").with_message(Cow::Owned(
            format!("password must be at least {MIN_PASSWORD_LENGTH} characters long"),
        )));
    }

    let (mut upper, mut lower, mut digit, mut special) = (false, false, false, false);
    for c in password.chars() {
        if c.is_uppercase() {
            upper = true;
        } else if c.is_lowercase() {
            lower = true;
        } else if c.is_ascii_digit() {
            digit = true;
        } else if PASSWORD_SPECIAL_CHARS.contains(c) {
            special = true;
        }
    }

    if upper && lower && digit && special {
        return Ok(());
    }

    Err(ValidationError::new("password_weak").with_message(Cow::Borrowed(
        "weak password: must contain at least 1 uppercase, 1 lowercase, 1 digit, 1 special character",
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_emails() {
        for email in [
            "user@example.com",
            "first.last+tag@sub.example.org",
            "a_b%c-d@host-name.io",
        ] {
            assert!(is_valid_email(email), "{email} should be valid");
        }
    }

    #[test]
    fn test_invalid_emails() {
        for email in [
            "",
            "plainaddress",
            "@example.com",
            "user@",
            "user@example",
            "user@example.c",
            "user@example.c0m",
            "us er@example.com",
            "user@@example.com",
            "user@.com",
            "user@example.com.",
            "user@host.123",
        ] {
            assert!(!is_valid_email(email), "{email} should be invalid");
        }
    }

    #[test]
    fn test_validate_email_shape_messages() {
        let err = validate_email_shape("").unwrap_err();
        assert_eq!(err.code, "email_empty");
        let err = validate_email_shape("nope").unwrap_err();
        assert_eq!(err.message.unwrap(), "invalid email: nope");
    }

    #[test]
    fn test_strong_password() {
        assert!(validate_password_strength("Passw0rd!").is_ok());
        assert!(validate_password_strength("Zz9~zzzz").is_ok());
    }

    #[test]
    fn test_short_password() {
        let err = validate_password_strength("Pa0!").unwrap_err();
        assert_eq!(err.code, "password_too_short");
    }

    #[test]
    fn test_password_missing_classes() {
        for password in [
            "password1!",
            "PASSWORD1!",
            "Password!!",
            "Password11",
            "Password1=",
            "Passw½rd!",
        ] {
            let err = validate_password_strength(password).unwrap_err();
            assert_eq!(err.code, "password_weak", "{password} should be weak");
        }
    }

    #[test]
    fn test_weak_password_message_does_not_echo_input() {
        let err = validate_password_strength("password1!").unwrap_err();
        assert!(!err.message.unwrap().contains("password1!"));
    }
}
