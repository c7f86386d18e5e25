//! Validation of the account forms before anything is sent.

use regex::Regex;
use thiserror::Error;

pub const MIN_PASSWORD_LEN: usize = 6;

const EMAIL_PATTERN: &str = r"^[^\s@]+@[^\s@]+\.[^\s@]+$";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    #[error("Username is required")]
    MissingUsername,

    #[error("Enter a valid email address")]
    InvalidEmail,

    #[error("Password must be at least 6 characters")]
    PasswordTooShort,

    #[error("Passwords do not match")]
    PasswordMismatch,
}

pub fn validate_email(email: &str) -> Result<(), FormError> {
    let valid = Regex::new(EMAIL_PATTERN)
        .map(|re| re.is_match(email.trim()))
        .unwrap_or(false);

    if valid {
        Ok(())
    } else {
        Err(FormError::InvalidEmail)
    }
}

pub fn validate_password(password: &str, confirmation: &str) -> Result<(), FormError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(FormError::PasswordTooShort);
    }
    if password != confirmation {
        return Err(FormError::PasswordMismatch);
    }
    Ok(())
}

#[derive(Debug, Clone, Default)]
pub struct RegistrationForm {
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirmation: String,
}

impl RegistrationForm {
    /// First problem with the form, checked in field order
    pub fn validate(&self) -> Result<(), FormError> {
        if self.username.trim().is_empty() {
            return Err(FormError::MissingUsername);
        }
        validate_email(&self.email)?;
        validate_password(&self.password, &self.confirmation)
    }
}

#[derive(Debug, Clone, Default)]
pub struct PasswordResetForm {
    pub password: String,
    pub confirmation: String,
}

impl PasswordResetForm {
    pub fn validate(&self) -> Result<(), FormError> {
        validate_password(&self.password, &self.confirmation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registration() -> RegistrationForm {
        RegistrationForm {
            username: "ana".to_string(),
            email: "ana@example.com".to_string(),
            password: "secret1".to_string(),
            confirmation: "secret1".to_string(),
        }
    }

    #[test]
    fn test_valid_registration() {
        assert_eq!(registration().validate(), Ok(()));
    }

    #[test]
    fn test_registration_errors_in_field_order() {
        let mut form = registration();
        form.username = "  ".to_string();
        form.email = "nope".to_string();
        assert_eq!(form.validate(), Err(FormError::MissingUsername));

        form.username = "ana".to_string();
        assert_eq!(form.validate(), Err(FormError::InvalidEmail));

        form.email = "ana@example.com".to_string();
        form.password = "12345".to_string();
        assert_eq!(form.validate(), Err(FormError::PasswordTooShort));

        form.password = "123456".to_string();
        assert_eq!(form.validate(), Err(FormError::PasswordMismatch));
    }

    #[test]
    fn test_email_shapes() {
        assert!(validate_email("a@b.co").is_ok());
        assert!(validate_email("a@b").is_err());
        assert!(validate_email("a b@c.com").is_err());
        assert!(validate_email("").is_err());
    }

    #[test]
    fn test_password_reset() {
        let form = PasswordResetForm {
            password: "abcdef".to_string(),
            confirmation: "abcdeg".to_string(),
        };
        assert_eq!(form.validate(), Err(FormError::PasswordMismatch));
        assert!(validate_password("abcdef", "abcdef").is_ok());
    }
}
