use crate::error::{AppError, Result};

/// Validates a username.
///
/// # Arguments
///
/// * `username` - The username to validate.
///
/// # Returns
///
/// A `Result<()>` indicating whether the username is valid.
pub fn validate_username(username: &str) -> Result<()> {
    if username.is_empty() || username.len() < 3 {
        return Err(AppError::Validation(
            "Username must be at least 3 characters long".to_string(),
        ));
    }

    if username.len() > 50 {
        return Err(AppError::Validation(
            "Username must be at most 50 characters".to_string(),
        ));
    }

    if !username.chars().all(|c| c.is_alphanumeric() || c == '_' || c == '-') {
        return Err(AppError::Validation(
            "Username can only contain letters, numbers, underscores, and hyphens".to_string(),
        ));
    }

    Ok(())
}

/// Validates a password.
///
/// # Arguments
///
/// * `password` - The password to validate.
///
/// # Returns
///
/// A `Result<()>` indicating whether the password is valid.
pub fn validate_password(password: &str) -> Result<()> {
    if password.len() < 8 {
        return Err(AppError::Validation(
            "Password must be at least 8 characters long".to_string(),
        ));
    }

    if password.len() > 128 {
        return Err(AppError::Validation(
            "Password must be at most 128 characters".to_string(),
        ));
    }

    Ok(())
}

/// Validates an email address.
///
/// # Arguments
///
/// * `email` - The email address to validate.
///
/// # Returns
///
/// A `Result<()>` indicating whether the email is plausible.
pub fn validate_email(email: &str) -> Result<()> {
    if email.is_empty() {
        return Err(AppError::Validation("Email is required".to_string()));
    }

    if email.len() > 255 {
        return Err(AppError::Validation(
            "Email must be at most 255 characters".to_string(),
        ));
    }

    if !email.contains('@') {
        return Err(AppError::Validation(
            "Email must be a valid email address".to_string(),
        ));
    }

    Ok(())
}

/// Validates a required name field, using `label` in the error message.
pub fn validate_name(label: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{label} is required")));
    }

    if value.len() > 255 {
        return Err(AppError::Validation(format!(
            "{label} must be at most 255 characters"
        )));
    }

    Ok(())
}

/// Validates an optional profile field, using `label` in the error message.
/// Absent values pass; present values must fit the column.
pub fn validate_optional(label: &str, value: Option<&str>) -> Result<()> {
    if let Some(value) = value {
        if value.len() > 255 {
            return Err(AppError::Validation(format!(
                "{label} must be at most 255 characters"
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn usernames_within_bounds_pass() {
        assert!(validate_username("ada_lovelace-1815").is_ok());
        assert!(validate_username("ada").is_ok());
    }

    #[test]
    fn short_long_or_symbolic_usernames_fail() {
        assert!(validate_username("ab").is_err());
        assert!(validate_username(&"a".repeat(51)).is_err());
        assert!(validate_username("ada lovelace").is_err());
    }

    #[test]
    fn password_length_is_bounded() {
        assert!(validate_password("longenough").is_ok());
        assert!(validate_password("short").is_err());
        assert!(validate_password(&"p".repeat(129)).is_err());
    }

    #[test]
    fn email_needs_an_at_sign() {
        assert!(validate_email("ada@example.com").is_ok());
        assert!(validate_email("").is_err());
        assert!(validate_email("ada.example.com").is_err());
    }

    #[test]
    fn names_must_be_present() {
        assert!(validate_name("First name", "Ada").is_ok());
        assert!(validate_name("First name", "  ").is_err());
    }

    #[test]
    fn optional_fields_are_bounded_when_present() {
        assert!(validate_optional("Phone", None).is_ok());
        assert!(validate_optional("Phone", Some("+44 20 7946 0958")).is_ok());
        assert!(validate_optional("Address", Some(&"a".repeat(256))).is_err());
    }
}
