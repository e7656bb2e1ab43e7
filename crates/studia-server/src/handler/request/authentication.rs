//! Authentication request bodies.

use serde::Deserialize;
use validator::{Validate, ValidationError};

/// Body for `POST /auth/register`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Email address.
    #[validate(email(message = "Please provide a valid email"))]
    pub email: String,

    /// Password; at least 6 characters with one lowercase letter, one
    /// uppercase letter, and one digit.
    #[validate(
        length(min = 6, message = "Password must be at least 6 characters long"),
        custom(function = validate_password_strength)
    )]
    pub password: String,

    /// Display name.
    #[validate(length(
        min = 2,
        max = 50,
        message = "Name must be between 2 and 50 characters"
    ))]
    pub name: String,
}

/// Body for `POST /auth/login`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    /// Email address.
    #[validate(email(message = "Please provide a valid email"))]
    pub email: String,

    /// Password.
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Body for `PUT /auth/change-password`.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    /// Current password, verified before the change.
    #[validate(length(min = 1, message = "Current password is required"))]
    pub current_password: String,

    /// New password, same strength rules as registration.
    #[validate(
        length(min = 6, message = "Password must be at least 6 characters long"),
        custom(function = validate_password_strength)
    )]
    pub new_password: String,
}

/// Requires at least one lowercase letter, one uppercase letter, and one
/// digit.
fn validate_password_strength(password: &str) -> Result<(), ValidationError> {
    let has_lower = password.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = password.chars().any(|c| c.is_ascii_uppercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());

    if has_lower && has_upper && has_digit {
        Ok(())
    } else {
        let mut error = ValidationError::new("password_strength");
        error.message = Some(
            "Password must contain at least one lowercase letter, one uppercase letter, and one number"
                .into(),
        );
        Err(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strong_password_passes() {
        let request = RegisterRequest {
            email: "student@example.com".to_string(),
            password: "Passw0rd".to_string(),
            name: "Student".to_string(),
        };
        assert!(request.validate().is_ok());
    }

    #[test]
    fn weak_password_fails() {
        let request = RegisterRequest {
            email: "student@example.com".to_string(),
            password: "password".to_string(),
            name: "Student".to_string(),
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn invalid_email_fails() {
        let request = LoginRequest {
            email: "not-an-email".to_string(),
            password: "x".to_string(),
        };
        assert!(request.validate().is_err());
    }
}
