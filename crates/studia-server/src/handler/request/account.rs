//! Account request bodies.

use serde::Deserialize;
use validator::Validate;

/// Body for `PUT /auth/profile`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    /// New display name.
    #[validate(length(
        min = 2,
        max = 50,
        message = "Name must be between 2 and 50 characters"
    ))]
    pub name: Option<String>,

    /// New email address; rejected when another account already uses it.
    #[validate(email(message = "Please provide a valid email"))]
    pub email: Option<String>,
}
