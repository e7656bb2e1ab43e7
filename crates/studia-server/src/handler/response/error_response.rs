//! Serialized error body.

use serde::Serialize;

use crate::handler::error::FieldError;

/// JSON body returned for every failed request.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Always `false` for errors.
    pub success: bool,
    /// User-facing message.
    pub message: String,
    /// Field-level validation messages, present for validation failures.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<FieldError>,
}

impl ErrorResponse {
    /// Creates an error body.
    pub fn new(message: &str, field_errors: &[FieldError]) -> Self {
        Self {
            success: false,
            message: message.to_string(),
            errors: field_errors.to_vec(),
        }
    }
}
