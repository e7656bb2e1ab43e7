//! HTTP error handling with a builder pattern for dynamic error responses.

use std::borrow::Cow;
use std::fmt;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use strum::{AsRefStr, IntoStaticStr};

use crate::handler::response::ErrorResponse;

/// Result type for HTTP handlers.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Categories of HTTP errors, each mapped to a status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[derive(AsRefStr, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum ErrorKind {
    /// Malformed or invalid input (400).
    BadRequest,
    /// Missing or invalid credentials (401).
    Unauthorized,
    /// Authenticated but not allowed (403).
    Forbidden,
    /// Resource absent or not owned by the caller (404).
    NotFound,
    /// Conflicting state, e.g. duplicate email (409).
    Conflict,
    /// Upstream collaborator failed or returned unusable data (502).
    UpstreamFailure,
    /// Unexpected internal error (500).
    #[default]
    InternalServerError,
}

impl ErrorKind {
    /// Returns the HTTP status code for this kind.
    pub fn status(self) -> StatusCode {
        match self {
            Self::BadRequest => StatusCode::BAD_REQUEST,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Conflict => StatusCode::CONFLICT,
            Self::UpstreamFailure => StatusCode::BAD_GATEWAY,
            Self::InternalServerError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns the default user-facing message for this kind.
    pub fn default_message(self) -> &'static str {
        match self {
            Self::BadRequest => "Invalid request",
            Self::Unauthorized => "Authentication required",
            Self::Forbidden => "Not allowed",
            Self::NotFound => "Resource not found",
            Self::Conflict => "Conflicting state",
            Self::UpstreamFailure => "An external service failed",
            Self::InternalServerError => "Internal server error",
        }
    }

    /// Attaches a user-facing message, producing an [`Error`].
    pub fn with_message(self, message: impl Into<Cow<'static, str>>) -> Error {
        Error::new(self).with_message(message)
    }

    /// Attaches internal context, producing an [`Error`].
    pub fn with_context(self, context: impl Into<Cow<'static, str>>) -> Error {
        Error::new(self).with_context(context)
    }
}

/// The error type for HTTP handlers.
///
/// Carries a kind (status mapping), an optional user-facing message, an
/// optional internal context (logged, never serialized), and optional
/// field-level validation messages.
#[derive(Debug, Clone)]
#[must_use = "errors do nothing unless serialized"]
pub struct Error {
    kind: ErrorKind,
    message: Option<Cow<'static, str>>,
    context: Option<Cow<'static, str>>,
    field_errors: Vec<FieldError>,
}

/// A field-level validation message.
#[derive(Debug, Clone, serde::Serialize)]
pub struct FieldError {
    /// Field the message refers to.
    pub field: String,
    /// Human-readable message.
    pub message: String,
}

impl Error {
    /// Creates a new error with the specified kind.
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            message: None,
            context: None,
            field_errors: Vec::new(),
        }
    }

    /// Sets a user-facing message.
    pub fn with_message(mut self, message: impl Into<Cow<'static, str>>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Attaches internal context for logs.
    pub fn with_context(mut self, context: impl Into<Cow<'static, str>>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Attaches field-level validation messages.
    pub fn with_field_errors(mut self, field_errors: Vec<FieldError>) -> Self {
        self.field_errors = field_errors;
        self
    }

    /// Returns the error kind.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the user-facing message.
    pub fn message(&self) -> &str {
        self.message
            .as_deref()
            .unwrap_or_else(|| self.kind.default_message())
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self {
        Self::new(kind)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.message(), self.kind.status())?;
        if let Some(ref context) = self.context {
            write!(f, " - {context}")?;
        }
        Ok(())
    }
}

impl std::error::Error for Error {}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        if let Some(ref context) = self.context {
            tracing::error!(
                target: "studia_server::handler",
                kind = self.kind.as_ref(),
                context = %context,
                "request failed"
            );
        }

        let status = self.kind.status();
        let body = ErrorResponse::new(self.message(), &self.field_errors);

        (status, axum::Json(body)).into_response()
    }
}

impl IntoResponse for ErrorKind {
    fn into_response(self) -> Response {
        Error::new(self).into_response()
    }
}

// Collaborator errors cross the orchestration boundary as upstream failures;
// everything else keeps its taxonomy.

impl From<studia_postgres::PgError> for Error {
    fn from(err: studia_postgres::PgError) -> Self {
        if err.is_not_found() {
            return ErrorKind::NotFound.with_message("Resource not found");
        }
        if err.is_unique_violation() {
            return ErrorKind::Conflict.with_context(err.to_string());
        }
        ErrorKind::InternalServerError
            .with_message("Database operation failed")
            .with_context(err.to_string())
    }
}

impl From<studia_opendal::StorageError> for Error {
    fn from(err: studia_opendal::StorageError) -> Self {
        if err.is_not_found() {
            return ErrorKind::NotFound.with_message("File not found");
        }
        ErrorKind::InternalServerError
            .with_message("Storage operation failed")
            .with_context(err.to_string())
    }
}

impl From<studia_vision::Error> for Error {
    fn from(err: studia_vision::Error) -> Self {
        ErrorKind::UpstreamFailure
            .with_message("Failed to extract text from image")
            .with_context(err.to_string())
    }
}

impl From<studia_rig::Error> for Error {
    fn from(err: studia_rig::Error) -> Self {
        ErrorKind::UpstreamFailure
            .with_message("Failed to generate study material")
            .with_context(err.to_string())
    }
}

impl From<studia_youtube::Error> for Error {
    fn from(err: studia_youtube::Error) -> Self {
        ErrorKind::UpstreamFailure
            .with_message("Failed to look up videos")
            .with_context(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_maps_to_status() {
        assert_eq!(ErrorKind::NotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(ErrorKind::UpstreamFailure.status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn message_falls_back_to_default() {
        let error = Error::new(ErrorKind::NotFound);
        assert_eq!(error.message(), "Resource not found");

        let error = ErrorKind::NotFound.with_message("Analysis not found");
        assert_eq!(error.message(), "Analysis not found");
    }

    #[test]
    fn storage_not_found_maps_to_404() {
        let err = studia_opendal::StorageError::not_found("exports/missing.pdf");
        let error: Error = err.into();
        assert_eq!(error.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn collaborator_failure_maps_to_upstream() {
        let err = studia_rig::Error::provider("gemini", "rate limited");
        let error: Error = err.into();
        assert_eq!(error.kind(), ErrorKind::UpstreamFailure);
    }
}
