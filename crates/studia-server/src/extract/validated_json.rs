//! JSON extractor with declarative validation.

use axum::Json;
use axum::extract::{FromRequest, Request};
use validator::Validate;

use crate::handler::error::FieldError;
use crate::handler::{Error, ErrorKind};

/// JSON body extractor that runs `validator` rules after deserialization.
///
/// Validation failures produce a 400 with field-level messages, the same
/// shape for every endpoint.
#[derive(Debug, Clone)]
pub struct ValidateJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidateJson<T>
where
    S: Send + Sync,
    T: serde::de::DeserializeOwned + Validate,
{
    type Rejection = Error;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(body) = Json::<T>::from_request(req, state).await.map_err(|e| {
            ErrorKind::BadRequest
                .with_message("Invalid request body")
                .with_context(e.to_string())
        })?;

        body.validate()
            .map_err(|errors| validation_error(&errors))?;

        Ok(ValidateJson(body))
    }
}

/// Flattens validator output into field-level messages.
fn validation_error(errors: &validator::ValidationErrors) -> Error {
    let field_errors: Vec<FieldError> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, messages)| {
            messages.iter().map(move |error| FieldError {
                field: field.to_string(),
                message: error
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("invalid value for {field}")),
            })
        })
        .collect();

    ErrorKind::BadRequest
        .with_message("Validation failed")
        .with_field_errors(field_errors)
}

#[cfg(test)]
mod tests {
    use validator::Validate;

    use super::*;

    #[derive(Debug, serde::Deserialize, Validate)]
    struct Sample {
        #[validate(length(min = 3, message = "too short"))]
        name: String,
    }

    #[test]
    fn validation_errors_carry_field_messages() {
        let sample = Sample {
            name: "ab".to_string(),
        };
        let errors = sample.validate().unwrap_err();
        let error = validation_error(&errors);

        assert_eq!(error.kind(), ErrorKind::BadRequest);
        assert_eq!(error.message(), "Validation failed");
    }
}
