//! Upload request types and multipart validation.

use studia_postgres::types::ContentType;
use validator::Validate;

use crate::handler::{ErrorKind, Result};

/// Maximum image size: 10 MiB.
pub const MAX_IMAGE_SIZE: usize = 10 * 1024 * 1024;

/// Allowed image MIME types.
pub const ALLOWED_IMAGE_TYPES: &[&str] = &[
    "image/jpeg",
    "image/jpg",
    "image/png",
    "image/gif",
    "image/webp",
];

/// Parsed and validated `POST /upload/analyze` form.
#[derive(Debug, Clone)]
pub struct UploadForm {
    /// Image bytes.
    pub image: Vec<u8>,
    /// Image MIME type (from the allow-list).
    pub mime_type: String,
    /// Free-text instruction, 5-500 characters.
    pub prompt: String,
    /// Content classification.
    pub content_type: ContentType,
    /// Title, 3-100 characters.
    pub title: String,
}

impl UploadForm {
    /// File extension for the stored image, derived from the MIME type.
    pub fn file_extension(&self) -> &'static str {
        match self.mime_type.as_str() {
            "image/png" => "png",
            "image/gif" => "gif",
            "image/webp" => "webp",
            _ => "jpg",
        }
    }
}

/// Accumulates multipart fields into an [`UploadForm`].
#[derive(Debug, Default)]
pub struct UploadFormBuilder {
    image: Option<(Vec<u8>, String)>,
    prompt: Option<String>,
    content_type: Option<String>,
    title: Option<String>,
}

impl UploadFormBuilder {
    /// Records the image field.
    pub fn image(&mut self, data: Vec<u8>, mime_type: String) {
        self.image = Some((data, mime_type));
    }

    /// Records a text field by its form name. Unknown fields are ignored.
    pub fn text_field(&mut self, name: &str, value: String) {
        match name {
            "prompt" => self.prompt = Some(value),
            "contentType" => self.content_type = Some(value),
            "title" => self.title = Some(value),
            _ => {}
        }
    }

    /// Validates the accumulated fields and builds the form.
    pub fn build(self) -> Result<UploadForm> {
        let (image, mime_type) = self
            .image
            .ok_or_else(|| ErrorKind::BadRequest.with_message("No image file uploaded"))?;

        if image.is_empty() {
            return Err(ErrorKind::BadRequest.with_message("No image file uploaded"));
        }

        if !ALLOWED_IMAGE_TYPES.contains(&mime_type.as_str()) {
            return Err(ErrorKind::BadRequest.with_message(
                "Invalid file type. Only JPEG, PNG, GIF, and WebP images are allowed.",
            ));
        }

        if image.len() > MAX_IMAGE_SIZE {
            return Err(
                ErrorKind::BadRequest.with_message("File size too large. Maximum size is 10MB.")
            );
        }

        let prompt = self
            .prompt
            .map(|p| p.trim().to_string())
            .filter(|p| (5..=500).contains(&p.len()))
            .ok_or_else(|| {
                ErrorKind::BadRequest.with_message("Prompt must be between 5 and 500 characters")
            })?;

        let content_type: ContentType = self
            .content_type
            .as_deref()
            .and_then(|value| value.parse().ok())
            .ok_or_else(|| {
                ErrorKind::BadRequest
                    .with_message("Content type must be handwritten, textbook, or diagram")
            })?;

        let title = self
            .title
            .map(|t| t.trim().to_string())
            .filter(|t| (3..=100).contains(&t.len()))
            .ok_or_else(|| {
                ErrorKind::BadRequest.with_message("Title must be between 3 and 100 characters")
            })?;

        Ok(UploadForm {
            image,
            mime_type,
            prompt,
            content_type,
            title,
        })
    }
}

/// Body for `POST /upload/{id}/retry`.
#[derive(Debug, Clone, serde::Deserialize, Validate)]
pub struct RetryRequest {
    /// New free-text instruction.
    #[validate(length(
        min = 5,
        max = 500,
        message = "Prompt must be between 5 and 500 characters"
    ))]
    pub prompt: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_builder() -> UploadFormBuilder {
        let mut builder = UploadFormBuilder::default();
        builder.image(vec![0u8; 64], "image/png".to_string());
        builder.text_field("prompt", "Summarize these notes".to_string());
        builder.text_field("contentType", "handwritten".to_string());
        builder.text_field("title", "Biology notes".to_string());
        builder
    }

    #[test]
    fn valid_form_builds() {
        let form = valid_builder().build().expect("valid form");
        assert_eq!(form.content_type, ContentType::Handwritten);
        assert_eq!(form.file_extension(), "png");
    }

    #[test]
    fn missing_image_is_rejected() {
        let mut builder = valid_builder();
        builder.image = None;
        assert!(builder.build().is_err());
    }

    #[test]
    fn disallowed_mime_type_is_rejected() {
        let mut builder = valid_builder();
        builder.image(vec![0u8; 64], "application/pdf".to_string());
        assert!(builder.build().is_err());
    }

    #[test]
    fn oversized_image_is_rejected() {
        let mut builder = valid_builder();
        builder.image(vec![0u8; MAX_IMAGE_SIZE + 1], "image/png".to_string());
        assert!(builder.build().is_err());
    }

    #[test]
    fn short_prompt_is_rejected() {
        let mut builder = valid_builder();
        builder.text_field("prompt", "hey".to_string());
        assert!(builder.build().is_err());
    }

    #[test]
    fn unknown_content_type_is_rejected() {
        let mut builder = valid_builder();
        builder.text_field("contentType", "poster".to_string());
        assert!(builder.build().is_err());
    }
}
