//! HTTP client for the Vision `images:annotate` endpoint.

use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::TRACING_TARGET;
use crate::annotation::{ImageAnnotation, LabelAnnotation, ObjectAnnotation, TextExtraction};
use crate::error::{Error, Result};

/// Default Vision API endpoint.
const DEFAULT_ENDPOINT: &str = "https://vision.googleapis.com/v1/images:annotate";

/// Default request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Maximum label/object results requested per annotation call.
const MAX_FEATURE_RESULTS: u32 = 10;

/// Configuration for the Vision HTTP client.
#[derive(Debug, Clone)]
pub struct VisionConfig {
    endpoint: Url,
    api_key: String,
    timeout: Duration,
}

impl VisionConfig {
    /// Creates a configuration with the default endpoint.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            endpoint: Url::parse(DEFAULT_ENDPOINT).expect("default endpoint is a valid url"),
            api_key: api_key.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Overrides the API endpoint (useful for tests and proxies).
    pub fn with_endpoint(mut self, endpoint: impl AsRef<str>) -> Result<Self> {
        self.endpoint = Url::parse(endpoint.as_ref())
            .map_err(|e| Error::config(format!("invalid endpoint '{}': {e}", endpoint.as_ref())))?;
        Ok(self)
    }

    /// Overrides the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Returns the configured endpoint.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

/// HTTP client for the Vision API.
///
/// Cheap to clone; all clones share the same connection pool.
#[derive(Debug, Clone)]
pub struct VisionClient {
    http_client: Client,
    config: VisionConfig,
}

impl VisionClient {
    /// Creates a new client from configuration.
    pub fn new(config: VisionConfig) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| Error::config(format!("failed to build http client: {e}")))?;

        tracing::debug!(
            target: TRACING_TARGET,
            endpoint = %config.endpoint,
            timeout = ?config.timeout,
            "vision client initialized"
        );

        Ok(Self {
            http_client,
            config,
        })
    }

    /// Returns a reference to the client configuration.
    pub fn config(&self) -> &VisionConfig {
        &self.config
    }

    /// Extracts text from an image (`TEXT_DETECTION` only).
    pub async fn extract_text(&self, image: &[u8]) -> Result<TextExtraction> {
        let response = self
            .annotate_raw(image, &[Feature::new("TEXT_DETECTION")])
            .await?;

        let text = response.full_text();

        tracing::debug!(
            target: TRACING_TARGET,
            text_len = text.len(),
            "text extraction complete"
        );

        Ok(TextExtraction::new(text))
    }

    /// Runs full annotation: text, labels, and localized objects.
    pub async fn annotate(&self, image: &[u8]) -> Result<ImageAnnotation> {
        let features = [
            Feature::new("TEXT_DETECTION"),
            Feature::with_max_results("LABEL_DETECTION", MAX_FEATURE_RESULTS),
            Feature::with_max_results("OBJECT_LOCALIZATION", MAX_FEATURE_RESULTS),
        ];
        let response = self.annotate_raw(image, &features).await?;

        let annotation = ImageAnnotation {
            text: response.full_text(),
            labels: response
                .label_annotations
                .into_iter()
                .map(|label| LabelAnnotation {
                    name: label.description,
                    confidence: label.score,
                })
                .collect(),
            objects: response
                .localized_object_annotations
                .into_iter()
                .map(|object| ObjectAnnotation {
                    name: object.name,
                    confidence: object.score,
                })
                .collect(),
        };

        tracing::debug!(
            target: TRACING_TARGET,
            text_len = annotation.text.len(),
            labels = annotation.labels.len(),
            objects = annotation.objects.len(),
            "image annotation complete"
        );

        Ok(annotation)
    }

    /// Sends one `images:annotate` request and unwraps the single response.
    async fn annotate_raw(&self, image: &[u8], features: &[Feature]) -> Result<AnnotateResponse> {
        let body = AnnotateBatchRequest {
            requests: vec![AnnotateRequest {
                image: ImageContent {
                    content: BASE64.encode(image),
                },
                features: features.to_vec(),
            }],
        };

        let mut url = self.config.endpoint.clone();
        url.query_pairs_mut().append_pair("key", &self.config.api_key);

        let response = self.http_client.post(url).json(&body).send().await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            tracing::warn!(
                target: TRACING_TARGET,
                status = status.as_u16(),
                "vision api returned an error"
            );
            return Err(Error::api(status.as_u16(), message));
        }

        let batch: AnnotateBatchResponse = response.json().await?;
        let annotate = batch
            .responses
            .into_iter()
            .next()
            .ok_or_else(|| Error::invalid_response("empty annotate response batch"))?;

        if let Some(api_error) = annotate.error {
            return Err(Error::api(api_error.code, api_error.message));
        }

        Ok(annotate)
    }
}

// Wire types for the annotate endpoint. Field names follow the REST API.

#[derive(Debug, Serialize)]
struct AnnotateBatchRequest {
    requests: Vec<AnnotateRequest>,
}

#[derive(Debug, Serialize)]
struct AnnotateRequest {
    image: ImageContent,
    features: Vec<Feature>,
}

#[derive(Debug, Serialize)]
struct ImageContent {
    content: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct Feature {
    #[serde(rename = "type")]
    feature_type: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_results: Option<u32>,
}

impl Feature {
    fn new(feature_type: &'static str) -> Self {
        Self {
            feature_type,
            max_results: None,
        }
    }

    fn with_max_results(feature_type: &'static str, max_results: u32) -> Self {
        Self {
            feature_type,
            max_results: Some(max_results),
        }
    }
}

#[derive(Debug, Deserialize)]
struct AnnotateBatchResponse {
    #[serde(default)]
    responses: Vec<AnnotateResponse>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnnotateResponse {
    #[serde(default)]
    text_annotations: Vec<TextAnnotation>,
    #[serde(default)]
    label_annotations: Vec<WireLabel>,
    #[serde(default)]
    localized_object_annotations: Vec<WireObject>,
    error: Option<ApiStatus>,
}

impl AnnotateResponse {
    /// The first text annotation carries the full extracted text; the rest
    /// are per-word fragments.
    fn full_text(&self) -> String {
        self.text_annotations
            .first()
            .map(|t| t.description.clone())
            .unwrap_or_default()
    }
}

#[derive(Debug, Deserialize)]
struct TextAnnotation {
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct WireLabel {
    #[serde(default)]
    description: String,
    #[serde(default)]
    score: f32,
}

#[derive(Debug, Deserialize)]
struct WireObject {
    #[serde(default)]
    name: String,
    #[serde(default)]
    score: f32,
}

#[derive(Debug, Deserialize)]
struct ApiStatus {
    #[serde(default)]
    code: u16,
    #[serde(default)]
    message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_text_takes_first_annotation() {
        let response: AnnotateResponse = serde_json::from_str(
            r#"{
                "textAnnotations": [
                    {"description": "full page text"},
                    {"description": "full"},
                    {"description": "page"}
                ]
            }"#,
        )
        .expect("parse");
        assert_eq!(response.full_text(), "full page text");
    }

    #[test]
    fn missing_annotations_default_to_empty() {
        let response: AnnotateResponse = serde_json::from_str("{}").expect("parse");
        assert_eq!(response.full_text(), "");
        assert!(response.label_annotations.is_empty());
        assert!(response.localized_object_annotations.is_empty());
    }

    #[test]
    fn feature_serializes_rest_shape() {
        let feature = Feature::with_max_results("LABEL_DETECTION", 10);
        let json = serde_json::to_value(&feature).expect("serialize");
        assert_eq!(
            json,
            serde_json::json!({"type": "LABEL_DETECTION", "maxResults": 10})
        );
    }
}
