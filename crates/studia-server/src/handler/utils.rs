//! Helpers shared by the orchestration handlers.

use studia_opendal::FileStore;
use studia_rig::StudyMaterial;
use studia_youtube::{VideoSuggestion, YoutubeClient};

/// Tracing target for orchestration helpers.
const TRACING_TARGET: &str = "studia_server::handler::utils";

/// Minimum extracted-text length for non-diagram uploads.
///
/// Shorter extractions fail the request before any generation call is made,
/// so unreadable images never consume a paid generation request.
pub const MIN_EXTRACTED_TEXT_LEN: usize = 10;

/// Looks up related videos for the generated key topics.
///
/// Video suggestions are declared non-fatal: any collaborator failure
/// degrades to an empty list and the analysis is stored without videos.
pub async fn fetch_videos(
    youtube_client: &YoutubeClient,
    key_topics: &[String],
) -> Vec<VideoSuggestion> {
    if key_topics.is_empty() {
        return Vec::new();
    }

    match youtube_client.related_videos(key_topics).await {
        Ok(videos) => videos,
        Err(err) => {
            tracing::warn!(
                target: TRACING_TARGET,
                error = %err,
                "video suggestion lookup failed, continuing without videos"
            );
            Vec::new()
        }
    }
}

/// Removes an uploaded file after a failed pipeline run.
///
/// Cleanup is best-effort: failures are logged, never surfaced, and the
/// original pipeline error propagates unchanged.
pub async fn cleanup_uploaded_file(file_store: &FileStore, key: &str) {
    if let Err(err) = file_store.delete(key).await {
        tracing::warn!(
            target: TRACING_TARGET,
            key = %key,
            error = %err,
            "failed to clean up uploaded file"
        );
    }
}

/// Serializes a generated collection for a JSONB column.
pub fn to_jsonb<T: serde::Serialize>(value: &T) -> serde_json::Value {
    serde_json::to_value(value).unwrap_or_else(|_| serde_json::Value::Array(Vec::new()))
}

/// Serialized update fields for a freshly generated material plus videos.
pub struct MaterialColumns {
    /// Summary column value.
    pub summary: String,
    /// Explanation column value.
    pub explanation: String,
    /// Quiz questions JSONB value.
    pub quiz_questions: serde_json::Value,
    /// Flashcards JSONB value.
    pub flashcards: serde_json::Value,
    /// Key topics JSONB value.
    pub key_topics: serde_json::Value,
    /// Mind-map JSONB value.
    pub mind_map: Option<serde_json::Value>,
    /// Videos JSONB value.
    pub videos: serde_json::Value,
}

impl MaterialColumns {
    /// Flattens a material and its video list into column values.
    pub fn new(material: &StudyMaterial, videos: &[VideoSuggestion]) -> Self {
        Self {
            summary: material.summary.clone(),
            explanation: material.explanation.clone(),
            quiz_questions: to_jsonb(&material.quiz_questions),
            flashcards: to_jsonb(&material.flashcards),
            key_topics: to_jsonb(&material.key_topics),
            mind_map: material.mind_map.as_ref().map(to_jsonb),
            videos: to_jsonb(&videos),
        }
    }
}

/// MIME type for a stored image extension.
pub fn mime_of_extension(path: &str) -> &'static str {
    match path.rsplit('.').next() {
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        _ => "image/jpeg",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mime_follows_extension() {
        assert_eq!(mime_of_extension("uploads/a.png"), "image/png");
        assert_eq!(mime_of_extension("uploads/a.jpg"), "image/jpeg");
        assert_eq!(mime_of_extension("no-extension"), "image/jpeg");
    }
}
