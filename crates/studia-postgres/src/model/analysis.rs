//! Analysis model for PostgreSQL database operations.
//!
//! An analysis is the persisted processing result of one uploaded study
//! image: the extracted text plus the structured material generated from it.
//! Generated collections (quiz questions, flashcards, key topics, mind map,
//! video suggestions) are stored as JSONB; the typed shapes live in
//! `studia-rig` and `studia-youtube`, and the service layer converts at the
//! boundary.
//!
//! ## Models
//!
//! - [`Analysis`] - Main analysis model
//! - [`NewAnalysis`] - Data structure for creating new analyses
//! - [`UpdateAnalysis`] - Data structure for updating existing analyses

use diesel::prelude::*;
use jiff_diesel::Timestamp;
use uuid::Uuid;

use crate::schema::analyses;
use crate::types::ContentType;

/// Analysis model representing one uploaded artifact's processing result.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = analyses)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Analysis {
    /// Unique analysis identifier.
    pub id: Uuid,
    /// Owning account.
    pub account_id: Uuid,
    /// Title given by the uploader.
    pub title: String,
    /// Storage key of the uploaded image.
    pub image_path: String,
    /// Free-text instruction the analysis was generated with.
    pub prompt: String,
    /// Content classification supplied by the uploader.
    pub content_type: ContentType,
    /// Text extracted from the image.
    pub extracted_text: String,
    /// Generated summary.
    pub summary: String,
    /// Generated explanation.
    pub explanation: String,
    /// Generated quiz questions (list of tagged variants).
    pub quiz_questions: serde_json::Value,
    /// Generated flashcards (list of front/back pairs).
    pub flashcards: serde_json::Value,
    /// Generated key topics (list of strings).
    pub key_topics: serde_json::Value,
    /// Generated mind-map tree, when present.
    pub mind_map: Option<serde_json::Value>,
    /// Suggested videos (list of video records).
    pub videos: serde_json::Value,
    /// Timestamp when the analysis was created.
    pub created_at: Timestamp,
    /// Timestamp when the analysis was last updated.
    pub updated_at: Timestamp,
}

/// Data structure for creating a new analysis.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = analyses)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewAnalysis {
    /// Analysis identifier, assigned by the caller so the stored image can
    /// be keyed by it before the row exists.
    pub id: Uuid,
    /// Owning account.
    pub account_id: Uuid,
    /// Title given by the uploader.
    pub title: String,
    /// Storage key of the uploaded image.
    pub image_path: String,
    /// Free-text instruction.
    pub prompt: String,
    /// Content classification.
    pub content_type: ContentType,
    /// Extracted text.
    pub extracted_text: String,
    /// Generated summary.
    pub summary: String,
    /// Generated explanation.
    pub explanation: String,
    /// Generated quiz questions.
    pub quiz_questions: serde_json::Value,
    /// Generated flashcards.
    pub flashcards: serde_json::Value,
    /// Generated key topics.
    pub key_topics: serde_json::Value,
    /// Generated mind map.
    pub mind_map: Option<serde_json::Value>,
    /// Suggested videos.
    pub videos: serde_json::Value,
}

/// Data structure for updating an existing analysis.
///
/// Used by title edits, retry (which replaces the generated material and
/// prompt in place), and video refresh.
#[derive(Debug, Clone, Default, AsChangeset)]
#[diesel(table_name = analyses)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UpdateAnalysis {
    /// Updated title.
    pub title: Option<String>,
    /// Updated prompt.
    pub prompt: Option<String>,
    /// Updated summary.
    pub summary: Option<String>,
    /// Updated explanation.
    pub explanation: Option<String>,
    /// Updated quiz questions.
    pub quiz_questions: Option<serde_json::Value>,
    /// Updated flashcards.
    pub flashcards: Option<serde_json::Value>,
    /// Updated key topics.
    pub key_topics: Option<serde_json::Value>,
    /// Updated mind map.
    pub mind_map: Option<Option<serde_json::Value>>,
    /// Updated videos.
    pub videos: Option<serde_json::Value>,
}

impl Analysis {
    /// Returns the key topics as plain strings.
    pub fn key_topic_list(&self) -> Vec<String> {
        self.key_topics
            .as_array()
            .map(|topics| {
                topics
                    .iter()
                    .filter_map(|topic| topic.as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Returns the number of quiz questions.
    pub fn quiz_question_count(&self) -> usize {
        self.quiz_questions.as_array().map_or(0, Vec::len)
    }

    /// Returns the number of flashcards.
    pub fn flashcard_count(&self) -> usize {
        self.flashcards.as_array().map_or(0, Vec::len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analysis_with(key_topics: serde_json::Value) -> Analysis {
        Analysis {
            id: Uuid::nil(),
            account_id: Uuid::nil(),
            title: String::new(),
            image_path: String::new(),
            prompt: String::new(),
            content_type: ContentType::Textbook,
            extracted_text: String::new(),
            summary: String::new(),
            explanation: String::new(),
            quiz_questions: serde_json::json!([1, 2, 3]),
            flashcards: serde_json::json!([]),
            key_topics,
            mind_map: None,
            videos: serde_json::json!([]),
            created_at: jiff::Timestamp::UNIX_EPOCH.into(),
            updated_at: jiff::Timestamp::UNIX_EPOCH.into(),
        }
    }

    #[test]
    fn key_topic_list_filters_non_strings() {
        let analysis = analysis_with(serde_json::json!(["cells", 42, "energy"]));
        assert_eq!(analysis.key_topic_list(), vec!["cells", "energy"]);
    }

    #[test]
    fn counts_read_jsonb_arrays() {
        let analysis = analysis_with(serde_json::json!([]));
        assert_eq!(analysis.quiz_question_count(), 3);
        assert_eq!(analysis.flashcard_count(), 0);
    }
}
