//! Analysis response types and projections.

use jiff::Timestamp;
use serde::Serialize;
use studia_postgres::model::Analysis;
use studia_postgres::types::{ContentType, OffsetPage, OffsetPagination};
use studia_rig::{Flashcard, MindMap, QuizQuestion, StudyMaterial};
use studia_youtube::VideoSuggestion;
use uuid::Uuid;

/// Rebuilds the typed study material from an analysis row.
///
/// JSONB columns are persisted from the same typed shapes, so deserialization
/// only fails for rows written by an incompatible version; entries that no
/// longer parse are dropped rather than failing the read.
pub fn material_of(analysis: &Analysis) -> StudyMaterial {
    let quiz_questions: Vec<QuizQuestion> = analysis
        .quiz_questions
        .as_array()
        .map(|entries| {
            entries
                .iter()
                .filter_map(|entry| serde_json::from_value(entry.clone()).ok())
                .collect()
        })
        .unwrap_or_default();

    let flashcards: Vec<Flashcard> = analysis
        .flashcards
        .as_array()
        .map(|entries| {
            entries
                .iter()
                .filter_map(|entry| serde_json::from_value(entry.clone()).ok())
                .collect()
        })
        .unwrap_or_default();

    let mind_map: Option<MindMap> = analysis
        .mind_map
        .clone()
        .and_then(|value| serde_json::from_value(value).ok());

    StudyMaterial {
        summary: analysis.summary.clone(),
        explanation: analysis.explanation.clone(),
        quiz_questions,
        flashcards,
        key_topics: analysis.key_topic_list(),
        mind_map,
        extracted_text: None,
    }
}

/// Parses the persisted video list of an analysis.
pub fn videos_of(analysis: &Analysis) -> Vec<VideoSuggestion> {
    analysis
        .videos
        .as_array()
        .map(|entries| {
            entries
                .iter()
                .filter_map(|entry| serde_json::from_value(entry.clone()).ok())
                .collect()
        })
        .unwrap_or_default()
}

/// Full projection of an analysis.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisDetail {
    /// Analysis identifier.
    pub id: Uuid,
    /// Title.
    pub title: String,
    /// Download path of the stored image.
    pub image_url: String,
    /// Content classification.
    pub content_type: ContentType,
    /// Prompt the material was generated with.
    pub prompt: String,
    /// Extracted text.
    pub extracted_text: String,
    /// Generated study material.
    pub analysis: StudyMaterial,
    /// Suggested videos.
    pub videos: Vec<VideoSuggestion>,
    /// When the analysis was created.
    pub created_at: Timestamp,
    /// When the analysis was last updated.
    pub updated_at: Timestamp,
}

impl From<Analysis> for AnalysisDetail {
    fn from(analysis: Analysis) -> Self {
        Self {
            image_url: image_url_of(analysis.id),
            analysis: material_of(&analysis),
            videos: videos_of(&analysis),
            id: analysis.id,
            title: analysis.title,
            content_type: analysis.content_type,
            prompt: analysis.prompt,
            extracted_text: analysis.extracted_text,
            created_at: analysis.created_at.into(),
            updated_at: analysis.updated_at.into(),
        }
    }
}

/// Compact projection used in lists.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisSummary {
    /// Analysis identifier.
    pub id: Uuid,
    /// Title.
    pub title: String,
    /// Download path of the stored image.
    pub image_url: String,
    /// Content classification.
    pub content_type: ContentType,
    /// Generated summary.
    pub summary: String,
    /// Key topics.
    pub key_topics: Vec<String>,
    /// When the analysis was created.
    pub created_at: Timestamp,
    /// When the analysis was last updated.
    pub updated_at: Timestamp,
}

impl From<Analysis> for AnalysisSummary {
    fn from(analysis: Analysis) -> Self {
        Self {
            image_url: image_url_of(analysis.id),
            key_topics: analysis.key_topic_list(),
            id: analysis.id,
            title: analysis.title,
            content_type: analysis.content_type,
            summary: analysis.summary,
            created_at: analysis.created_at.into(),
            updated_at: analysis.updated_at.into(),
        }
    }
}

/// Download path for an analysis's stored image.
pub fn image_url_of(analysis_id: Uuid) -> String {
    format!("/api/upload/{analysis_id}/image")
}

/// Pagination metadata mirrored back to the client.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMeta {
    /// Current 1-based page.
    pub current_page: i64,
    /// Total number of pages.
    pub total_pages: i64,
    /// Total matching items.
    pub total_items: i64,
    /// Page size.
    pub items_per_page: i64,
}

impl PaginationMeta {
    /// Builds metadata from a page result.
    pub fn new<T>(page: &OffsetPage<T>, pagination: &OffsetPagination) -> Self {
        Self {
            current_page: pagination.page_number(),
            total_pages: page.total_pages(pagination),
            total_items: page.total,
            items_per_page: pagination.page_size(),
        }
    }
}

/// Response for the analysis list endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisListResponse {
    /// Always `true` on success.
    pub success: bool,
    /// Analyses on this page.
    pub analyses: Vec<AnalysisSummary>,
    /// Pagination metadata.
    pub pagination: PaginationMeta,
}

/// Response wrapping one full analysis.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisResponse {
    /// Always `true` on success.
    pub success: bool,
    /// Human-readable outcome message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// The analysis.
    pub analysis: AnalysisDetail,
}

/// Scoped projection: quiz questions.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizResponse {
    /// Always `true` on success.
    pub success: bool,
    /// Quiz questions.
    pub quiz_questions: Vec<QuizQuestion>,
    /// Analysis title.
    pub title: String,
}

/// Scoped projection: flashcards.
#[derive(Debug, Clone, Serialize)]
pub struct FlashcardsResponse {
    /// Always `true` on success.
    pub success: bool,
    /// Flashcards.
    pub flashcards: Vec<Flashcard>,
    /// Analysis title.
    pub title: String,
}

/// Scoped projection: mind map.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MindMapResponse {
    /// Always `true` on success.
    pub success: bool,
    /// Mind-map tree (placeholder when none was generated).
    pub mind_map_data: MindMap,
    /// Analysis title.
    pub title: String,
}

/// Scoped projection: suggested videos.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VideosResponse {
    /// Always `true` on success.
    pub success: bool,
    /// Suggested videos.
    pub videos: Vec<VideoSuggestion>,
    /// Key topics driving the suggestions.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub key_topics: Vec<String>,
    /// Analysis title.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

/// Per-account analysis statistics body.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatisticsBody {
    /// Total number of analyses.
    pub total_analyses: i64,
    /// Number of handwritten analyses.
    pub handwritten_count: i64,
    /// Number of textbook analyses.
    pub textbook_count: i64,
    /// Number of diagram analyses.
    pub diagram_count: i64,
    /// Total quiz questions across all analyses.
    pub total_quiz_questions: i64,
    /// Total flashcards across all analyses.
    pub total_flashcards: i64,
}

impl From<studia_postgres::query::AnalysisStatistics> for StatisticsBody {
    fn from(stats: studia_postgres::query::AnalysisStatistics) -> Self {
        Self {
            total_analyses: stats.total_analyses,
            handwritten_count: stats.handwritten_count,
            textbook_count: stats.textbook_count,
            diagram_count: stats.diagram_count,
            total_quiz_questions: stats.total_quiz_questions,
            total_flashcards: stats.total_flashcards,
        }
    }
}

/// Response for the statistics endpoints.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatisticsResponse {
    /// Always `true` on success.
    pub success: bool,
    /// The statistics.
    pub statistics: StatisticsBody,
    /// Most recent analyses.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub recent_analyses: Vec<AnalysisSummary>,
}

/// One popular topic entry.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicEntry {
    /// Topic name.
    pub name: String,
    /// Number of analyses carrying it.
    pub count: i64,
    /// Most recent use.
    pub last_used: Timestamp,
}

/// Response for the popular-topics endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct TopicsResponse {
    /// Always `true` on success.
    pub success: bool,
    /// Topics, most used first.
    pub topics: Vec<TopicEntry>,
}

/// Response for the video search endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct VideoSearchResponse {
    /// Always `true` on success.
    pub success: bool,
    /// Matching videos.
    pub videos: Vec<VideoSuggestion>,
    /// The search query.
    pub query: String,
}
