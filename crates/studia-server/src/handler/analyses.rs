//! Analysis read projections, title edits, and video refresh.

use axum::extract::{Path, Query, State};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use studia_postgres::PgClient;
use studia_postgres::model::UpdateAnalysis;
use studia_postgres::query::AnalysisRepository;
use studia_youtube::YoutubeClient;

use crate::extract::{AuthState, ValidateJson};
use crate::handler::request::{
    AnalysisPathParams, ListQuery, UpdateTitleRequest, VideoSearchQuery,
};
use crate::handler::response::{
    AnalysisListResponse, AnalysisResponse, FlashcardsResponse, MindMapResponse, PaginationMeta,
    QuizResponse, StatisticsResponse, TopicEntry, TopicsResponse, VideoSearchResponse,
    VideosResponse, material_of, videos_of,
};
use crate::handler::utils::{fetch_videos, to_jsonb};
use crate::handler::{ErrorKind, Result};
use crate::service::ServiceState;

/// Tracing target for analysis operations.
const TRACING_TARGET: &str = "studia_server::handler::analyses";

/// Number of entries returned by the popular-topics endpoint.
const POPULAR_TOPIC_LIMIT: usize = 20;

/// Loads an analysis scoped to the caller or fails with 404.
macro_rules! find_owned_analysis {
    ($conn:expr, $params:expr, $claims:expr) => {
        $conn
            .find_analysis($params.id, $claims.account_id)
            .await?
            .ok_or_else(|| ErrorKind::NotFound.with_message("Analysis not found"))?
    };
}

/// Lists analyses with pagination, filtering, and search.
async fn list_analyses(
    State(pg_client): State<PgClient>,
    AuthState(claims): AuthState,
    Query(query): Query<ListQuery>,
) -> Result<Json<AnalysisListResponse>> {
    let pagination = query.pagination();
    let mut conn = pg_client.get_connection().await?;

    let page = conn
        .list_analyses(claims.account_id, query.filter(), pagination)
        .await?;

    Ok(Json(AnalysisListResponse {
        success: true,
        pagination: PaginationMeta::new(&page, &pagination),
        analyses: page.items.into_iter().map(Into::into).collect(),
    }))
}

/// Returns one full analysis.
async fn get_analysis(
    State(pg_client): State<PgClient>,
    AuthState(claims): AuthState,
    Path(params): Path<AnalysisPathParams>,
) -> Result<Json<AnalysisResponse>> {
    let mut conn = pg_client.get_connection().await?;
    let analysis = find_owned_analysis!(conn, params, claims);

    Ok(Json(AnalysisResponse {
        success: true,
        message: None,
        analysis: analysis.into(),
    }))
}

/// Renames an analysis.
#[tracing::instrument(skip_all, fields(analysis_id = %params.id))]
async fn update_title(
    State(pg_client): State<PgClient>,
    AuthState(claims): AuthState,
    Path(params): Path<AnalysisPathParams>,
    ValidateJson(request): ValidateJson<UpdateTitleRequest>,
) -> Result<Json<AnalysisResponse>> {
    let mut conn = pg_client.get_connection().await?;

    // Scope check first so a foreign id reads as 404, not as an update error.
    find_owned_analysis!(conn, params, claims);

    let updated = conn
        .update_analysis(
            params.id,
            claims.account_id,
            UpdateAnalysis {
                title: Some(request.title.trim().to_string()),
                ..Default::default()
            },
        )
        .await?;

    tracing::debug!(target: TRACING_TARGET, "analysis title updated");

    Ok(Json(AnalysisResponse {
        success: true,
        message: Some("Analysis title updated successfully".to_string()),
        analysis: updated.into(),
    }))
}

/// Scoped projection: quiz questions.
async fn get_quiz(
    State(pg_client): State<PgClient>,
    AuthState(claims): AuthState,
    Path(params): Path<AnalysisPathParams>,
) -> Result<Json<QuizResponse>> {
    let mut conn = pg_client.get_connection().await?;
    let analysis = find_owned_analysis!(conn, params, claims);
    let material = material_of(&analysis);

    Ok(Json(QuizResponse {
        success: true,
        quiz_questions: material.quiz_questions,
        title: analysis.title,
    }))
}

/// Scoped projection: flashcards.
async fn get_flashcards(
    State(pg_client): State<PgClient>,
    AuthState(claims): AuthState,
    Path(params): Path<AnalysisPathParams>,
) -> Result<Json<FlashcardsResponse>> {
    let mut conn = pg_client.get_connection().await?;
    let analysis = find_owned_analysis!(conn, params, claims);
    let material = material_of(&analysis);

    Ok(Json(FlashcardsResponse {
        success: true,
        flashcards: material.flashcards,
        title: analysis.title,
    }))
}

/// Scoped projection: mind map.
async fn get_mind_map(
    State(pg_client): State<PgClient>,
    AuthState(claims): AuthState,
    Path(params): Path<AnalysisPathParams>,
) -> Result<Json<MindMapResponse>> {
    let mut conn = pg_client.get_connection().await?;
    let analysis = find_owned_analysis!(conn, params, claims);
    let material = material_of(&analysis);

    Ok(Json(MindMapResponse {
        success: true,
        mind_map_data: material.mind_map_or_default(),
        title: analysis.title,
    }))
}

/// Scoped projection: suggested videos.
async fn get_videos(
    State(pg_client): State<PgClient>,
    AuthState(claims): AuthState,
    Path(params): Path<AnalysisPathParams>,
) -> Result<Json<VideosResponse>> {
    let mut conn = pg_client.get_connection().await?;
    let analysis = find_owned_analysis!(conn, params, claims);

    Ok(Json(VideosResponse {
        success: true,
        videos: videos_of(&analysis),
        key_topics: analysis.key_topic_list(),
        title: Some(analysis.title),
    }))
}

/// Re-runs the video lookup for an analysis and persists the result.
#[tracing::instrument(skip_all, fields(analysis_id = %params.id))]
async fn refresh_videos(
    State(pg_client): State<PgClient>,
    State(youtube_client): State<YoutubeClient>,
    AuthState(claims): AuthState,
    Path(params): Path<AnalysisPathParams>,
) -> Result<Json<VideosResponse>> {
    let mut conn = pg_client.get_connection().await?;
    let analysis = find_owned_analysis!(conn, params, claims);

    let videos = fetch_videos(&youtube_client, &analysis.key_topic_list()).await;

    conn.update_analysis(
        params.id,
        claims.account_id,
        UpdateAnalysis {
            videos: Some(to_jsonb(&videos)),
            ..Default::default()
        },
    )
    .await?;

    tracing::debug!(
        target: TRACING_TARGET,
        video_count = videos.len(),
        "video suggestions refreshed"
    );

    Ok(Json(VideosResponse {
        success: true,
        videos,
        key_topics: Vec::new(),
        title: None,
    }))
}

/// Searches educational videos directly.
async fn search_videos(
    State(youtube_client): State<YoutubeClient>,
    AuthState(_claims): AuthState,
    Query(query): Query<VideoSearchQuery>,
) -> Result<Json<VideoSearchResponse>> {
    use validator::Validate;
    query
        .validate()
        .map_err(|_| ErrorKind::BadRequest.with_message("Search query must be at least 3 characters long"))?;

    let videos = youtube_client.search_educational(&query.query).await?;

    Ok(Json(VideoSearchResponse {
        success: true,
        videos,
        query: query.query,
    }))
}

/// Per-account analysis statistics with recent analyses.
async fn analysis_statistics(
    State(pg_client): State<PgClient>,
    AuthState(claims): AuthState,
) -> Result<Json<StatisticsResponse>> {
    let mut conn = pg_client.get_connection().await?;

    let stats = conn.analysis_statistics(claims.account_id).await?;
    let recent = conn.recent_analyses(claims.account_id, 5).await?;

    Ok(Json(StatisticsResponse {
        success: true,
        statistics: stats.into(),
        recent_analyses: recent.into_iter().map(Into::into).collect(),
    }))
}

/// The account's most used key topics.
async fn popular_topics(
    State(pg_client): State<PgClient>,
    AuthState(claims): AuthState,
) -> Result<Json<TopicsResponse>> {
    let mut conn = pg_client.get_connection().await?;
    let topics = conn
        .popular_topics(claims.account_id, POPULAR_TOPIC_LIMIT)
        .await?;

    Ok(Json(TopicsResponse {
        success: true,
        topics: topics
            .into_iter()
            .map(|topic| TopicEntry {
                name: topic.name,
                count: topic.count,
                last_used: topic.last_used,
            })
            .collect(),
    }))
}

/// Returns a [`Router`] with all related routes.
///
/// Specific routes are registered before parameterized ones so `/statistics`
/// never parses as an analysis id.
pub fn routes() -> Router<ServiceState> {
    Router::new()
        .route("/analysis", get(list_analyses))
        .route("/analysis/statistics", get(analysis_statistics))
        .route("/analysis/popular-topics", get(popular_topics))
        .route("/analysis/youtube/search", get(search_videos))
        .route("/analysis/{id}", get(get_analysis))
        .route("/analysis/{id}/title", put(update_title))
        .route("/analysis/{id}/quiz", get(get_quiz))
        .route("/analysis/{id}/flashcards", get(get_flashcards))
        .route("/analysis/{id}/mindmap", get(get_mind_map))
        .route("/analysis/{id}/videos", get(get_videos))
        .route("/analysis/{id}/videos/refresh", post(refresh_videos))
}
