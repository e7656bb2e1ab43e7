//! Upload and analysis pipeline handlers.
//!
//! The analysis pipeline is the core orchestration of the system: persist
//! the image first, extract text, generate study material, attempt a video
//! lookup, then persist the full record. On any failure after the image was
//! stored, the stored file is removed before the error propagates, so failed
//! uploads never leave orphaned files behind.

use std::sync::Arc;

use axum::extract::{DefaultBodyLimit, Multipart, Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use studia_opendal::FileStore;
use studia_postgres::PgClient;
use studia_postgres::model::{NewAnalysis, UpdateAnalysis};
use studia_postgres::query::AnalysisRepository;
use studia_rig::{StudyAgent, StudyMaterial};
use studia_vision::VisionClient;
use studia_youtube::YoutubeClient;
use uuid::Uuid;

use crate::extract::{AuthState, ValidateJson};
use crate::handler::request::{
    AnalysisPathParams, ListQuery, MAX_IMAGE_SIZE, RetryRequest, UploadForm, UploadFormBuilder,
};
use crate::handler::response::{
    AckResponse, AnalysisListResponse, AnalysisResponse, PaginationMeta, StatisticsResponse,
};
use crate::handler::utils::{
    MIN_EXTRACTED_TEXT_LEN, MaterialColumns, cleanup_uploaded_file, fetch_videos,
    mime_of_extension,
};
use crate::handler::{ErrorKind, Result};
use crate::service::ServiceState;

/// Tracing target for upload operations.
const TRACING_TARGET: &str = "studia_server::handler::uploads";

/// Uploads an image and runs the full analysis pipeline.
///
/// Form data: `image` (file), `prompt`, `contentType`, `title`.
#[tracing::instrument(skip_all, fields(account_id = %claims.account_id))]
async fn upload_and_analyze(
    State(pg_client): State<PgClient>,
    State(file_store): State<FileStore>,
    State(vision_client): State<VisionClient>,
    State(study_agent): State<Arc<StudyAgent>>,
    State(youtube_client): State<YoutubeClient>,
    AuthState(claims): AuthState,
    multipart: Multipart,
) -> Result<(StatusCode, Json<AnalysisResponse>)> {
    let form = read_upload_form(multipart).await?;

    let analysis_id = Uuid::now_v7();
    let image_key = format!("uploads/{analysis_id}.{}", form.file_extension());

    // The image is persisted before any remote call; every failure past this
    // point must remove it again.
    file_store.write(&image_key, form.image.clone()).await?;

    tracing::debug!(
        target: TRACING_TARGET,
        analysis_id = %analysis_id,
        key = %image_key,
        size = form.image.len(),
        "image stored, starting analysis pipeline"
    );

    let outcome = run_analysis_pipeline(&vision_client, &study_agent, &form).await;
    let (extracted_text, material) = match outcome {
        Ok(result) => result,
        Err(error) => {
            cleanup_uploaded_file(&file_store, &image_key).await;
            return Err(error);
        }
    };

    let videos = fetch_videos(&youtube_client, &material.key_topics).await;

    let columns = MaterialColumns::new(&material, &videos);
    let record = NewAnalysis {
        id: analysis_id,
        account_id: claims.account_id,
        title: form.title.clone(),
        image_path: image_key.clone(),
        prompt: form.prompt.clone(),
        content_type: form.content_type,
        extracted_text,
        summary: columns.summary,
        explanation: columns.explanation,
        quiz_questions: columns.quiz_questions,
        flashcards: columns.flashcards,
        key_topics: columns.key_topics,
        mind_map: columns.mind_map,
        videos: columns.videos,
    };

    let mut conn = pg_client.get_connection().await?;
    let analysis = match conn.create_analysis(record).await {
        Ok(analysis) => analysis,
        Err(error) => {
            cleanup_uploaded_file(&file_store, &image_key).await;
            return Err(error.into());
        }
    };

    tracing::info!(
        target: TRACING_TARGET,
        analysis_id = %analysis.id,
        content_type = %analysis.content_type,
        "analysis created"
    );

    Ok((
        StatusCode::CREATED,
        Json(AnalysisResponse {
            success: true,
            message: Some("Image analyzed successfully".to_string()),
            analysis: analysis.into(),
        }),
    ))
}

/// Runs extraction and generation for an upload.
///
/// Returns the extracted text together with the generated material.
async fn run_analysis_pipeline(
    vision_client: &VisionClient,
    study_agent: &StudyAgent,
    form: &UploadForm,
) -> Result<(String, StudyMaterial)> {
    if form.content_type.is_diagram() {
        // Diagrams go through both collaborators: vision for a text
        // fallback, generation for the actual analysis of the image.
        let annotation = vision_client.annotate(&form.image).await?;

        // The classifier is best-effort and the caller's choice wins; a
        // disagreement is only worth a log line.
        let detected = studia_vision::ContentClass::from_annotation(&annotation);
        if detected != studia_vision::ContentClass::Diagram {
            tracing::debug!(
                target: TRACING_TARGET,
                detected = %detected,
                "classifier disagrees with supplied content type"
            );
        }

        let image_base64 = BASE64.encode(&form.image);
        let material = study_agent
            .analyze_image(&image_base64, &form.prompt, form.content_type.label())
            .await?;

        let extracted_text = material
            .extracted_text
            .clone()
            .filter(|text| !text.trim().is_empty())
            .unwrap_or(annotation.text);

        return Ok((extracted_text, material));
    }

    let extraction = vision_client.extract_text(&form.image).await?;
    let extracted_text = extraction.text.trim().to_string();

    if extracted_text.len() < MIN_EXTRACTED_TEXT_LEN {
        return Err(ErrorKind::BadRequest.with_message(
            "Unable to extract text from image. Please ensure the image is clear and contains readable text.",
        ));
    }

    let material = study_agent
        .analyze_text(&extracted_text, &form.prompt, form.content_type.label())
        .await?;

    Ok((extracted_text, material))
}

/// Reads and validates the multipart upload form.
async fn read_upload_form(mut multipart: Multipart) -> Result<UploadForm> {
    let mut builder = UploadFormBuilder::default();

    while let Some(field) = multipart.next_field().await.map_err(|err| {
        ErrorKind::BadRequest
            .with_message("Invalid multipart data")
            .with_context(err.to_string())
    })? {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        if name == "image" {
            let mime_type = field
                .content_type()
                .map(str::to_string)
                .unwrap_or_else(|| "application/octet-stream".to_string());
            let data = field.bytes().await.map_err(|err| {
                ErrorKind::BadRequest
                    .with_message("Failed to read image data")
                    .with_context(err.to_string())
            })?;
            builder.image(data.to_vec(), mime_type);
        } else {
            let value = field.text().await.map_err(|err| {
                ErrorKind::BadRequest
                    .with_message("Failed to read form field")
                    .with_context(err.to_string())
            })?;
            builder.text_field(&name, value);
        }
    }

    builder.build()
}

/// Re-runs generation with a new prompt against the stored inputs.
///
/// Extraction is never re-run: diagrams are re-analyzed from the stored
/// image, other content from the stored extracted text. Generation failure
/// leaves the record untouched.
#[tracing::instrument(skip_all, fields(analysis_id = %params.id))]
async fn retry_analysis(
    State(pg_client): State<PgClient>,
    State(file_store): State<FileStore>,
    State(study_agent): State<Arc<StudyAgent>>,
    State(youtube_client): State<YoutubeClient>,
    AuthState(claims): AuthState,
    Path(params): Path<AnalysisPathParams>,
    ValidateJson(request): ValidateJson<RetryRequest>,
) -> Result<Json<AnalysisResponse>> {
    let mut conn = pg_client.get_connection().await?;

    let analysis = conn
        .find_analysis(params.id, claims.account_id)
        .await?
        .ok_or_else(|| ErrorKind::NotFound.with_message("Analysis not found"))?;

    let material = if analysis.content_type.is_diagram() {
        let image = file_store.read(&analysis.image_path).await?;
        let image_base64 = BASE64.encode(&image);
        study_agent
            .analyze_image(
                &image_base64,
                &request.prompt,
                analysis.content_type.label(),
            )
            .await?
    } else {
        study_agent
            .analyze_text(
                &analysis.extracted_text,
                &request.prompt,
                analysis.content_type.label(),
            )
            .await?
    };

    let videos = fetch_videos(&youtube_client, &material.key_topics).await;
    let columns = MaterialColumns::new(&material, &videos);

    let updated = conn
        .update_analysis(
            params.id,
            claims.account_id,
            UpdateAnalysis {
                prompt: Some(request.prompt),
                summary: Some(columns.summary),
                explanation: Some(columns.explanation),
                quiz_questions: Some(columns.quiz_questions),
                flashcards: Some(columns.flashcards),
                key_topics: Some(columns.key_topics),
                mind_map: Some(columns.mind_map),
                videos: Some(columns.videos),
                ..Default::default()
            },
        )
        .await?;

    tracing::info!(target: TRACING_TARGET, "analysis re-generated");

    Ok(Json(AnalysisResponse {
        success: true,
        message: Some("Analysis updated successfully".to_string()),
        analysis: updated.into(),
    }))
}

/// Lists the account's uploads with pagination and filtering.
async fn list_uploads(
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

/// Per-account upload statistics.
async fn upload_statistics(
    State(pg_client): State<PgClient>,
    AuthState(claims): AuthState,
) -> Result<Json<StatisticsResponse>> {
    let mut conn = pg_client.get_connection().await?;
    let stats = conn.analysis_statistics(claims.account_id).await?;

    Ok(Json(StatisticsResponse {
        success: true,
        statistics: stats.into(),
        recent_analyses: Vec::new(),
    }))
}

/// Streams the stored image of an analysis.
async fn download_image(
    State(pg_client): State<PgClient>,
    State(file_store): State<FileStore>,
    AuthState(claims): AuthState,
    Path(params): Path<AnalysisPathParams>,
) -> Result<(HeaderMap, Vec<u8>)> {
    let mut conn = pg_client.get_connection().await?;

    let analysis = conn
        .find_analysis(params.id, claims.account_id)
        .await?
        .ok_or_else(|| ErrorKind::NotFound.with_message("Analysis not found"))?;

    let data = file_store.read(&analysis.image_path).await?;

    let mut headers = HeaderMap::new();
    headers.insert(
        axum::http::header::CONTENT_TYPE,
        mime_of_extension(&analysis.image_path)
            .parse()
            .expect("static mime type is a valid header value"),
    );

    Ok((headers, data))
}

/// Deletes an analysis, its chats, and the stored image.
#[tracing::instrument(skip_all, fields(analysis_id = %params.id))]
async fn delete_upload(
    State(pg_client): State<PgClient>,
    State(file_store): State<FileStore>,
    AuthState(claims): AuthState,
    Path(params): Path<AnalysisPathParams>,
) -> Result<Json<AckResponse>> {
    let mut conn = pg_client.get_connection().await?;

    let deleted = conn
        .delete_analysis(params.id, claims.account_id)
        .await?
        .ok_or_else(|| ErrorKind::NotFound.with_message("Analysis not found"))?;

    cleanup_uploaded_file(&file_store, &deleted.image_path).await;

    tracing::info!(target: TRACING_TARGET, "analysis deleted");

    Ok(Json(AckResponse::new("Analysis deleted successfully")))
}

/// Returns a [`Router`] with all related routes.
pub fn routes() -> Router<ServiceState> {
    Router::new()
        .route(
            "/upload/analyze",
            post(upload_and_analyze).layer(DefaultBodyLimit::max(MAX_IMAGE_SIZE + 64 * 1024)),
        )
        .route("/upload", get(list_uploads))
        .route("/upload/statistics", get(upload_statistics))
        .route("/upload/{id}/retry", post(retry_analysis))
        .route("/upload/{id}/image", get(download_image))
        .route("/upload/{id}", delete(delete_upload))
}
