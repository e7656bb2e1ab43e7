//! PDF export handlers.

use std::collections::HashSet;

use axum::extract::{Path, State};
use axum::http::{HeaderMap, header};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use studia_postgres::PgClient;
use studia_postgres::query::AnalysisRepository;
use studia_rig::{MindMap, MindMapBranch, StudyMaterial};

use crate::extract::{AuthState, ValidateJson};
use crate::handler::request::{AnalysisPathParams, BatchExportRequest, FilenamePathParams};
use crate::handler::response::{
    AckResponse, ExportEntry, ExportHistoryResponse, ExportResponse, material_of,
};
use crate::handler::{Error, ErrorKind, Result};
use crate::service::{ExportError, ExportService, ServiceState, download_url_of};

/// Tracing target for export operations.
const TRACING_TARGET: &str = "studia_server::handler::exports";

/// Analyses listed by the export history endpoint.
const HISTORY_ANALYSES: i64 = 20;

impl From<ExportError> for Error {
    fn from(err: ExportError) -> Self {
        match err {
            ExportError::InvalidFilename(_) => {
                ErrorKind::BadRequest.with_message("Invalid filename")
            }
            ExportError::Storage(storage) => storage.into(),
            ExportError::Render(render) => ErrorKind::InternalServerError
                .with_message("Failed to generate PDF")
                .with_context(render.to_string()),
        }
    }
}

/// Exports one analysis as a PDF.
#[tracing::instrument(skip_all, fields(analysis_id = %params.id))]
async fn export_pdf(
    State(pg_client): State<PgClient>,
    State(export_service): State<ExportService>,
    AuthState(claims): AuthState,
    Path(params): Path<AnalysisPathParams>,
) -> Result<Json<ExportResponse>> {
    let mut conn = pg_client.get_connection().await?;

    let analysis = conn
        .find_analysis(params.id, claims.account_id)
        .await?
        .ok_or_else(|| ErrorKind::NotFound.with_message("Analysis not found"))?;

    let material = material_of(&analysis);
    let artifact = export_service.render(&material, &analysis.title).await?;

    tracing::info!(
        target: TRACING_TARGET,
        filename = %artifact.filename,
        "analysis exported"
    );

    Ok(Json(ExportResponse::new(
        "PDF generated successfully",
        artifact,
    )))
}

/// Exports only the flashcards of an analysis.
#[tracing::instrument(skip_all, fields(analysis_id = %params.id))]
async fn export_flashcards(
    State(pg_client): State<PgClient>,
    State(export_service): State<ExportService>,
    AuthState(claims): AuthState,
    Path(params): Path<AnalysisPathParams>,
) -> Result<Json<ExportResponse>> {
    let mut conn = pg_client.get_connection().await?;

    let analysis = conn
        .find_analysis(params.id, claims.account_id)
        .await?
        .ok_or_else(|| ErrorKind::NotFound.with_message("Analysis not found"))?;

    let material = material_of(&analysis);
    if material.flashcards.is_empty() {
        return Err(ErrorKind::NotFound.with_message("No flashcards found for this analysis"));
    }

    let scoped = StudyMaterial {
        summary: format!("Flashcards for: {}", analysis.title),
        explanation: String::new(),
        quiz_questions: Vec::new(),
        flashcards: material.flashcards,
        key_topics: material.key_topics,
        mind_map: material.mind_map,
        extracted_text: None,
    };

    let title = format!("{} - Flashcards", analysis.title);
    let artifact = export_service.render(&scoped, &title).await?;

    Ok(Json(ExportResponse::new(
        "Flashcards PDF generated successfully",
        artifact,
    )))
}

/// Exports only the quiz questions of an analysis.
#[tracing::instrument(skip_all, fields(analysis_id = %params.id))]
async fn export_quiz(
    State(pg_client): State<PgClient>,
    State(export_service): State<ExportService>,
    AuthState(claims): AuthState,
    Path(params): Path<AnalysisPathParams>,
) -> Result<Json<ExportResponse>> {
    let mut conn = pg_client.get_connection().await?;

    let analysis = conn
        .find_analysis(params.id, claims.account_id)
        .await?
        .ok_or_else(|| ErrorKind::NotFound.with_message("Analysis not found"))?;

    let material = material_of(&analysis);
    if material.quiz_questions.is_empty() {
        return Err(ErrorKind::NotFound.with_message("No quiz questions found for this analysis"));
    }

    let scoped = StudyMaterial {
        summary: format!("Quiz Questions for: {}", analysis.title),
        explanation: String::new(),
        quiz_questions: material.quiz_questions,
        flashcards: Vec::new(),
        key_topics: material.key_topics,
        mind_map: material.mind_map,
        extracted_text: None,
    };

    let title = format!("{} - Quiz Questions", analysis.title);
    let artifact = export_service.render(&scoped, &title).await?;

    Ok(Json(ExportResponse::new(
        "Quiz questions PDF generated successfully",
        artifact,
    )))
}

/// Combines several analyses into one document.
#[tracing::instrument(skip_all, fields(count = request.analysis_ids.len()))]
async fn export_batch(
    State(pg_client): State<PgClient>,
    State(export_service): State<ExportService>,
    AuthState(claims): AuthState,
    ValidateJson(request): ValidateJson<BatchExportRequest>,
) -> Result<Json<ExportResponse>> {
    let mut conn = pg_client.get_connection().await?;

    let mut analyses = Vec::with_capacity(request.analysis_ids.len());
    for id in &request.analysis_ids {
        let analysis = conn.find_analysis(*id, claims.account_id).await?.ok_or_else(|| {
            ErrorKind::NotFound.with_message("Some analyses not found or do not belong to user")
        })?;
        analyses.push(analysis);
    }

    let mut summaries = Vec::new();
    let mut explanations = Vec::new();
    let mut quiz_questions = Vec::new();
    let mut flashcards = Vec::new();
    let mut seen_topics = HashSet::new();
    let mut key_topics = Vec::new();
    let mut branches = Vec::new();

    for analysis in &analyses {
        let material = material_of(analysis);
        summaries.push(format!("{}\n{}", analysis.title, material.summary));
        explanations.push(format!("{}\n{}", analysis.title, material.explanation));
        quiz_questions.extend(material.quiz_questions);
        flashcards.extend(material.flashcards);
        branches.push(MindMapBranch {
            name: analysis.title.clone(),
            subtopics: material.key_topics.clone(),
        });
        for topic in material.key_topics {
            if seen_topics.insert(topic.clone()) {
                key_topics.push(topic);
            }
        }
    }

    let combined = StudyMaterial {
        summary: summaries.join("\n\n"),
        explanation: explanations.join("\n\n"),
        quiz_questions,
        flashcards,
        key_topics,
        mind_map: Some(MindMap {
            central: "Combined Study Material".to_string(),
            branches,
        }),
        extracted_text: None,
    };

    let title = format!("Combined Study Material - {} Analyses", analyses.len());
    let artifact = export_service.render(&combined, &title).await?;

    tracing::info!(
        target: TRACING_TARGET,
        filename = %artifact.filename,
        count = analyses.len(),
        "combined export generated"
    );

    Ok(Json(
        ExportResponse::new("Combined PDF generated successfully", artifact)
            .with_count(analyses.len()),
    ))
}

/// Streams an export artifact. Public: the artifact name is the capability.
async fn download(
    State(export_service): State<ExportService>,
    Path(params): Path<FilenamePathParams>,
) -> Result<(HeaderMap, Vec<u8>)> {
    let data = export_service.read(&params.filename).await?;

    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        "application/pdf"
            .parse()
            .expect("static mime type is a valid header value"),
    );
    headers.insert(
        header::CONTENT_DISPOSITION,
        format!("attachment; filename=\"{}\"", params.filename)
            .parse()
            .map_err(|_| ErrorKind::BadRequest.with_message("Invalid filename"))?,
    );

    Ok((headers, data))
}

/// Deletes an export artifact.
async fn delete_export(
    State(export_service): State<ExportService>,
    AuthState(_claims): AuthState,
    Path(params): Path<FilenamePathParams>,
) -> Result<Json<AckResponse>> {
    export_service.delete(&params.filename).await?;
    Ok(Json(AckResponse::new("Export file deleted successfully")))
}

/// Lists recent analyses and available export artifacts.
async fn export_history(
    State(pg_client): State<PgClient>,
    State(export_service): State<ExportService>,
    AuthState(claims): AuthState,
) -> Result<Json<ExportHistoryResponse>> {
    let mut conn = pg_client.get_connection().await?;
    let recent = conn
        .recent_analyses(claims.account_id, HISTORY_ANALYSES)
        .await?;

    let available = export_service.list_recent().await?;

    Ok(Json(ExportHistoryResponse {
        success: true,
        recent_analyses: recent.into_iter().map(Into::into).collect(),
        available_exports: available
            .into_iter()
            .map(|entry| ExportEntry {
                download_url: download_url_of(&entry.filename),
                filename: entry.filename,
                size: entry.size,
                created_at: entry.created_at,
            })
            .collect(),
    }))
}

/// Removes artifacts older than the retention window.
async fn cleanup(
    State(export_service): State<ExportService>,
    AuthState(_claims): AuthState,
) -> Result<Json<AckResponse>> {
    let removed = export_service.cleanup_expired().await?;

    tracing::info!(target: TRACING_TARGET, removed, "export cleanup completed");

    Ok(Json(AckResponse::new("Cleanup completed successfully")))
}

/// Returns a [`Router`] with all related routes.
pub fn routes() -> Router<ServiceState> {
    Router::new()
        .route("/export/pdf/{id}", post(export_pdf))
        .route("/export/pdf/{id}/flashcards", post(export_flashcards))
        .route("/export/pdf/{id}/quiz", post(export_quiz))
        .route("/export/batch", post(export_batch))
        .route("/export/history", get(export_history))
        .route("/export/cleanup", post(cleanup))
        .route("/export/download/{filename}", get(download))
        .route("/export/{filename}", delete(delete_export))
}
