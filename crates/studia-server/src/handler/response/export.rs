//! Export response types.

use jiff::Timestamp;
use serde::Serialize;

use crate::handler::response::AnalysisSummary;
use crate::service::ExportArtifact;

/// Response for PDF generation endpoints.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportResponse {
    /// Always `true` on success.
    pub success: bool,
    /// Human-readable outcome message.
    pub message: String,
    /// Relative download path of the artifact.
    pub download_url: String,
    /// Artifact filename.
    pub filename: String,
    /// Number of analyses combined, present for batch exports.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analyses_count: Option<usize>,
}

impl ExportResponse {
    /// Builds a response from a rendered artifact.
    pub fn new(message: impl Into<String>, artifact: ExportArtifact) -> Self {
        Self {
            success: true,
            message: message.into(),
            download_url: artifact.download_url,
            filename: artifact.filename,
            analyses_count: None,
        }
    }

    /// Attaches the number of combined analyses.
    pub fn with_count(mut self, count: usize) -> Self {
        self.analyses_count = Some(count);
        self
    }
}

/// One available export artifact.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportEntry {
    /// Artifact filename.
    pub filename: String,
    /// Size in bytes.
    pub size: u64,
    /// When the artifact was written.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Timestamp>,
    /// Relative download path.
    pub download_url: String,
}

/// Response for the export history endpoint.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportHistoryResponse {
    /// Always `true` on success.
    pub success: bool,
    /// Recent analyses that could be exported.
    pub recent_analyses: Vec<AnalysisSummary>,
    /// Artifacts currently available for download.
    pub available_exports: Vec<ExportEntry>,
}
