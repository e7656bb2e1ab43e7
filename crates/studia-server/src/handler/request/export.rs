//! Export request bodies.

use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

/// Body for `POST /export/batch`.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct BatchExportRequest {
    /// Analyses to combine into one document, at most 10.
    #[validate(length(
        min = 1,
        max = 10,
        message = "Between 1 and 10 analysis IDs are required"
    ))]
    pub analysis_ids: Vec<Uuid>,
}
