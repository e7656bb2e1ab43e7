//! Analysis request bodies and query parameters.

use serde::Deserialize;
use studia_postgres::query::AnalysisFilter;
use studia_postgres::types::{ContentType, OffsetPagination};
use validator::Validate;

/// Body for `PUT /analysis/{id}/title`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateTitleRequest {
    /// New title.
    #[validate(length(
        min = 3,
        max = 100,
        message = "Title must be between 3 and 100 characters"
    ))]
    pub title: String,
}

/// Query parameters for analysis list endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    /// 1-based page number, defaults to 1.
    pub page: Option<i64>,
    /// Page size, defaults to 10.
    pub limit: Option<i64>,
    /// Restrict to one content type.
    pub content_type: Option<ContentType>,
    /// Case-insensitive search term.
    pub search: Option<String>,
}

impl ListQuery {
    /// Converts to repository pagination.
    pub fn pagination(&self) -> OffsetPagination {
        OffsetPagination::from_page(self.page.unwrap_or(1), self.limit.unwrap_or(10))
    }

    /// Converts to a repository filter.
    pub fn filter(&self) -> AnalysisFilter {
        AnalysisFilter {
            content_type: self.content_type,
            search: self
                .search
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
        }
    }
}

/// Query parameters for `GET /analysis/youtube/search`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct VideoSearchQuery {
    /// Search term, at least 3 characters.
    #[validate(length(
        min = 3,
        message = "Search query must be at least 3 characters long"
    ))]
    pub query: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_first_page_of_ten() {
        let query = ListQuery::default();
        let pagination = query.pagination();
        assert_eq!(pagination.limit, 10);
        assert_eq!(pagination.offset, 0);
    }

    #[test]
    fn blank_search_is_dropped() {
        let query = ListQuery {
            search: Some("   ".to_string()),
            ..Default::default()
        };
        assert!(query.filter().search.is_none());
    }
}
