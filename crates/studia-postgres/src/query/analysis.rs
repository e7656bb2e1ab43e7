//! Analysis repository for upload results and their read projections.

use std::collections::HashMap;
use std::future::Future;

use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::error::PgResult;
use crate::model::{Analysis, NewAnalysis, UpdateAnalysis};
use crate::types::{ContentType, OffsetPage, OffsetPagination};
use crate::{PgConnection, schema};

/// Filters for listing analyses.
#[derive(Debug, Clone, Default)]
pub struct AnalysisFilter {
    /// Restrict to one content type.
    pub content_type: Option<ContentType>,
    /// Case-insensitive search over title, summary, and key topics.
    pub search: Option<String>,
}

/// Per-account analysis statistics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnalysisStatistics {
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

/// A key topic with its usage count.
#[derive(Debug, Clone, PartialEq)]
pub struct TopicCount {
    /// Topic name.
    pub name: String,
    /// Number of analyses carrying the topic.
    pub count: i64,
    /// Most recent use.
    pub last_used: jiff::Timestamp,
}

/// Repository for analysis database operations.
pub trait AnalysisRepository {
    /// Creates a new analysis.
    fn create_analysis(
        &mut self,
        analysis: NewAnalysis,
    ) -> impl Future<Output = PgResult<Analysis>> + Send;

    /// Finds an analysis by id, scoped to its owner.
    fn find_analysis(
        &mut self,
        analysis_id: Uuid,
        account_id: Uuid,
    ) -> impl Future<Output = PgResult<Option<Analysis>>> + Send;

    /// Lists analyses for an account, newest first, with filtering and
    /// offset pagination.
    fn list_analyses(
        &mut self,
        account_id: Uuid,
        filter: AnalysisFilter,
        pagination: OffsetPagination,
    ) -> impl Future<Output = PgResult<OffsetPage<Analysis>>> + Send;

    /// Updates an analysis, scoped to its owner.
    fn update_analysis(
        &mut self,
        analysis_id: Uuid,
        account_id: Uuid,
        changes: UpdateAnalysis,
    ) -> impl Future<Output = PgResult<Analysis>> + Send;

    /// Deletes an analysis, scoped to its owner. Chats cascade in the
    /// schema. Returns the deleted row so the caller can remove the stored
    /// image.
    fn delete_analysis(
        &mut self,
        analysis_id: Uuid,
        account_id: Uuid,
    ) -> impl Future<Output = PgResult<Option<Analysis>>> + Send;

    /// Lists stored image paths for an account, used for file cleanup when
    /// the account is deleted.
    fn list_image_paths(
        &mut self,
        account_id: Uuid,
    ) -> impl Future<Output = PgResult<Vec<String>>> + Send;

    /// Computes per-account statistics.
    fn analysis_statistics(
        &mut self,
        account_id: Uuid,
    ) -> impl Future<Output = PgResult<AnalysisStatistics>> + Send;

    /// Returns the account's most used key topics, most frequent first.
    fn popular_topics(
        &mut self,
        account_id: Uuid,
        limit: usize,
    ) -> impl Future<Output = PgResult<Vec<TopicCount>>> + Send;

    /// Lists the account's most recent analyses.
    fn recent_analyses(
        &mut self,
        account_id: Uuid,
        limit: i64,
    ) -> impl Future<Output = PgResult<Vec<Analysis>>> + Send;
}

impl AnalysisRepository for PgConnection {
    async fn create_analysis(&mut self, analysis: NewAnalysis) -> PgResult<Analysis> {
        use schema::analyses;

        let analysis = diesel::insert_into(analyses::table)
            .values(&analysis)
            .returning(Analysis::as_returning())
            .get_result(self)
            .await?;

        Ok(analysis)
    }

    async fn find_analysis(
        &mut self,
        analysis_id: Uuid,
        owner_id: Uuid,
    ) -> PgResult<Option<Analysis>> {
        use schema::analyses::dsl::*;

        let analysis = analyses
            .filter(id.eq(analysis_id))
            .filter(account_id.eq(owner_id))
            .select(Analysis::as_select())
            .first(self)
            .await
            .optional()?;

        Ok(analysis)
    }

    async fn list_analyses(
        &mut self,
        owner_id: Uuid,
        filter: AnalysisFilter,
        pagination: OffsetPagination,
    ) -> PgResult<OffsetPage<Analysis>> {
        use schema::analyses::dsl::*;

        let mut query = analyses.filter(account_id.eq(owner_id)).into_boxed();
        let mut count_query = analyses.filter(account_id.eq(owner_id)).into_boxed();

        if let Some(ct) = filter.content_type {
            query = query.filter(content_type.eq(ct));
            count_query = count_query.filter(content_type.eq(ct));
        }

        if let Some(ref term) = filter.search {
            let pattern = format!("%{term}%");
            query = query.filter(
                title
                    .ilike(pattern.clone())
                    .or(summary.ilike(pattern.clone()))
                    .or(diesel::dsl::sql::<diesel::sql_types::Bool>("key_topics::text ILIKE ")
                        .bind::<diesel::sql_types::Text, _>(pattern.clone())),
            );
            count_query = count_query.filter(
                title
                    .ilike(pattern.clone())
                    .or(summary.ilike(pattern.clone()))
                    .or(diesel::dsl::sql::<diesel::sql_types::Bool>("key_topics::text ILIKE ")
                        .bind::<diesel::sql_types::Text, _>(pattern)),
            );
        }

        let items = query
            .order(updated_at.desc())
            .limit(pagination.limit)
            .offset(pagination.offset)
            .select(Analysis::as_select())
            .load(self)
            .await?;

        let total: i64 = count_query.count().get_result(self).await?;

        Ok(OffsetPage::new(items, total))
    }

    async fn update_analysis(
        &mut self,
        analysis_id: Uuid,
        owner_id: Uuid,
        changes: UpdateAnalysis,
    ) -> PgResult<Analysis> {
        use schema::analyses::dsl::*;

        let analysis = diesel::update(
            analyses
                .filter(id.eq(analysis_id))
                .filter(account_id.eq(owner_id)),
        )
        .set(&changes)
        .returning(Analysis::as_returning())
        .get_result(self)
        .await?;

        Ok(analysis)
    }

    async fn delete_analysis(
        &mut self,
        analysis_id: Uuid,
        owner_id: Uuid,
    ) -> PgResult<Option<Analysis>> {
        use schema::analyses::dsl::*;

        let deleted = diesel::delete(
            analyses
                .filter(id.eq(analysis_id))
                .filter(account_id.eq(owner_id)),
        )
        .returning(Analysis::as_returning())
        .get_result(self)
        .await
        .optional()?;

        Ok(deleted)
    }

    async fn list_image_paths(&mut self, owner_id: Uuid) -> PgResult<Vec<String>> {
        use schema::analyses::dsl::*;

        let paths = analyses
            .filter(account_id.eq(owner_id))
            .select(image_path)
            .load(self)
            .await?;

        Ok(paths)
    }

    async fn analysis_statistics(&mut self, owner_id: Uuid) -> PgResult<AnalysisStatistics> {
        use schema::analyses::dsl::*;

        let rows: Vec<(ContentType, serde_json::Value, serde_json::Value)> = analyses
            .filter(account_id.eq(owner_id))
            .select((content_type, quiz_questions, flashcards))
            .load(self)
            .await?;

        let mut stats = AnalysisStatistics::default();
        for (ct, quiz, cards) in rows {
            stats.total_analyses += 1;
            match ct {
                ContentType::Handwritten => stats.handwritten_count += 1,
                ContentType::Textbook => stats.textbook_count += 1,
                ContentType::Diagram => stats.diagram_count += 1,
            }
            stats.total_quiz_questions += quiz.as_array().map_or(0, Vec::len) as i64;
            stats.total_flashcards += cards.as_array().map_or(0, Vec::len) as i64;
        }

        Ok(stats)
    }

    async fn popular_topics(
        &mut self,
        owner_id: Uuid,
        limit: usize,
    ) -> PgResult<Vec<TopicCount>> {
        use schema::analyses::dsl::*;

        let rows: Vec<(serde_json::Value, jiff_diesel::Timestamp)> = analyses
            .filter(account_id.eq(owner_id))
            .select((key_topics, updated_at))
            .load(self)
            .await?;

        let mut counts: HashMap<String, (i64, jiff::Timestamp)> = HashMap::new();
        for (topics, last_updated) in rows {
            let last_updated: jiff::Timestamp = last_updated.into();
            let Some(topics) = topics.as_array() else {
                continue;
            };
            for topic in topics.iter().filter_map(|t| t.as_str()) {
                let entry = counts
                    .entry(topic.to_string())
                    .or_insert((0, last_updated));
                entry.0 += 1;
                if last_updated > entry.1 {
                    entry.1 = last_updated;
                }
            }
        }

        let mut topics: Vec<TopicCount> = counts
            .into_iter()
            .map(|(name, (count, last_used))| TopicCount {
                name,
                count,
                last_used,
            })
            .collect();
        topics.sort_by(|a, b| b.count.cmp(&a.count).then(b.last_used.cmp(&a.last_used)));
        topics.truncate(limit);

        Ok(topics)
    }

    async fn recent_analyses(&mut self, owner_id: Uuid, limit: i64) -> PgResult<Vec<Analysis>> {
        use schema::analyses::dsl::*;

        let items = analyses
            .filter(account_id.eq(owner_id))
            .order(created_at.desc())
            .limit(limit)
            .select(Analysis::as_select())
            .load(self)
            .await?;

        Ok(items)
    }
}
