//! HTTP client for the YouTube Data API v3.

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use url::Url;

use crate::TRACING_TARGET;
use crate::duration::format_duration;
use crate::error::{Error, Result};
use crate::video::{VideoSuggestion, dedupe_by_id};

/// Default API base URL.
const DEFAULT_BASE_URL: &str = "https://www.googleapis.com/youtube/v3/";

/// Default request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);

/// Number of key topics used for a related-video lookup.
const RELATED_TOPIC_LIMIT: usize = 3;

/// Search results fetched per related topic.
const RELATED_PER_TOPIC: u32 = 5;

/// Maximum related videos returned after merge.
const RELATED_RESULT_LIMIT: usize = 12;

/// Maximum educational search results returned.
const EDUCATIONAL_RESULT_LIMIT: usize = 10;

/// Title/channel markers used to filter for educational content.
const EDUCATIONAL_INDICATORS: &[&str] = &[
    "explained",
    "tutorial",
    "lesson",
    "course",
    "learn",
    "education",
    "academy",
    "university",
    "school",
    "crash course",
    "khan academy",
    "ted-ed",
    "mit",
];

/// Configuration for the YouTube HTTP client.
#[derive(Debug, Clone)]
pub struct YoutubeConfig {
    base_url: Url,
    api_key: String,
    timeout: Duration,
}

impl YoutubeConfig {
    /// Creates a configuration with the default base URL.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: Url::parse(DEFAULT_BASE_URL).expect("default base url is valid"),
            api_key: api_key.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Overrides the API base URL (useful for tests and proxies).
    pub fn with_base_url(mut self, base_url: impl AsRef<str>) -> Result<Self> {
        self.base_url = Url::parse(base_url.as_ref())
            .map_err(|e| Error::config(format!("invalid base url '{}': {e}", base_url.as_ref())))?;
        Ok(self)
    }

    /// Overrides the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// HTTP client for the YouTube Data API.
///
/// Cheap to clone; all clones share the same connection pool.
#[derive(Debug, Clone)]
pub struct YoutubeClient {
    http_client: Client,
    config: YoutubeConfig,
}

impl YoutubeClient {
    /// Creates a new client from configuration.
    pub fn new(config: YoutubeConfig) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| Error::config(format!("failed to build http client: {e}")))?;

        tracing::debug!(
            target: TRACING_TARGET,
            base_url = %config.base_url,
            timeout = ?config.timeout,
            "youtube client initialized"
        );

        Ok(Self {
            http_client,
            config,
        })
    }

    /// Searches for videos and resolves their statistics.
    ///
    /// Results are sorted by view count, descending.
    pub async fn search_videos(&self, query: &str, max_results: u32) -> Result<Vec<VideoSuggestion>> {
        let search = self.search(query, max_results).await?;

        let video_ids: Vec<String> = search
            .items
            .iter()
            .filter_map(|item| item.id.video_id.clone())
            .collect();

        if video_ids.is_empty() {
            return Ok(Vec::new());
        }

        let details = self.video_details(&video_ids).await?;

        let mut videos: Vec<VideoSuggestion> = search
            .items
            .into_iter()
            .filter_map(|item| {
                let video_id = item.id.video_id?;
                let snippet = item.snippet?;
                let detail = details.iter().find(|d| d.id == video_id);

                Some(VideoSuggestion {
                    title: snippet.title,
                    thumbnail: snippet
                        .thumbnails
                        .medium
                        .map(|thumb| thumb.url)
                        .unwrap_or_default(),
                    channel_title: snippet.channel_title,
                    views: detail
                        .and_then(|d| d.statistics.as_ref())
                        .and_then(|stats| stats.view_count.parse().ok())
                        .unwrap_or(0),
                    duration: detail
                        .and_then(|d| d.content_details.as_ref())
                        .map(|cd| format_duration(&cd.duration))
                        .unwrap_or_else(|| "0:00".to_string()),
                    video_id,
                })
            })
            .collect();

        videos.sort_by(|a, b| b.views.cmp(&a.views));

        tracing::debug!(
            target: TRACING_TARGET,
            query = %query,
            count = videos.len(),
            "video search complete"
        );

        Ok(videos)
    }

    /// Finds videos related to a list of key topics.
    ///
    /// Searches `"<topic> tutorial explanation"` for the top
    /// [`RELATED_TOPIC_LIMIT`] topics, merges the hits, removes duplicates,
    /// and returns the most-viewed [`RELATED_RESULT_LIMIT`] videos.
    pub async fn related_videos(&self, topics: &[String]) -> Result<Vec<VideoSuggestion>> {
        let mut all_videos = Vec::new();

        for topic in topics.iter().take(RELATED_TOPIC_LIMIT) {
            let query = format!("{topic} tutorial explanation");
            let videos = self.search_videos(&query, RELATED_PER_TOPIC).await?;
            all_videos.extend(videos);
        }

        let mut unique = dedupe_by_id(all_videos);
        unique.sort_by(|a, b| b.views.cmp(&a.views));
        unique.truncate(RELATED_RESULT_LIMIT);

        Ok(unique)
    }

    /// Searches for educational videos on a topic.
    ///
    /// Expands the term into learning-oriented queries, keeps only results
    /// whose title or channel carries an educational marker, and returns the
    /// most-viewed [`EDUCATIONAL_RESULT_LIMIT`] videos.
    pub async fn search_educational(&self, term: &str) -> Result<Vec<VideoSuggestion>> {
        let queries = [
            format!("{term} explained"),
            format!("{term} tutorial"),
            format!("{term} lesson"),
            format!("{term} crash course"),
            format!("learn {term}"),
        ];

        let mut all_videos = Vec::new();
        for query in &queries {
            let videos = self.search_videos(query, 3).await?;
            all_videos.extend(videos);
        }

        let educational: Vec<VideoSuggestion> = all_videos
            .into_iter()
            .filter(|video| {
                let title = video.title.to_lowercase();
                let channel = video.channel_title.to_lowercase();
                EDUCATIONAL_INDICATORS
                    .iter()
                    .any(|marker| title.contains(marker) || channel.contains(marker))
            })
            .collect();

        let mut unique = dedupe_by_id(educational);
        unique.sort_by(|a, b| b.views.cmp(&a.views));
        unique.truncate(EDUCATIONAL_RESULT_LIMIT);

        Ok(unique)
    }

    /// Calls `search.list`.
    async fn search(&self, query: &str, max_results: u32) -> Result<SearchResponse> {
        let mut url = self.join("search")?;
        url.query_pairs_mut()
            .append_pair("part", "id,snippet")
            .append_pair("q", query)
            .append_pair("type", "video")
            .append_pair("maxResults", &max_results.to_string())
            .append_pair("order", "relevance")
            .append_pair("safeSearch", "moderate")
            .append_pair("key", &self.config.api_key);

        self.get_json(url).await
    }

    /// Calls `videos.list` for statistics and content details.
    async fn video_details(&self, video_ids: &[String]) -> Result<Vec<VideoItem>> {
        let mut url = self.join("videos")?;
        url.query_pairs_mut()
            .append_pair("part", "statistics,contentDetails")
            .append_pair("id", &video_ids.join(","))
            .append_pair("key", &self.config.api_key);

        let response: VideosResponse = self.get_json(url).await?;
        Ok(response.items)
    }

    fn join(&self, path: &str) -> Result<Url> {
        self.config
            .base_url
            .join(path)
            .map_err(|e| Error::config(format!("failed to build api url: {e}")))
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: Url) -> Result<T> {
        let response = self.http_client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            tracing::warn!(
                target: TRACING_TARGET,
                status = status.as_u16(),
                "youtube api returned an error"
            );
            return Err(Error::api(status.as_u16(), message));
        }

        Ok(response.json().await?)
    }
}

// Wire types. Field names follow the REST API.

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    id: SearchItemId,
    snippet: Option<Snippet>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchItemId {
    video_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Snippet {
    #[serde(default)]
    title: String,
    #[serde(default)]
    channel_title: String,
    #[serde(default)]
    thumbnails: Thumbnails,
}

#[derive(Debug, Default, Deserialize)]
struct Thumbnails {
    medium: Option<Thumbnail>,
}

#[derive(Debug, Deserialize)]
struct Thumbnail {
    #[serde(default)]
    url: String,
}

#[derive(Debug, Deserialize)]
struct VideosResponse {
    #[serde(default)]
    items: Vec<VideoItem>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VideoItem {
    #[serde(default)]
    id: String,
    statistics: Option<Statistics>,
    content_details: Option<ContentDetails>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Statistics {
    #[serde(default)]
    view_count: String,
}

#[derive(Debug, Deserialize)]
struct ContentDetails {
    #[serde(default)]
    duration: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_response_parses_rest_shape() {
        let response: SearchResponse = serde_json::from_str(
            r#"{
                "items": [{
                    "id": {"videoId": "abc123"},
                    "snippet": {
                        "title": "Photosynthesis explained",
                        "channelTitle": "Bio Academy",
                        "thumbnails": {"medium": {"url": "https://i.ytimg.com/abc.jpg"}}
                    }
                }]
            }"#,
        )
        .expect("parse");

        assert_eq!(response.items.len(), 1);
        assert_eq!(response.items[0].id.video_id.as_deref(), Some("abc123"));
    }

    #[test]
    fn video_details_parse_statistics() {
        let response: VideosResponse = serde_json::from_str(
            r#"{
                "items": [{
                    "id": "abc123",
                    "statistics": {"viewCount": "1024"},
                    "contentDetails": {"duration": "PT4M13S"}
                }]
            }"#,
        )
        .expect("parse");

        let item = &response.items[0];
        assert_eq!(item.statistics.as_ref().unwrap().view_count, "1024");
        assert_eq!(item.content_details.as_ref().unwrap().duration, "PT4M13S");
    }
}
