//! Video suggestion type shared with the rest of the platform.

use serde::{Deserialize, Serialize};

/// A suggested educational video.
///
/// This is the shape persisted on an analysis record and returned by the
/// video endpoints, so it is serialized with the platform's camelCase
/// convention.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoSuggestion {
    /// Video title.
    pub title: String,
    /// External video identifier.
    pub video_id: String,
    /// Thumbnail URL (medium resolution).
    pub thumbnail: String,
    /// Channel title.
    pub channel_title: String,
    /// View count at lookup time.
    pub views: u64,
    /// Formatted duration, e.g. `12:34`.
    pub duration: String,
}

/// Removes duplicate videos by id, keeping first occurrences.
pub(crate) fn dedupe_by_id(videos: Vec<VideoSuggestion>) -> Vec<VideoSuggestion> {
    let mut seen = std::collections::HashSet::new();
    videos
        .into_iter()
        .filter(|video| seen.insert(video.video_id.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn video(id: &str, views: u64) -> VideoSuggestion {
        VideoSuggestion {
            title: format!("video {id}"),
            video_id: id.to_string(),
            thumbnail: String::new(),
            channel_title: String::new(),
            views,
            duration: "1:00".to_string(),
        }
    }

    #[test]
    fn dedupe_keeps_first_occurrence() {
        let deduped = dedupe_by_id(vec![video("a", 10), video("b", 5), video("a", 99)]);
        assert_eq!(deduped.len(), 2);
        assert_eq!(deduped[0].views, 10);
    }

    #[test]
    fn serializes_camel_case() {
        let json = serde_json::to_value(video("abc", 1)).expect("serialize");
        assert!(json.get("videoId").is_some());
        assert!(json.get("channelTitle").is_some());
    }
}
