//! Platform API response types.
//!
//! Only the fields the pipeline reads are modelled; everything else in the
//! response is ignored by serde.

use serde::{Deserialize, Deserializer};

// ---------------------------------------------------------------------------
// search.list
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct SearchListResponse {
    #[serde(default)]
    pub items: Vec<SearchResult>,
}

#[derive(Debug, Deserialize)]
pub struct SearchResult {
    pub id: SearchResultId,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResultId {
    /// Absent for channel or playlist hits.
    #[serde(default)]
    pub video_id: Option<String>,
}

// ---------------------------------------------------------------------------
// videos.list
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct VideoListResponse {
    #[serde(default)]
    pub items: Vec<VideoResource>,
}

#[derive(Debug, Deserialize)]
pub struct VideoResource {
    #[serde(default)]
    pub statistics: VideoStatistics,
    pub snippet: VideoSnippet,
}

/// Counts arrive as decimal strings; each one may be hidden by the uploader.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoStatistics {
    #[serde(default, deserialize_with = "count_field")]
    pub like_count: Option<String>,
    #[serde(default, deserialize_with = "count_field")]
    pub view_count: Option<String>,
    #[serde(default, deserialize_with = "count_field")]
    pub comment_count: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoSnippet {
    pub published_at: String,
}

// ---------------------------------------------------------------------------
// commentThreads.list
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentThreadListResponse {
    #[serde(default)]
    pub items: Vec<CommentThread>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CommentThread {
    pub snippet: CommentThreadSnippet,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentThreadSnippet {
    pub top_level_comment: TopLevelComment,
}

#[derive(Debug, Deserialize)]
pub struct TopLevelComment {
    pub snippet: CommentSnippet,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentSnippet {
    #[serde(default)]
    pub text_display: String,
}

// ---------------------------------------------------------------------------
// error envelope
// ---------------------------------------------------------------------------

/// `{"error": {"code": 403, "message": "...", "errors": [{"reason": "..."}]}}`
#[derive(Debug, Deserialize)]
pub struct ErrorEnvelope {
    pub error: ErrorBody,
}

#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub errors: Vec<ErrorDetail>,
}

#[derive(Debug, Deserialize)]
pub struct ErrorDetail {
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ErrorEnvelope {
    /// Reason code of the first error detail, if any.
    #[must_use]
    pub fn reason(&self) -> Option<&str> {
        self.error.errors.first().and_then(|e| e.reason.as_deref())
    }
}

/// Accept a count as either a JSON string or a JSON number.
fn count_field<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(u64),
    }

    Ok(Option::<Raw>::deserialize(deserializer)?.map(|raw| match raw {
        Raw::Text(s) => s,
        Raw::Number(n) => n.to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statistics_accept_strings_numbers_and_absence() {
        let stats: VideoStatistics =
            serde_json::from_str(r#"{"likeCount": "12", "viewCount": 345}"#).unwrap();
        assert_eq!(stats.like_count.as_deref(), Some("12"));
        assert_eq!(stats.view_count.as_deref(), Some("345"));
        assert!(stats.comment_count.is_none());
    }

    #[test]
    fn search_item_without_video_id_parses() {
        let resp: SearchListResponse = serde_json::from_str(
            r#"{"items": [{"id": {"kind": "youtube#channel", "channelId": "UC1"}}]}"#,
        )
        .unwrap();
        assert!(resp.items[0].id.video_id.is_none());
    }

    #[test]
    fn error_envelope_exposes_first_reason() {
        let env: ErrorEnvelope = serde_json::from_str(
            r#"{"error": {"code": 403, "message": "quota", "errors": [{"reason": "quotaExceeded"}, {"reason": "x"}]}}"#,
        )
        .unwrap();
        assert_eq!(env.reason(), Some("quotaExceeded"));
    }
}
