//! Rows that flow between pipeline stages.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One search hit: a video found on a tracked channel for one keyword.
///
/// Column names match the discovery output file header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoRef {
    #[serde(rename = "Country")]
    pub country: String,
    #[serde(rename = "Party")]
    pub party: String,
    #[serde(rename = "Keyword")]
    pub keyword: String,
    #[serde(rename = "VideoID")]
    pub video_id: String,
}

/// Aggregate statistics for a single video.
///
/// Counts absent from the platform response are zero; the publish
/// timestamp is always present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoStats {
    pub video_id: String,
    pub like_count: u64,
    pub view_count: u64,
    pub comment_count: u64,
    pub published_at: DateTime<Utc>,
}
