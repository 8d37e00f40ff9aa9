//! Per-video extraction: statistics plus the full comment list.

use polytube_core::VideoStats;

use crate::client::YoutubeClient;
use crate::error::YoutubeError;
use crate::pagination::collect_pages;

/// Upper bound on comment pages per video (100 comments each).
pub const MAX_COMMENT_PAGES: usize = 1_000;

/// Outcome of fetching a video's comments.
///
/// Keeps "the video has no comments" apart from "the fetch failed" while
/// still letting the run continue in both cases.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommentFetch {
    Fetched(Vec<String>),
    Failed { reason: String },
}

impl CommentFetch {
    /// The fetched comments, or an empty slice if the fetch failed.
    #[must_use]
    pub fn comments(&self) -> &[String] {
        match self {
            CommentFetch::Fetched(comments) => comments,
            CommentFetch::Failed { .. } => &[],
        }
    }

    /// Short status label written to the statistics table.
    #[must_use]
    pub fn status_label(&self) -> String {
        match self {
            CommentFetch::Fetched(_) => "ok".to_string(),
            CommentFetch::Failed { reason } => format!("failed: {reason}"),
        }
    }
}

/// Statistics and comments for one video.
#[derive(Debug, Clone)]
pub struct ExtractedVideo {
    pub stats: VideoStats,
    pub comments: CommentFetch,
}

impl YoutubeClient {
    /// Fetches every top-level comment of a video, following continuation
    /// tokens until the last page.
    ///
    /// # Errors
    ///
    /// Propagates the first page failure; see [`collect_pages`].
    pub async fn all_comments(
        &self,
        api_key: &str,
        video_id: &str,
    ) -> Result<Vec<String>, YoutubeError> {
        collect_pages(video_id, MAX_COMMENT_PAGES, |token| {
            self.comment_page(api_key, video_id, token)
        })
        .await
    }

    /// Fetches statistics and comments for one video.
    ///
    /// A comment failure is recorded in [`CommentFetch::Failed`] and logged;
    /// the statistics are still returned.
    ///
    /// # Errors
    ///
    /// Returns the statistics call's error; comment errors never escape.
    pub async fn fetch_video(
        &self,
        api_key: &str,
        video_id: &str,
    ) -> Result<ExtractedVideo, YoutubeError> {
        let stats = self.video_stats(api_key, video_id).await?;

        let comments = match self.all_comments(api_key, video_id).await {
            Ok(comments) => CommentFetch::Fetched(comments),
            Err(e) => {
                tracing::warn!(
                    video_id,
                    error = %e,
                    "comment fetch failed, continuing with no comments"
                );
                CommentFetch::Failed {
                    reason: e.to_string(),
                }
            }
        };

        Ok(ExtractedVideo { stats, comments })
    }
}
