//! HTTP client for the platform Data API.
//!
//! Wraps `reqwest` with credential handling, typed response
//! deserialization and error classification. Every call takes the API key
//! explicitly because discovery uses a different credential per channel.

use std::time::Duration;

use chrono::{DateTime, Utc};
use polytube_core::VideoStats;
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;

use crate::error::{ApiErrorKind, YoutubeError};
use crate::types::{
    CommentThreadListResponse, ErrorEnvelope, SearchListResponse, VideoListResponse,
};

const DEFAULT_BASE_URL: &str = "https://www.googleapis.com/youtube/v3/";

/// Comment threads requested per page; the endpoint maximum.
pub const COMMENT_PAGE_SIZE: u32 = 100;

/// Client for the platform Data API.
///
/// Use [`YoutubeClient::new`] for production or
/// [`YoutubeClient::with_base_url`] to point at a mock server in tests.
pub struct YoutubeClient {
    client: Client,
    base_url: Url,
}

impl YoutubeClient {
    /// Creates a new client pointed at the production API.
    ///
    /// # Errors
    ///
    /// Returns [`YoutubeError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(timeout_secs: u64, user_agent: &str) -> Result<Self, YoutubeError> {
        Self::with_base_url(timeout_secs, user_agent, DEFAULT_BASE_URL)
    }

    /// Creates a new client with a custom base URL.
    ///
    /// # Errors
    ///
    /// Returns [`YoutubeError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`YoutubeError::InvalidBaseUrl`] if
    /// `base_url` does not parse.
    pub fn with_base_url(
        timeout_secs: u64,
        user_agent: &str,
        base_url: &str,
    ) -> Result<Self, YoutubeError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        // Exactly one trailing slash so `Url::join` appends the endpoint
        // instead of replacing the last path segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| YoutubeError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self { client, base_url })
    }

    /// Searches one channel for videos matching `keyword`.
    ///
    /// Returns the video ids of the first result page only, in the order the
    /// platform ranked them. Hits without a video id are skipped.
    ///
    /// # Errors
    ///
    /// - [`YoutubeError::Api`] on a non-2xx response; check
    ///   [`YoutubeError::is_quota_exceeded`] for quota exhaustion.
    /// - [`YoutubeError::Http`] on network failure.
    /// - [`YoutubeError::Deserialize`] if the response shape is unexpected.
    pub async fn search_channel_videos(
        &self,
        api_key: &str,
        channel_id: &str,
        keyword: &str,
        max_results: Option<u32>,
    ) -> Result<Vec<String>, YoutubeError> {
        let max_results = max_results.map(|n| n.to_string());
        let mut params = vec![
            ("part", "snippet"),
            ("type", "video"),
            ("q", keyword),
            ("channelId", channel_id),
        ];
        if let Some(n) = max_results.as_deref() {
            params.push(("maxResults", n));
        }

        let url = self.build_url("search", api_key, &params);
        let response: SearchListResponse = self
            .get_json(&url, &format!("search(channel={channel_id}, q={keyword})"))
            .await?;

        Ok(response
            .items
            .into_iter()
            .filter_map(|item| item.id.video_id)
            .collect())
    }

    /// Fetches aggregate statistics and the publish timestamp of one video.
    ///
    /// Missing like/view/comment counts default to zero; the publish
    /// timestamp is required.
    ///
    /// # Errors
    ///
    /// - [`YoutubeError::VideoNotFound`] if the response has no items.
    /// - [`YoutubeError::InvalidField`] for a non-numeric count or a
    ///   malformed timestamp.
    /// - [`YoutubeError::Api`], [`YoutubeError::Http`],
    ///   [`YoutubeError::Deserialize`] as for every call.
    pub async fn video_stats(
        &self,
        api_key: &str,
        video_id: &str,
    ) -> Result<VideoStats, YoutubeError> {
        let url = self.build_url(
            "videos",
            api_key,
            &[("part", "statistics,snippet"), ("id", video_id)],
        );
        let response: VideoListResponse = self
            .get_json(&url, &format!("videos(id={video_id})"))
            .await?;

        let video = response
            .items
            .into_iter()
            .next()
            .ok_or_else(|| YoutubeError::VideoNotFound(video_id.to_owned()))?;

        let published_at = DateTime::parse_from_rfc3339(&video.snippet.published_at)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|_| YoutubeError::InvalidField {
                video_id: video_id.to_owned(),
                field: "publishedAt",
                value: video.snippet.published_at.clone(),
            })?;

        let stats = &video.statistics;
        Ok(VideoStats {
            video_id: video_id.to_owned(),
            like_count: parse_count(video_id, "likeCount", stats.like_count.as_deref())?,
            view_count: parse_count(video_id, "viewCount", stats.view_count.as_deref())?,
            comment_count: parse_count(video_id, "commentCount", stats.comment_count.as_deref())?,
            published_at,
        })
    }

    /// Fetches one page of top-level comment texts for a video.
    ///
    /// Returns the texts in response order plus the continuation token for
    /// the next page, if the platform returned one.
    ///
    /// # Errors
    ///
    /// Same as every call; a video with comments turned off yields
    /// [`ApiErrorKind::CommentsDisabled`].
    pub async fn comment_page(
        &self,
        api_key: &str,
        video_id: &str,
        page_token: Option<String>,
    ) -> Result<(Vec<String>, Option<String>), YoutubeError> {
        let page_size = COMMENT_PAGE_SIZE.to_string();
        let mut params = vec![
            ("part", "snippet"),
            ("videoId", video_id),
            ("textFormat", "plainText"),
            ("maxResults", page_size.as_str()),
        ];
        if let Some(token) = page_token.as_deref() {
            params.push(("pageToken", token));
        }

        let url = self.build_url("commentThreads", api_key, &params);
        let response: CommentThreadListResponse = self
            .get_json(&url, &format!("commentThreads(videoId={video_id})"))
            .await?;

        let texts = response
            .items
            .into_iter()
            .map(|thread| thread.snippet.top_level_comment.snippet.text_display)
            .collect();
        Ok((texts, response.next_page_token))
    }

    /// Builds the request URL for `endpoint` with percent-encoded query
    /// parameters; the credential is always the first parameter.
    fn build_url(&self, endpoint: &str, api_key: &str, params: &[(&str, &str)]) -> Url {
        let mut url = self
            .base_url
            .join(endpoint)
            .unwrap_or_else(|_| self.base_url.clone());
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("key", api_key);
            for (k, v) in params {
                pairs.append_pair(k, v);
            }
        }
        url
    }

    /// Sends a GET request and decodes the JSON body into `T`.
    ///
    /// Non-2xx responses are classified through the platform error envelope.
    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &Url,
        context: &str,
    ) -> Result<T, YoutubeError> {
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(api_error(status.as_u16(), &body));
        }

        serde_json::from_str(&body).map_err(|e| YoutubeError::Deserialize {
            context: context.to_owned(),
            source: e,
        })
    }
}

/// Map a failed response body onto [`YoutubeError::Api`].
///
/// Bodies that are not a platform error envelope still produce a
/// classification from the status code alone.
fn api_error(status: u16, body: &str) -> YoutubeError {
    let envelope = serde_json::from_str::<ErrorEnvelope>(body).ok();
    let reason = envelope.as_ref().and_then(ErrorEnvelope::reason);
    let kind = ApiErrorKind::classify(status, reason);
    let message = envelope
        .as_ref()
        .map(|env| {
            if env.error.message.is_empty() {
                env.error
                    .errors
                    .first()
                    .and_then(|e| e.message.clone())
                    .unwrap_or_default()
            } else {
                env.error.message.clone()
            }
        })
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| body.chars().take(200).collect());

    YoutubeError::Api {
        status,
        kind,
        message,
    }
}

/// Parse an optional decimal count; absence means zero.
fn parse_count(video_id: &str, field: &'static str, raw: Option<&str>) -> Result<u64, YoutubeError> {
    match raw {
        None => Ok(0),
        Some(value) => value
            .trim()
            .parse::<u64>()
            .map_err(|_| YoutubeError::InvalidField {
                video_id: video_id.to_owned(),
                field,
                value: value.to_owned(),
            }),
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
