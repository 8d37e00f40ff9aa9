//! CSV tables exchanged between the pipeline stages.
//!
//! Column names follow the headers the downstream report reads:
//! `Country, Party, Keyword, VideoID` for discovered videos,
//! `VideoID, UploadDate, LikeCount, ViewCount, Comment, sentiment` for
//! scored comments, plus a per-video statistics table.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, TimeZone};
use polytube_core::VideoStats;
use polytube_sentiment::SentimentScore;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::ReportError;

/// Timestamp format embedded in output file names.
pub const RUN_TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";

/// One scored comment, carrying its video's statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommentRow {
    #[serde(rename = "VideoID")]
    pub video_id: String,
    #[serde(rename = "UploadDate")]
    pub upload_date: String,
    #[serde(rename = "LikeCount")]
    pub like_count: u64,
    #[serde(rename = "ViewCount")]
    pub view_count: u64,
    #[serde(rename = "Comment")]
    pub comment: String,
    pub sentiment: SentimentScore,
}

impl CommentRow {
    #[must_use]
    pub fn new(stats: &VideoStats, comment: String, sentiment: SentimentScore) -> Self {
        Self {
            video_id: stats.video_id.clone(),
            upload_date: format_upload_date(stats),
            like_count: stats.like_count,
            view_count: stats.view_count,
            comment,
            sentiment,
        }
    }
}

/// Statistics of one extracted video, written even when it has no comments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoStatsRow {
    #[serde(rename = "VideoID")]
    pub video_id: String,
    #[serde(rename = "UploadDate")]
    pub upload_date: String,
    #[serde(rename = "LikeCount")]
    pub like_count: u64,
    #[serde(rename = "ViewCount")]
    pub view_count: u64,
    #[serde(rename = "CommentCount")]
    pub comment_count: u64,
    /// `ok`, or `failed: <reason>` when the comment fetch failed.
    #[serde(rename = "CommentsStatus")]
    pub comments_status: String,
}

impl VideoStatsRow {
    #[must_use]
    pub fn new(stats: &VideoStats, comments_status: String) -> Self {
        Self {
            video_id: stats.video_id.clone(),
            upload_date: format_upload_date(stats),
            like_count: stats.like_count,
            view_count: stats.view_count,
            comment_count: stats.comment_count,
            comments_status,
        }
    }
}

fn format_upload_date(stats: &VideoStats) -> String {
    stats.published_at.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Parse an `UploadDate` cell.
///
/// Accepts RFC 3339 timestamps as written by extraction as well as plain
/// `YYYY-MM-DD` dates and `YYYY-MM-DD HH:MM:SS` spreadsheet timestamps.
#[must_use]
pub fn parse_upload_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }
    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(dt.date());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}

/// Render the run timestamp used in output file names.
#[must_use]
pub fn run_timestamp<Tz: TimeZone>(now: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    now.format(RUN_TIMESTAMP_FORMAT).to_string()
}

/// `<dir>/<prefix>_<timestamp>.csv`
#[must_use]
pub fn timestamped_file(dir: &Path, prefix: &str, timestamp: &str) -> PathBuf {
    dir.join(format!("{prefix}_{timestamp}.csv"))
}

/// Write `rows` to a CSV file at `path`, creating parent directories.
///
/// # Errors
///
/// Returns [`ReportError::Io`] if the directory cannot be created and
/// [`ReportError::Csv`] if a row cannot be written.
pub fn write_rows<T: Serialize>(path: &Path, rows: &[T]) -> Result<(), ReportError> {
    ensure_parent_dir(path)?;
    let mut writer = csv::Writer::from_path(path).map_err(|e| ReportError::csv(path, e))?;
    for row in rows {
        writer.serialize(row).map_err(|e| ReportError::csv(path, e))?;
    }
    writer.flush().map_err(|e| ReportError::io(path, e))?;
    tracing::info!(file = %path.display(), rows = rows.len(), "table written");
    Ok(())
}

/// Read every row of the CSV file at `path`.
///
/// # Errors
///
/// Returns [`ReportError::Csv`] if the file cannot be opened or a row does
/// not match `T`.
pub fn read_rows<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, ReportError> {
    let mut reader = csv::Reader::from_path(path).map_err(|e| ReportError::csv(path, e))?;
    reader
        .deserialize()
        .collect::<Result<Vec<T>, _>>()
        .map_err(|e| ReportError::csv(path, e))
}

pub(crate) fn ensure_parent_dir(path: &Path) -> Result<(), ReportError> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            fs::create_dir_all(parent).map_err(|e| ReportError::io(parent, e))
        }
        _ => Ok(()),
    }
}
