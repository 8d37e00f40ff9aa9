//! The run index: which table files the latest run produced.
//!
//! A two-column CSV of `role,path` rows. Extraction writes it; reporting
//! reads it to find its inputs.

use std::path::{Path, PathBuf};

use polytube_core::VideoRef;
use serde::{Deserialize, Serialize};

use crate::aggregate::ReportData;
use crate::error::ReportError;
use crate::tables::{read_rows, write_rows, CommentRow, VideoStatsRow};

const ROLE_VIDEOS: &str = "videos";
const ROLE_COMMENTS: &str = "comments";
const ROLE_STATS: &str = "stats";

#[derive(Debug, Serialize, Deserialize)]
struct IndexRow {
    role: String,
    path: String,
}

/// Table files of one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunIndex {
    pub videos: PathBuf,
    pub comments: PathBuf,
    /// Absent in indexes that predate the statistics table.
    pub stats: Option<PathBuf>,
}

impl RunIndex {
    /// Write the index to `path`.
    ///
    /// # Errors
    ///
    /// Propagates [`write_rows`] failures.
    pub fn write(&self, path: &Path) -> Result<(), ReportError> {
        let mut rows = vec![
            IndexRow {
                role: ROLE_VIDEOS.to_string(),
                path: self.videos.display().to_string(),
            },
            IndexRow {
                role: ROLE_COMMENTS.to_string(),
                path: self.comments.display().to_string(),
            },
        ];
        if let Some(stats) = &self.stats {
            rows.push(IndexRow {
                role: ROLE_STATS.to_string(),
                path: stats.display().to_string(),
            });
        }
        write_rows(path, &rows)
    }

    /// Read an index written by [`RunIndex::write`]. Unknown roles are
    /// ignored.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::MissingIndexRole`] when the videos or comments
    /// entry is absent, or a read error.
    pub fn read(path: &Path) -> Result<Self, ReportError> {
        let rows: Vec<IndexRow> = read_rows(path)?;
        let mut videos = None;
        let mut comments = None;
        let mut stats = None;
        for row in rows {
            let slot = match row.role.trim() {
                ROLE_VIDEOS => &mut videos,
                ROLE_COMMENTS => &mut comments,
                ROLE_STATS => &mut stats,
                other => {
                    tracing::debug!(role = other, "ignoring unknown run index role");
                    continue;
                }
            };
            *slot = Some(PathBuf::from(row.path.trim()));
        }

        let missing = |role: &str| ReportError::MissingIndexRole {
            path: path.display().to_string(),
            role: role.to_string(),
        };
        Ok(Self {
            videos: videos.ok_or_else(|| missing(ROLE_VIDEOS))?,
            comments: comments.ok_or_else(|| missing(ROLE_COMMENTS))?,
            stats,
        })
    }

    /// Load every table the index points at.
    ///
    /// # Errors
    ///
    /// Returns the first table read failure.
    pub fn load(&self) -> Result<ReportData, ReportError> {
        let videos: Vec<VideoRef> = read_rows(&self.videos)?;
        let comments: Vec<CommentRow> = read_rows(&self.comments)?;
        let stats: Vec<VideoStatsRow> = match &self.stats {
            Some(path) => read_rows(path)?,
            None => Vec::new(),
        };
        tracing::info!(
            videos = videos.len(),
            comments = comments.len(),
            stats = stats.len(),
            "report inputs loaded"
        );
        Ok(ReportData {
            videos,
            comments,
            stats,
        })
    }
}
