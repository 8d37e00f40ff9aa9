//! Statistics, comments and sentiment for every discovered video.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::Context;
use polytube_core::{AppConfig, VideoRef};
use polytube_report::{
    read_rows, run_timestamp, timestamped_file, write_rows, CommentRow, RunIndex, VideoStatsRow,
};
use polytube_sentiment::SentimentAnalyzer;
use polytube_youtube::YoutubeClient;

#[derive(Debug, Default)]
pub(crate) struct ExtractionOutcome {
    pub comments: Vec<CommentRow>,
    pub stats: Vec<VideoStatsRow>,
    /// Videos whose statistics could not be fetched.
    pub skipped: Vec<String>,
    /// Set when quota ran out; later videos were not attempted.
    pub quota_exhausted: bool,
}

/// Fetch each distinct video once, in first-seen order, and score its
/// non-empty comments.
pub(crate) async fn extract(
    client: &YoutubeClient,
    api_key: &str,
    videos: &[VideoRef],
    analyzer: &SentimentAnalyzer,
) -> ExtractionOutcome {
    let mut outcome = ExtractionOutcome::default();
    let mut seen = HashSet::new();
    let unique: Vec<&str> = videos
        .iter()
        .map(|v| v.video_id.as_str())
        .filter(|id| seen.insert(*id))
        .collect();
    tracing::info!(videos = unique.len(), "extracting videos");

    for video_id in unique {
        let video = match client.fetch_video(api_key, video_id).await {
            Ok(video) => video,
            Err(e) if e.is_quota_exceeded() => {
                tracing::error!(video_id, "quota exceeded, stopping extraction");
                outcome.quota_exhausted = true;
                break;
            }
            Err(e) => {
                tracing::warn!(video_id, error = %e, "statistics fetch failed, skipping video");
                outcome.skipped.push(video_id.to_string());
                continue;
            }
        };

        let before = outcome.comments.len();
        outcome.comments.extend(
            video
                .comments
                .comments()
                .iter()
                .filter(|text| !text.is_empty())
                .map(|text| {
                    CommentRow::new(&video.stats, text.clone(), analyzer.polarity_scores(text))
                }),
        );
        tracing::debug!(
            video_id,
            comments = outcome.comments.len() - before,
            "video extracted"
        );
        outcome
            .stats
            .push(VideoStatsRow::new(&video.stats, video.comments.status_label()));
    }

    outcome
}

/// Newest `<prefix>_<timestamp>.csv` in `dir`; timestamps sort
/// lexicographically.
pub(crate) fn latest_table(dir: &Path, prefix: &str) -> anyhow::Result<PathBuf> {
    let entries =
        std::fs::read_dir(dir).with_context(|| format!("failed to list {}", dir.display()))?;
    let stem = format!("{prefix}_");
    let mut candidates = Vec::new();
    for entry in entries {
        let path = entry?.path();
        let matches = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|name| name.starts_with(&stem) && name.ends_with(".csv"));
        if matches {
            candidates.push(path);
        }
    }
    candidates.sort();
    candidates
        .pop()
        .with_context(|| format!("no {prefix}_*.csv in {}", dir.display()))
}

/// Run extraction over a videos table and write the comment, statistics and
/// index files. Returns the index path.
///
/// # Errors
///
/// Fails on a missing credential, unreadable input, write failures, or
/// quota exhaustion (after writing the partial tables and index).
pub(crate) async fn run_extract(
    config: &AppConfig,
    videos_path: Option<PathBuf>,
) -> anyhow::Result<PathBuf> {
    let api_key = config.require_comments_api_key()?;
    let videos_path = match videos_path {
        Some(path) => path,
        None => latest_table(&config.data_dir, "output_final")?,
    };
    let videos: Vec<VideoRef> = read_rows(&videos_path)
        .with_context(|| format!("failed to read videos {}", videos_path.display()))?;

    let client = crate::build_client(config)?;
    let analyzer = SentimentAnalyzer::new();
    let outcome = extract(&client, api_key, &videos, &analyzer).await;

    let timestamp = run_timestamp(&chrono::Local::now());
    let state = if outcome.quota_exhausted {
        "incomplete"
    } else {
        "final"
    };
    let comments_path =
        timestamped_file(&config.data_dir, &format!("comments_output_{state}"), &timestamp);
    let stats_path = timestamped_file(&config.data_dir, &format!("video_stats_{state}"), &timestamp);
    write_rows(&comments_path, &outcome.comments)?;
    write_rows(&stats_path, &outcome.stats)?;

    let index = RunIndex {
        videos: videos_path,
        comments: comments_path,
        stats: Some(stats_path),
    };
    index.write(&config.index_path)?;
    tracing::info!(
        index = %config.index_path.display(),
        videos = outcome.stats.len(),
        comments = outcome.comments.len(),
        skipped = outcome.skipped.len(),
        "extraction finished"
    );

    if outcome.quota_exhausted {
        anyhow::bail!(
            "quota exhausted after {} videos; partial results indexed in {}",
            outcome.stats.len(),
            config.index_path.display()
        );
    }
    Ok(config.index_path.clone())
}

#[cfg(test)]
#[path = "extract_test.rs"]
mod tests;
