//! Keyword search across the scheduled channels.
//!
//! Quota exhaustion always stops the stage; any other API failure stops it
//! or skips the channel depending on the configured policy. Whatever was
//! found before a stop is still written, under an `incomplete` name.

use std::path::PathBuf;

use anyhow::Context;
use polytube_core::{AppConfig, ChannelConfig, DiscoveryErrorPolicy, InputFile, VideoRef};
use polytube_report::{run_timestamp, timestamped_file, write_rows};
use polytube_youtube::{YoutubeClient, YoutubeError};

/// Why discovery stopped early.
#[derive(Debug)]
pub(crate) struct DiscoveryHalt {
    pub channel_id: String,
    pub keyword: String,
    pub error: YoutubeError,
}

#[derive(Debug)]
pub(crate) struct DiscoveryOutcome {
    pub videos: Vec<VideoRef>,
    pub halt: Option<DiscoveryHalt>,
}

/// Every (channel, keyword) pair discovery will search, in search order.
pub(crate) fn schedule(input: &InputFile) -> Vec<(&ChannelConfig, &str)> {
    input
        .scheduled_channels()
        .flat_map(|channel| input.keywords.iter().map(move |k| (channel, k.as_str())))
        .collect()
}

/// Search each scheduled channel for each keyword, in input order.
pub(crate) async fn discover(
    client: &YoutubeClient,
    input: &InputFile,
    policy: DiscoveryErrorPolicy,
    max_results: Option<u32>,
) -> DiscoveryOutcome {
    let mut videos = Vec::new();

    'channels: for channel in input.scheduled_channels() {
        for keyword in &input.keywords {
            let result = client
                .search_channel_videos(&channel.api_key, &channel.channel_id, keyword, max_results)
                .await;
            let error = match result {
                Ok(ids) => {
                    tracing::info!(
                        country = %channel.country,
                        party = %channel.party,
                        keyword = %keyword,
                        found = ids.len(),
                        "channel searched"
                    );
                    videos.extend(ids.into_iter().map(|video_id| VideoRef {
                        country: channel.country.clone(),
                        party: channel.party.clone(),
                        keyword: keyword.clone(),
                        video_id,
                    }));
                    continue;
                }
                Err(error) => error,
            };

            if error.is_quota_exceeded() {
                tracing::error!(
                    channel_id = %channel.channel_id,
                    keyword = %keyword,
                    "quota exceeded, stopping discovery"
                );
            } else if policy == DiscoveryErrorPolicy::SkipChannel {
                tracing::warn!(
                    channel_id = %channel.channel_id,
                    keyword = %keyword,
                    error = %error,
                    "search failed, skipping rest of channel"
                );
                continue 'channels;
            } else {
                tracing::error!(
                    channel_id = %channel.channel_id,
                    keyword = %keyword,
                    error = %error,
                    "search failed, stopping discovery"
                );
            }

            return DiscoveryOutcome {
                videos,
                halt: Some(DiscoveryHalt {
                    channel_id: channel.channel_id.clone(),
                    keyword: keyword.clone(),
                    error,
                }),
            };
        }
    }

    DiscoveryOutcome { videos, halt: None }
}

/// Run discovery and persist the videos table.
///
/// Returns the written path, or `None` for a dry run.
///
/// # Errors
///
/// Fails when the input cannot be loaded, the table cannot be written, or
/// discovery halted (after writing the partial table).
pub(crate) async fn run_discover(
    config: &AppConfig,
    dry_run: bool,
) -> anyhow::Result<Option<PathBuf>> {
    let input = polytube_core::load_input(&config.input_path)
        .with_context(|| format!("failed to load input {}", config.input_path.display()))?;

    if dry_run {
        let pairs = schedule(&input);
        println!("dry-run: {} searches scheduled", pairs.len());
        for (channel, keyword) in pairs {
            println!(
                "  {} / {} ({}): {keyword}",
                channel.country, channel.party, channel.channel_id
            );
        }
        return Ok(None);
    }

    let client = crate::build_client(config)?;
    let outcome = discover(
        &client,
        &input,
        config.discovery_error_policy,
        config.search_max_results,
    )
    .await;

    let timestamp = run_timestamp(&chrono::Local::now());
    let prefix = if outcome.halt.is_some() {
        "output_incomplete"
    } else {
        "output_final"
    };
    let path = timestamped_file(&config.data_dir, prefix, &timestamp);
    write_rows(&path, &outcome.videos)
        .with_context(|| format!("failed to write {}", path.display()))?;
    tracing::info!(file = %path.display(), videos = outcome.videos.len(), "videos written");

    if let Some(halt) = outcome.halt {
        anyhow::bail!(
            "discovery halted at channel {} keyword '{}': {}; partial results in {}",
            halt.channel_id,
            halt.keyword,
            halt.error,
            path.display()
        );
    }
    Ok(Some(path))
}

#[cfg(test)]
#[path = "discover_test.rs"]
mod tests;
