mod discover;
mod extract;
mod report;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use polytube_core::AppConfig;
use polytube_youtube::YoutubeClient;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "polytube")]
#[command(about = "Keyword video discovery, comment sentiment and engagement reports")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Search every scheduled channel for every keyword
    Discover {
        /// List the channel/keyword schedule without calling the API
        #[arg(long)]
        dry_run: bool,
    },
    /// Fetch statistics and comments of discovered videos and score them
    Extract {
        /// Videos table to extract (defaults to the newest `output_final_*.csv`)
        #[arg(long)]
        videos: Option<PathBuf>,
    },
    /// Aggregate an extraction run into summary tables and charts
    Report {
        /// Run index to read (defaults to `POLYTUBE_INDEX_PATH`)
        #[arg(long)]
        index: Option<PathBuf>,
    },
    /// Discover, extract and report in sequence
    Run,
}

fn init_tracing(default_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

pub(crate) fn build_client(config: &AppConfig) -> anyhow::Result<YoutubeClient> {
    YoutubeClient::with_base_url(
        config.request_timeout_secs,
        &config.user_agent,
        &config.api_base_url,
    )
    .context("failed to build API client")
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = polytube_core::load_app_config().context("failed to load configuration")?;
    init_tracing(&config.log_level);
    tracing::debug!(?config, "configuration loaded");

    match cli.command {
        Some(Commands::Discover { dry_run }) => {
            discover::run_discover(&config, dry_run).await?;
        }
        Some(Commands::Extract { videos }) => {
            extract::run_extract(&config, videos).await?;
        }
        Some(Commands::Report { index }) => {
            report::run_report(&config, index)?;
        }
        Some(Commands::Run) => {
            let videos = discover::run_discover(&config, false).await?;
            let index = extract::run_extract(&config, videos).await?;
            report::run_report(&config, Some(index))?;
        }
        None => println!("no command given; see `polytube --help`"),
    }

    Ok(())
}

#[cfg(test)]
mod tests;
