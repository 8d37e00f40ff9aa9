//! Shared domain types and configuration for the polytube pipeline.

pub mod app_config;
pub mod config;
pub mod input;
pub mod rows;

pub use app_config::{AppConfig, DiscoveryErrorPolicy};
pub use config::load_app_config;
pub use input::{load_input, parse_input, ChannelConfig, InputFile, SKIP_API_KEY_SENTINEL};
pub use rows::{VideoRef, VideoStats};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read input file {path}: {source}")]
    InputFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse input file: {0}")]
    InputFileParse(#[from] serde_yaml::Error),

    #[error("input validation failed: {0}")]
    Validation(String),
}
