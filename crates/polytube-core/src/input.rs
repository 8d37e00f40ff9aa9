//! Input workbook: the tracked channels and the search keywords.
//!
//! The file mirrors the two sheets the collection team maintains by hand:
//!
//! ```yaml
//! keywords:
//!   - climate change
//! channels:
//!   - country: Germany
//!     party: SPD
//!     channel_id: UC...
//!     api_key: AIza...
//!     todo: "Yes"
//! ```

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Credential placeholder meaning "no key issued for this channel yet".
pub const SKIP_API_KEY_SENTINEL: &str = "NNN";

/// The only `todo` value that schedules a channel for discovery.
const TODO_SCHEDULED: &str = "Yes";

#[derive(Clone, Serialize, Deserialize)]
pub struct ChannelConfig {
    pub country: String,
    pub party: String,
    pub channel_id: String,
    pub api_key: String,
    #[serde(default)]
    pub todo: Option<String>,
}

impl ChannelConfig {
    /// Whether discovery should run for this channel.
    ///
    /// A channel is skipped entirely when its credential is the sentinel
    /// value or its `todo` flag is anything other than exactly `Yes`.
    #[must_use]
    pub fn is_scheduled(&self) -> bool {
        self.api_key != SKIP_API_KEY_SENTINEL && self.todo.as_deref() == Some(TODO_SCHEDULED)
    }
}

impl std::fmt::Debug for ChannelConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChannelConfig")
            .field("country", &self.country)
            .field("party", &self.party)
            .field("channel_id", &self.channel_id)
            .field("api_key", &"[redacted]")
            .field("todo", &self.todo)
            .finish()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct InputFile {
    pub keywords: Vec<String>,
    pub channels: Vec<ChannelConfig>,
}

impl InputFile {
    /// Channels eligible for discovery, in file order.
    pub fn scheduled_channels(&self) -> impl Iterator<Item = &ChannelConfig> {
        self.channels.iter().filter(|c| {
            let scheduled = c.is_scheduled();
            if !scheduled {
                tracing::debug!(
                    country = %c.country,
                    party = %c.party,
                    channel_id = %c.channel_id,
                    "channel not scheduled, skipping"
                );
            }
            scheduled
        })
    }
}

/// Load and validate the input workbook from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_input(path: &Path) -> Result<InputFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::InputFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    parse_input(&content)
}

/// Parse and validate workbook YAML that is already in memory.
///
/// # Errors
///
/// Returns `ConfigError` if the YAML is malformed or fails validation.
pub fn parse_input(content: &str) -> Result<InputFile, ConfigError> {
    let mut input: InputFile = serde_yaml::from_str(content)?;
    for keyword in &mut input.keywords {
        *keyword = keyword.trim().to_string();
    }
    validate_input(&input)?;
    Ok(input)
}

fn validate_input(input: &InputFile) -> Result<(), ConfigError> {
    let mut seen_keywords = HashSet::new();
    for keyword in &input.keywords {
        if keyword.is_empty() {
            return Err(ConfigError::Validation(
                "keywords must be non-empty".to_string(),
            ));
        }
        if !seen_keywords.insert(keyword.to_lowercase()) {
            return Err(ConfigError::Validation(format!(
                "duplicate keyword: '{keyword}'"
            )));
        }
    }

    for (row, channel) in input.channels.iter().enumerate() {
        for (field, value) in [
            ("country", &channel.country),
            ("party", &channel.party),
            ("channel_id", &channel.channel_id),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::Validation(format!(
                    "channel row {} has an empty {field}",
                    row + 1
                )));
            }
        }
    }

    Ok(())
}

#[cfg(test)]
#[path = "input_test.rs"]
mod tests;
