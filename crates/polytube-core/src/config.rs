use crate::app_config::{AppConfig, DiscoveryErrorPolicy};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but cannot be parsed.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but cannot be parsed.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so tests can feed a `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let optional = |var: &str| -> Option<String> {
        lookup(var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let search_max_results = match optional("POLYTUBE_SEARCH_MAX_RESULTS") {
        Some(raw) => {
            let value = raw
                .parse::<u32>()
                .map_err(|e| ConfigError::InvalidEnvVar {
                    var: "POLYTUBE_SEARCH_MAX_RESULTS".to_string(),
                    reason: e.to_string(),
                })?;
            if !(1..=50).contains(&value) {
                return Err(ConfigError::InvalidEnvVar {
                    var: "POLYTUBE_SEARCH_MAX_RESULTS".to_string(),
                    reason: format!("{value} is outside the accepted range 1..=50"),
                });
            }
            Some(value)
        }
        None => None,
    };

    let input_path = PathBuf::from(or_default("POLYTUBE_INPUT_PATH", "./config/countries.yaml"));
    let data_dir = PathBuf::from(or_default("POLYTUBE_DATA_DIR", "./Data"));
    let reports_dir = PathBuf::from(or_default("POLYTUBE_REPORTS_DIR", "./Results/Reports"));
    let index_path = PathBuf::from(or_default("POLYTUBE_INDEX_PATH", "./data_files.csv"));
    let comments_api_key = optional("POLYTUBE_COMMENTS_API_KEY");
    let api_base_url = or_default(
        "POLYTUBE_API_BASE_URL",
        "https://www.googleapis.com/youtube/v3/",
    );
    let request_timeout_secs = parse_u64("POLYTUBE_REQUEST_TIMEOUT_SECS", "30")?;
    let user_agent = or_default("POLYTUBE_USER_AGENT", "polytube/0.1 (engagement-research)");
    let discovery_error_policy =
        parse_discovery_error_policy(&or_default("POLYTUBE_DISCOVERY_ERROR_POLICY", "halt"))?;
    let font_path = optional("POLYTUBE_FONT_PATH").map(PathBuf::from);
    let log_level = or_default("POLYTUBE_LOG_LEVEL", "info");

    Ok(AppConfig {
        input_path,
        data_dir,
        reports_dir,
        index_path,
        comments_api_key,
        api_base_url,
        request_timeout_secs,
        user_agent,
        search_max_results,
        discovery_error_policy,
        font_path,
        log_level,
    })
}

/// Parse the discovery error policy name.
///
/// # Errors
///
/// Returns `ConfigError::InvalidEnvVar` for anything other than `halt` or
/// `skip-channel`.
fn parse_discovery_error_policy(s: &str) -> Result<DiscoveryErrorPolicy, ConfigError> {
    match s.trim().to_ascii_lowercase().as_str() {
        "halt" => Ok(DiscoveryErrorPolicy::Halt),
        "skip-channel" | "skip_channel" => Ok(DiscoveryErrorPolicy::SkipChannel),
        other => Err(ConfigError::InvalidEnvVar {
            var: "POLYTUBE_DISCOVERY_ERROR_POLICY".to_string(),
            reason: format!("unknown policy '{other}'; expected 'halt' or 'skip-channel'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
