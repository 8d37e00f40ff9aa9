use std::path::PathBuf;

/// What discovery does when the platform returns an error that is not
/// quota exhaustion. Quota exhaustion always halts the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DiscoveryErrorPolicy {
    /// Stop the whole run and flush what has been collected so far.
    #[default]
    Halt,
    /// Log the error and skip the remaining keywords for that channel.
    SkipChannel,
}

impl std::fmt::Display for DiscoveryErrorPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DiscoveryErrorPolicy::Halt => write!(f, "halt"),
            DiscoveryErrorPolicy::SkipChannel => write!(f, "skip-channel"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub input_path: PathBuf,
    pub data_dir: PathBuf,
    pub reports_dir: PathBuf,
    pub index_path: PathBuf,
    pub comments_api_key: Option<String>,
    pub api_base_url: String,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub search_max_results: Option<u32>,
    pub discovery_error_policy: DiscoveryErrorPolicy,
    pub font_path: Option<PathBuf>,
    pub log_level: String,
}

impl AppConfig {
    /// The credential used for statistics and comment extraction.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingEnvVar` when `POLYTUBE_COMMENTS_API_KEY`
    /// was not set.
    pub fn require_comments_api_key(&self) -> Result<&str, crate::ConfigError> {
        self.comments_api_key.as_deref().ok_or_else(|| {
            crate::ConfigError::MissingEnvVar("POLYTUBE_COMMENTS_API_KEY".to_string())
        })
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("input_path", &self.input_path)
            .field("data_dir", &self.data_dir)
            .field("reports_dir", &self.reports_dir)
            .field("index_path", &self.index_path)
            .field(
                "comments_api_key",
                &self.comments_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("api_base_url", &self.api_base_url)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("search_max_results", &self.search_max_results)
            .field("discovery_error_policy", &self.discovery_error_policy)
            .field("font_path", &self.font_path)
            .field("log_level", &self.log_level)
            .finish()
    }
}
