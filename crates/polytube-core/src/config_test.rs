use std::collections::HashMap;
use std::env::VarError;
use std::path::PathBuf;

use super::*;

fn lookup_from_map<'a>(
    map: &'a HashMap<&'a str, &'a str>,
) -> impl Fn(&str) -> Result<String, VarError> + 'a {
    move |key| {
        map.get(key)
            .map(|v| (*v).to_string())
            .ok_or(VarError::NotPresent)
    }
}

#[test]
fn parse_policy_halt() {
    assert_eq!(
        parse_discovery_error_policy("halt").unwrap(),
        DiscoveryErrorPolicy::Halt
    );
}

#[test]
fn parse_policy_skip_channel_accepts_both_spellings() {
    assert_eq!(
        parse_discovery_error_policy("skip-channel").unwrap(),
        DiscoveryErrorPolicy::SkipChannel
    );
    assert_eq!(
        parse_discovery_error_policy("SKIP_CHANNEL").unwrap(),
        DiscoveryErrorPolicy::SkipChannel
    );
}

#[test]
fn parse_policy_unknown_fails() {
    let err = parse_discovery_error_policy("retry").unwrap_err();
    assert!(
        matches!(err, ConfigError::InvalidEnvVar { ref var, .. } if var == "POLYTUBE_DISCOVERY_ERROR_POLICY")
    );
}

#[test]
fn build_app_config_defaults_with_empty_env() {
    let map: HashMap<&str, &str> = HashMap::new();
    let cfg = build_app_config(lookup_from_map(&map)).expect("defaults should be valid");
    assert_eq!(cfg.input_path, PathBuf::from("./config/countries.yaml"));
    assert_eq!(cfg.data_dir, PathBuf::from("./Data"));
    assert_eq!(cfg.reports_dir, PathBuf::from("./Results/Reports"));
    assert_eq!(cfg.index_path, PathBuf::from("./data_files.csv"));
    assert!(cfg.comments_api_key.is_none());
    assert_eq!(cfg.api_base_url, "https://www.googleapis.com/youtube/v3/");
    assert_eq!(cfg.request_timeout_secs, 30);
    assert_eq!(cfg.user_agent, "polytube/0.1 (engagement-research)");
    assert!(cfg.search_max_results.is_none());
    assert_eq!(cfg.discovery_error_policy, DiscoveryErrorPolicy::Halt);
    assert!(cfg.font_path.is_none());
    assert_eq!(cfg.log_level, "info");
}

#[test]
fn build_app_config_reads_overrides() {
    let mut map = HashMap::new();
    map.insert("POLYTUBE_COMMENTS_API_KEY", "secret");
    map.insert("POLYTUBE_REQUEST_TIMEOUT_SECS", "5");
    map.insert("POLYTUBE_SEARCH_MAX_RESULTS", "25");
    map.insert("POLYTUBE_DISCOVERY_ERROR_POLICY", "skip-channel");
    map.insert("POLYTUBE_FONT_PATH", "/tmp/font.ttf");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.comments_api_key.as_deref(), Some("secret"));
    assert_eq!(cfg.request_timeout_secs, 5);
    assert_eq!(cfg.search_max_results, Some(25));
    assert_eq!(cfg.discovery_error_policy, DiscoveryErrorPolicy::SkipChannel);
    assert_eq!(cfg.font_path, Some(PathBuf::from("/tmp/font.ttf")));
}

#[test]
fn blank_comments_key_is_treated_as_missing() {
    let mut map = HashMap::new();
    map.insert("POLYTUBE_COMMENTS_API_KEY", "   ");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert!(cfg.comments_api_key.is_none());
}

#[test]
fn invalid_timeout_is_rejected() {
    let mut map = HashMap::new();
    map.insert("POLYTUBE_REQUEST_TIMEOUT_SECS", "not-a-number");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "POLYTUBE_REQUEST_TIMEOUT_SECS"),
        "expected InvalidEnvVar(POLYTUBE_REQUEST_TIMEOUT_SECS), got: {result:?}"
    );
}

#[test]
fn search_max_results_out_of_range_is_rejected() {
    let mut map = HashMap::new();
    map.insert("POLYTUBE_SEARCH_MAX_RESULTS", "500");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "POLYTUBE_SEARCH_MAX_RESULTS"),
        "expected InvalidEnvVar(POLYTUBE_SEARCH_MAX_RESULTS), got: {result:?}"
    );
}

#[test]
fn debug_output_redacts_comments_key() {
    let mut map = HashMap::new();
    map.insert("POLYTUBE_COMMENTS_API_KEY", "AIza-very-secret");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    let rendered = format!("{cfg:?}");
    assert!(!rendered.contains("AIza-very-secret"));
    assert!(rendered.contains("[redacted]"));
}

#[test]
fn require_comments_api_key_reports_missing_var() {
    let map: HashMap<&str, &str> = HashMap::new();
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    let err = cfg.require_comments_api_key().unwrap_err();
    assert!(matches!(err, ConfigError::MissingEnvVar(ref v) if v == "POLYTUBE_COMMENTS_API_KEY"));
}
