//! # Configuration Tests
//!
//! Covers the layering in `get_config`: programmatic defaults, the YAML file
//! with `${VAR}` substitution, and both kinds of environment overrides.
//! Every test touches process-wide environment variables, so they run
//! serially.

use moviesearch::providers::RemoteFailurePolicy;
use moviesearch_server::config::{get_config, ConfigError};
use serde_json::json;
use serial_test::serial;
use std::env;
use tempfile::NamedTempFile;

const ENV_VARS: &[&str] = &[
    "PORT",
    "TMDB_API_KEY",
    "TEST_REMOTE_KEY",
    "MOVIESEARCH_REMOTE__ON_FAILURE",
    "MOVIESEARCH_REMOTE__BASE_URL",
    "MOVIESEARCH_CACHE__TTL_SECS",
    "MOVIESEARCH_LOCAL__TIMEOUT_SECS",
];

/// Clears every environment variable these tests set.
fn clear_env_vars() {
    for var in ENV_VARS {
        env::remove_var(var);
    }
}

/// Writes `value` as YAML to a temporary file kept alive by the caller.
fn write_yaml(value: serde_json::Value) -> NamedTempFile {
    let file = tempfile::Builder::new()
        .suffix(".yml")
        .tempfile()
        .expect("temp file");
    std::fs::write(file.path(), serde_yaml::to_string(&value).expect("yaml")).expect("write");
    file
}

fn minimal_config() -> serde_json::Value {
    json!({
        "local": { "base_url": "http://local.test/movies" },
        "remote": { "base_url": "http://remote.test/search" }
    })
}

#[test]
#[serial]
fn test_bundled_config_loads() {
    clear_env_vars();

    let config = get_config(None).expect("bundled config.yml should load");

    assert_eq!(config.port, 9090);
    assert_eq!(config.remote.on_failure, RemoteFailurePolicy::EmptyPage);
    assert_eq!(config.cache.ttl_secs, 600);
    assert_eq!(config.cache.max_entries, 100);
    assert_eq!(config.circuit_breaker.failure_threshold, 5);
    assert_eq!(config.circuit_breaker.open_secs, 30);
    // `${TMDB_API_KEY}` expands to nothing when unset.
    assert_eq!(config.remote.api_key.as_deref(), Some(""));
}

#[test]
#[serial]
fn test_programmatic_defaults_fill_missing_keys() {
    clear_env_vars();
    let file = write_yaml(minimal_config());

    let config = get_config(file.path().to_str()).expect("minimal config should load");

    assert_eq!(config.port, 9090);
    assert_eq!(config.local.base_url, "http://local.test/movies");
    assert_eq!(config.local.timeout_secs, 3);
    assert_eq!(config.remote.timeout_secs, 5);
    assert_eq!(config.remote.api_key, None);
    assert_eq!(config.remote.on_failure, RemoteFailurePolicy::EmptyPage);
    assert_eq!(config.cache.ttl_secs, 600);
    assert_eq!(config.circuit_breaker.failure_threshold, 5);
}

#[test]
#[serial]
fn test_placeholders_are_substituted_from_environment() {
    clear_env_vars();
    env::set_var("TEST_REMOTE_KEY", "abc123");
    let file = write_yaml(json!({
        "local": { "base_url": "http://local.test/movies" },
        "remote": {
            "base_url": "http://remote.test/search",
            "api_key": "${TEST_REMOTE_KEY}"
        }
    }));

    let config = get_config(file.path().to_str()).expect("config should load");

    assert_eq!(config.remote.api_key.as_deref(), Some("abc123"));
    clear_env_vars();
}

#[test]
#[serial]
fn test_environment_overrides_file_values() {
    clear_env_vars();
    env::set_var("PORT", "9999");
    env::set_var("MOVIESEARCH_REMOTE__ON_FAILURE", "error");
    env::set_var("MOVIESEARCH_REMOTE__BASE_URL", "http://override.test/search");
    env::set_var("MOVIESEARCH_CACHE__TTL_SECS", "5");
    env::set_var("MOVIESEARCH_LOCAL__TIMEOUT_SECS", "1");
    let file = write_yaml(minimal_config());

    let config = get_config(file.path().to_str()).expect("config should load");

    assert_eq!(config.port, 9999);
    assert_eq!(config.remote.on_failure, RemoteFailurePolicy::Error);
    assert_eq!(config.remote.base_url, "http://override.test/search");
    assert_eq!(config.cache.ttl_secs, 5);
    assert_eq!(config.local.timeout().as_secs(), 1);
    clear_env_vars();
}

#[test]
#[serial]
fn test_missing_config_file() {
    clear_env_vars();

    let result = get_config(Some("/nonexistent/moviesearch/config.yml"));

    assert!(matches!(result, Err(ConfigError::NotFound(_))));
}

#[test]
#[serial]
fn test_missing_required_key() {
    clear_env_vars();
    let file = write_yaml(json!({
        "local": { "base_url": "http://local.test/movies" }
    }));

    let result = get_config(file.path().to_str());

    assert!(matches!(result, Err(ConfigError::General(_))));
}
