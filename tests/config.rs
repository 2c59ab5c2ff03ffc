//! Config file loading: defaults, overrides, and validation errors.

use std::io::Write;
use std::time::Duration;

use job_searcher::config::{load_config_with, Config};
use tempfile::NamedTempFile;

fn write_config(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn test_full_config() {
    let file = write_config(
        r#"
[api]
base_url = "https://jobs.example.com/api"
timeout_secs = 10

[search]
debounce_ms = 150
page_size = 50
prefetch_threshold = 8
"#,
    );
    let config = load_config_with(file.path(), None).unwrap();
    assert_eq!(config.api.base_url, "https://jobs.example.com/api");
    assert_eq!(config.api.timeout(), Duration::from_secs(10));
    assert_eq!(config.search.page_size, 50);

    let controller = config.search.controller_config();
    assert_eq!(controller.debounce, Duration::from_millis(150));
    assert_eq!(controller.prefetch_threshold, 8);
}

#[test]
fn test_minimal_file_uses_defaults() {
    let file = write_config("[api]\nbase_url = \"http://127.0.0.1:8000\"\n");
    let config = load_config_with(file.path(), None).unwrap();
    assert_eq!(config.api.timeout_secs, 30);
    assert_eq!(config.search.debounce_ms, 300);
    assert_eq!(config.search.page_size, 20);
    assert_eq!(config.search.prefetch_threshold, 5);
}

#[test]
fn test_override_replaces_base_url() {
    let file = write_config("[api]\nbase_url = \"http://127.0.0.1:8000\"\n");
    let config =
        load_config_with(file.path(), Some("https://staging.example.com".into())).unwrap();
    assert_eq!(config.api.base_url, "https://staging.example.com");
}

#[test]
fn test_override_is_validated() {
    let file = write_config("[api]\nbase_url = \"http://127.0.0.1:8000\"\n");
    let err = load_config_with(file.path(), Some("localhost".into())).unwrap_err();
    assert!(format!("{:#}", err).contains("api.base_url"));
}

#[test]
fn test_missing_api_section_fails() {
    let file = write_config("[search]\npage_size = 10\n");
    let err = load_config_with(file.path(), None).unwrap_err();
    assert!(err.to_string().contains("Failed to parse config file"));
}

#[test]
fn test_zero_page_size_fails() {
    let file = write_config("[api]\nbase_url = \"http://x.example\"\n[search]\npage_size = 0\n");
    let err = load_config_with(file.path(), None).unwrap_err();
    assert!(err.to_string().contains("page_size"));
}

#[test]
fn test_missing_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_config_with(&dir.path().join("absent.toml"), None).unwrap_err();
    assert!(err.to_string().contains("Failed to read config file"));
}

#[test]
fn test_minimal_config_is_valid() {
    Config::minimal().validate().unwrap();
}
