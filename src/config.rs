//! Configuration parsing and validation.
//!
//! Job Searcher reads a TOML file (default `./config/jobs.toml`) with two
//! sections:
//!
//! ```toml
//! [api]
//! base_url = "http://127.0.0.1:8000"
//! timeout_secs = 30
//!
//! [search]
//! debounce_ms = 300
//! page_size = 20
//! prefetch_threshold = 5
//! ```
//!
//! Every key except `api.base_url` has a default. The `JOB_API_BASE_URL`
//! environment variable, when set and non-empty, replaces `api.base_url`.

use anyhow::{bail, Context, Result};
use job_searcher_core::SearchConfig;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Environment variable overriding `api.base_url`.
pub const BASE_URL_ENV: &str = "JOB_API_BASE_URL";

/// Base URL used when neither a config file nor the environment names one.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Config {
    pub api: ApiConfig,
    #[serde(default)]
    pub search: SearchSettings,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    30
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SearchSettings {
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    #[serde(default = "default_prefetch_threshold")]
    pub prefetch_threshold: usize,
}

fn default_debounce_ms() -> u64 {
    300
}
fn default_page_size() -> u32 {
    job_searcher_core::query::DEFAULT_PAGE_SIZE
}
fn default_prefetch_threshold() -> usize {
    job_searcher_core::controller::DEFAULT_PREFETCH_THRESHOLD
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            page_size: default_page_size(),
            prefetch_threshold: default_prefetch_threshold(),
        }
    }
}

impl SearchSettings {
    /// Controller tuning derived from these settings.
    pub fn controller_config(&self) -> SearchConfig {
        SearchConfig {
            debounce: Duration::from_millis(self.debounce_ms),
            prefetch_threshold: self.prefetch_threshold,
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Config {
    /// Defaults for commands that can run without a config file.
    ///
    /// Still honours `JOB_API_BASE_URL`.
    pub fn minimal() -> Self {
        let mut config = Self {
            api: ApiConfig {
                base_url: DEFAULT_BASE_URL.to_string(),
                timeout_secs: default_timeout_secs(),
            },
            search: SearchSettings::default(),
        };
        config.apply_base_url_override(std::env::var(BASE_URL_ENV).ok());
        config
    }

    /// Replace `api.base_url` with `value` when it is present and non-blank.
    pub fn apply_base_url_override(&mut self, value: Option<String>) {
        if let Some(url) = value.map(|v| v.trim().to_string()) {
            if !url.is_empty() {
                self.api.base_url = url;
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        let url = Url::parse(&self.api.base_url)
            .with_context(|| format!("api.base_url is not a valid URL: {}", self.api.base_url))?;
        match url.scheme() {
            "http" | "https" => {}
            other => bail!("api.base_url must use http or https, got '{}'", other),
        }
        if self.api.timeout_secs == 0 {
            bail!("api.timeout_secs must be >= 1");
        }
        if self.search.page_size == 0 {
            bail!("search.page_size must be >= 1");
        }
        if self.search.prefetch_threshold == 0 {
            bail!("search.prefetch_threshold must be >= 1");
        }
        Ok(())
    }
}

/// Load, override from the environment, and validate a config file.
pub fn load_config(path: &Path) -> Result<Config> {
    load_config_with(path, std::env::var(BASE_URL_ENV).ok())
}

/// [`load_config`] with an explicit base URL override instead of the environment.
pub fn load_config_with(path: &Path, base_url_override: Option<String>) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let mut config: Config =
        toml::from_str(&content).with_context(|| "Failed to parse config file")?;

    config.apply_base_url_override(base_url_override);
    config.validate()?;
    Ok(config)
}
