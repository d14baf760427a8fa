//! Centralized configuration management for eagrab

use anyhow::{Context, Result};
use std::path::PathBuf;
use std::time::Duration;

/// Container listing endpoint; `prefix` and `marker` are appended per request
pub const DEFAULT_LISTING_URL: &str =
    "https://emidatasets.blob.core.windows.net/publicdata?restype=container&comp=list";

/// Stripped from blob URLs when they are shown to the user
pub const DEFAULT_DATASETS_BASE_URL: &str =
    "https://emidatasets.blob.core.windows.net/publicdata/Datasets";

const DEFAULT_USER_AGENT: &str = concat!("eagrab/", env!("CARGO_PKG_VERSION"));

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Blob container listing endpoint
    pub listing_url: String,
    /// Prefix removed from URLs in console output
    pub datasets_base_url: String,
    /// Directory for downloaded files
    pub download_dir: PathBuf,
    /// Upper bound on listing pages fetched per search
    pub max_pages: usize,
    /// HTTP client configuration
    pub http: HttpConfig,
}

/// HTTP client configuration
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Request timeout in seconds
    pub timeout_seconds: u64,
    /// Timeout for binary file downloads in seconds
    pub binary_timeout_seconds: u64,
    /// User agent string
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 30,
            binary_timeout_seconds: 60,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listing_url: DEFAULT_LISTING_URL.to_string(),
            datasets_base_url: DEFAULT_DATASETS_BASE_URL.to_string(),
            download_dir: PathBuf::from("./downloads"),
            max_pages: 10_000,
            http: HttpConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables and defaults
    pub fn from_env() -> Result<Self> {
        let defaults = Config::default();

        let listing_url =
            std::env::var("EAGRAB_LISTING_URL").unwrap_or(defaults.listing_url);

        let datasets_base_url =
            std::env::var("EAGRAB_DATASETS_BASE_URL").unwrap_or(defaults.datasets_base_url);

        let download_dir = std::env::var("EAGRAB_DOWNLOAD_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.download_dir);

        let max_pages = parse_env_var("EAGRAB_MAX_PAGES")?.unwrap_or(defaults.max_pages);

        let http = HttpConfig {
            timeout_seconds: parse_env_var("EAGRAB_HTTP_TIMEOUT_SECONDS")?
                .unwrap_or(defaults.http.timeout_seconds),
            binary_timeout_seconds: parse_env_var("EAGRAB_BINARY_TIMEOUT_SECONDS")?
                .unwrap_or(defaults.http.binary_timeout_seconds),
            user_agent: std::env::var("EAGRAB_USER_AGENT").unwrap_or(defaults.http.user_agent),
        };

        Ok(Config {
            listing_url,
            datasets_base_url,
            download_dir,
            max_pages,
            http,
        })
    }

    /// Get HTTP timeout as Duration
    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http.timeout_seconds)
    }

    /// Get binary download timeout as Duration
    pub fn binary_timeout(&self) -> Duration {
        Duration::from_secs(self.http.binary_timeout_seconds)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        reqwest::Url::parse(&self.listing_url)
            .with_context(|| format!("Invalid listing URL: {}", self.listing_url))?;

        if self.max_pages == 0 {
            return Err(anyhow::anyhow!("EAGRAB_MAX_PAGES must be at least 1"));
        }

        if self.http.timeout_seconds == 0 || self.http.binary_timeout_seconds == 0 {
            return Err(anyhow::anyhow!("HTTP timeouts must be at least 1 second"));
        }

        Ok(())
    }
}

/// Helper function to parse environment variable as a specific type
fn parse_env_var<T>(var_name: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display + Send + Sync + std::error::Error + 'static,
{
    match std::env::var(var_name) {
        Ok(val) => val.parse().map(Some).with_context(|| {
            format!("Failed to parse environment variable {} = '{}'", var_name, val)
        }),
        Err(_) => Ok(None),
    }
}
