//! Configuration for tenderwatch.
//!
//! Crawl mechanics (page size, retry policy, request identity) are fixed
//! constants; everything a deployment may want to vary lives in
//! [`Settings`], loadable from a TOML file with environment overrides.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use serde::{Deserialize, Serialize};

/// Tenders shown per page of the search listing.
pub const LISTING_PAGE_SIZE: usize = 20;

/// Total fetch attempts before a URL counts as failed.
pub const FETCH_ATTEMPTS: u32 = 3;

/// Fixed delay between fetch attempts (no exponential backoff).
pub const FETCH_RETRY_DELAY: Duration = Duration::from_secs(2);

/// Browser-like identity sent with every request.
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64)";

/// Runtime settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Site root, without a trailing slash.
    pub base_url: String,
    /// Path of the paginated search listing under the site root.
    pub listing_path: String,
    /// Where crawl results are written unless a caller overrides it.
    pub output_path: PathBuf,
    /// HTTP request timeout in seconds.
    pub request_timeout_secs: u64,
    /// Default port for `serve`.
    pub server_port: u16,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: "https://rostender.info".to_string(),
            listing_path: "/extsearch".to_string(),
            output_path: PathBuf::from("tenders.csv"),
            request_timeout_secs: 30,
            server_port: 8000,
        }
    }
}

impl Settings {
    /// Load settings from an optional TOML file, then apply environment
    /// overrides on top.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let mut settings = match path {
            Some(path) => {
                let raw = fs::read_to_string(path)
                    .with_context(|| format!("failed to read config {}", path.display()))?;
                toml::from_str(&raw)
                    .with_context(|| format!("invalid config {}", path.display()))?
            }
            None => Self::default(),
        };
        settings.apply_env();
        Ok(settings)
    }

    fn apply_env(&mut self) {
        if let Ok(v) = env::var("TENDERWATCH_BASE_URL") {
            self.base_url = v;
        }
        if let Ok(v) = env::var("TENDERWATCH_OUTPUT") {
            self.output_path = PathBuf::from(v);
        }
    }

    /// Full URL of the search listing.
    pub fn listing_url(&self) -> String {
        format!("{}{}", self.base_url, self.listing_path)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_settings_point_at_rostender() {
        let settings = Settings::default();
        assert_eq!(settings.listing_url(), "https://rostender.info/extsearch");
        assert_eq!(settings.output_path, PathBuf::from("tenders.csv"));
    }

    #[test]
    fn partial_toml_keeps_defaults_for_the_rest() {
        let settings: Settings =
            toml::from_str("base_url = \"https://example.org\"\nserver_port = 9000\n").unwrap();
        assert_eq!(settings.base_url, "https://example.org");
        assert_eq!(settings.server_port, 9000);
        assert_eq!(settings.listing_path, "/extsearch");
        assert_eq!(settings.request_timeout_secs, 30);
    }

    #[test]
    fn load_without_file_uses_defaults() {
        let settings = Settings::load(None).unwrap();
        assert_eq!(settings.listing_path, "/extsearch");
    }
}
