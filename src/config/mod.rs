//! Client configuration.
//!
//! `ClientConfig` controls the transport target and cache sizing;
//! `LoggingSettings` feeds `infra::telemetry::init`. Both deserialize with
//! full defaults so a host application can configure only what it changes.

use std::num::NonZeroUsize;

use serde::Deserialize;
use url::Url;

// Default values for client configuration
const DEFAULT_BASE_URL: &str = "http://localhost:3000/";
const DEFAULT_POST_SNAPSHOT_LIMIT: usize = 100;
const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 10_000;

/// Configuration for `PostsClient` and the HTTP transport.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL of the posts backend.
    pub base_url: String,
    /// Maximum single-post snapshots kept in the LRU cache.
    pub post_snapshot_limit: usize,
    /// Refetch the list in the background after a successful create,
    /// reconciling the provisional entry with the server-assigned one.
    pub refetch_after_add: bool,
    /// Per-request transport timeout in milliseconds.
    pub request_timeout_ms: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            post_snapshot_limit: DEFAULT_POST_SNAPSHOT_LIMIT,
            refetch_after_add: true,
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
        }
    }
}

impl ClientConfig {
    /// Parse the configured base URL, normalizing to a trailing slash so
    /// joined paths append instead of replacing the last segment.
    pub fn base_url(&self) -> Result<Url, url::ParseError> {
        let raw = if self.base_url.ends_with('/') {
            self.base_url.clone()
        } else {
            format!("{}/", self.base_url)
        };
        Url::parse(&raw)
    }

    /// Returns the snapshot limit as NonZeroUsize, clamping to 1 if zero.
    pub fn post_snapshot_limit_non_zero(&self) -> NonZeroUsize {
        NonZeroUsize::new(self.post_snapshot_limit).unwrap_or(NonZeroUsize::MIN)
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Compact,
    Json,
}

/// Settings for the tracing subscriber installed by `telemetry::init`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Default tracing directive, overridable via `RUST_LOG`.
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Compact,
        }
    }
}
