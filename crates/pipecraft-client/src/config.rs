//! Analysis client configuration.

use std::time::Duration;

#[cfg(feature = "config")]
use clap::Args;
use serde::{Deserialize, Serialize};
use url::Url;

/// Default base URL of the analysis service.
pub const DEFAULT_ANALYZER_URL: &str = "http://localhost:8000";

/// Default timeout for HTTP requests: 30 seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration for the analysis client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
pub struct AnalyzerConfig {
    /// Base URL of the analysis service
    #[cfg_attr(
        feature = "config",
        arg(long = "analyzer-url", env = "ANALYZER_URL", default_value = DEFAULT_ANALYZER_URL)
    )]
    #[serde(default = "default_analyzer_url")]
    pub analyzer_url: Url,

    /// HTTP request timeout in seconds
    #[cfg_attr(
        feature = "config",
        arg(long = "http-timeout", env = "HTTP_TIMEOUT", default_value = "30")
    )]
    #[serde(default = "default_timeout_secs")]
    pub http_timeout: u64,

    /// User-Agent header to send with requests
    #[cfg_attr(
        feature = "config",
        arg(long = "http-user-agent", env = "HTTP_USER_AGENT")
    )]
    #[serde(default)]
    pub user_agent: Option<String>,
}

fn default_analyzer_url() -> Url {
    Url::parse(DEFAULT_ANALYZER_URL).expect("default analyzer url is valid")
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            analyzer_url: default_analyzer_url(),
            http_timeout: default_timeout_secs(),
            user_agent: None,
        }
    }
}

impl AnalyzerConfig {
    /// Creates a configuration pointing at `analyzer_url`.
    pub fn new(analyzer_url: Url) -> Self {
        Self {
            analyzer_url,
            ..Self::default()
        }
    }

    /// Returns the effective timeout, using default if zero.
    pub fn effective_timeout(&self) -> Duration {
        if self.http_timeout == 0 {
            Duration::from_secs(DEFAULT_TIMEOUT_SECS)
        } else {
            Duration::from_secs(self.http_timeout)
        }
    }

    /// Returns the effective user agent, using default if not set.
    pub fn effective_user_agent(&self) -> String {
        self.user_agent
            .clone()
            .unwrap_or_else(|| format!("pipecraft/{}", env!("CARGO_PKG_VERSION")))
    }

    /// Set the timeout in seconds.
    #[must_use]
    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.http_timeout = timeout_secs;
        self
    }

    /// Set the user agent.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }
}
