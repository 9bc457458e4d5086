//! Reqwest transport configuration.

use std::time::Duration;

#[cfg(feature = "config")]
use clap::Args;
use serde::{Deserialize, Serialize};

/// Default timeout for HTTP requests: 30 seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default timeout for establishing a connection: 10 seconds.
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Configuration for the reqwest HTTP transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
pub struct ReqwestConfig {
    /// HTTP request timeout in seconds
    #[cfg_attr(
        feature = "config",
        arg(long = "http-timeout", env = "CLOUDFILES_HTTP_TIMEOUT", default_value = "30")
    )]
    #[serde(default = "default_timeout_secs")]
    pub http_timeout: u64,

    /// Connection timeout in seconds
    #[cfg_attr(
        feature = "config",
        arg(
            long = "http-connect-timeout",
            env = "CLOUDFILES_HTTP_CONNECT_TIMEOUT",
            default_value = "10"
        )
    )]
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout: u64,

    /// User-Agent header to send with requests
    #[cfg_attr(
        feature = "config",
        arg(long = "http-user-agent", env = "CLOUDFILES_HTTP_USER_AGENT")
    )]
    #[serde(default)]
    pub user_agent: Option<String>,
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_connect_timeout_secs() -> u64 {
    DEFAULT_CONNECT_TIMEOUT_SECS
}

impl Default for ReqwestConfig {
    fn default() -> Self {
        Self {
            http_timeout: default_timeout_secs(),
            connect_timeout: default_connect_timeout_secs(),
            user_agent: None,
        }
    }
}

impl ReqwestConfig {
    /// Returns the effective request timeout, using the default if zero.
    pub fn effective_timeout(&self) -> Duration {
        if self.http_timeout == 0 {
            Duration::from_secs(DEFAULT_TIMEOUT_SECS)
        } else {
            Duration::from_secs(self.http_timeout)
        }
    }

    /// Returns the effective connect timeout, using the default if zero.
    pub fn effective_connect_timeout(&self) -> Duration {
        if self.connect_timeout == 0 {
            Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS)
        } else {
            Duration::from_secs(self.connect_timeout)
        }
    }

    /// Returns the effective user agent, using the default if not set.
    pub fn effective_user_agent(&self) -> String {
        self.user_agent
            .clone()
            .unwrap_or_else(Self::default_user_agent)
    }

    fn default_user_agent() -> String {
        format!("cloudfiles/{}", env!("CARGO_PKG_VERSION"))
    }

    /// Set the request timeout in seconds.
    #[must_use]
    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.http_timeout = timeout_secs;
        self
    }

    /// Set the connect timeout in seconds.
    #[must_use]
    pub fn with_connect_timeout(mut self, timeout_secs: u64) -> Self {
        self.connect_timeout = timeout_secs;
        self
    }

    /// Set the user agent.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ReqwestConfig::default();
        assert_eq!(config.http_timeout, 30);
        assert_eq!(config.connect_timeout, 10);
        assert!(config.user_agent.is_none());
    }

    #[test]
    fn test_builder_pattern() {
        let config = ReqwestConfig::default()
            .with_timeout(120)
            .with_connect_timeout(5)
            .with_user_agent("custom-agent/1.0");

        assert_eq!(config.effective_timeout(), Duration::from_secs(120));
        assert_eq!(config.effective_connect_timeout(), Duration::from_secs(5));
        assert_eq!(config.effective_user_agent(), "custom-agent/1.0");
    }

    #[test]
    fn test_effective_values_use_defaults_when_zero() {
        let config = ReqwestConfig::default()
            .with_timeout(0)
            .with_connect_timeout(0);
        assert_eq!(
            config.effective_timeout(),
            Duration::from_secs(DEFAULT_TIMEOUT_SECS)
        );
        assert_eq!(
            config.effective_connect_timeout(),
            Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS)
        );
        assert!(config.effective_user_agent().starts_with("cloudfiles/"));
    }

    #[test]
    fn test_deserialize_defaults() {
        let config: ReqwestConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, ReqwestConfig::default());
    }
}
