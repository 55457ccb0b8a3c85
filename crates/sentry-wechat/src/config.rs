//! Notifier configuration.

use std::time::Duration;

#[cfg(feature = "config")]
use clap::Args;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Default timeout for webhook requests: 3 seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 3;

/// Configuration for the Wechat notifier.
///
/// Passed to the notifier and the HTTP client at construction time; nothing
/// is read from process-wide state after that.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
pub struct NotifierConfig {
    /// Webhook request timeout in seconds
    #[cfg_attr(
        feature = "config",
        arg(long = "wechat-timeout", env = "SENTRY_WECHAT_TIMEOUT", default_value = "3")
    )]
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Verify TLS certificates of webhook endpoints
    #[cfg_attr(
        feature = "config",
        arg(
            long = "wechat-verify-tls",
            env = "SENTRY_WECHAT_VERIFY_TLS",
            default_value_t = true,
            action = clap::ArgAction::Set
        )
    )]
    #[serde(default = "default_verify_tls")]
    pub verify_tls: bool,

    /// User-Agent header to send with webhook requests
    #[cfg_attr(
        feature = "config",
        arg(long = "wechat-user-agent", env = "SENTRY_WECHAT_USER_AGENT")
    )]
    #[serde(default)]
    pub user_agent: Option<String>,
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_verify_tls() -> bool {
    true
}

impl Default for NotifierConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            verify_tls: default_verify_tls(),
            user_agent: None,
        }
    }
}

impl NotifierConfig {
    /// Create a new configuration with the specified timeout.
    pub fn new(timeout_secs: u64) -> Self {
        Self {
            timeout_secs,
            ..Self::default()
        }
    }

    /// Returns the effective timeout, using default if zero.
    pub fn effective_timeout(&self) -> Duration {
        if self.timeout_secs == 0 {
            Duration::from_secs(DEFAULT_TIMEOUT_SECS)
        } else {
            Duration::from_secs(self.timeout_secs)
        }
    }

    /// Returns the effective user agent, using default if not set or empty.
    pub fn effective_user_agent(&self) -> String {
        match self.user_agent.as_deref() {
            Some(agent) if !agent.trim().is_empty() => agent.to_owned(),
            _ => Self::default_user_agent(),
        }
    }

    /// Returns the default user agent string.
    fn default_user_agent() -> String {
        format!("sentry-wechat/{}", env!("CARGO_PKG_VERSION"))
    }

    /// Set the timeout in seconds.
    #[must_use]
    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    /// Enable or disable TLS certificate verification.
    #[must_use]
    pub fn with_verify_tls(mut self, verify_tls: bool) -> Self {
        self.verify_tls = verify_tls;
        self
    }

    /// Set the user agent.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        if let Some(agent) = &self.user_agent
            && agent.chars().any(char::is_control)
        {
            return Err(Error::configuration()
                .with_message("user agent must not contain control characters")
                .with_context("user_agent"));
        }
        Ok(())
    }
}
