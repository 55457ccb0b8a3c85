//! Webhook targets and the project `urls` option.

use std::fmt;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::{Error, Result, TRACING_TARGET_CONFIG};

/// Name of the project option holding the newline-separated webhook URLs.
pub const URLS_OPTION: &str = "urls";

/// One validated webhook destination.
///
/// Always an absolute `http://` or `https://` URL. The robot key travels in the
/// query string, so [`Display`](fmt::Display) prints the URL without it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct WebhookTarget {
    url: Url,
}

impl WebhookTarget {
    /// Parses a single webhook URL.
    pub fn parse(value: &str) -> Result<Self> {
        let value = value.trim();
        if !value.starts_with("http://") && !value.starts_with("https://") {
            return Err(Error::invalid_input()
                .with_message("Not a valid URL.")
                .with_context(value.to_owned()));
        }

        let url = Url::parse(value)
            .map_err(|e| Error::from(e).with_context(value.to_owned()))?;
        if url.host_str().is_none_or(str::is_empty) {
            return Err(Error::invalid_input()
                .with_message("Not a valid URL.")
                .with_context(value.to_owned()));
        }

        Ok(Self { url })
    }

    /// Returns the full URL, including the query string.
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Returns the full URL as a string slice.
    pub fn as_str(&self) -> &str {
        self.url.as_str()
    }

    /// Returns the URL with query and fragment removed, safe for logs.
    pub fn redacted(&self) -> String {
        let mut url = self.url.clone();
        url.set_query(None);
        url.set_fragment(None);
        url.into()
    }
}

impl fmt::Display for WebhookTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.redacted())
    }
}

impl TryFrom<String> for WebhookTarget {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<WebhookTarget> for String {
    fn from(target: WebhookTarget) -> Self {
        target.url.into()
    }
}

/// Iterates over the non-blank, trimmed lines of a `urls` option value.
fn lines(value: &str) -> impl Iterator<Item = &str> {
    value.lines().map(str::trim).filter(|line| !line.is_empty())
}

/// Cleans a `urls` option value before it is saved.
///
/// Blank lines and surrounding whitespace are dropped. Any remaining line that
/// is not an http(s) URL rejects the whole value.
pub fn clean_urls(value: &str) -> Result<String> {
    let cleaned = lines(value)
        .map(|line| WebhookTarget::parse(line).map(|_| line))
        .collect::<Result<Vec<_>>>()?;

    Ok(cleaned.join("\n"))
}

/// Resolves the webhook targets of a stored `urls` option value.
///
/// Invalid lines are skipped with a warning. Every valid line yields one
/// target, in order, so a URL listed twice is posted to twice.
pub fn parse_targets(value: &str) -> Vec<WebhookTarget> {
    let mut targets: Vec<WebhookTarget> = Vec::new();

    for line in lines(value) {
        match WebhookTarget::parse(line) {
            Ok(target) => targets.push(target),
            Err(error) => {
                tracing::warn!(
                    target: TRACING_TARGET_CONFIG,
                    error = %error,
                    "Skipping invalid webhook URL"
                );
            }
        }
    }

    targets
}
