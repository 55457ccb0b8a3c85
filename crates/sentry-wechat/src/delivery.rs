//! Outcome of a single webhook delivery attempt.

use std::time::Duration;

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, IntoStaticStr};
use uuid::Uuid;

use crate::{Error, ErrorKind};

/// Maximum number of response body characters kept on a result.
pub const MAX_BODY_CHARS: usize = 1024;

/// Classification of a failed delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[derive(AsRefStr, Display, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// No response within the configured timeout.
    Timeout,
    /// The connection could not be established.
    Connection,
    /// The endpoint answered with a non-2xx status.
    HttpStatus,
    /// The endpoint answered 2xx but reported a non-zero `errcode`.
    Rejected,
    /// The payload could not be encoded.
    Serialization,
    /// Any other failure.
    Other,
}

impl From<ErrorKind> for FailureKind {
    fn from(kind: ErrorKind) -> Self {
        match kind {
            ErrorKind::Timeout => Self::Timeout,
            ErrorKind::NetworkError => Self::Connection,
            ErrorKind::Serialization => Self::Serialization,
            ErrorKind::ExternalError => Self::Rejected,
            _ => Self::Other,
        }
    }
}

/// Result of posting one payload to one webhook target.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryResult {
    /// Unique identifier of this attempt.
    pub request_id: Uuid,
    /// Target URL with the query string removed.
    pub endpoint: String,
    /// Whether the delivery was successful.
    pub success: bool,
    /// HTTP status code, if a response was received.
    pub status_code: Option<u16>,
    /// Failure classification, if the delivery failed.
    pub failure: Option<FailureKind>,
    /// Error message if delivery failed.
    pub error: Option<String>,
    /// Response body from the endpoint (truncated).
    pub body: Option<String>,
    /// Response time in milliseconds.
    pub response_time_ms: Option<u64>,
    /// When the attempt started.
    pub started_at: Timestamp,
}

impl DeliveryResult {
    fn new(request_id: Uuid, endpoint: impl Into<String>) -> Self {
        Self {
            request_id,
            endpoint: endpoint.into(),
            success: false,
            status_code: None,
            failure: None,
            error: None,
            body: None,
            response_time_ms: None,
            started_at: Timestamp::now(),
        }
    }

    /// Creates a successful delivery result.
    pub fn success(request_id: Uuid, endpoint: impl Into<String>, status_code: u16) -> Self {
        Self {
            success: true,
            status_code: Some(status_code),
            ..Self::new(request_id, endpoint)
        }
    }

    /// Creates a failed delivery result.
    pub fn failure(
        request_id: Uuid,
        endpoint: impl Into<String>,
        failure: FailureKind,
        error: impl Into<String>,
    ) -> Self {
        Self {
            failure: Some(failure),
            error: Some(error.into()),
            ..Self::new(request_id, endpoint)
        }
    }

    /// Creates a failed delivery result from a provider error.
    pub fn from_error(request_id: Uuid, endpoint: impl Into<String>, error: &Error) -> Self {
        Self::failure(request_id, endpoint, error.kind.into(), error.to_string())
    }

    /// Sets the status code.
    pub fn with_status_code(mut self, status_code: u16) -> Self {
        self.status_code = Some(status_code);
        self
    }

    /// Sets the response body, truncated to [`MAX_BODY_CHARS`].
    pub fn with_body(mut self, body: impl AsRef<str>) -> Self {
        self.body = Some(body.as_ref().chars().take(MAX_BODY_CHARS).collect());
        self
    }

    /// Sets the response time.
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.response_time_ms = Some(u64::try_from(duration.as_millis()).unwrap_or(u64::MAX));
        self
    }

    /// Sets the start timestamp.
    pub fn with_started_at(mut self, started_at: Timestamp) -> Self {
        self.started_at = started_at;
        self
    }

    /// Checks whether the failure would be worth retrying.
    ///
    /// Nothing retries automatically; hosts may use this when logging.
    pub fn is_retryable(&self) -> bool {
        if self.success {
            return false;
        }

        match self.failure {
            Some(FailureKind::Timeout | FailureKind::Connection) => true,
            Some(FailureKind::HttpStatus) => self
                .status_code
                .is_some_and(|code| code >= 500 || code == 408 || code == 429),
            _ => false,
        }
    }
}
