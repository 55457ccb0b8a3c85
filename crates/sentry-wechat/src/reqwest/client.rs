//! Reqwest-based HTTP client for webhook delivery.

use std::sync::Arc;
use std::time::Instant;

use ::reqwest::Client;
use ::reqwest::header::CONTENT_TYPE;
use jiff::Timestamp;
use serde::Deserialize;
use uuid::Uuid;

use super::{Error, TRACING_TARGET};
use crate::delivery::{DeliveryResult, FailureKind};
use crate::payload::NotificationPayload;
use crate::target::WebhookTarget;
use crate::{NotifierConfig, WebhookProvider, WebhookService};

/// Reply body of the Wechat robot API.
#[derive(Debug, Deserialize)]
struct RobotReply {
    errcode: i64,
    #[serde(default)]
    errmsg: Option<String>,
}

/// Inner client that holds the HTTP client and configuration.
struct ReqwestClientInner {
    http: Client,
    config: NotifierConfig,
}

/// Reqwest-based HTTP client posting notification payloads to Wechat robots.
///
/// One POST per call, no retries. The timeout, TLS verification and
/// user agent come from [`NotifierConfig`].
#[derive(Clone)]
pub struct ReqwestClient {
    inner: Arc<ReqwestClientInner>,
}

impl std::fmt::Debug for ReqwestClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReqwestClient")
            .field("config", &self.inner.config)
            .finish_non_exhaustive()
    }
}

impl ReqwestClient {
    /// Creates a new reqwest client with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the HTTP client
    /// cannot be created.
    pub fn new(config: NotifierConfig) -> crate::Result<Self> {
        config.validate()?;

        let timeout = config.effective_timeout();
        let user_agent = config.effective_user_agent();

        tracing::debug!(
            target: TRACING_TARGET,
            timeout_ms = timeout.as_millis(),
            verify_tls = config.verify_tls,
            "Creating reqwest client"
        );

        if !config.verify_tls {
            tracing::warn!(
                target: TRACING_TARGET,
                "TLS certificate verification is disabled for webhook delivery"
            );
        }

        let http = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .danger_accept_invalid_certs(!config.verify_tls)
            .build()
            .map_err(Error::from)?;

        let inner = ReqwestClientInner { http, config };
        Ok(Self {
            inner: Arc::new(inner),
        })
    }

    /// Gets the client configuration.
    pub fn config(&self) -> &NotifierConfig {
        &self.inner.config
    }

    /// Converts this client into a [`WebhookService`] for use with dependency injection.
    pub fn into_service(self) -> WebhookService {
        WebhookService::new(self)
    }

    /// Checks a 2xx reply body for a robot-level rejection.
    fn rejection(body: &str) -> Option<String> {
        let reply: RobotReply = serde_json::from_str(body).ok()?;
        (reply.errcode != 0).then(|| {
            let errmsg = reply.errmsg.unwrap_or_default();
            format!("errcode {}: {errmsg}", reply.errcode)
        })
    }
}

#[async_trait::async_trait]
impl WebhookProvider for ReqwestClient {
    async fn deliver(
        &self,
        target: &WebhookTarget,
        payload: &NotificationPayload,
    ) -> crate::Result<DeliveryResult> {
        let request_id = Uuid::now_v7();
        let started_at = Timestamp::now();
        let started = Instant::now();
        let endpoint = target.redacted();

        tracing::debug!(
            target: TRACING_TARGET,
            request_id = %request_id,
            endpoint = %endpoint,
            "Posting webhook"
        );

        let body = serde_json::to_vec(payload).map_err(Error::from)?;

        let result = self
            .inner
            .http
            .post(target.url().clone())
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await;

        let result = match result {
            Ok(response) => {
                let status = response.status();
                let status_code = status.as_u16();

                if !status.is_success() {
                    let text = response.text().await.unwrap_or_default();
                    DeliveryResult::failure(
                        request_id,
                        endpoint,
                        FailureKind::HttpStatus,
                        format!("HTTP {status_code}"),
                    )
                    .with_status_code(status_code)
                    .with_body(text)
                } else {
                    match response.text().await {
                        Ok(text) => match Self::rejection(&text) {
                            Some(reason) => {
                                let error = crate::Error::external_error().with_message(reason);
                                DeliveryResult::from_error(request_id, endpoint, &error)
                                    .with_status_code(status_code)
                                    .with_body(text)
                            }
                            None => DeliveryResult::success(request_id, endpoint, status_code)
                                .with_body(text),
                        },
                        Err(err) => {
                            let error = crate::Error::from(Error::from(err));
                            DeliveryResult::from_error(request_id, endpoint, &error)
                                .with_status_code(status_code)
                        }
                    }
                }
            }
            Err(err) => {
                let error = crate::Error::from(Error::from(err));
                DeliveryResult::from_error(request_id, endpoint, &error)
            }
        };

        Ok(result
            .with_started_at(started_at)
            .with_duration(started.elapsed()))
    }
}
