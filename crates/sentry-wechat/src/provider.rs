//! Webhook delivery trait and its logging wrapper.

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use uuid::Uuid;

use crate::delivery::DeliveryResult;
use crate::payload::NotificationPayload;
use crate::target::WebhookTarget;
use crate::{Result, TRACING_TARGET_DELIVERY};

/// Core trait for webhook delivery.
///
/// Implementations make exactly one attempt and report HTTP-level failures as
/// a failed [`DeliveryResult`]. An `Err` is reserved for failures that happen
/// before a request could be sent.
#[async_trait::async_trait]
pub trait WebhookProvider: Send + Sync {
    /// Posts `payload` to `target`.
    async fn deliver(
        &self,
        target: &WebhookTarget,
        payload: &NotificationPayload,
    ) -> Result<DeliveryResult>;
}

/// Webhook service wrapper with observability.
///
/// Adds structured logging to any [`WebhookProvider`] and folds provider
/// errors into failed results, so delivery never returns an error.
#[derive(Clone)]
pub struct WebhookService {
    inner: Arc<dyn WebhookProvider>,
}

impl fmt::Debug for WebhookService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WebhookService").finish_non_exhaustive()
    }
}

impl WebhookService {
    /// Create a new webhook service wrapper.
    pub fn new<P>(provider: P) -> Self
    where
        P: WebhookProvider + 'static,
    {
        Self {
            inner: Arc::new(provider),
        }
    }

    /// Delivers `payload` to `target`.
    pub async fn deliver(
        &self,
        target: &WebhookTarget,
        payload: &NotificationPayload,
    ) -> DeliveryResult {
        let started_at = Instant::now();

        let result = match self.inner.deliver(target, payload).await {
            Ok(result) => result,
            Err(error) => {
                tracing::error!(
                    target: TRACING_TARGET_DELIVERY,
                    endpoint = %target,
                    error = %error,
                    "Webhook delivery error"
                );
                DeliveryResult::from_error(Uuid::now_v7(), target.redacted(), &error)
                    .with_duration(started_at.elapsed())
            }
        };

        if result.success {
            tracing::debug!(
                target: TRACING_TARGET_DELIVERY,
                request_id = %result.request_id,
                endpoint = %target,
                status_code = ?result.status_code,
                elapsed_ms = started_at.elapsed().as_millis(),
                "Webhook delivered successfully"
            );
        } else {
            tracing::warn!(
                target: TRACING_TARGET_DELIVERY,
                request_id = %result.request_id,
                endpoint = %target,
                status_code = ?result.status_code,
                failure = ?result.failure,
                error = ?result.error,
                elapsed_ms = started_at.elapsed().as_millis(),
                "Webhook delivery failed"
            );
        }

        result
    }
}
