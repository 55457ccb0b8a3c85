//! Notification orchestrator.

use std::time::Instant;

use futures::future::join_all;

use crate::delivery::DeliveryResult;
use crate::gate::{Dispatch, DispatchGate, SuppressReason};
use crate::payload::NotificationPayload;
use crate::plugin::{NotificationPlugin, PluginInfo, WECHAT_PLUGIN};
use crate::provider::WebhookService;
use crate::store::ProjectConfigStore;
use crate::trigger::NotificationTrigger;
use crate::{NotifierConfig, TRACING_TARGET_NOTIFIER};

/// What happened to one trigger.
#[derive(Debug, Clone)]
pub enum NotifyOutcome {
    /// Nothing was sent.
    Suppressed(SuppressReason),
    /// One result per target, in configuration order.
    Dispatched(Vec<DeliveryResult>),
}

impl NotifyOutcome {
    /// Returns the delivery results, empty when suppressed.
    pub fn deliveries(&self) -> &[DeliveryResult] {
        match self {
            Self::Suppressed(_) => &[],
            Self::Dispatched(results) => results,
        }
    }

    /// Returns the suppression reason, if any.
    pub fn suppressed(&self) -> Option<SuppressReason> {
        match self {
            Self::Suppressed(reason) => Some(*reason),
            Self::Dispatched(_) => None,
        }
    }

    /// Number of successful deliveries.
    pub fn succeeded(&self) -> usize {
        self.deliveries().iter().filter(|r| r.success).count()
    }

    /// Number of failed deliveries.
    pub fn failed(&self) -> usize {
        self.deliveries().len() - self.succeeded()
    }
}

/// Sends a Wechat robot message for every qualifying error event.
///
/// Composes the [`DispatchGate`], [`NotificationPayload`] and a
/// [`WebhookService`]. Each trigger is handled on the caller's task; sends to
/// multiple targets run concurrently and independently.
#[derive(Debug, Clone)]
pub struct WechatNotifier<S> {
    gate: DispatchGate<S>,
    service: WebhookService,
    config: NotifierConfig,
}

impl<S> WechatNotifier<S>
where
    S: ProjectConfigStore,
{
    /// Creates a notifier delivering through `service`.
    pub fn new(store: S, service: WebhookService, config: NotifierConfig) -> Self {
        Self {
            gate: DispatchGate::new(store),
            service,
            config,
        }
    }

    /// Creates a notifier delivering through a [`ReqwestClient`] built from `config`.
    ///
    /// [`ReqwestClient`]: crate::reqwest::ReqwestClient
    #[cfg(feature = "reqwest")]
    #[cfg_attr(docsrs, doc(cfg(feature = "reqwest")))]
    pub fn with_reqwest(store: S, config: NotifierConfig) -> crate::Result<Self> {
        let client = crate::reqwest::ReqwestClient::new(config.clone())?;
        Ok(Self::new(store, client.into_service(), config))
    }

    /// Returns the dispatch gate.
    pub fn gate(&self) -> &DispatchGate<S> {
        &self.gate
    }

    /// Returns the notifier configuration.
    pub fn config(&self) -> &NotifierConfig {
        &self.config
    }

    async fn dispatch(&self, trigger: &NotificationTrigger) -> NotifyOutcome {
        let targets = match self.gate.evaluate(trigger) {
            Dispatch::Suppressed(reason) => {
                tracing::debug!(
                    target: TRACING_TARGET_NOTIFIER,
                    project = %trigger.project.slug,
                    event_id = %trigger.event.id,
                    reason = %reason,
                    "Notification suppressed"
                );
                return NotifyOutcome::Suppressed(reason);
            }
            Dispatch::Deliver(targets) => targets,
        };

        let started_at = Instant::now();
        let payload = NotificationPayload::from_trigger(trigger);

        let sends = targets
            .iter()
            .map(|target| self.service.deliver(target, &payload));
        let results = join_all(sends).await;

        let outcome = NotifyOutcome::Dispatched(results);
        tracing::info!(
            target: TRACING_TARGET_NOTIFIER,
            project = %trigger.project.slug,
            event_id = %trigger.event.id,
            targets = targets.len(),
            succeeded = outcome.succeeded(),
            failed = outcome.failed(),
            elapsed_ms = started_at.elapsed().as_millis(),
            "Notification dispatched"
        );

        outcome
    }
}

#[async_trait::async_trait]
impl<S> NotificationPlugin for WechatNotifier<S>
where
    S: ProjectConfigStore,
{
    fn info(&self) -> &PluginInfo {
        &WECHAT_PLUGIN
    }

    fn is_configured(&self, project: &str) -> bool {
        self.gate.is_configured(project)
    }

    async fn notify(&self, trigger: &NotificationTrigger) -> NotifyOutcome {
        self.dispatch(trigger).await
    }
}
