//! Go/no-go decision made before any network call.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, IntoStaticStr};

use crate::store::ProjectConfigStore;
use crate::target::{URLS_OPTION, WebhookTarget, parse_targets};
use crate::trigger::NotificationTrigger;

/// Why a trigger produced no notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[derive(AsRefStr, Display, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum SuppressReason {
    /// The project has no usable webhook URL.
    NotConfigured,
    /// The event's group is muted.
    GroupIgnored,
}

/// Outcome of the dispatch gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    /// Do not notify.
    Suppressed(SuppressReason),
    /// Notify every target; never empty.
    Deliver(Vec<WebhookTarget>),
}

/// Decides, per project and group, whether a notification is attempted.
#[derive(Debug, Clone)]
pub struct DispatchGate<S> {
    store: S,
}

impl<S> DispatchGate<S>
where
    S: ProjectConfigStore,
{
    /// Creates a gate reading options from `store`.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Returns the configuration store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Resolves the webhook targets configured for a project.
    pub fn targets(&self, project: &str) -> Vec<WebhookTarget> {
        self.store
            .get_option(project, URLS_OPTION)
            .map(|value| parse_targets(&value))
            .unwrap_or_default()
    }

    /// Returns whether the project has at least one usable webhook URL.
    pub fn is_configured(&self, project: &str) -> bool {
        !self.targets(project).is_empty()
    }

    /// Decides whether `trigger` should be delivered, and to where.
    pub fn evaluate(&self, trigger: &NotificationTrigger) -> Dispatch {
        let targets = self.targets(&trigger.project.slug);
        if targets.is_empty() {
            return Dispatch::Suppressed(SuppressReason::NotConfigured);
        }

        if trigger.group.ignored {
            return Dispatch::Suppressed(SuppressReason::GroupIgnored);
        }

        Dispatch::Deliver(targets)
    }
}
