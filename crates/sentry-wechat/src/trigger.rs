//! Inbound notification triggers.

use serde::{Deserialize, Serialize};

/// The project an event was reported to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectRef {
    /// Project slug, used as the configuration key and in the alert title.
    pub slug: String,
}

impl ProjectRef {
    /// Creates a project reference.
    pub fn new(slug: impl Into<String>) -> Self {
        Self { slug: slug.into() }
    }
}

/// The aggregated issue an event belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupRef {
    /// Absolute URL of the group detail page.
    pub url: String,
    /// Whether the group has been muted.
    #[serde(default)]
    pub ignored: bool,
}

impl GroupRef {
    /// Creates a non-ignored group reference.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ignored: false,
        }
    }

    /// Sets the ignored status.
    pub fn with_ignored(mut self, ignored: bool) -> Self {
        self.ignored = ignored;
        self
    }
}

/// One occurrence of an error within a group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRef {
    /// Stable event identifier.
    pub id: String,
    /// Human-readable event message.
    pub message: String,
}

impl EventRef {
    /// Creates an event reference.
    pub fn new(id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            message: message.into(),
        }
    }
}

/// The inbound unit of work: one event occurrence that may warrant a notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationTrigger {
    pub project: ProjectRef,
    pub group: GroupRef,
    pub event: EventRef,
}

impl NotificationTrigger {
    /// Creates a trigger from its parts.
    pub fn new(project: ProjectRef, group: GroupRef, event: EventRef) -> Self {
        Self {
            project,
            group,
            event,
        }
    }

    /// Returns the alert title for this trigger.
    pub fn title(&self) -> String {
        format!("New alert from {}", self.project.slug)
    }

    /// Returns the absolute URL of the event detail page.
    pub fn event_url(&self) -> String {
        let base = &self.group.url;
        let separator = if base.ends_with('/') { "" } else { "/" };
        format!("{base}{separator}events/{}/", self.event.id)
    }
}
