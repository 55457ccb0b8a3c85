//! Wechat robot message payloads.
//!
//! The robot endpoint expects exactly:
//!
//! ```json
//! {"msgtype": "markdown", "markdown": {"content": "..."}}
//! ```
//!
//! Field names and nesting must not change.

use serde::{Deserialize, Serialize};

use crate::trigger::NotificationTrigger;

/// Message type discriminator for markdown messages.
pub const MARKDOWN_MSGTYPE: &str = "markdown";

/// Markdown body of a robot message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
pub struct MarkdownBody {
    /// Markdown text, passed to the robot verbatim.
    pub content: String,
}

/// The outbound message posted to each webhook target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
pub struct NotificationPayload {
    msgtype: String,
    markdown: MarkdownBody,
}

impl NotificationPayload {
    /// Builds the alert message for one event.
    ///
    /// The message text is not escaped.
    pub fn markdown(title: &str, message: &str, url: &str) -> Self {
        Self {
            msgtype: MARKDOWN_MSGTYPE.to_owned(),
            markdown: MarkdownBody {
                content: format!("#### {title} \n > {message} [href]({url})"),
            },
        }
    }

    /// Builds the alert message for a trigger.
    pub fn from_trigger(trigger: &NotificationTrigger) -> Self {
        Self::markdown(&trigger.title(), &trigger.event.message, &trigger.event_url())
    }

    /// Returns the message type discriminator.
    pub fn msgtype(&self) -> &str {
        &self.msgtype
    }

    /// Returns the markdown content.
    pub fn content(&self) -> &str {
        &self.markdown.content
    }

    /// Serializes the payload to a JSON body.
    pub fn to_json(&self) -> crate::Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trigger::{EventRef, GroupRef, ProjectRef};

    #[test]
    fn test_markdown_content() {
        let payload = NotificationPayload::markdown(
            "New alert from demo",
            "NullPointerException",
            "https://sentry.example/org/demo/events/42/",
        );

        assert_eq!(payload.msgtype(), "markdown");
        assert_eq!(
            payload.content(),
            "#### New alert from demo \n > NullPointerException [href](https://sentry.example/org/demo/events/42/)"
        );
    }

    #[test]
    fn test_from_trigger() {
        let trigger = NotificationTrigger::new(
            ProjectRef::new("demo"),
            GroupRef::new("https://sentry.example/org/demo/"),
            EventRef::new("42", "NullPointerException"),
        );

        assert_eq!(
            NotificationPayload::from_trigger(&trigger),
            NotificationPayload::markdown(
                "New alert from demo",
                "NullPointerException",
                "https://sentry.example/org/demo/events/42/",
            )
        );
    }

    #[test]
    fn test_message_is_not_escaped() {
        let payload = NotificationPayload::markdown("t", "**bold** <font>[x](y)", "u");
        assert!(payload.content().contains("> **bold** <font>[x](y) [href](u)"));
    }

    #[test]
    fn test_wire_shape() {
        let payload = NotificationPayload::markdown("t", "m", "u");
        let value: serde_json::Value = serde_json::from_slice(&payload.to_json().unwrap()).unwrap();

        assert_eq!(
            value,
            serde_json::json!({
                "msgtype": "markdown",
                "markdown": {"content": "#### t \n > m [href](u)"}
            })
        );

        let parsed: NotificationPayload = serde_json::from_value(value).unwrap();
        assert_eq!(parsed, payload);
    }
}
