//! Host-facing plugin contract and registration metadata.

use serde::Serialize;

use crate::notifier::NotifyOutcome;
use crate::trigger::NotificationTrigger;

/// A link shown next to the plugin in the host's plugin list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ResourceLink {
    pub title: &'static str,
    pub url: &'static str,
}

/// Registration metadata describing a notification plugin to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PluginInfo {
    /// Unique plugin identifier.
    pub slug: &'static str,
    /// Display name.
    pub title: &'static str,
    /// Key under which project options are stored.
    pub conf_key: &'static str,
    pub description: &'static str,
    pub version: &'static str,
    pub author: &'static str,
    pub author_url: &'static str,
    pub resource_links: &'static [ResourceLink],
}

/// Metadata of the Wechat robot plugin.
pub const WECHAT_PLUGIN: PluginInfo = PluginInfo {
    slug: "Wechat",
    title: "Wechat",
    conf_key: "Wechat",
    description: "Integrates wechat robot.",
    version: env!("CARGO_PKG_VERSION"),
    author: "jerry hu",
    author_url: "https://github.com/jerryhu1234/sentry-wechat",
    resource_links: &[
        ResourceLink {
            title: "Bug Tracker",
            url: "https://github.com/jerryhu1234/sentry-wechat/issues",
        },
        ResourceLink {
            title: "Source",
            url: "https://github.com/jerryhu1234/sentry-wechat",
        },
        ResourceLink {
            title: "README",
            url: "https://github.com/jerryhu1234/sentry-wechat/blob/master/README.md",
        },
    ],
};

/// Capability contract a host uses to drive a notification plugin.
#[async_trait::async_trait]
pub trait NotificationPlugin: Send + Sync {
    /// Returns the plugin's registration metadata.
    fn info(&self) -> &PluginInfo;

    /// Returns whether the project has the plugin configured.
    fn is_configured(&self, project: &str) -> bool;

    /// Handles one trigger. Never fails; delivery problems are logged.
    async fn notify(&self, trigger: &NotificationTrigger) -> NotifyOutcome;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wechat_plugin_metadata() {
        assert_eq!(WECHAT_PLUGIN.slug, "Wechat");
        assert_eq!(WECHAT_PLUGIN.conf_key, WECHAT_PLUGIN.slug);
        assert_eq!(WECHAT_PLUGIN.version, env!("CARGO_PKG_VERSION"));
        assert_eq!(WECHAT_PLUGIN.resource_links.len(), 3);
    }
}
