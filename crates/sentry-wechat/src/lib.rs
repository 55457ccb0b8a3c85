#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod config;
mod error;
mod provider;

pub mod delivery;
pub mod gate;
pub mod notifier;
pub mod payload;
pub mod plugin;
pub mod store;
pub mod target;
pub mod trigger;

#[cfg(feature = "reqwest")]
#[cfg_attr(docsrs, doc(cfg(feature = "reqwest")))]
pub mod reqwest;

pub use config::{DEFAULT_TIMEOUT_SECS, NotifierConfig};
pub use delivery::{DeliveryResult, FailureKind};
pub use error::{BoxedError, Error, ErrorKind, Result};
pub use gate::{Dispatch, DispatchGate, SuppressReason};
pub use notifier::{NotifyOutcome, WechatNotifier};
pub use payload::NotificationPayload;
pub use plugin::{NotificationPlugin, PluginInfo, WECHAT_PLUGIN};
pub use provider::{WebhookProvider, WebhookService};
pub use store::{MemoryConfigStore, ProjectConfigStore};
pub use target::{URLS_OPTION, WebhookTarget, clean_urls};
pub use trigger::{EventRef, GroupRef, NotificationTrigger, ProjectRef};

/// Tracing target for notification orchestration.
pub const TRACING_TARGET_NOTIFIER: &str = "sentry_wechat::notifier";

/// Tracing target for webhook delivery.
pub const TRACING_TARGET_DELIVERY: &str = "sentry_wechat::delivery";

/// Tracing target for project configuration.
pub const TRACING_TARGET_CONFIG: &str = "sentry_wechat::config";
