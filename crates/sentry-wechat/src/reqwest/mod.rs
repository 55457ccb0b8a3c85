//! Reqwest-based HTTP sender for webhook delivery.
//!
//! This module provides a reqwest-based implementation of the [`WebhookProvider`] trait.
//!
//! # Example
//!
//! ```rust,ignore
//! use sentry_wechat::reqwest::ReqwestClient;
//! use sentry_wechat::{NotifierConfig, WebhookService};
//!
//! let client = ReqwestClient::new(NotifierConfig::default())?;
//!
//! // Convert to a service for dependency injection
//! let service: WebhookService = client.into_service();
//! ```
//!
//! [`WebhookProvider`]: crate::WebhookProvider

mod client;
mod error;

pub use client::ReqwestClient;
pub use error::{Error, Result};

/// Tracing target for reqwest client operations.
pub const TRACING_TARGET: &str = "sentry_wechat::reqwest";
