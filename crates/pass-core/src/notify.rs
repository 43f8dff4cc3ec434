//! # Notifier Trait
//!
//! Delivery of the access link to the payer.

use crate::error::PassResult;
use async_trait::async_trait;
use std::sync::Arc;

/// An access link waiting to be sent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessNotification {
    /// Payer email
    pub recipient: String,
    /// Checkout session ID used as the access token
    pub token: String,
}

impl AccessNotification {
    pub fn new(recipient: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            recipient: recipient.into(),
            token: token.into(),
        }
    }
}

/// Sends access-link messages. One attempt per call, no retry.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send_access_link(&self, notification: &AccessNotification) -> PassResult<()>;
}

pub type BoxedNotifier = Arc<dyn Notifier>;
