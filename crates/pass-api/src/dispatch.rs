//! # Notification Dispatch
//!
//! The webhook handler never awaits email delivery. It hands an
//! `AccessNotification` to a supervisor task which runs each send in its own
//! task and logs the outcome. The channel is in-memory only: anything still
//! pending when the process dies is lost.

use pass_core::{AccessNotification, BoxedNotifier, PassResult};
use tokio::sync::mpsc;
use tokio::task::{JoinError, JoinHandle, JoinSet};
use tracing::{debug, error, info};

/// Sending half held by the application state
#[derive(Clone, Debug)]
pub struct NotificationDispatcher {
    tx: mpsc::UnboundedSender<AccessNotification>,
}

impl NotificationDispatcher {
    /// Dispatcher plus the raw receiving half (no supervisor attached)
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<AccessNotification>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    /// Dispatcher wired to a running supervisor.
    ///
    /// The supervisor exits once every dispatcher clone is dropped and all
    /// in-flight sends have finished.
    pub fn spawn(notifier: BoxedNotifier) -> (Self, JoinHandle<()>) {
        let (dispatcher, rx) = Self::channel();
        let handle = tokio::spawn(supervise(rx, notifier));
        (dispatcher, handle)
    }

    /// Queue a send without waiting for it
    pub fn dispatch(&self, notification: AccessNotification) {
        if let Err(e) = self.tx.send(notification) {
            error!(
                recipient = %e.0.recipient,
                "Notification supervisor is gone, access email dropped"
            );
        }
    }
}

/// Run sends as they arrive and log every failure
pub async fn supervise(
    mut rx: mpsc::UnboundedReceiver<AccessNotification>,
    notifier: BoxedNotifier,
) {
    let mut tasks = JoinSet::new();

    loop {
        tokio::select! {
            received = rx.recv() => match received {
                Some(notification) => {
                    let notifier = notifier.clone();
                    tasks.spawn(async move {
                        let result = notifier.send_access_link(&notification).await;
                        (notification, result)
                    });
                }
                None => break,
            },
            Some(joined) = tasks.join_next(), if !tasks.is_empty() => log_outcome(joined),
        }
    }

    while let Some(joined) = tasks.join_next().await {
        log_outcome(joined);
    }

    info!("Notification supervisor stopped");
}

fn log_outcome(joined: Result<(AccessNotification, PassResult<()>), JoinError>) {
    match joined {
        Ok((notification, Ok(()))) => {
            debug!(recipient = %notification.recipient, "Access email delivered");
        }
        Ok((notification, Err(e))) => {
            error!(
                recipient = %notification.recipient,
                session_id = %notification.token,
                "Failed to send access email: {}",
                e
            );
        }
        Err(e) => error!("Access email task aborted: {}", e),
    }
}
