//! Background notification dispatch.
//!
//! Request handlers hand notifications to a bounded queue and return
//! immediately. A single worker task drains the queue through the configured
//! `Notifier`. Delivery failures end in the log and are never retried.

use crate::domain::Notification;
use crate::ports::outbound::Notifier;
use std::sync::Arc;
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::task::JoinHandle;
use tracing::{debug, error, warn};

/// Default queue depth.
pub const DEFAULT_QUEUE_CAPACITY: usize = 256;

/// Cloneable handle for enqueueing notifications.
///
/// The worker exits once every handle is dropped and the queue is drained.
#[derive(Clone)]
pub struct NotificationDispatcher {
    tx: mpsc::Sender<Notification>,
}

impl NotificationDispatcher {
    /// Start the worker on the current tokio runtime.
    pub fn spawn(notifier: Arc<dyn Notifier>, capacity: usize) -> (Self, JoinHandle<()>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        let worker = tokio::spawn(run_worker(notifier, rx));
        (Self { tx }, worker)
    }

    /// Enqueue without waiting. Never fails from the caller's point of view.
    pub fn dispatch(&self, notification: Notification) {
        match self.tx.try_send(notification) {
            Ok(()) => {}
            Err(TrySendError::Full(dropped)) => {
                warn!(
                    kind = dropped.kind(),
                    tracking_code = %dropped.tracking_code(),
                    "Notification queue full, dropping notification"
                );
            }
            Err(TrySendError::Closed(dropped)) => {
                warn!(
                    kind = dropped.kind(),
                    tracking_code = %dropped.tracking_code(),
                    "Notification worker stopped, dropping notification"
                );
            }
        }
    }
}

async fn run_worker(notifier: Arc<dyn Notifier>, mut rx: mpsc::Receiver<Notification>) {
    while let Some(notification) = rx.recv().await {
        match notifier.send(&notification).await {
            Ok(()) => debug!(
                kind = notification.kind(),
                tracking_code = %notification.tracking_code(),
                "Notification delivered"
            ),
            Err(e) => error!(
                kind = notification.kind(),
                tracking_code = %notification.tracking_code(),
                error = %e,
                "Notification delivery failed"
            ),
        }
    }
    debug!("Notification worker stopped");
}
