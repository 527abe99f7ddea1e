//! # Stock Notifications
//!
//! Outbound queue for stock alerts, drained by a background worker.
//!
//! ## Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Notification Flow                                    │
//! │                                                                         │
//! │  SaleEngine (after commit)                                             │
//! │       │                                                                 │
//! │       │ enqueue(notification)   try_send, never awaits                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │  bounded mpsc channel (notify_queue_capacity)                   │   │
//! │  │  full or closed ──► warn!, notification dropped                 │   │
//! │  └────────────────────────────┬────────────────────────────────────┘   │
//! │                               │                                         │
//! │                               ▼                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │  NotificationWorker (own task)                                  │   │
//! │  │                                                                 │   │
//! │  │  loop select! {                                                 │   │
//! │  │     notification ──► PushGateway::push ──► error! on failure    │   │
//! │  │     shutdown     ──► drain what is queued, exit                 │   │
//! │  │  }                                                              │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                                                         │
//! │  Delivery failures are logged and never retried.                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use kora_core::StockNotification;

// =============================================================================
// Traits
// =============================================================================

/// Accepts stock notifications without blocking the caller.
pub trait Notifier: Send + Sync {
    /// Hands a notification off for delivery. Best effort.
    fn enqueue(&self, notification: StockNotification);
}

/// Delivery failures.
#[derive(Debug, Error)]
pub enum NotifyError {
    /// The push provider refused the message.
    #[error("Push rejected: {0}")]
    Rejected(String),

    /// The push provider could not be reached.
    #[error("Push provider unavailable: {0}")]
    Unavailable(String),
}

/// Delivers one notification to a device.
#[async_trait]
pub trait PushGateway: Send + Sync {
    async fn push(&self, notification: &StockNotification) -> Result<(), NotifyError>;
}

/// Gateway that only logs. Used when no push provider is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingPushGateway;

#[async_trait]
impl PushGateway for LoggingPushGateway {
    async fn push(&self, notification: &StockNotification) -> Result<(), NotifyError> {
        let payload = serde_json::to_string(&notification.event)
            .map_err(|e| NotifyError::Rejected(e.to_string()))?;

        info!(
            push_token = %notification.push_token,
            product_id = %notification.event.product_id,
            payload = %payload,
            "Stock alert"
        );
        Ok(())
    }
}

// =============================================================================
// Queue
// =============================================================================

/// Sending side of the notification channel.
#[derive(Debug, Clone)]
pub struct NotificationQueue {
    tx: mpsc::Sender<StockNotification>,
}

impl Notifier for NotificationQueue {
    fn enqueue(&self, notification: StockNotification) {
        let product_id = notification.event.product_id.clone();

        match self.tx.try_send(notification) {
            Ok(()) => debug!(product_id = %product_id, "Stock notification queued"),
            Err(mpsc::error::TrySendError::Full(_)) => {
                warn!(product_id = %product_id, "Notification queue full - dropping alert");
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                warn!(product_id = %product_id, "Notification worker stopped - dropping alert");
            }
        }
    }
}

// =============================================================================
// Worker
// =============================================================================

/// Drains the notification queue into a [`PushGateway`].
pub struct NotificationWorker {
    gateway: Arc<dyn PushGateway>,
    rx: mpsc::Receiver<StockNotification>,
    shutdown_rx: mpsc::Receiver<()>,
}

/// Handle for stopping the worker.
pub struct NotificationWorkerHandle {
    shutdown_tx: mpsc::Sender<()>,
    task: JoinHandle<()>,
}

impl NotificationWorkerHandle {
    /// Stops the worker after it delivers what is already queued.
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(()).await;
        if let Err(e) = self.task.await {
            error!(error = %e, "Notification worker panicked");
        }
    }
}

impl NotificationWorker {
    /// Spawns the worker and returns the queue feeding it.
    pub fn spawn(
        gateway: Arc<dyn PushGateway>,
        capacity: usize,
    ) -> (NotificationQueue, NotificationWorkerHandle) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        let (shutdown_tx, shutdown_rx) = mpsc::channel(1);

        let worker = NotificationWorker {
            gateway,
            rx,
            shutdown_rx,
        };
        let task = tokio::spawn(worker.run());

        (
            NotificationQueue { tx },
            NotificationWorkerHandle { shutdown_tx, task },
        )
    }

    async fn run(mut self) {
        info!("Notification worker started");

        loop {
            tokio::select! {
                received = self.rx.recv() => match received {
                    Some(notification) => deliver(self.gateway.as_ref(), notification).await,
                    None => break,
                },
                Some(()) = self.shutdown_rx.recv() => {
                    self.rx.close();
                    while let Some(notification) = self.rx.recv().await {
                        deliver(self.gateway.as_ref(), notification).await;
                    }
                    break;
                }
            }
        }

        info!("Notification worker stopped");
    }
}

async fn deliver(gateway: &dyn PushGateway, notification: StockNotification) {
    match gateway.push(&notification).await {
        Ok(()) => debug!(
            product_id = %notification.event.product_id,
            "Stock notification delivered"
        ),
        Err(e) => error!(
            product_id = %notification.event.product_id,
            error = %e,
            "Stock notification delivery failed"
        ),
    }
}
