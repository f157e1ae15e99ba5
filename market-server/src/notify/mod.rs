//! Order notifications
//!
//! The order manager hands each committed order to a bounded channel. A
//! background [`NotificationWorker`] formats it and delivers it through
//! Telegram when configured, or only logs it otherwise. Delivery never
//! affects the order that triggered it.

mod telegram;
mod worker;

pub use telegram::TelegramClient;
pub use worker::{NotificationWorker, format_message};

use shared::models::{Order, OrderProductDetail};
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

/// Default queue depth between the order manager and the worker
pub const NOTIFICATION_QUEUE_CAPACITY: usize = 256;

/// A committed order with its named line items
#[derive(Debug, Clone)]
pub struct OrderNotification {
    pub order: Order,
    pub products: Vec<OrderProductDetail>,
}

/// Sending half of the notification queue
#[derive(Debug, Clone)]
pub struct Notifier {
    tx: mpsc::Sender<OrderNotification>,
}

impl Notifier {
    /// Create a notifier and the receiver its worker drains
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<OrderNotification>) {
        let (tx, rx) = mpsc::channel(capacity);
        (Self { tx }, rx)
    }

    /// Enqueue without waiting. A full or closed queue drops the message.
    pub fn notify(&self, notification: OrderNotification) {
        let order_id = notification.order.id;
        match self.tx.try_send(notification) {
            Ok(()) => tracing::debug!(order_id, "Order notification queued"),
            Err(TrySendError::Full(_)) => {
                tracing::warn!(order_id, "Notification queue full, dropping order notification")
            }
            Err(TrySendError::Closed(_)) => {
                tracing::warn!(order_id, "Notification worker stopped, dropping order notification")
            }
        }
    }
}
