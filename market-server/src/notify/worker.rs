//! Notification worker

use std::fmt::Write;

use tokio::sync::mpsc;

use super::OrderNotification;
use super::telegram::TelegramClient;

/// Drains the notification queue until every sender is dropped
pub struct NotificationWorker {
    telegram: Option<TelegramClient>,
}

impl NotificationWorker {
    pub fn new(telegram: Option<TelegramClient>) -> Self {
        Self { telegram }
    }

    pub async fn run(self, mut rx: mpsc::Receiver<OrderNotification>) {
        tracing::info!(
            telegram = self.telegram.is_some(),
            "NotificationWorker started"
        );

        while let Some(notification) = rx.recv().await {
            let order_id = notification.order.id;
            let text = format_message(&notification);
            match &self.telegram {
                Some(client) => match client.send(&text).await {
                    Ok(()) => tracing::info!(order_id, "Order notification delivered"),
                    Err(e) => {
                        tracing::error!(order_id, error = %e, "Order notification failed")
                    }
                },
                None => tracing::info!(order_id, message = %text, "Order notification"),
            }
        }

        tracing::info!("Notification channel closed, shutting down NotificationWorker");
    }
}

/// Plain-text summary of an order and its line items
pub fn format_message(notification: &OrderNotification) -> String {
    let order = &notification.order;
    let date = chrono::DateTime::from_timestamp_millis(order.date)
        .map(|d| d.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| order.date.to_string());

    let mut text = String::new();
    let _ = writeln!(text, "New order #{}", order.id);
    let _ = writeln!(text, "Address: {}", order.address);
    let _ = writeln!(text, "Date: {date}");
    let _ = writeln!(text, "Total: {:.2}", order.total_price);
    let _ = writeln!(text, "Payment: {:?}", order.payment_type);
    if order.with_delivery {
        match &order.delivery_comment {
            Some(comment) => {
                let _ = writeln!(text, "Delivery: yes ({comment})");
            }
            None => {
                let _ = writeln!(text, "Delivery: yes");
            }
        }
    }
    let _ = writeln!(text, "Items:");
    for detail in &notification.products {
        let product = &detail.product;
        let name = if product.tool_id.is_some() {
            detail.tool_name.as_deref().unwrap_or("Unknown tool")
        } else {
            detail.profession_name.as_deref().unwrap_or("Unknown profession")
        };
        let _ = write!(text, "- {name} x{}", product.quantity);
        if let Some(level) = &detail.level_name {
            let _ = write!(text, " [{level}]");
        }
        if let (Some(unit), Some(time)) = (product.time_unit, product.working_time) {
            let _ = write!(text, " {time} {unit:?}");
        }
        let _ = writeln!(text, " = {:.2}", product.price);
    }
    text
}
