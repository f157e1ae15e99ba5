//! OrderManager - order lifecycle and inventory consistency
//!
//! # Create Flow
//!
//! ```text
//! create(input, owner)
//!     ├─ 1. Non-empty and per-item profession/tool rules
//!     ├─ 2. Referenced profession/tool/level ids exist
//!     ├─ 3. Storage transaction: order + items, stock check and
//!     │     conditional decrement, owner basket cleared
//!     └─ 4. Hand the committed order to the notifier (never fails the call)
//! ```
//!
//! # Status Lattice
//!
//! `PENDING < ACCEPTED < IN_PROGRESS < COMPLETED`, with `CANCELLED` and
//! `REJECTED` reachable from any non-terminal status. Stock is released
//! exactly once, on the write that moves an order into a terminal status.

mod error;
pub use error::*;

use std::sync::Arc;

use shared::models::{
    LineItem, LineRefs, Order, OrderCreate, OrderDetail, OrderQuery, OrderUpdate, UserRole,
};
use shared::pagination::{Paginated, page_window};

use super::storage::{NewOrder, OrderPatch, OrderStorage, StatusChange};
use crate::notify::{Notifier, OrderNotification};

pub struct OrderManager {
    storage: Arc<dyn OrderStorage>,
    notifier: Option<Notifier>,
}

impl std::fmt::Debug for OrderManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrderManager")
            .field("storage", &"<dyn OrderStorage>")
            .field("notifier", &self.notifier.is_some())
            .finish()
    }
}

impl OrderManager {
    pub fn new(storage: Arc<dyn OrderStorage>, notifier: Option<Notifier>) -> Self {
        Self { storage, notifier }
    }

    /// Validate and store a new order owned by `owner_id`
    pub async fn create(&self, input: OrderCreate, owner_id: i64) -> ManagerResult<OrderDetail> {
        if input.order_products.is_empty() {
            return Err(ManagerError::EmptyOrder);
        }
        for product in &input.order_products {
            product.target().map_err(ManagerError::InvalidItem)?;
        }

        let refs = LineRefs::collect(&input.order_products);
        if !self.storage.refs_exist(&refs).await? {
            return Err(ManagerError::InvalidReferences);
        }

        let order = NewOrder {
            owner_id,
            address: input.address,
            latitude: input.latitude,
            longitude: input.longitude,
            date: input.date.timestamp_millis(),
            total_price: input.total_price,
            payment_type: input.payment_type,
            with_delivery: input.with_delivery,
            delivery_comment: input.delivery_comment,
            products: input.order_products,
        };
        let id = self.storage.create(&order).await?;
        tracing::info!(order_id = id, owner_id, items = order.products.len(), "Order created");

        let detail = self.load(id).await?;
        if let Some(notifier) = &self.notifier {
            notifier.notify(OrderNotification {
                order: detail.order.clone(),
                products: detail.order_products.clone(),
            });
        }
        Ok(detail)
    }

    /// Apply an admin patch: status, master assignments and paid flag
    pub async fn update(&self, id: i64, patch: OrderUpdate) -> ManagerResult<OrderDetail> {
        let current = self
            .storage
            .find(id)
            .await?
            .ok_or(ManagerError::OrderNotFound(id))?;

        if let Some(master_ids) = &patch.master_ids {
            if !self.storage.masters_exist(master_ids).await? {
                return Err(ManagerError::InvalidReferences);
            }
        }

        let status = match patch.status {
            Some(to) if to == current.status => None,
            Some(to) if !current.status.can_transition_to(to) => {
                return Err(ManagerError::InvalidTransition {
                    from: current.status,
                    to,
                });
            }
            Some(to) => Some(StatusChange {
                from: current.status,
                to,
                release: to.is_terminal(),
            }),
            None => None,
        };

        let store_patch = OrderPatch {
            status,
            master_ids: patch.master_ids,
            paid: patch.paid,
        };
        self.storage.apply(id, &store_patch).await?;

        if let Some(change) = status {
            tracing::info!(
                order_id = id,
                from = %change.from,
                to = %change.to,
                released = change.release,
                "Order status changed"
            );
        }
        self.load(id).await
    }

    /// Hard delete. A non-terminal order returns its reserved stock first.
    pub async fn remove(&self, id: i64) -> ManagerResult<()> {
        let current = self
            .storage
            .find(id)
            .await?
            .ok_or(ManagerError::OrderNotFound(id))?;
        let release = !current.status.is_terminal();
        self.storage.delete(id, current.status, release).await?;
        tracing::info!(order_id = id, released = release, "Order deleted");
        Ok(())
    }

    /// Customers only ever see their own orders
    pub async fn find_all(
        &self,
        query: &OrderQuery,
        caller_id: i64,
        caller_role: UserRole,
    ) -> ManagerResult<Paginated<Order>> {
        let owner_scope = caller_role.is_customer().then_some(caller_id);
        let (page, limit, _) = page_window(query.page, query.limit);
        let (orders, total) = self.storage.list(query, owner_scope).await?;
        Ok(Paginated::new(orders, total, page, limit))
    }

    pub async fn find_one(
        &self,
        id: i64,
        caller_id: i64,
        caller_role: UserRole,
    ) -> ManagerResult<OrderDetail> {
        let detail = self.load(id).await?;
        if caller_role.is_customer() && detail.order.owner_id != caller_id {
            return Err(ManagerError::NotOwner);
        }
        Ok(detail)
    }

    async fn load(&self, id: i64) -> ManagerResult<OrderDetail> {
        self.storage
            .find_detail(id)
            .await?
            .ok_or(ManagerError::OrderNotFound(id))
    }
}

#[cfg(test)]
mod tests;
