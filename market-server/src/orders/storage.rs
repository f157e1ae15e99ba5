//! Order persistence port
//!
//! [`OrderStorage`] is the capability set the order manager needs. Each
//! method is one atomic unit: an implementation must either apply all of
//! its writes or none of them.
//!
//! | Method | Writes |
//! |--------|--------|
//! | `create` | order row, line items, tool reservation, owner basket cleared |
//! | `apply` | status compare-and-set (+ release), master set, paid flag |
//! | `delete` | status compare-and-set delete (+ release) |

use async_trait::async_trait;
use shared::models::{
    LineRefs, Order, OrderDetail, OrderProductInput, OrderQuery, OrderStatus, PaymentType,
};
use thiserror::Error;

use crate::db::repository::RepoError;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Tool {tool_id} does not have enough stock")]
    InsufficientStock { tool_id: i64 },

    #[error("Order {0} not found")]
    OrderNotFound(i64),

    /// The stored status no longer matches the expected one
    #[error("Order {0} was modified concurrently")]
    StatusChanged(i64),

    #[error(transparent)]
    Repo(#[from] RepoError),
}

impl From<sqlx::Error> for StorageError {
    fn from(err: sqlx::Error) -> Self {
        StorageError::Repo(err.into())
    }
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Validated order ready to be stored
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub owner_id: i64,
    pub address: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// Unix millis
    pub date: i64,
    pub total_price: f64,
    pub payment_type: PaymentType,
    pub with_delivery: bool,
    pub delivery_comment: Option<String>,
    pub products: Vec<OrderProductInput>,
}

impl NewOrder {
    /// Requested quantity per tool, summed over line items, sorted by tool id
    ///
    /// A sum past `i64::MAX` can never be in stock and is reported as
    /// insufficient stock for that tool.
    pub fn tool_demand(&self) -> StorageResult<Vec<(i64, i64)>> {
        let mut demand = std::collections::BTreeMap::new();
        for product in &self.products {
            if let Some(tool_id) = product.tool_id {
                let total: &mut i64 = demand.entry(tool_id).or_insert(0);
                *total = total
                    .checked_add(product.quantity)
                    .ok_or(StorageError::InsufficientStock { tool_id })?;
            }
        }
        Ok(demand.into_iter().collect())
    }
}

/// Status write guarded by the previously read status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusChange {
    pub from: OrderStatus,
    pub to: OrderStatus,
    /// Return reserved tool stock in the same transaction
    pub release: bool,
}

#[derive(Debug, Clone, Default)]
pub struct OrderPatch {
    pub status: Option<StatusChange>,
    /// Replaces the assignment set wholesale
    pub master_ids: Option<Vec<i64>>,
    pub paid: Option<bool>,
}

#[async_trait]
pub trait OrderStorage: Send + Sync {
    /// True when every referenced profession, tool and level exists
    async fn refs_exist(&self, refs: &LineRefs) -> StorageResult<bool>;

    async fn masters_exist(&self, ids: &[i64]) -> StorageResult<bool>;

    /// Store the order and its line items, reserve tool stock and clear the
    /// owner's basket. Returns the new order id.
    async fn create(&self, order: &NewOrder) -> StorageResult<i64>;

    async fn find(&self, id: i64) -> StorageResult<Option<Order>>;

    async fn find_detail(&self, id: i64) -> StorageResult<Option<OrderDetail>>;

    async fn apply(&self, id: i64, patch: &OrderPatch) -> StorageResult<()>;

    /// Delete the order if its status is still `expected`
    async fn delete(&self, id: i64, expected: OrderStatus, release: bool) -> StorageResult<()>;

    /// Filtered page of orders, restricted to one owner when `owner_id` is set
    async fn list(
        &self,
        query: &OrderQuery,
        owner_id: Option<i64>,
    ) -> StorageResult<(Vec<Order>, i64)>;
}
