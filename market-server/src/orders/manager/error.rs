use shared::error::{AppError, ErrorCode};
use shared::models::OrderStatus;
use thiserror::Error;

use crate::orders::storage::StorageError;

pub const MSG_EMPTY_ORDER: &str = "Order must include at least one product.";
pub const MSG_INVALID_REFS: &str = "One or more profession/tool/level/master IDs are invalid.";

/// Manager errors
#[derive(Debug, Error)]
pub enum ManagerError {
    #[error("{}", MSG_EMPTY_ORDER)]
    EmptyOrder,

    /// A line item broke the profession/tool rules
    #[error("{0}")]
    InvalidItem(&'static str),

    #[error("{}", MSG_INVALID_REFS)]
    InvalidReferences,

    #[error("ID: {0}, This tool's quantity is not enough for the order.")]
    InsufficientStock(i64),

    #[error("Order {0} not found")]
    OrderNotFound(i64),

    #[error("You do not have access to this order")]
    NotOwner,

    #[error("Order status cannot change from {from} to {to}")]
    InvalidTransition { from: OrderStatus, to: OrderStatus },

    #[error("Order {0} was modified by another request, please retry")]
    ConcurrentModification(i64),

    #[error("Storage error: {0}")]
    Storage(StorageError),
}

impl From<StorageError> for ManagerError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::InsufficientStock { tool_id } => ManagerError::InsufficientStock(tool_id),
            StorageError::OrderNotFound(id) => ManagerError::OrderNotFound(id),
            StorageError::StatusChanged(id) => ManagerError::ConcurrentModification(id),
            other => ManagerError::Storage(other),
        }
    }
}

pub type ManagerResult<T> = Result<T, ManagerError>;

impl From<ManagerError> for AppError {
    fn from(err: ManagerError) -> Self {
        let message = err.to_string();
        match err {
            ManagerError::EmptyOrder => AppError::with_message(ErrorCode::OrderEmpty, message),
            ManagerError::InvalidItem(_) => {
                AppError::with_message(ErrorCode::OrderItemInvalid, message)
            }
            ManagerError::InvalidReferences => {
                AppError::with_message(ErrorCode::OrderReferenceInvalid, message)
            }
            ManagerError::InsufficientStock(tool_id) => {
                AppError::with_message(ErrorCode::InsufficientStock, message)
                    .with_detail("toolId", tool_id)
            }
            ManagerError::OrderNotFound(_) => {
                AppError::with_message(ErrorCode::OrderNotFound, message)
            }
            ManagerError::NotOwner => AppError::not_owner(message),
            ManagerError::InvalidTransition { from, to } => {
                AppError::with_message(ErrorCode::OrderInvalidTransition, message)
                    .with_detail("from", from.as_str())
                    .with_detail("to", to.as_str())
            }
            ManagerError::ConcurrentModification(_) => {
                AppError::with_message(ErrorCode::OrderInvalidTransition, message)
            }
            ManagerError::Storage(StorageError::Repo(e)) => e.into(),
            ManagerError::Storage(e) => {
                tracing::error!(error = %e, "Order storage error");
                AppError::internal("Order storage error")
            }
        }
    }
}
