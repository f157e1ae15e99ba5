//! Order lifecycle
//!
//! - **manager**: [`OrderManager`], validation, status lattice and stock policy
//! - **storage**: [`OrderStorage`] persistence port (SQLite implementation in
//!   `db::repository::order`)

pub mod manager;
pub mod storage;

// Re-exports
pub use manager::{ManagerError, ManagerResult, OrderManager};
pub use storage::{OrderStorage, StorageError};
