//! Shared types for the marketplace backend
//!
//! Error system, domain models, request payloads and the pagination
//! envelope. Row types derive `sqlx::FromRow` when the `db` feature is on.

pub mod error;
pub mod models;
pub mod pagination;
pub mod util;

// Re-exports
pub use error::{ApiResponse, AppError, AppResult, ErrorCode};
pub use pagination::{Paginated, SortDirection};
