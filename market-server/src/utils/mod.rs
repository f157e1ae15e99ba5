//! Utilities
//!
//! - [`AppError`] / [`ApiResponse`] re-exported from `shared::error`
//! - logger setup
//! - client address helpers

pub mod logger;
pub mod net;

pub use shared::error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
