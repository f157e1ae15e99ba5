//! Marketplace backend
//!
//! Customers book service professionals ("masters") and rent tools. The
//! server covers accounts and OTP activation, the catalog, baskets, the
//! order lifecycle with tool inventory reservation, comments with master
//! ratings, and image uploads.
//!
//! # Module layout
//!
//! ```text
//! market-server/src/
//! ├── core/          # config, state, server
//! ├── auth/          # JWT, passwords, OTP, middleware
//! ├── db/            # SQLite pool and repositories
//! ├── orders/        # order lifecycle manager
//! ├── notify/        # order notification worker
//! ├── api/           # HTTP handlers
//! ├── routes/        # router assembly
//! ├── middleware/    # request logging
//! └── utils/         # logger, error re-exports
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod middleware;
pub mod notify;
pub mod orders;
pub mod routes;
pub mod utils;

// Re-export public types
pub use auth::{CurrentUser, JwtService};
pub use core::{Config, Server, ServerState};
pub use orders::OrderManager;
pub use utils::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

/// Load `.env` and start logging from `LOG_LEVEL`, `LOG_JSON` and `LOG_DIR`
pub fn setup_environment() {
    dotenv::dotenv().ok();

    let log_level = std::env::var("LOG_LEVEL").ok();
    let json = std::env::var("LOG_JSON")
        .map(|v| matches!(v.as_str(), "1" | "true"))
        .unwrap_or(false);
    let log_dir = std::env::var("LOG_DIR").ok();
    init_logger_with_file(log_level.as_deref(), json, log_dir.as_deref());
}

// Security logging macro, supports tracing format specifiers
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}
