//! Data models
//!
//! Shared between market-server and API clients.
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` (SQLite INTEGER PRIMARY KEY), timestamps are Unix millis.

pub mod basket;
pub mod catalog;
pub mod comment;
pub mod contact;
pub mod line_item;
pub mod master;
pub mod order;
pub mod profession;
pub mod role;
pub mod site_metadata;
pub mod user;

// Re-exports
pub use basket::*;
pub use catalog::*;
pub use comment::*;
pub use contact::*;
pub use line_item::*;
pub use master::*;
pub use order::*;
pub use profession::*;
pub use role::*;
pub use site_metadata::*;
pub use user::*;
