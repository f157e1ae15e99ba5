//! Authentication and authorization
//!
//! - [`JwtService`] - access and refresh tokens
//! - [`CurrentUser`] - caller context
//! - [`require_auth`] - global authentication middleware
//! - [`require_role`] - role gate for route groups
//! - argon2 password hashing and OTP codes

pub mod extractor;
pub mod jwt;
pub mod middleware;
pub mod otp;
pub mod password;

pub use jwt::{Claims, CurrentUser, JwtConfig, JwtError, JwtService};
pub use middleware::{MANAGERS, STAFF, SUPER_ADMIN_ONLY, require_auth, require_role};
pub use otp::{LogOtpSender, OtpSender, OtpThrottle};
