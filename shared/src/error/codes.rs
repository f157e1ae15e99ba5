//! Unified error codes for the marketplace
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 3xxx: Account errors (users, masters)
//! - 4xxx: Order errors
//! - 5xxx: Basket errors
//! - 6xxx: Catalog errors
//! - 7xxx: Comment errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values so clients can switch on
/// the number without parsing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Invalid format
    InvalidFormat = 6,
    /// Required field missing
    RequiredField = 7,
    /// Value out of range
    ValueOutOfRange = 8,

    // ==================== 1xxx: Auth ====================
    /// User is not authenticated
    NotAuthenticated = 1001,
    /// Invalid credentials (phone/password)
    InvalidCredentials = 1002,
    /// Token has expired
    TokenExpired = 1003,
    /// Token is invalid
    TokenInvalid = 1004,
    /// Session not found (logged out)
    SessionExpired = 1005,
    /// One-time password is invalid or expired
    OtpInvalid = 1006,

    // ==================== 2xxx: Permission ====================
    /// Permission denied
    PermissionDenied = 2001,
    /// Specific role required
    RoleRequired = 2002,
    /// Admin role required
    AdminRequired = 2003,
    /// Resource belongs to another user
    NotOwner = 2004,

    // ==================== 3xxx: Account ====================
    /// User not found
    UserNotFound = 3001,
    /// Phone number already registered
    PhoneAlreadyExists = 3002,
    /// Account has not been activated
    AccountInactive = 3003,
    /// Account is banned
    AccountBanned = 3004,
    /// Master not found
    MasterNotFound = 3101,
    /// Region not found
    RegionNotFound = 3201,

    // ==================== 4xxx: Order ====================
    /// Order not found
    OrderNotFound = 4001,
    /// Order has no line items
    OrderEmpty = 4002,
    /// Line item violates the profession/tool rules
    OrderItemInvalid = 4003,
    /// Referenced catalog or master id does not exist
    OrderReferenceInvalid = 4004,
    /// Tool stock is lower than the requested quantity
    InsufficientStock = 4005,
    /// Status change is not allowed from the current status
    OrderInvalidTransition = 4006,

    // ==================== 5xxx: Basket ====================
    /// Basket item not found
    BasketNotFound = 5001,
    /// Basket item violates the profession/tool rules
    BasketItemInvalid = 5002,

    // ==================== 6xxx: Catalog ====================
    /// Catalog entry not found
    CatalogNotFound = 6001,
    /// Catalog entry with the same name already exists
    CatalogNameExists = 6002,
    /// Tool not found
    ToolNotFound = 6101,
    /// Profession not found
    ProfessionNotFound = 6201,
    /// Uploaded file is too large
    FileTooLarge = 6301,
    /// Uploaded file format is not supported
    UnsupportedFileFormat = 6302,

    // ==================== 7xxx: Comment ====================
    /// Comment not found
    CommentNotFound = 7001,
    /// Order already has a comment
    CommentAlreadyExists = 7002,
    /// Order is not completed yet
    OrderNotCompleted = 7003,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Network error
    NetworkError = 9003,
    /// Operation timed out
    TimeoutError = 9004,
    /// Configuration error
    ConfigError = 9005,
    /// File storage error
    StorageError = 9401,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::InvalidFormat => "Invalid format",
            ErrorCode::RequiredField => "Required field is missing",
            ErrorCode::ValueOutOfRange => "Value is out of range",

            // Auth
            ErrorCode::NotAuthenticated => "User is not authenticated",
            ErrorCode::InvalidCredentials => "Phone number or password is incorrect!",
            ErrorCode::TokenExpired => "Token has expired",
            ErrorCode::TokenInvalid => "Token is invalid",
            ErrorCode::SessionExpired => "You are logged out! Please log in again.",
            ErrorCode::OtpInvalid => "Invalid phone number or OTP!",

            // Permission
            ErrorCode::PermissionDenied => "Permission denied",
            ErrorCode::RoleRequired => "Required role is missing",
            ErrorCode::AdminRequired => "Admin role required",
            ErrorCode::NotOwner => "You do not have access to this resource",

            // Account
            ErrorCode::UserNotFound => "User not found",
            ErrorCode::PhoneAlreadyExists => "A user with this phone number already exists!",
            ErrorCode::AccountInactive => {
                "Your account is not active, please activate your account first!"
            }
            ErrorCode::AccountBanned => "Your account is banned, please contact support!",
            ErrorCode::MasterNotFound => "Master not found",
            ErrorCode::RegionNotFound => "Region not found with the provided regionId!",

            // Order
            ErrorCode::OrderNotFound => "Order not found",
            ErrorCode::OrderEmpty => "Order must include at least one product.",
            ErrorCode::OrderItemInvalid => "Order product is invalid",
            ErrorCode::OrderReferenceInvalid => {
                "One or more profession/tool/level/master IDs are invalid."
            }
            ErrorCode::InsufficientStock => "This tool's quantity is not enough for the order.",
            ErrorCode::OrderInvalidTransition => "Order status transition is not allowed",

            // Basket
            ErrorCode::BasketNotFound => "Basket not found",
            ErrorCode::BasketItemInvalid => "Basket item is invalid",

            // Catalog
            ErrorCode::CatalogNotFound => "Catalog entry not found",
            ErrorCode::CatalogNameExists => "Catalog entry already exists",
            ErrorCode::ToolNotFound => "Tool not found",
            ErrorCode::ProfessionNotFound => "Profession not found",
            ErrorCode::FileTooLarge => "File is too large",
            ErrorCode::UnsupportedFileFormat => "Unsupported file format",

            // Comment
            ErrorCode::CommentNotFound => "Comment not found",
            ErrorCode::CommentAlreadyExists => "This order already has a comment",
            ErrorCode::OrderNotCompleted => "You can only comment on completed orders",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",
            ErrorCode::NetworkError => "Network error",
            ErrorCode::TimeoutError => "Operation timed out",
            ErrorCode::ConfigError => "Configuration error",
            ErrorCode::StorageError => "File storage error",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),
            5 => Ok(ErrorCode::InvalidRequest),
            6 => Ok(ErrorCode::InvalidFormat),
            7 => Ok(ErrorCode::RequiredField),
            8 => Ok(ErrorCode::ValueOutOfRange),

            // Auth
            1001 => Ok(ErrorCode::NotAuthenticated),
            1002 => Ok(ErrorCode::InvalidCredentials),
            1003 => Ok(ErrorCode::TokenExpired),
            1004 => Ok(ErrorCode::TokenInvalid),
            1005 => Ok(ErrorCode::SessionExpired),
            1006 => Ok(ErrorCode::OtpInvalid),

            // Permission
            2001 => Ok(ErrorCode::PermissionDenied),
            2002 => Ok(ErrorCode::RoleRequired),
            2003 => Ok(ErrorCode::AdminRequired),
            2004 => Ok(ErrorCode::NotOwner),

            // Account
            3001 => Ok(ErrorCode::UserNotFound),
            3002 => Ok(ErrorCode::PhoneAlreadyExists),
            3003 => Ok(ErrorCode::AccountInactive),
            3004 => Ok(ErrorCode::AccountBanned),
            3101 => Ok(ErrorCode::MasterNotFound),
            3201 => Ok(ErrorCode::RegionNotFound),

            // Order
            4001 => Ok(ErrorCode::OrderNotFound),
            4002 => Ok(ErrorCode::OrderEmpty),
            4003 => Ok(ErrorCode::OrderItemInvalid),
            4004 => Ok(ErrorCode::OrderReferenceInvalid),
            4005 => Ok(ErrorCode::InsufficientStock),
            4006 => Ok(ErrorCode::OrderInvalidTransition),

            // Basket
            5001 => Ok(ErrorCode::BasketNotFound),
            5002 => Ok(ErrorCode::BasketItemInvalid),

            // Catalog
            6001 => Ok(ErrorCode::CatalogNotFound),
            6002 => Ok(ErrorCode::CatalogNameExists),
            6101 => Ok(ErrorCode::ToolNotFound),
            6201 => Ok(ErrorCode::ProfessionNotFound),
            6301 => Ok(ErrorCode::FileTooLarge),
            6302 => Ok(ErrorCode::UnsupportedFileFormat),

            // Comment
            7001 => Ok(ErrorCode::CommentNotFound),
            7002 => Ok(ErrorCode::CommentAlreadyExists),
            7003 => Ok(ErrorCode::OrderNotCompleted),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),
            9003 => Ok(ErrorCode::NetworkError),
            9004 => Ok(ErrorCode::TimeoutError),
            9005 => Ok(ErrorCode::ConfigError),
            9401 => Ok(ErrorCode::StorageError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
