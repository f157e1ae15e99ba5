//! User accounts, companies and sessions

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::role::{UserRole, UserStatus};
use crate::util::{validate_password, validate_phone};

/// User row without secrets (password hash, refresh token hash)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: String,
    pub role: UserRole,
    pub status: UserStatus,
    pub region_id: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Company details of a legal-entity customer
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub id: i64,
    pub user_id: i64,
    pub name_uz: String,
    pub name_ru: Option<String>,
    pub name_en: Option<String>,
    pub tax_id: Option<String>,
    pub bank_code: Option<String>,
    pub bank_account: Option<String>,
    pub bank_name: Option<String>,
    pub oked: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CompanyInput {
    #[validate(length(min = 1, message = "nameUz is required"))]
    pub name_uz: String,
    pub name_ru: Option<String>,
    pub name_en: Option<String>,
    pub tax_id: Option<String>,
    pub bank_code: Option<String>,
    pub bank_account: Option<String>,
    pub bank_name: Option<String>,
    pub oked: Option<String>,
    pub address: Option<String>,
}

/// Login session, one per (user, client ip)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: i64,
    pub user_id: i64,
    pub ip: String,
    pub user_agent: Option<String>,
    pub created_at: i64,
}

/// `GET /api/auth/me` payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(flatten)]
    pub user: User,
    pub company: Option<Company>,
    pub sessions: Vec<Session>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 64, message = "First name is required"))]
    pub first_name: String,
    #[validate(length(min = 1, max = 64, message = "Last name is required"))]
    pub last_name: String,
    #[validate(custom(function = "validate_phone"))]
    pub phone_number: String,
    #[validate(
        length(min = 8, message = "Password must be at least 8 characters"),
        custom(function = "validate_password")
    )]
    pub password: String,
    pub region_id: i64,
    pub role: UserRole,
    #[validate(nested)]
    pub company: Option<CompanyInput>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[validate(custom(function = "validate_phone"))]
    pub phone_number: String,
    #[validate(length(min = 1))]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PhoneRequest {
    #[validate(custom(function = "validate_phone"))]
    pub phone_number: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct OtpRequest {
    #[validate(custom(function = "validate_phone"))]
    pub phone_number: String,
    #[validate(length(equal = 6, message = "OTP must be 6 digits"))]
    pub otp: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    #[validate(custom(function = "validate_phone"))]
    pub phone_number: String,
    #[validate(length(equal = 6, message = "OTP must be 6 digits"))]
    pub otp: String,
    #[validate(
        length(min = 8, message = "New password must be at least 8 characters"),
        custom(function = "validate_password")
    )]
    pub new_password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Token pair returned by login and refresh
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Back-office account creation (SUPER_ADMIN only)
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AdminCreate {
    #[validate(length(min = 1, max = 64))]
    pub first_name: String,
    #[validate(length(min = 1, max = 64))]
    pub last_name: String,
    #[validate(custom(function = "validate_phone"))]
    pub phone_number: String,
    #[validate(length(min = 8), custom(function = "validate_password"))]
    pub password: String,
    pub region_id: i64,
    pub role: UserRole,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UserUpdate {
    #[validate(length(min = 1, max = 64))]
    pub first_name: Option<String>,
    #[validate(length(min = 1, max = 64))]
    pub last_name: Option<String>,
    pub region_id: Option<i64>,
    /// Managers only
    pub status: Option<UserStatus>,
}

/// Query for user and admin listings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub search: Option<String>,
    pub role: Option<UserRole>,
    pub status: Option<UserStatus>,
}
