//! Contact requests left by signed-in users

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::pagination::SortDirection;
use crate::util::{validate_person_name, validate_phone};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub id: i64,
    pub user_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: String,
    pub address: String,
    pub message: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ContactCreate {
    #[validate(length(max = 64), custom(function = "validate_person_name"))]
    pub first_name: String,
    #[validate(length(max = 64), custom(function = "validate_person_name"))]
    pub last_name: String,
    #[validate(custom(function = "validate_phone"))]
    pub phone_number: String,
    #[validate(length(min = 1, max = 500, message = "address is required"))]
    pub address: String,
    #[validate(length(max = 2000))]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ContactUpdate {
    #[validate(length(max = 64), custom(function = "validate_person_name"))]
    pub first_name: Option<String>,
    #[validate(length(max = 64), custom(function = "validate_person_name"))]
    pub last_name: Option<String>,
    #[validate(custom(function = "validate_phone"))]
    pub phone_number: Option<String>,
    #[validate(length(min = 1, max = 500))]
    pub address: Option<String>,
    #[validate(length(max = 2000))]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum ContactSortField {
    FirstName,
    LastName,
    #[default]
    CreatedAt,
    UpdatedAt,
}

impl ContactSortField {
    pub fn column(&self) -> &'static str {
        match self {
            Self::FirstName => "first_name",
            Self::LastName => "last_name",
            Self::CreatedAt => "created_at",
            Self::UpdatedAt => "updated_at",
        }
    }
}

/// `search` matches first name, last name or phone. Newest first unless
/// `sortOrder` says otherwise.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub search: Option<String>,
    pub user_id: Option<i64>,
    #[serde(default)]
    pub sort_by: ContactSortField,
    pub sort_order: Option<SortDirection>,
}

impl ContactQuery {
    pub fn direction(&self) -> SortDirection {
        self.sort_order.unwrap_or(SortDirection::Desc)
    }
}
