//! Service professionals and what they offer

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::pagination::SortDirection;
use crate::util::validate_phone;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Master {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: String,
    pub is_active: bool,
    pub birth_year: Option<i64>,
    pub image: Option<String>,
    pub passport_image: Option<String>,
    pub about: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Master row with the average star over all comment ratings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct MasterSummary {
    #[serde(flatten)]
    #[cfg_attr(feature = "db", sqlx(flatten))]
    pub master: Master,
    pub average_rating: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct MasterProfession {
    pub id: i64,
    pub master_id: i64,
    pub profession_id: i64,
    pub level_id: Option<i64>,
    pub min_working_hours: i64,
    pub price_hourly: f64,
    pub price_daily: f64,
    pub experience: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MasterDetail {
    #[serde(flatten)]
    pub master: Master,
    pub average_rating: Option<f64>,
    pub master_professions: Vec<MasterProfession>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct MasterProfessionInput {
    pub profession_id: i64,
    pub level_id: Option<i64>,
    #[validate(range(min = 0))]
    pub min_working_hours: i64,
    #[validate(range(min = 0.0))]
    pub price_hourly: f64,
    #[validate(range(min = 0.0))]
    pub price_daily: f64,
    #[validate(range(min = 0))]
    pub experience: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct MasterCreate {
    #[validate(length(min = 1, max = 64))]
    pub first_name: String,
    #[validate(length(min = 1, max = 64))]
    pub last_name: String,
    #[validate(custom(function = "validate_phone"))]
    pub phone_number: String,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[validate(range(min = 1900, max = 2100))]
    pub birth_year: Option<i64>,
    pub image: Option<String>,
    pub passport_image: Option<String>,
    #[validate(length(max = 2000))]
    pub about: Option<String>,
    #[serde(default)]
    #[validate(nested)]
    pub master_professions: Vec<MasterProfessionInput>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct MasterUpdate {
    #[validate(length(min = 1, max = 64))]
    pub first_name: Option<String>,
    #[validate(length(min = 1, max = 64))]
    pub last_name: Option<String>,
    #[validate(custom(function = "validate_phone"))]
    pub phone_number: Option<String>,
    pub is_active: Option<bool>,
    #[validate(range(min = 1900, max = 2100))]
    pub birth_year: Option<i64>,
    pub image: Option<String>,
    pub passport_image: Option<String>,
    #[validate(length(max = 2000))]
    pub about: Option<String>,
    #[validate(nested)]
    pub master_professions: Option<Vec<MasterProfessionInput>>,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum MasterSortField {
    FirstName,
    BirthYear,
    #[default]
    CreatedAt,
}

impl MasterSortField {
    pub fn column(&self) -> &'static str {
        match self {
            Self::FirstName => "m.first_name",
            Self::BirthYear => "m.birth_year",
            Self::CreatedAt => "m.created_at",
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MasterQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    /// Matches first or last name
    pub name: Option<String>,
    pub phone_number: Option<String>,
    pub is_active: Option<bool>,
    pub birth_year: Option<i64>,
    pub gte_birth_year: Option<i64>,
    pub lte_birth_year: Option<i64>,
    #[serde(default)]
    pub sort_by: MasterSortField,
    #[serde(default)]
    pub order_by: SortDirection,
}

/// Search over the professions a master offers
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MasterSearch {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub profession_id: Option<i64>,
    pub level_id: Option<i64>,
    pub gte_min_working_hours: Option<i64>,
    pub lte_min_working_hours: Option<i64>,
    pub gte_price_hourly: Option<f64>,
    pub lte_price_hourly: Option<f64>,
    pub gte_price_daily: Option<f64>,
    pub lte_price_daily: Option<f64>,
    pub gte_experience: Option<i64>,
    pub lte_experience: Option<i64>,
}

fn default_active() -> bool {
    true
}
