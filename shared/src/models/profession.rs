//! Professions and their level pricing

use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Profession {
    pub id: i64,
    pub name_uz: String,
    pub name_ru: Option<String>,
    pub name_en: Option<String>,
    pub image: Option<String>,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Pricing of a profession at a given level
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct ProfessionLevel {
    pub profession_id: i64,
    pub level_id: i64,
    pub min_working_hours: i64,
    pub price_hourly: f64,
    pub price_daily: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProfessionLevelInput {
    pub level_id: i64,
    #[validate(range(min = 0))]
    pub min_working_hours: i64,
    #[validate(range(min = 0.0))]
    pub price_hourly: f64,
    #[validate(range(min = 0.0))]
    pub price_daily: f64,
}

/// Profession with its level pricing and linked tools
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfessionDetail {
    #[serde(flatten)]
    pub profession: Profession,
    pub profession_levels: Vec<ProfessionLevel>,
    pub tool_ids: Vec<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProfessionCreate {
    #[validate(length(min = 1, max = 255, message = "nameUz is required"))]
    pub name_uz: String,
    pub name_ru: Option<String>,
    pub name_en: Option<String>,
    pub image: Option<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default)]
    #[validate(nested)]
    pub profession_levels: Vec<ProfessionLevelInput>,
    #[serde(default)]
    pub tool_ids: Vec<i64>,
}

/// Join lists, when present, replace the stored ones wholesale
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProfessionUpdate {
    #[validate(length(min = 1, max = 255))]
    pub name_uz: Option<String>,
    pub name_ru: Option<String>,
    pub name_en: Option<String>,
    pub image: Option<String>,
    pub is_active: Option<bool>,
    #[validate(nested)]
    pub profession_levels: Option<Vec<ProfessionLevelInput>>,
    pub tool_ids: Option<Vec<i64>>,
}

fn default_active() -> bool {
    true
}
