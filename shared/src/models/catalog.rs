//! Catalog reference data
//!
//! Brands, capacities, sizes, levels and regions share one localized shape
//! ([`NamedEntry`]). Partners, FAQs and showcases have their own rows.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::pagination::SortDirection;

/// Localized reference entry (brand, capacity, size, level, region)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct NamedEntry {
    pub id: i64,
    pub name_uz: String,
    pub name_ru: Option<String>,
    pub name_en: Option<String>,
    /// Only brands carry an image
    pub image: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NamedEntryCreate {
    #[validate(length(min = 1, max = 255, message = "nameUz is required"))]
    pub name_uz: String,
    #[validate(length(max = 255))]
    pub name_ru: Option<String>,
    #[validate(length(max = 255))]
    pub name_en: Option<String>,
    pub image: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NamedEntryUpdate {
    #[validate(length(min = 1, max = 255))]
    pub name_uz: Option<String>,
    #[validate(length(max = 255))]
    pub name_ru: Option<String>,
    #[validate(length(max = 255))]
    pub name_en: Option<String>,
    pub image: Option<String>,
}

/// Partner logo shown on the landing page
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Partner {
    pub id: i64,
    pub name_uz: String,
    pub name_ru: Option<String>,
    pub name_en: Option<String>,
    pub image: String,
    pub link: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PartnerCreate {
    #[validate(length(min = 1, max = 255, message = "nameUz is required"))]
    pub name_uz: String,
    pub name_ru: Option<String>,
    pub name_en: Option<String>,
    #[validate(length(min = 1, message = "Image is required"))]
    pub image: String,
    #[validate(url)]
    pub link: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PartnerUpdate {
    #[validate(length(min = 1, max = 255))]
    pub name_uz: Option<String>,
    pub name_ru: Option<String>,
    pub name_en: Option<String>,
    #[validate(length(min = 1))]
    pub image: Option<String>,
    #[validate(url)]
    pub link: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Faq {
    pub id: i64,
    pub question_uz: String,
    pub question_ru: Option<String>,
    pub question_en: Option<String>,
    pub answer_uz: String,
    pub answer_ru: Option<String>,
    pub answer_en: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct FaqCreate {
    #[validate(length(min = 1, message = "questionUz is required"))]
    pub question_uz: String,
    pub question_ru: Option<String>,
    pub question_en: Option<String>,
    #[validate(length(min = 1, message = "answerUz is required"))]
    pub answer_uz: String,
    pub answer_ru: Option<String>,
    pub answer_en: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct FaqUpdate {
    #[validate(length(min = 1))]
    pub question_uz: Option<String>,
    pub question_ru: Option<String>,
    pub question_en: Option<String>,
    #[validate(length(min = 1))]
    pub answer_uz: Option<String>,
    pub answer_ru: Option<String>,
    pub answer_en: Option<String>,
}

/// Promotional banner
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Showcase {
    pub id: i64,
    pub name_uz: String,
    pub name_ru: Option<String>,
    pub name_en: Option<String>,
    pub description_uz: String,
    pub description_ru: Option<String>,
    pub description_en: Option<String>,
    pub image: String,
    pub link: String,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ShowcaseCreate {
    #[validate(length(min = 1, message = "nameUz is required"))]
    pub name_uz: String,
    pub name_ru: Option<String>,
    pub name_en: Option<String>,
    #[validate(length(min = 1, message = "descriptionUz is required"))]
    pub description_uz: String,
    pub description_ru: Option<String>,
    pub description_en: Option<String>,
    #[validate(length(min = 1, message = "Image is required"))]
    pub image: String,
    #[validate(url(message = "Link must be a valid URL"))]
    pub link: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ShowcaseUpdate {
    #[validate(length(min = 1))]
    pub name_uz: Option<String>,
    pub name_ru: Option<String>,
    pub name_en: Option<String>,
    #[validate(length(min = 1))]
    pub description_uz: Option<String>,
    pub description_ru: Option<String>,
    pub description_en: Option<String>,
    #[validate(length(min = 1))]
    pub image: Option<String>,
    #[validate(url(message = "Link must be a valid URL"))]
    pub link: Option<String>,
}

/// Rental tool with a mutable stock counter
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Tool {
    pub id: i64,
    pub code: i64,
    pub name_uz: String,
    pub name_ru: Option<String>,
    pub name_en: Option<String>,
    pub description_uz: Option<String>,
    pub description_ru: Option<String>,
    pub description_en: Option<String>,
    pub price: f64,
    pub quantity: i64,
    pub brand_id: Option<i64>,
    pub capacity_id: Option<i64>,
    pub size_id: Option<i64>,
    pub image: Option<String>,
    pub is_available: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ToolCreate {
    #[validate(length(min = 1, max = 255, message = "nameUz is required"))]
    pub name_uz: String,
    pub name_ru: Option<String>,
    pub name_en: Option<String>,
    pub description_uz: Option<String>,
    pub description_ru: Option<String>,
    pub description_en: Option<String>,
    #[validate(range(min = 0.0, message = "price must not be negative"))]
    pub price: f64,
    #[validate(range(min = 0, message = "quantity must not be negative"))]
    pub quantity: i64,
    pub brand_id: Option<i64>,
    pub capacity_id: Option<i64>,
    pub size_id: Option<i64>,
    pub image: Option<String>,
    #[serde(default = "default_true")]
    pub is_available: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ToolUpdate {
    #[validate(length(min = 1, max = 255))]
    pub name_uz: Option<String>,
    pub name_ru: Option<String>,
    pub name_en: Option<String>,
    pub description_uz: Option<String>,
    pub description_ru: Option<String>,
    pub description_en: Option<String>,
    #[validate(range(min = 0.0))]
    pub price: Option<f64>,
    #[validate(range(min = 0))]
    pub quantity: Option<i64>,
    pub brand_id: Option<i64>,
    pub capacity_id: Option<i64>,
    pub size_id: Option<i64>,
    pub image: Option<String>,
    pub is_available: Option<bool>,
}

fn default_true() -> bool {
    true
}

/// Listing query shared by every catalog collection
///
/// Tool-only filters are ignored by the other collections.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    /// OR-search over the localized name fields
    pub search: Option<String>,
    pub sort_by: Option<String>,
    #[serde(default)]
    pub order_by: SortDirection,
    pub brand_id: Option<i64>,
    pub capacity_id: Option<i64>,
    pub size_id: Option<i64>,
    pub is_available: Option<bool>,
}
