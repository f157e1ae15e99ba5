//! Basket line items staged before ordering

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::line_item::{LineItem, MAX_LINE_QUANTITY, TimeUnit};
use crate::pagination::SortDirection;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Basket {
    pub id: i64,
    pub owner_id: i64,
    pub profession_id: Option<i64>,
    pub tool_id: Option<i64>,
    pub level_id: Option<i64>,
    pub quantity: i64,
    pub time_unit: Option<TimeUnit>,
    pub working_time: Option<i64>,
    pub price: f64,
    pub created_at: i64,
    pub updated_at: i64,
}

impl LineItem for Basket {
    fn profession_id(&self) -> Option<i64> {
        self.profession_id
    }
    fn tool_id(&self) -> Option<i64> {
        self.tool_id
    }
    fn level_id(&self) -> Option<i64> {
        self.level_id
    }
    fn time_unit(&self) -> Option<TimeUnit> {
        self.time_unit
    }
    fn working_time(&self) -> Option<i64> {
        self.working_time
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct BasketCreate {
    pub profession_id: Option<i64>,
    pub tool_id: Option<i64>,
    pub level_id: Option<i64>,
    #[validate(range(min = 1, max = MAX_LINE_QUANTITY, message = "quantity must be between 1 and 1000000"))]
    pub quantity: i64,
    pub time_unit: Option<TimeUnit>,
    #[validate(range(min = 1))]
    pub working_time: Option<i64>,
    #[validate(range(min = 0.0, message = "price must not be negative"))]
    pub price: f64,
}

impl LineItem for BasketCreate {
    fn profession_id(&self) -> Option<i64> {
        self.profession_id
    }
    fn tool_id(&self) -> Option<i64> {
        self.tool_id
    }
    fn level_id(&self) -> Option<i64> {
        self.level_id
    }
    fn time_unit(&self) -> Option<TimeUnit> {
        self.time_unit
    }
    fn working_time(&self) -> Option<i64> {
        self.working_time
    }
}

/// Partial update, merged onto the stored row before the line rules run
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct BasketUpdate {
    pub profession_id: Option<i64>,
    pub tool_id: Option<i64>,
    pub level_id: Option<i64>,
    #[validate(range(min = 1, max = MAX_LINE_QUANTITY))]
    pub quantity: Option<i64>,
    pub time_unit: Option<TimeUnit>,
    #[validate(range(min = 1))]
    pub working_time: Option<i64>,
    #[validate(range(min = 0.0))]
    pub price: Option<f64>,
}

impl Basket {
    /// Apply a patch. Setting one target clears the other one.
    pub fn merge(&self, patch: &BasketUpdate) -> Basket {
        let mut next = self.clone();
        match (patch.profession_id, patch.tool_id) {
            // both given: keep both so the xor rule rejects it
            (Some(profession_id), Some(tool_id)) => {
                next.profession_id = Some(profession_id);
                next.tool_id = Some(tool_id);
            }
            (Some(profession_id), None) => {
                next.profession_id = Some(profession_id);
                next.tool_id = None;
            }
            (None, Some(tool_id)) => {
                next.tool_id = Some(tool_id);
                next.profession_id = None;
                next.level_id = None;
                next.time_unit = None;
                next.working_time = None;
            }
            (None, None) => {}
        }
        if let Some(level_id) = patch.level_id {
            next.level_id = Some(level_id);
        }
        if let Some(quantity) = patch.quantity {
            next.quantity = quantity;
        }
        if let Some(time_unit) = patch.time_unit {
            next.time_unit = Some(time_unit);
        }
        if let Some(working_time) = patch.working_time {
            next.working_time = Some(working_time);
        }
        if let Some(price) = patch.price {
            next.price = price;
        }
        next
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum BasketSortField {
    Price,
    #[default]
    CreatedAt,
    UpdatedAt,
}

impl BasketSortField {
    pub fn column(&self) -> &'static str {
        match self {
            Self::Price => "price",
            Self::CreatedAt => "created_at",
            Self::UpdatedAt => "updated_at",
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BasketQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    #[serde(default)]
    pub sort_by: BasketSortField,
    #[serde(default)]
    pub order_by: SortDirection,
}
