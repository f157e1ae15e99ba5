//! Orders, order products and the status lattice

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::line_item::{LineItem, MAX_LINE_QUANTITY, TimeUnit};
use crate::pagination::SortDirection;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum PaymentType {
    Cash,
    Click,
    Payme,
}

/// Order status
///
/// `PENDING -> ACCEPTED -> IN_PROGRESS -> COMPLETED`, with `CANCELLED` and
/// `REJECTED` reachable from any non-terminal state.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum OrderStatus {
    Pending,
    Accepted,
    InProgress,
    Completed,
    Cancelled,
    Rejected,
}

impl OrderStatus {
    /// Terminal statuses release reserved tool inventory
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled | Self::Rejected)
    }

    fn rank(&self) -> u8 {
        match self {
            Self::Pending => 0,
            Self::Accepted => 1,
            Self::InProgress => 2,
            Self::Completed | Self::Cancelled | Self::Rejected => 3,
        }
    }

    /// Forward-only lattice. Re-applying the current status is allowed
    /// and changes nothing.
    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        if *self == next {
            return true;
        }
        if self.is_terminal() {
            return false;
        }
        match next {
            Self::Cancelled | Self::Rejected => true,
            _ => next.rank() > self.rank(),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Accepted => "ACCEPTED",
            Self::InProgress => "IN_PROGRESS",
            Self::Completed => "COMPLETED",
            Self::Cancelled => "CANCELLED",
            Self::Rejected => "REJECTED",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: i64,
    pub owner_id: i64,
    pub address: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// Scheduled date, Unix millis
    pub date: i64,
    pub total_price: f64,
    pub payment_type: PaymentType,
    pub with_delivery: bool,
    pub delivery_comment: Option<String>,
    pub paid: bool,
    pub status: OrderStatus,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Line item row; price is the value snapshotted at order time
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct OrderProduct {
    pub id: i64,
    pub order_id: i64,
    pub profession_id: Option<i64>,
    pub tool_id: Option<i64>,
    pub level_id: Option<i64>,
    pub quantity: i64,
    pub time_unit: Option<TimeUnit>,
    pub working_time: Option<i64>,
    pub price: f64,
}

/// Line item joined with catalog names
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct OrderProductDetail {
    #[serde(flatten)]
    #[cfg_attr(feature = "db", sqlx(flatten))]
    pub product: OrderProduct,
    pub profession_name: Option<String>,
    pub tool_name: Option<String>,
    pub level_name: Option<String>,
}

/// Owner summary embedded in order details
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct OrderOwner {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDetail {
    #[serde(flatten)]
    pub order: Order,
    pub order_products: Vec<OrderProductDetail>,
    pub master_ids: Vec<i64>,
    pub owner: Option<OrderOwner>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct OrderProductInput {
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

impl LineItem for OrderProductInput {
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
pub struct OrderCreate {
    #[validate(length(min = 1, max = 500, message = "address is required"))]
    pub address: String,
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: Option<f64>,
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: Option<f64>,
    pub date: DateTime<Utc>,
    #[validate(range(min = 0.0))]
    pub total_price: f64,
    pub payment_type: PaymentType,
    #[serde(default)]
    pub with_delivery: bool,
    pub delivery_comment: Option<String>,
    #[validate(nested)]
    pub order_products: Vec<OrderProductInput>,
}

/// Admin patch. `masterIds` replaces the assignment set wholesale.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderUpdate {
    pub status: Option<OrderStatus>,
    pub master_ids: Option<Vec<i64>>,
    pub paid: Option<bool>,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum OrderSortField {
    #[default]
    Date,
    TotalSum,
    WithDelivery,
}

impl OrderSortField {
    pub fn column(&self) -> &'static str {
        match self {
            Self::Date => "date",
            Self::TotalSum => "total_price",
            Self::WithDelivery => "with_delivery",
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    #[serde(default)]
    pub sort_by: OrderSortField,
    #[serde(default)]
    pub order_by: SortDirection,
    pub status: Option<OrderStatus>,
    pub payment_type: Option<PaymentType>,
    pub paid: Option<bool>,
    pub with_delivery: Option<bool>,
    pub date: Option<DateTime<Utc>>,
    pub gte_date: Option<DateTime<Utc>>,
    pub lte_date: Option<DateTime<Utc>>,
    pub total_sum: Option<f64>,
    pub gte_total_sum: Option<f64>,
    pub lte_total_sum: Option<f64>,
}
