//! Post-completion feedback and master ratings

use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: i64,
    pub order_id: i64,
    pub user_id: i64,
    pub message: String,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct MasterRating {
    pub id: i64,
    pub comment_id: i64,
    pub master_id: i64,
    pub star: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentDetail {
    #[serde(flatten)]
    pub comment: Comment,
    pub master_ratings: Vec<MasterRating>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct MasterRatingInput {
    pub master_id: i64,
    #[validate(range(min = 0, max = 5, message = "star must be between 0 and 5"))]
    pub star: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CommentCreate {
    pub order_id: i64,
    #[validate(length(min = 1, max = 2000, message = "message is required"))]
    pub message: String,
    #[serde(default)]
    #[validate(nested)]
    pub master_ratings: Vec<MasterRatingInput>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CommentUpdate {
    #[validate(length(min = 1, max = 2000))]
    pub message: Option<String>,
    #[validate(nested)]
    pub master_ratings: Option<Vec<MasterRatingInput>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub order_id: Option<i64>,
}
