//! Order Handlers
//!
//! Thin adapters: the caller's id and role are passed to [`OrderManager`]
//! as plain arguments.
//!
//! [`OrderManager`]: crate::orders::OrderManager

use axum::{
    Json,
    extract::{Path, Query, State},
};
use shared::models::{Order, OrderCreate, OrderDetail, OrderQuery, OrderUpdate};
use shared::pagination::Paginated;

use crate::api::validate;
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::{ApiResponse, AppResult};

pub async fn create(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Json(payload): Json<OrderCreate>,
) -> AppResult<Json<OrderDetail>> {
    validate(&payload)?;
    let detail = state.order_manager.create(payload, current_user.id).await?;
    Ok(Json(detail))
}

pub async fn list(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Query(query): Query<OrderQuery>,
) -> AppResult<Json<Paginated<Order>>> {
    let page = state
        .order_manager
        .find_all(&query, current_user.id, current_user.role)
        .await?;
    Ok(Json(page))
}

pub async fn get_by_id(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<OrderDetail>> {
    let detail = state
        .order_manager
        .find_one(id, current_user.id, current_user.role)
        .await?;
    Ok(Json(detail))
}

pub async fn update(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<OrderUpdate>,
) -> AppResult<Json<ApiResponse<OrderDetail>>> {
    let detail = state.order_manager.update(id, payload).await?;
    tracing::debug!(order_id = id, by = current_user.id, "Order update applied");
    Ok(Json(ApiResponse::success_with_message(
        "Order updated successfully",
        detail,
    )))
}

pub async fn delete(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<()>>> {
    state.order_manager.remove(id).await?;
    tracing::debug!(order_id = id, by = current_user.id, "Order removed");
    Ok(Json(ApiResponse::ok_with_message("Order deleted successfully")))
}
