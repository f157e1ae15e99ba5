//! Basket Handlers
//!
//! Items follow the order product rules: exactly one of profession or
//! tool, and tools carry no level or time fields.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use shared::models::{Basket, BasketCreate, BasketQuery, BasketUpdate, LineItem, LineRefs};
use shared::pagination::{Paginated, page_window};

use crate::api::validate;
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::{basket, line_refs_exist};
use crate::orders::manager::MSG_INVALID_REFS;
use crate::{ApiResponse, AppError, AppResult, ErrorCode};

const MSG_NOT_OWNER: &str = "You do not have access to this basket";

/// Line rules plus existence of every referenced id
async fn check_item<T: LineItem>(state: &ServerState, item: &T) -> AppResult<()> {
    item.target()
        .map_err(|msg| AppError::with_message(ErrorCode::BasketItemInvalid, msg))?;

    let refs = LineRefs::collect([item]);
    let mut conn = state.pool.acquire().await.map_err(|e| {
        tracing::error!(error = %e, "Failed to acquire connection");
        AppError::database("Database error")
    })?;
    if !line_refs_exist(&mut conn, &refs).await? {
        return Err(AppError::with_message(
            ErrorCode::BasketItemInvalid,
            MSG_INVALID_REFS,
        ));
    }
    Ok(())
}

/// Load an item the caller may touch
async fn owned(state: &ServerState, current_user: &CurrentUser, id: i64) -> AppResult<Basket> {
    let item = basket::find_by_id(&state.pool, id).await?.ok_or_else(|| {
        AppError::with_message(ErrorCode::BasketNotFound, format!("Basket {id} not found"))
    })?;
    if current_user.is_customer() && item.owner_id != current_user.id {
        return Err(AppError::not_owner(MSG_NOT_OWNER));
    }
    Ok(item)
}

pub async fn create(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Json(payload): Json<BasketCreate>,
) -> AppResult<Json<Basket>> {
    validate(&payload)?;
    check_item(&state, &payload).await?;

    let item = basket::create(&state.pool, current_user.id, &payload).await?;
    tracing::debug!(basket_id = item.id, owner_id = current_user.id, "Basket item added");
    Ok(Json(item))
}

pub async fn list(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Query(query): Query<BasketQuery>,
) -> AppResult<Json<Paginated<Basket>>> {
    let (page, limit, _) = page_window(query.page, query.limit);
    let (items, total) = basket::list(&state.pool, &query, current_user.owner_scope()).await?;
    Ok(Json(Paginated::new(items, total, page, limit)))
}

pub async fn get_by_id(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<Basket>> {
    Ok(Json(owned(&state, &current_user, id).await?))
}

/// Merge the patch onto the stored item and re-check the merged result
pub async fn update(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<BasketUpdate>,
) -> AppResult<Json<Basket>> {
    validate(&payload)?;
    let stored = owned(&state, &current_user, id).await?;

    let merged = stored.merge(&payload);
    check_item(&state, &merged).await?;

    let saved = basket::save(&state.pool, &merged).await?;
    Ok(Json(saved))
}

pub async fn delete(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<()>>> {
    owned(&state, &current_user, id).await?;
    basket::delete(&state.pool, id).await?;
    Ok(Json(ApiResponse::ok_with_message("Basket deleted successfully")))
}
