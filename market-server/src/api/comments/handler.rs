//! Comment Handlers
//!
//! A customer may leave one comment per completed order they own, with
//! optional star ratings for the masters who worked on it.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use shared::models::{CommentCreate, CommentDetail, CommentQuery, CommentUpdate, OrderStatus};
use shared::pagination::{Paginated, page_window};

use crate::api::validate;
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::comment;
use crate::{ApiResponse, AppError, AppResult, ErrorCode};

const MSG_NOT_OWNER: &str = "You do not have access to this comment";

fn not_found(id: i64) -> AppError {
    AppError::with_message(ErrorCode::CommentNotFound, format!("Comment {id} not found"))
}

async fn check_masters(
    state: &ServerState,
    ratings: &[shared::models::MasterRatingInput],
) -> AppResult<()> {
    if !comment::masters_exist(&state.pool, ratings).await? {
        return Err(AppError::validation("One or more master IDs are invalid."));
    }
    Ok(())
}

pub async fn create(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Json(payload): Json<CommentCreate>,
) -> AppResult<Json<CommentDetail>> {
    validate(&payload)?;

    let (owner_id, status) = comment::order_owner_status(&state.pool, payload.order_id)
        .await?
        .ok_or_else(|| {
            AppError::with_message(
                ErrorCode::OrderNotFound,
                format!("Order {} not found", payload.order_id),
            )
        })?;
    if owner_id != current_user.id {
        return Err(AppError::not_owner("You do not have access to this order"));
    }
    if status != OrderStatus::Completed {
        return Err(AppError::new(ErrorCode::OrderNotCompleted));
    }
    if comment::exists_for_order(&state.pool, payload.order_id).await? {
        return Err(AppError::new(ErrorCode::CommentAlreadyExists));
    }
    check_masters(&state, &payload.master_ratings).await?;

    let created = comment::create(&state.pool, current_user.id, &payload)
        .await
        .map_err(|e| match e {
            crate::db::repository::RepoError::Duplicate(_) => {
                AppError::new(ErrorCode::CommentAlreadyExists)
            }
            other => other.into(),
        })?;
    tracing::info!(
        comment_id = created.comment.id,
        order_id = payload.order_id,
        "Comment created"
    );
    Ok(Json(created))
}

pub async fn list(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Query(query): Query<CommentQuery>,
) -> AppResult<Json<Paginated<CommentDetail>>> {
    let (page, limit, _) = page_window(query.page, query.limit);
    let (comments, total) =
        comment::list(&state.pool, &query, current_user.owner_scope()).await?;
    Ok(Json(Paginated::new(comments, total, page, limit)))
}

pub async fn get_by_id(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<CommentDetail>> {
    let detail = comment::find_detail(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    if current_user.is_customer() && detail.comment.user_id != current_user.id {
        return Err(AppError::not_owner(MSG_NOT_OWNER));
    }
    Ok(Json(detail))
}

/// Author only. Ratings are replaced as a set when given.
pub async fn update(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<CommentUpdate>,
) -> AppResult<Json<CommentDetail>> {
    validate(&payload)?;

    let stored = comment::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    if stored.user_id != current_user.id {
        return Err(AppError::not_owner(MSG_NOT_OWNER));
    }
    if let Some(ratings) = &payload.master_ratings {
        check_masters(&state, ratings).await?;
    }

    let updated = comment::update(
        &state.pool,
        id,
        payload.message.as_deref(),
        payload.master_ratings.as_deref(),
    )
    .await?;
    Ok(Json(updated))
}

/// Author or manager
pub async fn delete(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<()>>> {
    let stored = comment::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    if stored.user_id != current_user.id && !current_user.can_manage() {
        return Err(AppError::not_owner(MSG_NOT_OWNER));
    }

    comment::delete(&state.pool, id).await?;
    tracing::info!(comment_id = id, by = current_user.id, "Comment deleted");
    Ok(Json(ApiResponse::ok_with_message("Comment deleted successfully")))
}
