//! User Registry Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use shared::models::{User, UserProfile, UserQuery, UserUpdate};
use shared::pagination::{Paginated, page_window};

use crate::api::validate;
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::{RepoError, session, user};
use crate::{ApiResponse, AppError, AppResult, ErrorCode};

fn not_found(id: i64) -> AppError {
    AppError::with_message(ErrorCode::UserNotFound, format!("User {id} not found"))
}

pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<UserQuery>,
) -> AppResult<Json<Paginated<User>>> {
    let (page, limit, _) = page_window(query.page, query.limit);
    let (users, total) = user::list(&state.pool, &query, &[]).await?;
    Ok(Json(Paginated::new(users, total, page, limit)))
}

/// User with company and sessions
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<UserProfile>> {
    let account = user::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    let company = user::find_company(&state.pool, id).await?;
    let sessions = session::find_by_user(&state.pool, id).await?;
    Ok(Json(UserProfile {
        user: account,
        company,
        sessions,
    }))
}

pub async fn update(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<UserUpdate>,
) -> AppResult<Json<User>> {
    validate(&payload)?;

    if !current_user.can_manage() {
        if id != current_user.id {
            return Err(AppError::not_owner("You can only update your own profile"));
        }
        if payload.status.is_some() {
            return Err(AppError::forbidden("Only managers can change account status"));
        }
    }

    if let Some(region_id) = payload.region_id {
        if !user::region_exists(&state.pool, region_id).await? {
            return Err(AppError::new(ErrorCode::RegionNotFound));
        }
    }

    let updated = user::update(&state.pool, id, &payload)
        .await
        .map_err(|e| match e {
            RepoError::NotFound(_) => not_found(id),
            other => other.into(),
        })?;
    tracing::info!(user_id = id, by = current_user.id, "User updated");
    Ok(Json(updated))
}

pub async fn delete(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<()>>> {
    if id == current_user.id {
        return Err(AppError::validation("You cannot delete your own account"));
    }
    if !user::delete(&state.pool, id).await? {
        return Err(not_found(id));
    }
    tracing::info!(user_id = id, by = current_user.id, "User deleted");
    Ok(Json(ApiResponse::ok_with_message("User deleted successfully")))
}
