//! Admin Account Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use shared::models::{AdminCreate, User, UserQuery, UserRole, UserStatus};
use shared::pagination::{Paginated, page_window};

use crate::api::validate;
use crate::auth::{CurrentUser, password};
use crate::core::ServerState;
use crate::db::repository::user;
use crate::{ApiResponse, AppError, AppResult, ErrorCode};

const ADMIN_ROLES: &[UserRole] = &[UserRole::SuperAdmin, UserRole::Admin, UserRole::ViewerAdmin];

/// Create an ACTIVE back-office account
pub async fn create(
    State(state): State<ServerState>,
    Json(req): Json<AdminCreate>,
) -> AppResult<Json<User>> {
    validate(&req)?;

    if !req.role.is_staff() {
        return Err(AppError::validation(
            "role must be one of: SUPER_ADMIN, ADMIN, VIEWER_ADMIN",
        ));
    }
    if user::phone_exists(&state.pool, &req.phone_number).await? {
        return Err(AppError::new(ErrorCode::PhoneAlreadyExists));
    }
    if !user::region_exists(&state.pool, req.region_id).await? {
        return Err(AppError::new(ErrorCode::RegionNotFound));
    }

    let password_hash = password::hash_password(&req.password)?;
    let new_user = user::NewUser {
        first_name: &req.first_name,
        last_name: &req.last_name,
        phone_number: &req.phone_number,
        password_hash: &password_hash,
        role: req.role,
        status: UserStatus::Active,
        region_id: Some(req.region_id),
    };
    let created = user::create(&state.pool, &new_user, None).await?;

    tracing::info!(user_id = created.id, role = %created.role, "Admin account created");
    Ok(Json(created))
}

pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<UserQuery>,
) -> AppResult<Json<Paginated<User>>> {
    let (page, limit, _) = page_window(query.page, query.limit);
    let (admins, total) = user::list(&state.pool, &query, ADMIN_ROLES).await?;
    Ok(Json(Paginated::new(admins, total, page, limit)))
}

pub async fn delete(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<()>>> {
    if id == current_user.id {
        return Err(AppError::validation("You cannot delete your own account"));
    }

    let not_found = || AppError::with_message(ErrorCode::UserNotFound, format!("Admin {id} not found"));
    let target = user::find_by_id(&state.pool, id).await?.ok_or_else(not_found)?;
    if !target.role.is_staff() {
        return Err(not_found());
    }

    user::delete(&state.pool, id).await?;
    tracing::info!(user_id = id, by = current_user.id, "Admin account deleted");
    Ok(Json(ApiResponse::ok_with_message("Admin deleted successfully")))
}
