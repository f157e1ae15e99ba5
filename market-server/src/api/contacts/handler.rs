//! Contact Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use shared::models::{Contact, ContactCreate, ContactQuery, ContactUpdate};
use shared::pagination::{Paginated, page_window};

use crate::api::validate;
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::contact;
use crate::{ApiResponse, AppError, AppResult, ErrorCode};

const MSG_NOT_FOUND: &str = "Contact not found!";
const MSG_NOT_OWNER: &str = "Access denied! You are not allowed to view this contact";

async fn load(state: &ServerState, id: i64) -> AppResult<Contact> {
    contact::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::with_message(ErrorCode::NotFound, MSG_NOT_FOUND))
}

pub async fn create(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Json(payload): Json<ContactCreate>,
) -> AppResult<Json<Contact>> {
    validate(&payload)?;
    let created = contact::create(&state.pool, current_user.id, &payload).await?;
    tracing::info!(contact_id = created.id, user_id = current_user.id, "Contact request created");
    Ok(Json(created))
}

pub async fn list(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Query(query): Query<ContactQuery>,
) -> AppResult<Json<Paginated<Contact>>> {
    let (page, limit, _) = page_window(query.page, query.limit);
    let (items, total) = contact::list(&state.pool, &query, current_user.owner_scope()).await?;
    Ok(Json(Paginated::new(items, total, page, limit)))
}

/// Staff see every contact, customers only their own
pub async fn get_by_id(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<Contact>> {
    let found = load(&state, id).await?;
    if found.user_id != current_user.id && !current_user.is_staff() {
        return Err(AppError::not_owner(MSG_NOT_OWNER));
    }
    Ok(Json(found))
}

pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<ContactUpdate>,
) -> AppResult<Json<Contact>> {
    validate(&payload)?;
    load(&state, id).await?;
    let updated = contact::update(&state.pool, id, &payload).await?;
    Ok(Json(updated))
}

pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<()>>> {
    load(&state, id).await?;
    contact::delete(&state.pool, id).await?;
    tracing::info!(contact_id = id, "Contact request deleted");
    Ok(Json(ApiResponse::ok_with_message("Contact deleted successfully")))
}
