//! Master Registry Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use shared::models::{MasterCreate, MasterDetail, MasterQuery, MasterSearch, MasterSummary, MasterUpdate};
use shared::pagination::{Paginated, page_window};

use crate::api::{remove_upload, validate};
use crate::core::ServerState;
use crate::db::repository::master;
use crate::{ApiResponse, AppError, AppResult, ErrorCode};

pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<MasterQuery>,
) -> AppResult<Json<Paginated<MasterSummary>>> {
    let (page, limit, _) = page_window(query.page, query.limit);
    let (masters, total) = master::list(&state.pool, &query).await?;
    Ok(Json(Paginated::new(masters, total, page, limit)))
}

/// Masters by the professions they offer
pub async fn search(
    State(state): State<ServerState>,
    Query(query): Query<MasterSearch>,
) -> AppResult<Json<Paginated<MasterSummary>>> {
    let (page, limit, _) = page_window(query.page, query.limit);
    let (masters, total) = master::search(&state.pool, &query).await?;
    Ok(Json(Paginated::new(masters, total, page, limit)))
}

pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<MasterDetail>> {
    let detail = master::find_detail(&state.pool, id).await?.ok_or_else(|| {
        AppError::with_message(ErrorCode::MasterNotFound, format!("Master {id} not found"))
    })?;
    Ok(Json(detail))
}

pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<MasterCreate>,
) -> AppResult<Json<MasterDetail>> {
    validate(&payload)?;
    let detail = master::create(&state.pool, &payload).await?;
    tracing::info!(master_id = detail.master.id, "Master created");
    Ok(Json(detail))
}

pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<MasterUpdate>,
) -> AppResult<Json<MasterDetail>> {
    validate(&payload)?;
    let detail = master::update(&state.pool, id, &payload).await?;
    tracing::info!(master_id = id, "Master updated");
    Ok(Json(detail))
}

/// Delete the master and both of its images
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<()>>> {
    let removed = master::delete(&state.pool, id).await?;

    let uploads = state.uploads_dir();
    remove_upload(&state.pool, &uploads, removed.image.as_deref()).await;
    remove_upload(&state.pool, &uploads, removed.passport_image.as_deref()).await;

    tracing::info!(master_id = id, "Master deleted");
    Ok(Json(ApiResponse::ok_with_message("Master deleted successfully")))
}
