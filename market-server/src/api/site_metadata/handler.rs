//! Site Metadata Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use shared::models::{SiteMetadata, SiteMetadataCreate, SiteMetadataUpdate};

use crate::api::validate;
use crate::core::ServerState;
use crate::db::repository::site_metadata;
use crate::{ApiResponse, AppError, AppResult, ErrorCode};

pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<SiteMetadata>>> {
    let rows = site_metadata::find_all(&state.pool).await?;
    if rows.is_empty() {
        return Err(AppError::with_message(
            ErrorCode::NotFound,
            "No site metadata found!",
        ));
    }
    Ok(Json(rows))
}

/// A second create is a conflict
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<SiteMetadataCreate>,
) -> AppResult<Json<SiteMetadata>> {
    validate(&payload)?;
    let created = site_metadata::create(&state.pool, &payload).await?;
    tracing::info!(id = created.id, "Site metadata created");
    Ok(Json(created))
}

pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<SiteMetadataUpdate>,
) -> AppResult<Json<SiteMetadata>> {
    validate(&payload)?;
    let updated = site_metadata::update(&state.pool, id, &payload).await?;
    Ok(Json(updated))
}

pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<SiteMetadata>>> {
    let removed = site_metadata::delete(&state.pool, id).await?;
    tracing::info!(id, "Site metadata deleted");
    Ok(Json(ApiResponse::success_with_message(
        "Site metadata deleted successfully",
        removed,
    )))
}
