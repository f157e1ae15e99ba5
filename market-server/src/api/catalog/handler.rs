//! Generic Catalog Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use shared::models::CatalogQuery;
use shared::pagination::{Paginated, page_window};

use crate::api::{remove_upload, validate};
use crate::core::ServerState;
use crate::db::repository::catalog::{self, CatalogResource};
use crate::{ApiResponse, AppError, AppResult, ErrorCode};

pub(super) fn not_found<R: CatalogResource>(id: i64) -> AppError {
    AppError::with_message(
        ErrorCode::CatalogNotFound,
        format!("{} {id} not found", R::LABEL),
    )
}

pub async fn list<R: CatalogResource>(
    State(state): State<ServerState>,
    Query(query): Query<CatalogQuery>,
) -> AppResult<Json<Paginated<R::Row>>> {
    let (page, limit, _) = page_window(query.page, query.limit);
    let (rows, total) = catalog::list::<R>(&state.pool, &query).await?;
    Ok(Json(Paginated::new(rows, total, page, limit)))
}

pub async fn get_by_id<R: CatalogResource>(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<R::Row>> {
    let row = catalog::find_by_id::<R>(&state.pool, id)
        .await?
        .ok_or_else(|| not_found::<R>(id))?;
    Ok(Json(row))
}

pub async fn create<R: CatalogResource>(
    State(state): State<ServerState>,
    Json(payload): Json<R::Create>,
) -> AppResult<Json<R::Row>> {
    validate(&payload)?;
    let row = catalog::create::<R>(&state.pool, &payload).await?;
    tracing::info!(resource = R::TABLE, "Catalog entry created");
    Ok(Json(row))
}

pub async fn update<R: CatalogResource>(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<R::Update>,
) -> AppResult<Json<R::Row>> {
    validate(&payload)?;
    let row = catalog::update::<R>(&state.pool, id, &payload).await?;
    tracing::info!(resource = R::TABLE, id, "Catalog entry updated");
    Ok(Json(row))
}

/// Delete the row, then its image
pub async fn delete<R: CatalogResource>(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<()>>> {
    let removed = catalog::delete::<R>(&state.pool, id).await?;
    remove_upload(&state.pool, &state.uploads_dir(), R::image(&removed)).await;

    tracing::info!(resource = R::TABLE, id, "Catalog entry deleted");
    Ok(Json(ApiResponse::ok_with_message(format!(
        "{} deleted successfully",
        R::LABEL
    ))))
}
