//! Profession handlers that carry the level and tool joins

use axum::{
    Json,
    extract::{Path, State},
};
use shared::models::{ProfessionCreate, ProfessionDetail, ProfessionUpdate};

use super::handler::not_found;
use crate::api::validate;
use crate::core::ServerState;
use crate::db::repository::profession::{self, Professions};
use crate::AppResult;

pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ProfessionDetail>> {
    let detail = profession::find_detail(&state.pool, id)
        .await?
        .ok_or_else(|| not_found::<Professions>(id))?;
    Ok(Json(detail))
}

pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<ProfessionCreate>,
) -> AppResult<Json<ProfessionDetail>> {
    validate(&payload)?;
    let detail = profession::create(&state.pool, &payload).await?;
    tracing::info!(profession_id = detail.profession.id, "Profession created");
    Ok(Json(detail))
}

pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<ProfessionUpdate>,
) -> AppResult<Json<ProfessionDetail>> {
    validate(&payload)?;
    let detail = profession::update(&state.pool, id, &payload).await?;
    tracing::info!(profession_id = id, "Profession updated");
    Ok(Json(detail))
}
