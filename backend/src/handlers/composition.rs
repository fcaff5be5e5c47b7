//! HTTP handlers for feed composition endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use shared::{
    Composition, CompositionId, CompositionNameInput, CompositionSummary, ReplaceCompositionInput,
};

use crate::error::AppResult;
use crate::extract::AppJson;
use crate::services::CompositionService;
use crate::AppState;

/// List compositions for the picker
pub async fn list_compositions(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<CompositionSummary>>> {
    let service = CompositionService::new(state.db);
    let compositions = service.list_compositions().await?;
    Ok(Json(compositions))
}

/// Get a composition with its members
pub async fn get_composition(
    State(state): State<AppState>,
    Path(composition_id): Path<CompositionId>,
) -> AppResult<Json<Composition>> {
    let service = CompositionService::new(state.db);
    let composition = service.get_composition(composition_id).await?;
    Ok(Json(composition))
}

/// Create an empty composition
pub async fn create_composition(
    State(state): State<AppState>,
    AppJson(input): AppJson<CompositionNameInput>,
) -> AppResult<(StatusCode, Json<Composition>)> {
    let service = CompositionService::new(state.db);
    let composition = service.create_composition(input).await?;
    Ok((StatusCode::CREATED, Json(composition)))
}

/// Replace a composition's name and member list
pub async fn replace_composition(
    State(state): State<AppState>,
    Path(composition_id): Path<CompositionId>,
    AppJson(input): AppJson<ReplaceCompositionInput>,
) -> AppResult<Json<Composition>> {
    let service = CompositionService::new(state.db);
    let composition = service.replace_composition(composition_id, input).await?;
    Ok(Json(composition))
}

/// Rename a composition
pub async fn rename_composition(
    State(state): State<AppState>,
    Path(composition_id): Path<CompositionId>,
    AppJson(input): AppJson<CompositionNameInput>,
) -> AppResult<Json<Composition>> {
    let service = CompositionService::new(state.db);
    let composition = service.rename_composition(composition_id, input).await?;
    Ok(Json(composition))
}
