//! Character builder REST routes

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use crate::application::dto::{CharacterViewDto, SkillCheckDto, SyncStatusDto};
use crate::domain::errors::CharacterError;
use crate::domain::value_objects::Catalog;
use crate::infrastructure::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AdjustRequest {
    pub delta: i64,
}

#[derive(Debug, Deserialize)]
pub struct SelectClassRequest {
    pub class: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SkillCheckRequest {
    pub skill: String,
    pub dc: i64,
}

fn not_found(error: CharacterError) -> (StatusCode, String) {
    (StatusCode::NOT_FOUND, error.to_string())
}

pub async fn get_catalog(State(state): State<Arc<AppState>>) -> Json<Catalog> {
    Json(state.catalog.as_ref().clone())
}

pub async fn get_character(State(state): State<Arc<AppState>>) -> Json<CharacterViewDto> {
    Json(state.session.view().await)
}

pub async fn get_sync_status(State(state): State<Arc<AppState>>) -> Json<SyncStatusDto> {
    Json(state.session.sync_status().into())
}

pub async fn adjust_attribute(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
    Json(req): Json<AdjustRequest>,
) -> Result<Json<CharacterViewDto>, (StatusCode, String)> {
    state
        .session
        .adjust_attribute(&name, req.delta)
        .await
        .map(Json)
        .map_err(not_found)
}

pub async fn adjust_skill(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
    Json(req): Json<AdjustRequest>,
) -> Result<Json<CharacterViewDto>, (StatusCode, String)> {
    state
        .session
        .adjust_skill(&name, req.delta)
        .await
        .map(Json)
        .map_err(not_found)
}

pub async fn select_class(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SelectClassRequest>,
) -> Result<Json<CharacterViewDto>, (StatusCode, String)> {
    state
        .session
        .select_class(req.class.as_deref())
        .await
        .map(Json)
        .map_err(not_found)
}

pub async fn roll_skill_check(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SkillCheckRequest>,
) -> Result<Json<SkillCheckDto>, (StatusCode, String)> {
    state
        .session
        .roll_skill_check(&req.skill, req.dc)
        .await
        .map(Json)
        .map_err(not_found)
}
