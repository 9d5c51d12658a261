use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::ApiError;
use crate::db::{self, SaveSlot, try_lock};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct SavesResponse {
  pub slots: Vec<Option<SaveSlot>>,
  pub active_slot: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct CreateSaveRequest {
  #[serde(default)]
  pub player_name: String,
}

fn check_slot(slot: usize) -> Result<(), ApiError> {
  if db::is_valid_slot(slot) {
    Ok(())
  } else {
    Err(ApiError::bad_request(format!("No save slot {}", slot)))
  }
}

/// GET /api/saves
pub async fn list_saves(State(state): State<AppState>) -> Result<Json<SavesResponse>, ApiError> {
  let conn = try_lock(&state.db)?;
  Ok(Json(SavesResponse {
    slots: db::get_save_slots(&conn)?,
    active_slot: db::get_active_slot_index(&conn)?,
  }))
}

/// POST /api/saves/{slot} - create or overwrite, and activate
pub async fn create_save(
  State(state): State<AppState>,
  Path(slot): Path<usize>,
  Json(req): Json<CreateSaveRequest>,
) -> Result<(StatusCode, Json<SaveSlot>), ApiError> {
  check_slot(slot)?;
  let conn = try_lock(&state.db)?;
  let save = db::create_save(&conn, slot, &req.player_name, Utc::now())?;
  Ok((StatusCode::CREATED, Json(save)))
}

/// DELETE /api/saves/{slot}
pub async fn delete_save(
  State(state): State<AppState>,
  Path(slot): Path<usize>,
) -> Result<StatusCode, ApiError> {
  check_slot(slot)?;
  let conn = try_lock(&state.db)?;
  if db::get_save(&conn, slot)?.is_none() {
    return Err(ApiError::not_found(format!("Save slot {} is empty", slot)));
  }
  db::delete_save(&conn, slot)?;
  Ok(StatusCode::NO_CONTENT)
}

/// POST /api/saves/{slot}/activate
pub async fn activate_save(
  State(state): State<AppState>,
  Path(slot): Path<usize>,
) -> Result<Json<SaveSlot>, ApiError> {
  check_slot(slot)?;
  let conn = try_lock(&state.db)?;
  let save = db::get_save(&conn, slot)?
    .ok_or_else(|| ApiError::not_found(format!("Save slot {} is empty", slot)))?;
  db::set_active_slot(&conn, slot)?;
  Ok(Json(save))
}
