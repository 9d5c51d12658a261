use axum::{Json, extract::State};
use chrono::{DateTime, Utc};
use serde::Serialize;

use super::ApiError;
use crate::db::{self, try_lock};
use crate::domain::Category;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct CategoryReport {
  pub category: Category,
  pub games_played: u32,
  pub best_time: Option<f64>,
  pub accuracy: u32,
  pub last_played: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
pub struct StatsResponse {
  pub player_name: String,
  pub total_games: u32,
  pub overall_accuracy: u32,
  pub categories: Vec<CategoryReport>,
}

/// GET /api/stats - summary for the active save
pub async fn stats(State(state): State<AppState>) -> Result<Json<StatsResponse>, ApiError> {
  let conn = try_lock(&state.db)?;
  let save = db::get_active_save(&conn)?.ok_or_else(|| ApiError::not_found("No active save"))?;

  let categories = Category::ALL
    .iter()
    .map(|&category| {
      let stats = save.category_stats(category);
      CategoryReport {
        category,
        games_played: stats.games_played,
        best_time: stats.best_time,
        accuracy: stats.accuracy(),
        last_played: stats.last_played,
      }
    })
    .collect();

  Ok(Json(StatsResponse {
    player_name: save.player_name.clone(),
    total_games: save.total_games,
    overall_accuracy: save.overall_accuracy(),
    categories,
  }))
}
