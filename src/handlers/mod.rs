//! JSON API for save slots, practice sessions and statistics.

pub mod practice;
pub mod saves;
pub mod stats;

use axum::{
  Json, Router,
  http::StatusCode,
  response::{IntoResponse, Response},
  routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::db::DbLockError;
use crate::session::SessionError;
use crate::state::AppState;

pub fn router(state: AppState) -> Router {
  Router::new()
    .route("/api/saves", get(saves::list_saves))
    .route(
      "/api/saves/{slot}",
      post(saves::create_save).delete(saves::delete_save),
    )
    .route("/api/saves/{slot}/activate", post(saves::activate_save))
    .route("/api/stats", get(stats::stats))
    .route("/api/practice", get(practice::current))
    .route("/api/practice/answer", post(practice::answer))
    .route("/api/practice/abandon", post(practice::abandon))
    .route("/api/practice/{category}", post(practice::start))
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

#[derive(Debug)]
pub enum ApiError {
  BadRequest(String),
  NotFound(String),
  Conflict(String),
  Internal(String),
}

impl ApiError {
  pub fn bad_request(message: impl Into<String>) -> Self {
    ApiError::BadRequest(message.into())
  }

  pub fn not_found(message: impl Into<String>) -> Self {
    ApiError::NotFound(message.into())
  }
}

impl From<rusqlite::Error> for ApiError {
  fn from(err: rusqlite::Error) -> Self {
    tracing::error!("Database error: {}", err);
    ApiError::Internal("Database error".to_string())
  }
}

impl From<DbLockError> for ApiError {
  fn from(err: DbLockError) -> Self {
    ApiError::Internal(err.to_string())
  }
}

impl From<SessionError> for ApiError {
  fn from(err: SessionError) -> Self {
    match err {
      SessionError::NotActive(_) => ApiError::Conflict(err.to_string()),
      SessionError::Generate(e) => {
        tracing::error!("Problem generation failed: {}", e);
        ApiError::Internal(e.to_string())
      }
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match self {
      ApiError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
      ApiError::NotFound(message) => (StatusCode::NOT_FOUND, message),
      ApiError::Conflict(message) => (StatusCode::CONFLICT, message),
      ApiError::Internal(message) => (StatusCode::INTERNAL_SERVER_ERROR, message),
    };
    let body = serde_json::json!({
      "message": message,
      "status": status.as_u16()
    });
    (status, Json(body)).into_response()
  }
}
