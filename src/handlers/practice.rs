//! Practice session endpoints.
//!
//! The session lives in the in-memory store under the id carried by the
//! `practice_session` cookie. Results of sessions that complete or time out
//! are written to the active save slot.

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::ApiError;
use crate::config;
use crate::db::{self, SaveSlot, try_lock};
use crate::domain::{Answer, Category, GameResult};
use crate::quiz::{LocalSource, RngSource};
use crate::session::{GameSession, SessionSnapshot, SubmitOutcome, generate_session_id};
use crate::state::AppState;

pub const PRACTICE_COOKIE: &str = "practice_session";

#[derive(Debug, Deserialize)]
pub struct AnswerRequest {
  pub answer: Answer,
}

#[derive(Debug, Serialize)]
pub struct AnswerResponse {
  /// Whether the submitted answer was scored as correct (false when it arrived late)
  pub was_correct: bool,
  pub correct_answer: Option<Answer>,
  pub session: SessionSnapshot,
  pub result: Option<GameResult>,
  pub save: Option<SaveSlot>,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
  pub session: SessionSnapshot,
  pub result: Option<GameResult>,
  pub save: Option<SaveSlot>,
}

fn session_id(jar: &CookieJar) -> Result<String, ApiError> {
  jar
    .get(PRACTICE_COOKIE)
    .map(|c| c.value().to_string())
    .ok_or_else(|| ApiError::not_found("No practice session"))
}

/// Write a finished session to the active save, if there is one
fn record_result(state: &AppState, result: &GameResult) -> Result<Option<SaveSlot>, ApiError> {
  let conn = try_lock(&state.db)?;
  let save = db::record_game(&conn, result, Utc::now())?;
  if save.is_none() {
    tracing::debug!("No active save, result not recorded");
  }
  Ok(save)
}

/// POST /api/practice/{category} - start a new session, replacing any current one
pub async fn start(
  State(state): State<AppState>,
  jar: CookieJar,
  Path(category): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
  let category: Category = category
    .parse()
    .map_err(|e: crate::domain::ParseCategoryError| ApiError::bad_request(e.to_string()))?;

  let now = Utc::now();
  let session = {
    let mut rng = RngSource::thread();
    GameSession::start(category, now, &mut LocalSource, &mut rng)?
  };
  let snapshot = session.snapshot(now);

  let id = jar
    .get(PRACTICE_COOKIE)
    .map(|c| c.value().to_string())
    .unwrap_or_else(generate_session_id);
  state.sessions.insert(&id, session, now);

  let cookie = Cookie::build((PRACTICE_COOKIE, id))
    .path("/")
    .http_only(true)
    .max_age(time::Duration::hours(config::SESSION_EXPIRY_HOURS))
    .build();

  Ok((StatusCode::CREATED, jar.add(cookie), Json(snapshot)))
}

/// GET /api/practice - current state, ending the session if its time ran out
pub async fn current(
  State(state): State<AppState>,
  jar: CookieJar,
) -> Result<Json<SessionResponse>, ApiError> {
  let id = session_id(&jar)?;
  let now = Utc::now();

  let (snapshot, expired) = state
    .sessions
    .with_session(&id, now, |session| {
      let expired = session.expire_if_due(now);
      (session.snapshot(now), expired)
    })
    .ok_or_else(|| ApiError::not_found("No practice session"))?;

  let save = match &expired {
    Some(result) => record_result(&state, result)?,
    None => None,
  };

  Ok(Json(SessionResponse {
    session: snapshot,
    result: expired,
    save,
  }))
}

/// POST /api/practice/answer
pub async fn answer(
  State(state): State<AppState>,
  jar: CookieJar,
  Json(req): Json<AnswerRequest>,
) -> Result<Json<AnswerResponse>, ApiError> {
  let id = session_id(&jar)?;
  let now = Utc::now();

  let (outcome, snapshot) = state
    .sessions
    .with_session(&id, now, |session| {
      let mut rng = RngSource::thread();
      session
        .submit(&req.answer, now, &mut LocalSource, &mut rng)
        .map(|outcome| (outcome, session.snapshot(now)))
    })
    .ok_or_else(|| ApiError::not_found("No practice session"))??;

  let result = outcome.result().cloned();
  let save = match &result {
    Some(result) => record_result(&state, result)?,
    None => None,
  };

  let (was_correct, correct_answer) = match outcome {
    SubmitOutcome::Next {
      was_correct,
      correct_answer,
    }
    | SubmitOutcome::Finished {
      was_correct,
      correct_answer,
      ..
    } => (was_correct, Some(correct_answer)),
    SubmitOutcome::TimedOut(_) => (false, None),
  };

  Ok(Json(AnswerResponse {
    was_correct,
    correct_answer,
    session: snapshot,
    result,
    save,
  }))
}

/// POST /api/practice/abandon - drop the session without recording it
pub async fn abandon(
  State(state): State<AppState>,
  jar: CookieJar,
) -> Result<impl IntoResponse, ApiError> {
  let id = session_id(&jar)?;
  let mut session = state
    .sessions
    .remove(&id)
    .ok_or_else(|| ApiError::not_found("No practice session"))?;
  session.abandon(Utc::now());
  tracing::info!(category = session.category().as_str(), "practice session abandoned");

  let cookie = Cookie::build((PRACTICE_COOKIE, ""))
    .path("/")
    .max_age(time::Duration::seconds(0))
    .build();
  Ok((jar.remove(cookie), StatusCode::NO_CONTENT))
}
