//! Practice sessions: the countdown, the running score and the current problem.
//!
//! A [`GameSession`] drives one 20-question run. It is pure state plus
//! explicit timestamps, so the HTTP layer owns the clock and tests can
//! replay a whole session deterministically. Live sessions are kept in a
//! [`SessionStore`] owned by the application state and keyed by a cookie id.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Mutex, PoisonError};

use crate::config;
use crate::domain::{Answer, Category, GameResult, Problem};
use crate::quiz::{GenerateError, ProblemSource, RandomSource, generate_options, generate_problem};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
  Playing,
  Completed,
  TimedOut,
  Abandoned,
}

impl SessionStatus {
  pub fn as_str(&self) -> &'static str {
    match self {
      SessionStatus::Playing => "playing",
      SessionStatus::Completed => "completed",
      SessionStatus::TimedOut => "timed_out",
      SessionStatus::Abandoned => "abandoned",
    }
  }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SessionError {
  /// The session already ended
  NotActive(SessionStatus),
  Generate(GenerateError),
}

impl fmt::Display for SessionError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      SessionError::NotActive(status) => write!(f, "Session is {}", status.as_str()),
      SessionError::Generate(e) => write!(f, "{}", e),
    }
  }
}

impl std::error::Error for SessionError {}

impl From<GenerateError> for SessionError {
  fn from(e: GenerateError) -> Self {
    SessionError::Generate(e)
  }
}

/// What happened after an answer was submitted.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
  /// Answer scored, the next problem is ready
  Next { was_correct: bool, correct_answer: Answer },
  /// Last question answered in time
  Finished {
    was_correct: bool,
    correct_answer: Answer,
    result: GameResult,
  },
  /// The deadline passed before the answer arrived; it was not scored
  TimedOut(GameResult),
}

impl SubmitOutcome {
  /// The result to record, if the session ended
  pub fn result(&self) -> Option<&GameResult> {
    match self {
      SubmitOutcome::Next { .. } => None,
      SubmitOutcome::Finished { result, .. } | SubmitOutcome::TimedOut(result) => Some(result),
    }
  }
}

#[derive(Debug, Clone)]
pub struct GameSession {
  category: Category,
  index: usize,
  correct: u32,
  status: SessionStatus,
  started_at: DateTime<Utc>,
  deadline: DateTime<Utc>,
  ended_at: Option<DateTime<Utc>>,
  problem: Problem,
  options: Vec<Answer>,
}

impl GameSession {
  /// Start a session at `now` with the first problem drawn from `source`.
  pub fn start<R: RandomSource>(
    category: Category,
    now: DateTime<Utc>,
    source: &mut dyn ProblemSource,
    rng: &mut R,
  ) -> Result<Self, SessionError> {
    let problem = next_problem(source, category, 0, rng)?;
    let options = generate_options(&problem.answer, problem.shape, rng);
    let limit = Duration::seconds(i64::from(config::time_limit_secs(category)));

    tracing::info!(category = category.as_str(), "practice session started");
    Ok(Self {
      category,
      index: 0,
      correct: 0,
      status: SessionStatus::Playing,
      started_at: now,
      deadline: now + limit,
      ended_at: None,
      problem,
      options,
    })
  }

  pub fn category(&self) -> Category {
    self.category
  }

  /// Zero-based position of the current problem
  pub fn index(&self) -> usize {
    self.index
  }

  pub fn correct(&self) -> u32 {
    self.correct
  }

  pub fn status(&self) -> SessionStatus {
    self.status
  }

  pub fn problem(&self) -> &Problem {
    &self.problem
  }

  pub fn options(&self) -> &[Answer] {
    &self.options
  }

  /// Whole seconds left on the countdown, rounded up
  pub fn remaining_seconds(&self, now: DateTime<Utc>) -> u32 {
    if self.status != SessionStatus::Playing {
      return 0;
    }
    let millis = (self.deadline - now).num_milliseconds();
    if millis <= 0 {
      return 0;
    }
    ((millis + 999) / 1000) as u32
  }

  /// End the session as timed out if its deadline has passed.
  ///
  /// Returns the result only on the call that performs the transition.
  pub fn expire_if_due(&mut self, now: DateTime<Utc>) -> Option<GameResult> {
    if self.status != SessionStatus::Playing || now < self.deadline {
      return None;
    }
    self.end(SessionStatus::TimedOut, self.deadline);
    tracing::info!(
      category = self.category.as_str(),
      correct = self.correct,
      "practice session timed out"
    );
    self.result()
  }

  /// Score `choice` against the current problem and move on.
  pub fn submit<R: RandomSource>(
    &mut self,
    choice: &Answer,
    now: DateTime<Utc>,
    source: &mut dyn ProblemSource,
    rng: &mut R,
  ) -> Result<SubmitOutcome, SessionError> {
    if self.status != SessionStatus::Playing {
      return Err(SessionError::NotActive(self.status));
    }
    if let Some(result) = self.expire_if_due(now) {
      return Ok(SubmitOutcome::TimedOut(result));
    }

    let was_correct = self.problem.is_correct(choice);
    let correct_answer = self.problem.answer.clone();
    if was_correct {
      self.correct += 1;
    }
    tracing::debug!(index = self.index, was_correct, "answer submitted");

    if self.index + 1 >= config::QUESTIONS_PER_SESSION {
      self.end(SessionStatus::Completed, now);
      tracing::info!(
        category = self.category.as_str(),
        correct = self.correct,
        "practice session completed"
      );
      let result = self.build_result();
      return Ok(SubmitOutcome::Finished {
        was_correct,
        correct_answer,
        result,
      });
    }

    self.index += 1;
    self.problem = next_problem(source, self.category, self.index, rng)?;
    self.options = generate_options(&self.problem.answer, self.problem.shape, rng);
    Ok(SubmitOutcome::Next {
      was_correct,
      correct_answer,
    })
  }

  /// Stop without producing a result to record
  pub fn abandon(&mut self, now: DateTime<Utc>) {
    if self.status == SessionStatus::Playing {
      self.end(SessionStatus::Abandoned, now);
    }
  }

  /// Final result once the session completed or timed out
  pub fn result(&self) -> Option<GameResult> {
    match self.status {
      SessionStatus::Completed | SessionStatus::TimedOut => Some(self.build_result()),
      SessionStatus::Playing | SessionStatus::Abandoned => None,
    }
  }

  pub fn snapshot(&self, now: DateTime<Utc>) -> SessionSnapshot {
    SessionSnapshot {
      category: self.category,
      status: self.status,
      question_number: self.index + 1,
      total_questions: config::QUESTIONS_PER_SESSION,
      correct: self.correct,
      remaining_seconds: self.remaining_seconds(now),
      question: self.problem.text.clone(),
      options: self.options.clone(),
    }
  }

  fn end(&mut self, status: SessionStatus, at: DateTime<Utc>) {
    self.status = status;
    self.ended_at = Some(at);
  }

  fn build_result(&self) -> GameResult {
    let ended = self.ended_at.unwrap_or(self.deadline);
    GameResult {
      category: self.category,
      correct: self.correct,
      total: config::QUESTIONS_PER_SESSION as u32,
      time_elapsed: (ended - self.started_at).num_milliseconds() as f64 / 1000.0,
      completed: self.status == SessionStatus::Completed,
    }
  }
}

/// Ask `source` for a problem, falling back to local generation on failure
fn next_problem<R: RandomSource>(
  source: &mut dyn ProblemSource,
  category: Category,
  index: usize,
  rng: &mut R,
) -> Result<Problem, SessionError> {
  match source.next_problem(category, index, rng) {
    Ok(problem) => Ok(problem),
    Err(e) => {
      tracing::warn!("Problem source failed, generating locally: {}", e);
      Ok(generate_problem(category, index, rng)?)
    }
  }
}

/// Client-facing view of a running session (answer withheld)
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
  pub category: Category,
  pub status: SessionStatus,
  pub question_number: usize,
  pub total_questions: usize,
  pub correct: u32,
  pub remaining_seconds: u32,
  pub question: String,
  pub options: Vec<Answer>,
}

// ==================== Session Store ====================

struct SessionEntry {
  session: GameSession,
  last_access: DateTime<Utc>,
}

/// In-memory practice sessions keyed by cookie id
#[derive(Default)]
pub struct SessionStore {
  sessions: Mutex<HashMap<String, SessionEntry>>,
}

impl SessionStore {
  pub fn new() -> Self {
    Self::default()
  }

  fn entries(&self) -> std::sync::MutexGuard<'_, HashMap<String, SessionEntry>> {
    self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
  }

  /// Store `session` under `id`, replacing any previous one
  pub fn insert(&self, id: &str, session: GameSession, now: DateTime<Utc>) {
    let mut sessions = self.entries();
    if rand::random::<u8>() < config::SESSION_CLEANUP_THRESHOLD {
      cleanup_expired(&mut sessions, now);
    }
    sessions.insert(
      id.to_string(),
      SessionEntry {
        session,
        last_access: now,
      },
    );
  }

  /// Run `f` on the session under `id` while holding the store lock.
  ///
  /// Returns `None` when no live session has that id.
  pub fn with_session<T>(
    &self,
    id: &str,
    now: DateTime<Utc>,
    f: impl FnOnce(&mut GameSession) -> T,
  ) -> Option<T> {
    let mut sessions = self.entries();
    let expiry = now - Duration::hours(config::SESSION_EXPIRY_HOURS);
    if sessions.get(id).is_some_and(|e| e.last_access <= expiry) {
      sessions.remove(id);
      return None;
    }
    let entry = sessions.get_mut(id)?;
    entry.last_access = now;
    Some(f(&mut entry.session))
  }

  pub fn remove(&self, id: &str) -> Option<GameSession> {
    self.entries().remove(id).map(|e| e.session)
  }

  pub fn len(&self) -> usize {
    self.entries().len()
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  /// Drop every session idle for longer than the expiry window
  pub fn cleanup(&self, now: DateTime<Utc>) {
    cleanup_expired(&mut self.entries(), now);
  }
}

fn cleanup_expired(sessions: &mut HashMap<String, SessionEntry>, now: DateTime<Utc>) {
  let expiry = now - Duration::hours(config::SESSION_EXPIRY_HOURS);
  sessions.retain(|_, entry| entry.last_access > expiry);
}

const SESSION_ID_CHARSET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Random 32-character cookie id
pub fn generate_session_id() -> String {
  use rand::Rng;
  let mut rng = rand::rng();
  (0..32)
    .map(|_| SESSION_ID_CHARSET[rng.random_range(0..SESSION_ID_CHARSET.len())] as char)
    .collect()
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::quiz::{LocalSource, RngSource, SourceError};
  use chrono::TimeZone;
  use rand::SeedableRng;

  fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap()
  }

  fn seeded() -> RngSource<rand::rngs::StdRng> {
    RngSource(rand::rngs::StdRng::seed_from_u64(7))
  }

  fn wrong_answer(problem: &Problem) -> Answer {
    match &problem.answer {
      Answer::Integer(n) => Answer::Integer(n + 1),
      Answer::Bool(b) => Answer::Bool(!b),
      Answer::Text(s) => Answer::Text(format!("{} ", s)),
    }
  }

  struct OfflineSource;

  impl ProblemSource for OfflineSource {
    fn next_problem(
      &mut self,
      _category: Category,
      _index: usize,
      _rng: &mut dyn RandomSource,
    ) -> Result<Problem, SourceError> {
      Err(SourceError::Unavailable("connection refused".to_string()))
    }
  }

  #[test]
  fn test_start_sets_first_problem() {
    let mut rng = seeded();
    let session =
      GameSession::start(Category::Multiplication, t0(), &mut LocalSource, &mut rng).unwrap();
    assert_eq!(session.index(), 0);
    assert_eq!(session.status(), SessionStatus::Playing);
    assert!(session.options().contains(&session.problem().answer));
    assert_eq!(session.remaining_seconds(t0()), 120);
  }

  #[test]
  fn test_full_session_all_correct() {
    let mut rng = seeded();
    let mut source = LocalSource;
    let mut session =
      GameSession::start(Category::Addition, t0(), &mut source, &mut rng).unwrap();

    let mut last = None;
    for i in 0..20 {
      let at = t0() + Duration::milliseconds(2260 * (i + 1));
      let choice = session.problem().answer.clone();
      last = Some(session.submit(&choice, at, &mut source, &mut rng).unwrap());
    }

    let expected = GameResult {
      category: Category::Addition,
      correct: 20,
      total: 20,
      time_elapsed: 45.2,
      completed: true,
    };
    match last.unwrap() {
      SubmitOutcome::Finished { result, was_correct, .. } => {
        assert!(was_correct);
        assert_eq!(result, expected);
      }
      other => panic!("unexpected outcome {:?}", other),
    }
    assert_eq!(session.result(), Some(expected));
  }

  #[test]
  fn test_wrong_answers_are_counted() {
    let mut rng = seeded();
    let mut source = LocalSource;
    let mut session =
      GameSession::start(Category::Divisibility, t0(), &mut source, &mut rng).unwrap();

    let choice = wrong_answer(session.problem());
    let outcome = session.submit(&choice, t0(), &mut source, &mut rng).unwrap();
    assert!(matches!(outcome, SubmitOutcome::Next { was_correct: false, .. }));
    assert_eq!(session.correct(), 0);
    assert_eq!(session.index(), 1);
  }

  #[test]
  fn test_submit_after_deadline_times_out() {
    let mut rng = seeded();
    let mut source = LocalSource;
    let mut session =
      GameSession::start(Category::Divisibility, t0(), &mut source, &mut rng).unwrap();

    let choice = session.problem().answer.clone();
    session
      .submit(&choice, t0() + Duration::seconds(10), &mut source, &mut rng)
      .unwrap();

    let late = t0() + Duration::seconds(95);
    let choice = session.problem().answer.clone();
    let outcome = session.submit(&choice, late, &mut source, &mut rng).unwrap();
    match outcome {
      SubmitOutcome::TimedOut(result) => {
        assert!(!result.completed);
        assert_eq!(result.correct, 1);
        assert_eq!(result.total, 20);
        assert_eq!(result.time_elapsed, 90.0);
      }
      other => panic!("unexpected outcome {:?}", other),
    }
    assert_eq!(
      session.submit(&choice, late, &mut source, &mut rng),
      Err(SessionError::NotActive(SessionStatus::TimedOut))
    );
  }

  #[test]
  fn test_expire_if_due_fires_once() {
    let mut rng = seeded();
    let mut session =
      GameSession::start(Category::Fractions, t0(), &mut LocalSource, &mut rng).unwrap();

    assert_eq!(session.expire_if_due(t0() + Duration::seconds(119)), None);
    assert_eq!(session.remaining_seconds(t0() + Duration::milliseconds(119_500)), 1);

    let result = session.expire_if_due(t0() + Duration::seconds(200)).unwrap();
    assert!(!result.completed);
    assert_eq!(result.time_elapsed, 120.0);
    assert_eq!(session.expire_if_due(t0() + Duration::seconds(300)), None);
    assert_eq!(session.remaining_seconds(t0() + Duration::seconds(300)), 0);
  }

  #[test]
  fn test_abandon_has_no_result() {
    let mut rng = seeded();
    let mut session =
      GameSession::start(Category::Addition, t0(), &mut LocalSource, &mut rng).unwrap();
    session.abandon(t0());
    assert_eq!(session.status(), SessionStatus::Abandoned);
    assert_eq!(session.result(), None);
  }

  #[test]
  fn test_failing_source_falls_back() {
    let mut rng = seeded();
    let mut source = OfflineSource;
    let mut session =
      GameSession::start(Category::Multiplication, t0(), &mut source, &mut rng).unwrap();
    assert!(!session.problem().text.is_empty());

    let choice = session.problem().answer.clone();
    let outcome = session.submit(&choice, t0(), &mut source, &mut rng).unwrap();
    assert!(matches!(outcome, SubmitOutcome::Next { was_correct: true, .. }));
  }

  #[test]
  fn test_snapshot_hides_answer() {
    let mut rng = seeded();
    let session =
      GameSession::start(Category::Addition, t0(), &mut LocalSource, &mut rng).unwrap();
    let snapshot = session.snapshot(t0() + Duration::seconds(30));
    assert_eq!(snapshot.question_number, 1);
    assert_eq!(snapshot.remaining_seconds, 90);
    let json = serde_json::to_value(&snapshot).unwrap();
    assert!(json.get("answer").is_none());
    assert_eq!(json["status"], "playing");
  }

  #[test]
  fn test_store_round_trip_and_expiry() {
    let mut rng = seeded();
    let store = SessionStore::new();
    let session =
      GameSession::start(Category::Addition, t0(), &mut LocalSource, &mut rng).unwrap();
    store.insert("abc", session, t0());

    let index = store.with_session("abc", t0() + Duration::minutes(30), |s| s.index());
    assert_eq!(index, Some(0));
    assert_eq!(store.with_session("missing", t0(), |s| s.index()), None);

    let later = t0() + Duration::minutes(30) + Duration::hours(1);
    assert_eq!(store.with_session("abc", later, |s| s.index()), None);
    assert!(store.is_empty());
  }

  #[test]
  fn test_store_cleanup() {
    let mut rng = seeded();
    let store = SessionStore::new();
    for (id, at) in [("old", t0()), ("new", t0() + Duration::minutes(90))] {
      let session = GameSession::start(Category::Addition, at, &mut LocalSource, &mut rng).unwrap();
      store.insert(id, session, at);
    }
    store.cleanup(t0() + Duration::minutes(100));
    assert_eq!(store.len(), 1);
    assert!(store.remove("new").is_some());
  }

  #[test]
  fn test_generate_session_id() {
    let id = generate_session_id();
    assert_eq!(id.len(), 32);
    assert!(id.chars().all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
    assert_ne!(id, generate_session_id());
  }
}
