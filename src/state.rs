//! Application state shared by all handlers.

use std::sync::Arc;

use crate::db::DbPool;
use crate::session::SessionStore;

#[derive(Clone)]
pub struct AppState {
  pub db: DbPool,
  pub sessions: Arc<SessionStore>,
}

impl AppState {
  pub fn new(db: DbPool) -> Self {
    Self {
      db,
      sessions: Arc::new(SessionStore::new()),
    }
  }
}
