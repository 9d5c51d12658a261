//! Test utilities for database setup.
//!
//! Reuses the real schema initialization so tests never carry their own copy
//! of the table definitions.

use rusqlite::Connection;
use std::path::Path;
use tempfile::TempDir;

/// Save database in a temporary directory, removed on drop.
pub struct TestEnv {
  /// Kept alive so the database file persists for the test
  pub temp: TempDir,
  pub conn: Connection,
}

impl TestEnv {
  pub fn new() -> rusqlite::Result<Self> {
    let temp =
      TempDir::new().map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;

    let conn = Connection::open(temp.path().join("math_sprint.db"))?;
    crate::db::schema::run_migrations(&conn)?;

    Ok(Self { temp, conn })
  }

  /// Temporary directory path for creating test files.
  pub fn path(&self) -> &Path {
    self.temp.path()
  }
}
