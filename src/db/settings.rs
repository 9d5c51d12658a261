//! Key-value settings

use rusqlite::{Connection, OptionalExtension, Result, params};

pub fn get_setting(conn: &Connection, key: &str) -> Result<Option<String>> {
  conn
    .query_row("SELECT value FROM settings WHERE key = ?1", params![key], |row| {
      row.get(0)
    })
    .optional()
}

pub fn set_setting(conn: &Connection, key: &str, value: &str) -> Result<()> {
  conn.execute(
    "INSERT OR REPLACE INTO settings (key, value) VALUES (?1, ?2)",
    params![key, value],
  )?;
  Ok(())
}

pub fn delete_setting(conn: &Connection, key: &str) -> Result<()> {
  conn.execute("DELETE FROM settings WHERE key = ?1", params![key])?;
  Ok(())
}
