use rusqlite::{Connection, Result};

pub fn run_migrations(conn: &Connection) -> Result<()> {
  conn.execute_batch(
    r#"
    CREATE TABLE IF NOT EXISTS save_slots (
      slot INTEGER PRIMARY KEY CHECK (slot >= 0 AND slot < 3),
      player_name TEXT NOT NULL,
      created_at TEXT NOT NULL,
      last_played TEXT NOT NULL,
      total_games INTEGER NOT NULL DEFAULT 0,
      total_correct INTEGER NOT NULL DEFAULT 0,
      total_questions INTEGER NOT NULL DEFAULT 0
    );

    CREATE TABLE IF NOT EXISTS category_stats (
      slot INTEGER NOT NULL,
      category TEXT NOT NULL,
      games_played INTEGER NOT NULL DEFAULT 0,
      best_time REAL,
      total_correct INTEGER NOT NULL DEFAULT 0,
      total_questions INTEGER NOT NULL DEFAULT 0,
      last_played TEXT,
      PRIMARY KEY (slot, category),
      FOREIGN KEY (slot) REFERENCES save_slots(slot)
    );

    CREATE TABLE IF NOT EXISTS settings (
      key TEXT PRIMARY KEY,
      value TEXT NOT NULL
    );
    "#,
  )?;

  Ok(())
}
