//! Save slots and per-category statistics.
//!
//! Players pick one of [`SAVE_SLOT_COUNT`] slots. The active slot is kept in
//! the settings table and receives every recorded game.

use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, Result, Row, params};
use serde::Serialize;
use std::collections::BTreeMap;

use super::settings::{delete_setting, get_setting, set_setting};
use crate::config::SAVE_SLOT_COUNT;
use crate::domain::{Category, GameResult};

const ACTIVE_SLOT_KEY: &str = "active_slot";

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct CategoryStats {
  pub games_played: u32,
  pub best_time: Option<f64>,
  pub total_correct: u32,
  pub total_questions: u32,
  pub last_played: Option<DateTime<Utc>>,
}

impl CategoryStats {
  /// Rounded percentage of correct answers, 0 when nothing was attempted
  pub fn accuracy(&self) -> u32 {
    percent(self.total_correct, self.total_questions)
  }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SaveSlot {
  /// 1-based slot number shown to players
  pub id: usize,
  pub player_name: String,
  pub created_at: DateTime<Utc>,
  pub last_played: DateTime<Utc>,
  pub total_games: u32,
  pub total_correct: u32,
  pub total_questions: u32,
  pub stats: BTreeMap<Category, CategoryStats>,
}

impl SaveSlot {
  pub fn slot_index(&self) -> usize {
    self.id - 1
  }

  pub fn overall_accuracy(&self) -> u32 {
    percent(self.total_correct, self.total_questions)
  }

  pub fn category_stats(&self, category: Category) -> CategoryStats {
    self.stats.get(&category).cloned().unwrap_or_default()
  }
}

fn percent(correct: u32, total: u32) -> u32 {
  if total == 0 {
    return 0;
  }
  let (correct, total) = (u64::from(correct), u64::from(total));
  ((correct * 100 + total / 2) / total) as u32
}

pub fn is_valid_slot(slot_index: usize) -> bool {
  slot_index < SAVE_SLOT_COUNT
}

fn parse_timestamp(idx: usize, s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e)))
}

fn slot_from_row(row: &Row) -> Result<SaveSlot> {
  let slot: i64 = row.get(0)?;
  let created_at: String = row.get(2)?;
  let last_played: String = row.get(3)?;
  Ok(SaveSlot {
    id: slot as usize + 1,
    player_name: row.get(1)?,
    created_at: parse_timestamp(2, &created_at)?,
    last_played: parse_timestamp(3, &last_played)?,
    total_games: row.get(4)?,
    total_correct: row.get(5)?,
    total_questions: row.get(6)?,
    stats: BTreeMap::new(),
  })
}

fn load_category_stats(conn: &Connection, slot_index: usize) -> Result<BTreeMap<Category, CategoryStats>> {
  let mut stats: BTreeMap<Category, CategoryStats> = Category::ALL
    .iter()
    .map(|c| (*c, CategoryStats::default()))
    .collect();

  let mut stmt = conn.prepare(
    r#"
    SELECT category, games_played, best_time, total_correct, total_questions, last_played
    FROM category_stats
    WHERE slot = ?1
    "#,
  )?;
  let rows = stmt.query_map(params![slot_index as i64], |row| {
    let category: String = row.get(0)?;
    let last_played: Option<String> = row.get(5)?;
    let last_played = match last_played {
      Some(s) => Some(parse_timestamp(5, &s)?),
      None => None,
    };
    Ok((
      category,
      CategoryStats {
        games_played: row.get(1)?,
        best_time: row.get(2)?,
        total_correct: row.get(3)?,
        total_questions: row.get(4)?,
        last_played,
      },
    ))
  })?;

  for row in rows {
    let (category, entry) = row?;
    match category.parse::<Category>() {
      Ok(category) => {
        stats.insert(category, entry);
      }
      Err(e) => tracing::warn!("Skipping stats row: {}", e),
    }
  }
  Ok(stats)
}

/// The save in `slot_index`, if any
pub fn get_save(conn: &Connection, slot_index: usize) -> Result<Option<SaveSlot>> {
  let save = conn
    .query_row(
      r#"
      SELECT slot, player_name, created_at, last_played, total_games, total_correct, total_questions
      FROM save_slots
      WHERE slot = ?1
      "#,
      params![slot_index as i64],
      slot_from_row,
    )
    .optional()?;

  match save {
    Some(mut save) => {
      save.stats = load_category_stats(conn, slot_index)?;
      Ok(Some(save))
    }
    None => Ok(None),
  }
}

/// All slots in order, `None` for empty ones
pub fn get_save_slots(conn: &Connection) -> Result<Vec<Option<SaveSlot>>> {
  (0..SAVE_SLOT_COUNT).map(|i| get_save(conn, i)).collect()
}

/// Create (or overwrite) the save in `slot_index` and make it active.
///
/// A blank name becomes `Player N`.
pub fn create_save(conn: &Connection, slot_index: usize, player_name: &str, now: DateTime<Utc>) -> Result<SaveSlot> {
  let name = match player_name.trim() {
    "" => format!("Player {}", slot_index + 1),
    trimmed => trimmed.to_string(),
  };
  let now_str = now.to_rfc3339();

  let tx = conn.unchecked_transaction()?;
  tx.execute("DELETE FROM category_stats WHERE slot = ?1", params![slot_index as i64])?;
  tx.execute(
    r#"
    INSERT OR REPLACE INTO save_slots
      (slot, player_name, created_at, last_played, total_games, total_correct, total_questions)
    VALUES (?1, ?2, ?3, ?3, 0, 0, 0)
    "#,
    params![slot_index as i64, name, now_str],
  )?;
  for category in Category::ALL {
    tx.execute(
      "INSERT INTO category_stats (slot, category) VALUES (?1, ?2)",
      params![slot_index as i64, category.as_str()],
    )?;
  }
  tx.commit()?;

  set_active_slot(conn, slot_index)?;
  tracing::info!(slot = slot_index, player = %name, "save created");

  Ok(SaveSlot {
    id: slot_index + 1,
    player_name: name,
    created_at: now,
    last_played: now,
    total_games: 0,
    total_correct: 0,
    total_questions: 0,
    stats: Category::ALL
      .iter()
      .map(|c| (*c, CategoryStats::default()))
      .collect(),
  })
}

/// Empty `slot_index`, clearing the active marker if it pointed there
pub fn delete_save(conn: &Connection, slot_index: usize) -> Result<()> {
  let tx = conn.unchecked_transaction()?;
  tx.execute("DELETE FROM category_stats WHERE slot = ?1", params![slot_index as i64])?;
  tx.execute("DELETE FROM save_slots WHERE slot = ?1", params![slot_index as i64])?;
  tx.commit()?;

  if get_active_slot_index(conn)? == Some(slot_index) {
    delete_setting(conn, ACTIVE_SLOT_KEY)?;
  }
  tracing::info!(slot = slot_index, "save deleted");
  Ok(())
}

pub fn get_active_slot_index(conn: &Connection) -> Result<Option<usize>> {
  Ok(get_setting(conn, ACTIVE_SLOT_KEY)?.and_then(|v| v.parse().ok()))
}

pub fn set_active_slot(conn: &Connection, slot_index: usize) -> Result<()> {
  set_setting(conn, ACTIVE_SLOT_KEY, &slot_index.to_string())
}

pub fn get_active_save(conn: &Connection) -> Result<Option<SaveSlot>> {
  match get_active_slot_index(conn)? {
    Some(idx) => get_save(conn, idx),
    None => Ok(None),
  }
}

/// Apply a finished session to the active save.
///
/// Returns the updated save, or `None` when no save is active.
pub fn record_game(conn: &Connection, result: &GameResult, now: DateTime<Utc>) -> Result<Option<SaveSlot>> {
  let Some(slot_index) = get_active_slot_index(conn)? else {
    return Ok(None);
  };
  let Some(save) = get_save(conn, slot_index)? else {
    return Ok(None);
  };

  let now_str = now.to_rfc3339();
  let slot = slot_index as i64;
  let category = result.category.as_str();

  let best_time = save.category_stats(result.category).best_time;
  let new_best = match best_time {
    _ if !result.qualifies_for_best_time() => best_time,
    Some(best) if best <= result.time_elapsed => Some(best),
    _ => Some(result.time_elapsed),
  };

  let tx = conn.unchecked_transaction()?;
  tx.execute(
    r#"
    UPDATE save_slots
    SET last_played = ?1,
        total_games = total_games + 1,
        total_correct = total_correct + ?2,
        total_questions = total_questions + ?3
    WHERE slot = ?4
    "#,
    params![now_str, result.correct, result.total, slot],
  )?;
  tx.execute(
    r#"
    INSERT INTO category_stats
      (slot, category, games_played, best_time, total_correct, total_questions, last_played)
    VALUES (?1, ?2, 1, ?3, ?4, ?5, ?6)
    ON CONFLICT (slot, category) DO UPDATE SET
      games_played = games_played + 1,
      best_time = ?3,
      total_correct = total_correct + ?4,
      total_questions = total_questions + ?5,
      last_played = ?6
    "#,
    params![slot, category, new_best, result.correct, result.total, now_str],
  )?;
  tx.commit()?;

  if new_best != best_time {
    tracing::info!(slot = slot_index, category, best_time = result.time_elapsed, "new best time");
  }

  get_save(conn, slot_index)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::testing::TestEnv;
  use chrono::{Duration, TimeZone};

  fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap()
  }

  fn game(category: Category, correct: u32, time_elapsed: f64, completed: bool) -> GameResult {
    GameResult {
      category,
      correct,
      total: 20,
      time_elapsed,
      completed,
    }
  }

  #[test]
  fn test_empty_slots() {
    let env = TestEnv::new().unwrap();
    let slots = get_save_slots(&env.conn).unwrap();
    assert_eq!(slots.len(), 3);
    assert!(slots.iter().all(Option::is_none));
    assert_eq!(get_active_save(&env.conn).unwrap(), None);
  }

  #[test]
  fn test_create_save_becomes_active() {
    let env = TestEnv::new().unwrap();
    let save = create_save(&env.conn, 1, "  Ada  ", t0()).unwrap();
    assert_eq!(save.id, 2);
    assert_eq!(save.player_name, "Ada");
    assert_eq!(get_active_slot_index(&env.conn).unwrap(), Some(1));
    assert_eq!(get_active_save(&env.conn).unwrap(), Some(save));
  }

  #[test]
  fn test_blank_name_gets_default() {
    let env = TestEnv::new().unwrap();
    let save = create_save(&env.conn, 2, "   ", t0()).unwrap();
    assert_eq!(save.player_name, "Player 3");
  }

  #[test]
  fn test_delete_clears_active() {
    let env = TestEnv::new().unwrap();
    create_save(&env.conn, 0, "A", t0()).unwrap();
    create_save(&env.conn, 1, "B", t0()).unwrap();

    delete_save(&env.conn, 0).unwrap();
    assert_eq!(get_active_slot_index(&env.conn).unwrap(), Some(1));

    delete_save(&env.conn, 1).unwrap();
    assert_eq!(get_active_slot_index(&env.conn).unwrap(), None);
    assert!(get_save_slots(&env.conn).unwrap().iter().all(Option::is_none));
  }

  #[test]
  fn test_record_without_active_save() {
    let env = TestEnv::new().unwrap();
    let result = game(Category::Addition, 20, 40.0, true);
    assert_eq!(record_game(&env.conn, &result, t0()).unwrap(), None);
  }

  #[test]
  fn test_record_sets_first_best_time() {
    let env = TestEnv::new().unwrap();
    create_save(&env.conn, 0, "Ada", t0()).unwrap();

    let later = t0() + Duration::minutes(5);
    let save = record_game(&env.conn, &game(Category::Addition, 20, 45.2, true), later)
      .unwrap()
      .unwrap();

    let stats = save.category_stats(Category::Addition);
    assert_eq!(stats.best_time, Some(45.2));
    assert_eq!(stats.games_played, 1);
    assert_eq!(stats.total_correct, 20);
    assert_eq!(stats.total_questions, 20);
    assert_eq!(stats.last_played, Some(later));
    assert_eq!(save.total_games, 1);
    assert_eq!(save.last_played, later);
    assert_eq!(save.category_stats(Category::Fractions), CategoryStats::default());
  }

  #[test]
  fn test_best_time_rules() {
    let env = TestEnv::new().unwrap();
    create_save(&env.conn, 0, "Ada", t0()).unwrap();
    let best = |results: &[GameResult]| {
      let mut save = None;
      for r in results {
        save = record_game(&env.conn, r, t0()).unwrap();
      }
      save.unwrap().category_stats(Category::Multiplication).best_time
    };

    // Too few correct, or timed out: no best time
    assert_eq!(best(&[game(Category::Multiplication, 17, 30.0, true)]), None);
    assert_eq!(best(&[game(Category::Multiplication, 20, 30.0, false)]), None);

    assert_eq!(best(&[game(Category::Multiplication, 18, 60.0, true)]), Some(60.0));
    assert_eq!(best(&[game(Category::Multiplication, 20, 70.0, true)]), Some(60.0));
    assert_eq!(best(&[game(Category::Multiplication, 19, 50.5, true)]), Some(50.5));
  }

  #[test]
  fn test_accuracy() {
    let env = TestEnv::new().unwrap();
    let save = create_save(&env.conn, 0, "Ada", t0()).unwrap();
    assert_eq!(save.overall_accuracy(), 0);

    record_game(&env.conn, &game(Category::Divisibility, 13, 90.0, false), t0()).unwrap();
    let save = record_game(&env.conn, &game(Category::Addition, 20, 50.0, true), t0())
      .unwrap()
      .unwrap();

    // 33 of 40
    assert_eq!(save.overall_accuracy(), 83);
    assert_eq!(save.category_stats(Category::Divisibility).accuracy(), 65);
    assert_eq!(save.category_stats(Category::Fractions).accuracy(), 0);
  }

  #[test]
  fn test_overwrite_resets_stats() {
    let env = TestEnv::new().unwrap();
    create_save(&env.conn, 0, "Ada", t0()).unwrap();
    record_game(&env.conn, &game(Category::Addition, 20, 45.0, true), t0()).unwrap();

    let save = create_save(&env.conn, 0, "Grace", t0()).unwrap();
    assert_eq!(save.total_games, 0);
    let stored = get_save(&env.conn, 0).unwrap().unwrap();
    assert_eq!(stored.player_name, "Grace");
    assert_eq!(stored.category_stats(Category::Addition).best_time, None);
  }
}
