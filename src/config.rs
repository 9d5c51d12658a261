//! Application configuration constants.
//!
//! This module centralizes the tunable values of the quiz: session length,
//! time limits, difficulty breakpoints and reverse-mode schedules.

use serde::Deserialize;
use std::path::PathBuf;

use crate::domain::Category;

// ==================== Database Configuration ====================

/// Configuration file structure for config.toml
#[derive(Debug, Deserialize)]
struct AppConfig {
  database: Option<DatabaseConfig>,
}

#[derive(Debug, Deserialize)]
struct DatabaseConfig {
  path: Option<String>,
}

/// Load database path with priority: config.toml > .env > default
pub fn load_database_path() -> PathBuf {
  let _ = dotenvy::dotenv();

  if let Ok(contents) = std::fs::read_to_string("config.toml") {
    match toml::from_str::<AppConfig>(&contents) {
      Ok(config) => {
        if let Some(path) = config.database.and_then(|db| db.path) {
          tracing::info!("Using database from config.toml: {}", path);
          return PathBuf::from(path);
        }
      }
      Err(e) => tracing::warn!("Ignoring malformed config.toml: {}", e),
    }
  }

  if let Ok(path) = std::env::var("DATABASE_PATH") {
    tracing::info!("Using database from DATABASE_PATH env: {}", path);
    return PathBuf::from(path);
  }

  let default = PathBuf::from(DEFAULT_DB_PATH);
  tracing::info!("Using default database path: {}", default.display());
  default
}

pub const DEFAULT_DB_PATH: &str = "data/math_sprint.db";

// ==================== Server Configuration ====================

/// Server address to bind to
pub const SERVER_ADDR: &str = "0.0.0.0";

/// Server port
pub const SERVER_PORT: u16 = 3000;

/// Get the full server bind address
pub fn server_bind_addr() -> String {
  format!("{}:{}", SERVER_ADDR, SERVER_PORT)
}

// ==================== Session Configuration ====================

/// Questions in one practice session
pub const QUESTIONS_PER_SESSION: usize = 20;

/// Minimum correct answers for a completed session to count towards best time
pub const BEST_TIME_MIN_CORRECT: u32 = 18;

/// Idle practice sessions are dropped after this many hours
pub const SESSION_EXPIRY_HOURS: i64 = 1;

/// Probability threshold for session cleanup (0-255, lower = more frequent)
pub const SESSION_CLEANUP_THRESHOLD: u8 = 25;

/// Number of save slots offered to players
pub const SAVE_SLOT_COUNT: usize = 3;

/// Countdown for a session, in seconds
pub fn time_limit_secs(category: Category) -> u32 {
  match category {
    Category::Multiplication => 120,
    Category::Addition => 120,
    Category::Divisibility => 90,
    Category::Fractions => 120,
  }
}

// ==================== Option Synthesis ====================

/// Target size of a multiple-choice option set, correct answer included
pub const OPTION_COUNT: usize = 5;

/// Draws attempted before accepting a shorter option set
pub const OPTION_ATTEMPTS: usize = 50;

/// Decoy products for reversed multiplication stay within this distance
pub const REVERSE_MULT_SPREAD: i64 = 15;

/// Attempts to find two distinct fractions for a comparison
pub const COMPARE_ATTEMPTS: usize = 20;

// ==================== Difficulty ====================

/// Index at which each tier starts: (medium, hard)
pub struct TierBreaks {
  pub medium_from: usize,
  pub hard_from: usize,
}

pub const MULTIPLICATION_TIERS: TierBreaks = TierBreaks {
  medium_from: 5,
  hard_from: 15,
};

pub const ADDITION_TIERS: TierBreaks = TierBreaks {
  medium_from: 5,
  hard_from: 10,
};

pub const FRACTION_TIERS: TierBreaks = TierBreaks {
  medium_from: 7,
  hard_from: 14,
};

/// Divisors switch from {2,5,10} to {3,9} at this index
pub const DIVISIBILITY_SWITCH_INDEX: usize = 8;

/// Probability of asking the inverse question, by question index.
///
/// Each step applies from its index onward; indices before the first step
/// never reverse.
pub struct ReverseSchedule {
  pub steps: &'static [(usize, f64)],
}

impl ReverseSchedule {
  pub fn chance(&self, index: usize) -> f64 {
    self
      .steps
      .iter()
      .rev()
      .find(|(from, _)| index >= *from)
      .map(|(_, p)| *p)
      .unwrap_or(0.0)
  }
}

// Multiplication and addition are tuned separately even though they match today.
pub const MULTIPLICATION_REVERSE: ReverseSchedule = ReverseSchedule {
  steps: &[(10, 0.5), (15, 0.8)],
};

pub const ADDITION_REVERSE: ReverseSchedule = ReverseSchedule {
  steps: &[(10, 0.5), (15, 0.8)],
};

pub const FRACTION_REVERSE: ReverseSchedule = ReverseSchedule {
  steps: &[(0, 0.15), (5, 0.3), (10, 0.4), (15, 0.5)],
};

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_reverse_schedule_before_first_step() {
    assert_eq!(MULTIPLICATION_REVERSE.chance(0), 0.0);
    assert_eq!(MULTIPLICATION_REVERSE.chance(9), 0.0);
  }

  #[test]
  fn test_reverse_schedule_steps() {
    assert_eq!(MULTIPLICATION_REVERSE.chance(10), 0.5);
    assert_eq!(MULTIPLICATION_REVERSE.chance(14), 0.5);
    assert_eq!(MULTIPLICATION_REVERSE.chance(15), 0.8);
    assert_eq!(ADDITION_REVERSE.chance(19), 0.8);
  }

  #[test]
  fn test_fraction_reverse_increases() {
    let chances: Vec<f64> = (0..20).map(|i| FRACTION_REVERSE.chance(i)).collect();
    assert_eq!(chances[0], 0.15);
    assert_eq!(chances[19], 0.5);
    assert!(chances.windows(2).all(|w| w[0] <= w[1]));
  }

  #[test]
  fn test_time_limits() {
    assert_eq!(time_limit_secs(Category::Divisibility), 90);
    assert_eq!(time_limit_secs(Category::Fractions), 120);
  }
}
