use serde::{Deserialize, Serialize};

use super::Category;
use crate::config;

/// Outcome of one session, handed to the save layer when it ends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameResult {
  pub category: Category,
  pub correct: u32,
  pub total: u32,
  /// Seconds from first question to the end of the session
  pub time_elapsed: f64,
  /// True when all questions were answered before the timer ran out
  pub completed: bool,
}

impl GameResult {
  /// Whether this result may replace a category's best time
  pub fn qualifies_for_best_time(&self) -> bool {
    self.completed && self.correct >= config::BEST_TIME_MIN_CORRECT
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn result(correct: u32, completed: bool) -> GameResult {
    GameResult {
      category: Category::Addition,
      correct,
      total: 20,
      time_elapsed: 60.0,
      completed,
    }
  }

  #[test]
  fn test_best_time_needs_completion_and_score() {
    assert!(result(20, true).qualifies_for_best_time());
    assert!(result(18, true).qualifies_for_best_time());
    assert!(!result(17, true).qualifies_for_best_time());
    assert!(!result(20, false).qualifies_for_best_time());
  }
}
