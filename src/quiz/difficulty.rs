use crate::config::TierBreaks;

/// Difficulty tier of a question within a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Tier {
  Easy,
  Medium,
  Hard,
}

impl Tier {
  pub fn for_index(index: usize, breaks: &TierBreaks) -> Self {
    if index < breaks.medium_from {
      Self::Easy
    } else if index < breaks.hard_from {
      Self::Medium
    } else {
      Self::Hard
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::config::{ADDITION_TIERS, FRACTION_TIERS, MULTIPLICATION_TIERS};

  #[test]
  fn test_multiplication_tiers() {
    assert_eq!(Tier::for_index(0, &MULTIPLICATION_TIERS), Tier::Easy);
    assert_eq!(Tier::for_index(4, &MULTIPLICATION_TIERS), Tier::Easy);
    assert_eq!(Tier::for_index(5, &MULTIPLICATION_TIERS), Tier::Medium);
    assert_eq!(Tier::for_index(14, &MULTIPLICATION_TIERS), Tier::Medium);
    assert_eq!(Tier::for_index(15, &MULTIPLICATION_TIERS), Tier::Hard);
  }

  #[test]
  fn test_addition_tiers() {
    assert_eq!(Tier::for_index(9, &ADDITION_TIERS), Tier::Medium);
    assert_eq!(Tier::for_index(10, &ADDITION_TIERS), Tier::Hard);
  }

  #[test]
  fn test_tiers_are_monotone() {
    for breaks in [&MULTIPLICATION_TIERS, &ADDITION_TIERS, &FRACTION_TIERS] {
      let tiers: Vec<Tier> = (0..20).map(|i| Tier::for_index(i, breaks)).collect();
      assert!(tiers.windows(2).all(|w| w[0] <= w[1]));
    }
  }
}
