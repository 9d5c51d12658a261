//! Fraction problems.
//!
//! A question is drawn in two steps: an archetype is picked from the pool for
//! the current tier and turned into a [`FractionTask`] holding the exact
//! fractions involved, then the task is rendered as a [`Problem`], either
//! straight or reversed (the given value and the answer swap roles).

use super::difficulty::Tier;
use super::fraction::{Fraction, FractionSum};
use super::random::RandomSource;
use crate::config::{COMPARE_ATTEMPTS, FRACTION_REVERSE, FRACTION_TIERS};
use crate::domain::{AnswerShape, Problem};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Archetype {
  FracOfNumber,
  Simplify,
  Equivalent,
  Compare,
  AddSameDenom,
  AddDiffDenom,
}

impl Archetype {
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::FracOfNumber => "frac-of-number",
      Self::Simplify => "simplify",
      Self::Equivalent => "equivalent",
      Self::Compare => "compare",
      Self::AddSameDenom => "add-same-denom",
      Self::AddDiffDenom => "add-diff-denom",
    }
  }

  /// Archetypes that can be drawn in a tier
  pub fn pool(tier: Tier) -> &'static [Archetype] {
    match tier {
      Tier::Easy => &EASY_POOL,
      Tier::Medium => &MEDIUM_POOL,
      Tier::Hard => &HARD_POOL,
    }
  }
}

const EASY_POOL: [Archetype; 3] = [
  Archetype::FracOfNumber,
  Archetype::Simplify,
  Archetype::Equivalent,
];

const MEDIUM_POOL: [Archetype; 5] = [
  Archetype::Compare,
  Archetype::AddSameDenom,
  Archetype::Simplify,
  Archetype::Equivalent,
  Archetype::FracOfNumber,
];

const HARD_POOL: [Archetype; 5] = [
  Archetype::AddDiffDenom,
  Archetype::AddSameDenom,
  Archetype::Compare,
  Archetype::FracOfNumber,
  Archetype::Simplify,
];

pub const EASY_DENOMS: [i64; 4] = [2, 3, 4, 5];
pub const MEDIUM_DENOMS: [i64; 6] = [2, 3, 4, 5, 6, 8];
pub const HARD_DENOMS: [i64; 9] = [3, 4, 5, 6, 7, 8, 9, 10, 12];

pub fn denominators(tier: Tier) -> &'static [i64] {
  match tier {
    Tier::Easy => &EASY_DENOMS,
    Tier::Medium => &MEDIUM_DENOMS,
    Tier::Hard => &HARD_DENOMS,
  }
}

/// The exact values behind one fraction question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FractionTask {
  /// `part` of `whole`, where `whole` is a multiple of the denominator
  OfNumber { part: Fraction, whole: i64 },
  /// `simple` is in lowest terms, shown multiplied by `factor`
  Simplify { simple: Fraction, factor: i64 },
  /// `base` equals `base * factor / factor`
  Equivalent { base: Fraction, factor: i64 },
  /// Two fractions with different values
  Compare { first: Fraction, second: Fraction },
  AddSameDenom { left: Fraction, right: Fraction },
  AddDiffDenom { left: Fraction, right: Fraction },
}

impl FractionTask {
  /// Draw the values for `archetype`.
  ///
  /// Returns `None` only for a comparison when no pair of distinct values
  /// turns up within the attempt bound.
  pub fn draw<R: RandomSource>(archetype: Archetype, tier: Tier, rng: &mut R) -> Option<Self> {
    let denoms = denominators(tier);
    let task = match archetype {
      Archetype::FracOfNumber => {
        let part = proper_fraction(rng.pick(denoms), rng);
        let multiplier = match tier {
          Tier::Easy => rng.range_inclusive(2, 5),
          _ => rng.range_inclusive(2, 7),
        };
        Self::OfNumber {
          part,
          whole: part.den * multiplier,
        }
      }
      Archetype::Simplify => {
        let simple = proper_fraction(rng.pick(denoms), rng).simplified();
        let factor = match tier {
          Tier::Easy => rng.range_inclusive(2, 4),
          _ => rng.range_inclusive(2, 6),
        };
        Self::Simplify { simple, factor }
      }
      Archetype::Equivalent => {
        let base = proper_fraction(rng.pick(denoms), rng);
        Self::Equivalent {
          base,
          factor: rng.range_inclusive(2, 5),
        }
      }
      Archetype::Compare => {
        let (first, second) = (0..COMPARE_ATTEMPTS).find_map(|_| {
          let first = proper_fraction(rng.pick(denoms), rng);
          distinct_fraction(first, denoms, rng).map(|second| (first, second))
        })?;
        Self::Compare { first, second }
      }
      Archetype::AddSameDenom => {
        let d = rng.pick(denoms);
        Self::AddSameDenom {
          left: proper_fraction(d, rng),
          right: proper_fraction(d, rng),
        }
      }
      Archetype::AddDiffDenom => {
        let d1 = rng.pick(denoms);
        let d2 = other_denominator(d1, denoms, rng)?;
        Self::AddDiffDenom {
          left: proper_fraction(d1, rng),
          right: proper_fraction(d2, rng),
        }
      }
    };
    Some(task)
  }

  pub fn archetype(&self) -> Archetype {
    match self {
      Self::OfNumber { .. } => Archetype::FracOfNumber,
      Self::Simplify { .. } => Archetype::Simplify,
      Self::Equivalent { .. } => Archetype::Equivalent,
      Self::Compare { .. } => Archetype::Compare,
      Self::AddSameDenom { .. } => Archetype::AddSameDenom,
      Self::AddDiffDenom { .. } => Archetype::AddDiffDenom,
    }
  }

  pub fn into_problem(self, reverse: bool) -> Problem {
    match self {
      Self::OfNumber { part, whole } => {
        let result = part.num * whole / part.den;
        if reverse {
          Problem::new(format!("{} = {} of ?", result, part), whole, AnswerShape::Standard)
        } else {
          Problem::new(format!("{} of {} = ?", part, whole), result, AnswerShape::Standard)
        }
      }
      Self::Simplify { simple, factor } => {
        let shown = simple.scaled(factor);
        if reverse {
          Problem::new(
            format!("{} = ?/?", simple),
            shown.to_string(),
            AnswerShape::FractionStr,
          )
        } else {
          Problem::new(
            format!("Simplify {}", shown),
            simple.to_string(),
            AnswerShape::FractionStr,
          )
        }
      }
      Self::Equivalent { base, factor } => {
        let target = base.scaled(factor);
        if reverse {
          Problem::new(
            format!("?/{} = {}", base.den, target),
            base.num,
            AnswerShape::Standard,
          )
        } else {
          Problem::new(
            format!("{} = ?/{}", base, target.den),
            target.num,
            AnswerShape::Standard,
          )
        }
      }
      Self::Compare { first, second } => {
        let first_greater = first.cmp_value(&second).is_gt();
        let (greater, smaller) = if first_greater {
          (first, second)
        } else {
          (second, first)
        };
        if reverse {
          Problem::new(
            format!("Which is smaller: {} or {}?", first, second),
            smaller.to_string(),
            AnswerShape::FractionStr,
          )
        } else {
          Problem::new(
            format!("Which is greater: {} or {}?", first, second),
            greater.to_string(),
            AnswerShape::FractionStr,
          )
        }
      }
      Self::AddSameDenom { left, right } | Self::AddDiffDenom { left, right } => {
        let sum = FractionSum::new(left, right);
        if reverse {
          Problem::new(
            format!("{} = ? + ?", sum.total()),
            sum.to_string(),
            AnswerShape::FractionStr,
          )
        } else {
          Problem::new(
            format!("{} = ?", sum),
            sum.total().to_string(),
            AnswerShape::FractionStr,
          )
        }
      }
    }
  }
}

/// Draw the task for question `index` and whether it is asked in reverse
pub fn draw<R: RandomSource>(index: usize, rng: &mut R) -> (FractionTask, bool) {
  let tier = Tier::for_index(index, &FRACTION_TIERS);
  let reverse = rng.chance(FRACTION_REVERSE.chance(index));
  let archetype = rng.pick(Archetype::pool(tier));

  let task = FractionTask::draw(archetype, tier, rng).unwrap_or_else(|| {
    tracing::warn!(index, archetype = archetype.as_str(), "no valid draw, falling back to simplify");
    let simple = proper_fraction(rng.pick(denominators(tier)), rng).simplified();
    FractionTask::Simplify { simple, factor: 2 }
  });
  (task, reverse)
}

pub fn generate<R: RandomSource>(index: usize, rng: &mut R) -> Problem {
  let (task, reverse) = draw(index, rng);
  tracing::debug!(index, archetype = task.archetype().as_str(), reverse, "fraction problem");
  task.into_problem(reverse)
}

/// `n/d` with `1 <= n < d`
fn proper_fraction<R: RandomSource>(den: i64, rng: &mut R) -> Fraction {
  Fraction::new(rng.range_inclusive(1, den - 1), den)
}

fn other_denominator<R: RandomSource>(den: i64, denoms: &[i64], rng: &mut R) -> Option<i64> {
  (0..COMPARE_ATTEMPTS)
    .map(|_| rng.pick(denoms))
    .find(|&d| d != den)
}

/// A fraction over a different denominator whose value differs from `first`
fn distinct_fraction<R: RandomSource>(
  first: Fraction,
  denoms: &[i64],
  rng: &mut R,
) -> Option<Fraction> {
  for _ in 0..COMPARE_ATTEMPTS {
    let den = other_denominator(first.den, denoms, rng)?;
    let candidate = proper_fraction(den, rng);
    if !candidate.same_value(&first) {
      return Some(candidate);
    }
  }
  None
}
