//! Times-table problems, weighted towards the operands students miss most.

use super::difficulty::Tier;
use super::random::RandomSource;
use crate::config::{MULTIPLICATION_REVERSE, MULTIPLICATION_TIERS};
use crate::domain::{AnswerShape, Problem};

/// Operands that get drilled once the warm-up is over
pub const HARD_OPERANDS: [i64; 5] = [6, 7, 8, 9, 12];

/// Separator of a reversed multiplication answer, e.g. `"7 × 8"`
pub const TIMES: &str = " × ";

pub fn generate<R: RandomSource>(index: usize, rng: &mut R) -> Problem {
  let chance = MULTIPLICATION_REVERSE.chance(index);
  let reverse = chance > 0.0 && rng.chance(chance);

  let (a, b) = match Tier::for_index(index, &MULTIPLICATION_TIERS) {
    Tier::Easy => (rng.range_inclusive(2, 10), rng.range_inclusive(2, 10)),
    Tier::Medium => (rng.pick(&HARD_OPERANDS), rng.range_inclusive(2, 12)),
    Tier::Hard => (rng.pick(&HARD_OPERANDS), rng.pick(&HARD_OPERANDS)),
  };

  tracing::debug!(index, a, b, reverse, "multiplication problem");
  build(a, b, reverse)
}

/// Problem for `a × b`, optionally asking for the factors of the product
pub fn build(a: i64, b: i64, reverse: bool) -> Problem {
  let product = a * b;
  if reverse {
    Problem::new(
      format!("{} = ?{}?", product, TIMES),
      format!("{}{}{}", a, TIMES, b),
      AnswerShape::ReverseMult,
    )
  } else {
    Problem::new(format!("{}{}{} = ?", a, TIMES, b), product, AnswerShape::Standard)
  }
}

/// Parse `"a × b"` into its factors
pub fn parse_factors(s: &str) -> Option<(i64, i64)> {
  let (a, b) = s.split_once(TIMES)?;
  Some((a.trim().parse().ok()?, b.trim().parse().ok()?))
}
