//! Yes/no divisibility questions.

use super::random::RandomSource;
use crate::config::DIVISIBILITY_SWITCH_INDEX;
use crate::domain::{AnswerShape, Problem};

pub const EARLY_DIVISORS: [i64; 3] = [2, 5, 10];
pub const LATE_DIVISORS: [i64; 2] = [3, 9];

pub fn generate<R: RandomSource>(index: usize, rng: &mut R) -> Problem {
  let divisor = if index < DIVISIBILITY_SWITCH_INDEX {
    rng.pick(&EARLY_DIVISORS)
  } else {
    rng.pick(&LATE_DIVISORS)
  };

  let base = rng.range_inclusive(10, 59);
  let divisible = rng.chance(0.5);
  let dividend = if divisible {
    base * divisor
  } else {
    base * divisor + rng.range_inclusive(1, divisor - 1)
  };

  tracing::debug!(index, dividend, divisor, "divisibility problem");
  build(dividend, divisor)
}

pub fn build(dividend: i64, divisor: i64) -> Problem {
  Problem::new(
    format!("{} ÷ {}?", dividend, divisor),
    dividend % divisor == 0,
    AnswerShape::Standard,
  )
}
