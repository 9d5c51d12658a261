//! Column addition, moving from single digits to forced carries.

use super::difficulty::Tier;
use super::random::RandomSource;
use crate::config::{ADDITION_REVERSE, ADDITION_TIERS};
use crate::domain::{AnswerShape, Problem};

/// Last digits that always carry when added to another of them
pub const CARRY_ENDINGS: [i64; 3] = [7, 8, 9];

/// Separator of a reversed addition answer, e.g. `"27 + 48"`
pub const PLUS: &str = " + ";

pub fn generate<R: RandomSource>(index: usize, rng: &mut R) -> Problem {
  let chance = ADDITION_REVERSE.chance(index);
  let reverse = chance > 0.0 && rng.chance(chance);

  let (a, b) = match Tier::for_index(index, &ADDITION_TIERS) {
    Tier::Easy => {
      let roll = rng.next_f64();
      if roll < 0.35 {
        (one_digit(rng), one_digit(rng))
      } else if roll < 0.75 {
        let pair = (one_digit(rng), rng.range_inclusive(10, 49));
        maybe_swap(pair, rng)
      } else {
        (rng.range_inclusive(10, 49), rng.range_inclusive(10, 49))
      }
    }
    Tier::Medium => {
      if rng.chance(0.4) {
        let pair = (one_digit(rng), carry_number(rng));
        maybe_swap(pair, rng)
      } else {
        (carry_number(rng), carry_number(rng))
      }
    }
    Tier::Hard => (carry_number(rng), carry_number(rng)),
  };

  tracing::debug!(index, a, b, reverse, "addition problem");
  build(a, b, reverse)
}

/// Problem for `a + b`, optionally asking for the addends of the sum
pub fn build(a: i64, b: i64, reverse: bool) -> Problem {
  let sum = a + b;
  if reverse {
    Problem::new(
      format!("{} = ?{}?", sum, PLUS),
      format!("{}{}{}", a, PLUS, b),
      AnswerShape::ReverseAdd,
    )
  } else {
    Problem::new(format!("{}{}{} = ?", a, PLUS, b), sum, AnswerShape::Standard)
  }
}

/// Parse `"a + b"` into its addends
pub fn parse_addends(s: &str) -> Option<(i64, i64)> {
  let (a, b) = s.split_once(PLUS)?;
  Some((a.trim().parse().ok()?, b.trim().parse().ok()?))
}

fn one_digit<R: RandomSource>(rng: &mut R) -> i64 {
  rng.range_inclusive(2, 9)
}

/// Up to two digits, ending in 7, 8 or 9
fn carry_number<R: RandomSource>(rng: &mut R) -> i64 {
  rng.range_inclusive(0, 7) * 10 + rng.pick(&CARRY_ENDINGS)
}

fn maybe_swap<R: RandomSource>((a, b): (i64, i64), rng: &mut R) -> (i64, i64) {
  if rng.chance(0.5) { (b, a) } else { (a, b) }
}
