//! Multiple-choice option synthesis.
//!
//! Decoys are near misses in the same representation as the answer: nearby
//! integers, other factor pairs with a close product, perturbed addends, or
//! small structural edits of a fraction. A decoy is never equal to the
//! answer under the shape's equality rule, and fraction decoys are also
//! never equal to it in value.

use super::addition::{self, PLUS};
use super::fraction::{Fraction, FractionSum};
use super::multiplication::{self, TIMES};
use super::random::RandomSource;
use crate::config::{OPTION_ATTEMPTS, OPTION_COUNT, REVERSE_MULT_SPREAD};
use crate::domain::{Answer, AnswerShape};

/// Build the shuffled option list for `answer`.
///
/// Booleans always get exactly `[true, false]`. Everything else gets up to
/// [`OPTION_COUNT`] options; when the attempt bound runs out first the list
/// is simply shorter.
pub fn generate_options<R: RandomSource>(
  answer: &Answer,
  shape: AnswerShape,
  rng: &mut R,
) -> Vec<Answer> {
  if let Answer::Bool(_) = answer {
    let mut options = vec![Answer::Bool(true), Answer::Bool(false)];
    rng.shuffle(&mut options);
    return options;
  }

  let mut options = vec![answer.clone()];
  let mut attempts = 0;
  while options.len() < OPTION_COUNT && attempts < OPTION_ATTEMPTS {
    attempts += 1;
    let Some(decoy) = draw_decoy(answer, shape, rng) else {
      continue;
    };
    if !options.contains(&decoy) {
      options.push(decoy);
    }
  }

  if options.len() < OPTION_COUNT {
    tracing::warn!(
      answer = %answer,
      shape = shape.as_str(),
      count = options.len(),
      "short option set"
    );
  }

  rng.shuffle(&mut options);
  options
}

/// One candidate decoy, or `None` if this draw was rejected
fn draw_decoy<R: RandomSource>(answer: &Answer, shape: AnswerShape, rng: &mut R) -> Option<Answer> {
  match (shape, answer) {
    (AnswerShape::ReverseMult, Answer::Text(s)) => reverse_mult_decoy(s, rng),
    (AnswerShape::ReverseAdd, Answer::Text(s)) => reverse_add_decoy(s, rng),
    (AnswerShape::FractionStr, Answer::Text(s)) => fraction_decoy(s, rng),
    (_, Answer::Integer(n)) => integer_decoy(*n, rng),
    _ => None,
  }
}

/// `answer ± 1..5`, positive only
fn integer_decoy<R: RandomSource>(answer: i64, rng: &mut R) -> Option<Answer> {
  let magnitude = rng.range_inclusive(1, 5);
  let delta = if rng.chance(0.5) { magnitude } else { -magnitude };
  let decoy = answer + delta;
  (decoy > 0).then_some(Answer::Integer(decoy))
}

/// Another `a × b` with `a, b` in `[2, 12]` whose product is close but different
fn reverse_mult_decoy<R: RandomSource>(answer: &str, rng: &mut R) -> Option<Answer> {
  let (x, y) = multiplication::parse_factors(answer)?;
  let target = x * y;
  let a = rng.range_inclusive(2, 12);
  let b = rng.range_inclusive(2, 12);
  let product = a * b;
  if product == target || (product - target).abs() > REVERSE_MULT_SPREAD {
    return None;
  }
  Some(Answer::Text(format!("{}{}{}", a, TIMES, b)))
}

/// Nudge the first addend, then pick a second one that lands near the sum
fn reverse_add_decoy<R: RandomSource>(answer: &str, rng: &mut R) -> Option<Answer> {
  let (x, y) = addition::parse_addends(answer)?;
  let target = x + y;
  let a = (x + rng.range_inclusive(-5, 5)).max(1);
  let mut b = target - a + rng.range_inclusive(-3, 3);
  if b < 1 {
    b = rng.range_inclusive(1, 9);
  }
  if a + b == target {
    return None;
  }
  Some(Answer::Text(format!("{}{}{}", a, PLUS, b)))
}

/// Structural edits of `n/d` students tend to produce
fn fraction_variations(f: Fraction) -> [Fraction; 8] {
  let (n, d) = (f.num, f.den);
  [
    Fraction::new(n + 1, d),
    Fraction::new(n - 1, d),
    Fraction::new(n, d + 1),
    Fraction::new(n, d - 1),
    Fraction::new(n + 1, d + 1),
    Fraction::new(n - 1, d - 1),
    Fraction::new(d, n),
    Fraction::new(n + 2, d),
  ]
}

fn fraction_decoy<R: RandomSource>(answer: &str, rng: &mut R) -> Option<Answer> {
  if answer.contains(PLUS) {
    return fraction_sum_decoy(answer, rng);
  }
  let correct: Fraction = answer.parse().ok()?;
  let pick = rng.pick(&fraction_variations(correct));
  if !pick.is_positive() || pick.same_value(&correct) {
    return None;
  }
  Some(Answer::Text(pick.to_string()))
}

/// Edit one addend of `"a/b + c/d"`, keeping the total different
fn fraction_sum_decoy<R: RandomSource>(answer: &str, rng: &mut R) -> Option<Answer> {
  let correct: FractionSum = answer.parse().ok()?;
  let edit_left = rng.chance(0.5);
  let target = if edit_left { correct.left } else { correct.right };
  let pick = rng.pick(&fraction_variations(target));
  if !pick.is_positive() {
    return None;
  }
  let decoy = if edit_left {
    FractionSum::new(pick, correct.right)
  } else {
    FractionSum::new(correct.left, pick)
  };
  if decoy.total().same_value(&correct.total()) {
    return None;
  }
  Some(Answer::Text(decoy.to_string()))
}
