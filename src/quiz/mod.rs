//! Problem generation and multiple-choice synthesis.
//!
//! Everything here is a pure function of its inputs and the injected
//! [`RandomSource`]; no state is kept between calls.

pub mod addition;
pub mod difficulty;
pub mod divisibility;
pub mod fraction;
pub mod fractions;
pub mod multiplication;
pub mod options;
pub mod random;
pub mod source;

use std::fmt;

use crate::config::QUESTIONS_PER_SESSION;
use crate::domain::{Category, Problem};

pub use options::generate_options;
pub use random::{RandomSource, RngAdapter, RngSource, ScriptedRandom};
pub use source::{ExternalProblem, LocalSource, ProblemSource, SourceError};

/// Contract violation by the caller of [`generate_problem`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerateError {
  InvalidIndex(usize),
}

impl fmt::Display for GenerateError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      GenerateError::InvalidIndex(i) => write!(
        f,
        "Question index {} outside 0..{}",
        i, QUESTIONS_PER_SESSION
      ),
    }
  }
}

impl std::error::Error for GenerateError {}

/// Produce the problem for position `index` of a session in `category`.
///
/// Later indices draw from harder tiers and, for multiplication, addition
/// and fractions, increasingly often ask the question in reverse.
pub fn generate_problem<R: RandomSource>(
  category: Category,
  index: usize,
  rng: &mut R,
) -> Result<Problem, GenerateError> {
  if index >= QUESTIONS_PER_SESSION {
    return Err(GenerateError::InvalidIndex(index));
  }

  let problem = match category {
    Category::Multiplication => multiplication::generate(index, rng),
    Category::Addition => addition::generate(index, rng),
    Category::Divisibility => divisibility::generate(index, rng),
    Category::Fractions => fractions::generate(index, rng),
  };
  Ok(problem)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::config::OPTION_COUNT;
  use crate::domain::{Answer, AnswerShape};
  use rand::SeedableRng;
  use std::collections::HashSet;

  fn allowed_shapes(category: Category) -> &'static [AnswerShape] {
    match category {
      Category::Multiplication => &[AnswerShape::Standard, AnswerShape::ReverseMult],
      Category::Addition => &[AnswerShape::Standard, AnswerShape::ReverseAdd],
      Category::Divisibility => &[AnswerShape::Standard],
      Category::Fractions => &[AnswerShape::Standard, AnswerShape::FractionStr],
    }
  }

  #[test]
  fn test_every_category_and_index() {
    let mut rng = RngSource(rand::rngs::StdRng::seed_from_u64(99));
    for category in Category::ALL {
      for index in 0..QUESTIONS_PER_SESSION {
        for _ in 0..25 {
          let problem = generate_problem(category, index, &mut rng).unwrap();
          assert!(
            allowed_shapes(category).contains(&problem.shape),
            "{:?} produced {:?}",
            category,
            problem.shape
          );
          assert!(!problem.text.is_empty());
          match (&problem.answer, category) {
            (Answer::Bool(_), Category::Divisibility) => {}
            (Answer::Bool(_), _) => panic!("boolean answer outside divisibility"),
            (Answer::Integer(n), _) => assert!(*n > 0),
            (Answer::Text(s), _) => assert!(!s.is_empty()),
          }
        }
      }
    }
  }

  #[test]
  fn test_generated_options_always_valid() {
    let mut rng = RngSource(rand::rngs::StdRng::seed_from_u64(100));
    for category in Category::ALL {
      for index in 0..QUESTIONS_PER_SESSION {
        for _ in 0..20 {
          let problem = generate_problem(category, index, &mut rng).unwrap();
          let options = generate_options(&problem.answer, problem.shape, &mut rng);
          let unique: HashSet<&Answer> = options.iter().collect();
          assert_eq!(unique.len(), options.len());
          assert_eq!(options.iter().filter(|o| problem.is_correct(o)).count(), 1);
          if let Answer::Bool(_) = problem.answer {
            assert_eq!(options.len(), 2);
          } else {
            // a short list is allowed when decoys run out
            assert!(!options.is_empty() && options.len() <= OPTION_COUNT, "{:?}", options);
          }
        }
      }
    }
  }

  #[test]
  fn test_index_out_of_range() {
    let mut rng = RngSource::thread();
    assert_eq!(
      generate_problem(Category::Addition, 20, &mut rng),
      Err(GenerateError::InvalidIndex(20))
    );
  }

  #[test]
  fn test_scenario_divisibility_by_ten() {
    let mut rng = ScriptedRandom::new(&[0.9, 0.2, 0.3]);
    let problem = generate_problem(Category::Divisibility, 2, &mut rng).unwrap();
    assert_eq!(problem.answer, Answer::Bool(true));

    let mut rng = ScriptedRandom::new(&[0.9, 0.2, 0.8, 0.0]);
    let problem = generate_problem(Category::Divisibility, 2, &mut rng).unwrap();
    assert_eq!(problem.answer, Answer::Bool(false));
  }

  #[test]
  fn test_scenario_reverse_multiplication_options() {
    let mut rng = ScriptedRandom::new(&[0.1, 0.3, 0.5]);
    let problem = generate_problem(Category::Multiplication, 16, &mut rng).unwrap();
    assert_eq!(problem.answer, Answer::Text("7 × 8".to_string()));
    assert!(problem.text.starts_with("56"));

    let options = generate_options(&problem.answer, problem.shape, &mut rng);
    for option in options.iter().filter(|o| !problem.is_correct(o)) {
      let text = option.as_text().unwrap();
      assert_ne!(text, "7 × 8");
      let (a, b) = multiplication::parse_factors(text).unwrap();
      assert!((a * b - 56).abs() <= 15 && a * b != 56);
    }
  }
}
