//! Where a session's problems come from.
//!
//! The local generator is the default. An alternative source (for instance a
//! remote content service) can stand in for it; its failures are recoverable
//! and the session falls back to local generation.

use std::fmt;

use super::addition::PLUS;
use super::fraction::{Fraction, FractionSum};
use super::multiplication::TIMES;
use super::random::RandomSource;
use super::{GenerateError, generate_problem};
use crate::domain::{Answer, AnswerShape, Category, Problem};

/// Recoverable failure of a problem source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceError {
  /// The source could not be reached or did not answer
  Unavailable(String),
  /// The source answered with something that is not a usable problem
  Malformed(String),
  Generate(GenerateError),
}

impl fmt::Display for SourceError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      SourceError::Unavailable(e) => write!(f, "Problem source unavailable: {}", e),
      SourceError::Malformed(e) => write!(f, "Malformed problem: {}", e),
      SourceError::Generate(e) => write!(f, "{}", e),
    }
  }
}

impl std::error::Error for SourceError {}

impl From<GenerateError> for SourceError {
  fn from(e: GenerateError) -> Self {
    SourceError::Generate(e)
  }
}

pub trait ProblemSource {
  fn next_problem(
    &mut self,
    category: Category,
    index: usize,
    rng: &mut dyn RandomSource,
  ) -> Result<Problem, SourceError>;
}

/// The built-in generator.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalSource;

impl ProblemSource for LocalSource {
  fn next_problem(
    &mut self,
    category: Category,
    index: usize,
    mut rng: &mut dyn RandomSource,
  ) -> Result<Problem, SourceError> {
    Ok(generate_problem(category, index, &mut rng)?)
  }
}

/// Problem as delivered by an external content service.
///
/// `correctAnswer` usually arrives as a string and `problemType` is a free
/// description such as "Missing Factor", so the shape is read off the answer.
/// A `problemType` that names a shape exactly must agree with it.
#[derive(Debug, Clone, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExternalProblem {
  pub question: String,
  pub correct_answer: Answer,
  pub problem_type: String,
  #[serde(default)]
  pub subskill_id: Option<String>,
}

impl TryFrom<ExternalProblem> for Problem {
  type Error = SourceError;

  fn try_from(ext: ExternalProblem) -> Result<Self, Self::Error> {
    if ext.question.trim().is_empty() {
      return Err(SourceError::Malformed("empty question".to_string()));
    }
    let (answer, shape) = match ext.correct_answer {
      Answer::Text(text) => read_text_answer(&text)
        .ok_or_else(|| SourceError::Malformed(format!("unrecognized answer {:?}", text)))?,
      other => (other, AnswerShape::Standard),
    };
    match ext.problem_type.trim().parse::<AnswerShape>() {
      Ok(named) if named != shape => {
        return Err(SourceError::Malformed(format!(
          "{} answer {} given as {}",
          shape.as_str(),
          answer,
          named.as_str()
        )));
      }
      _ => {}
    }
    tracing::debug!(
      problem_type = %ext.problem_type,
      subskill = ext.subskill_id.as_deref().unwrap_or(""),
      shape = shape.as_str(),
      "external problem accepted"
    );
    Ok(Problem::new(ext.question, answer, shape))
  }
}

/// Canonical answer and shape for a textual answer, tolerating loose spacing
fn read_text_answer(text: &str) -> Option<(Answer, AnswerShape)> {
  let text = text.trim();
  if let Ok(n) = text.parse::<i64>() {
    return Some((Answer::Integer(n), AnswerShape::Standard));
  }
  match text.to_lowercase().as_str() {
    "true" | "yes" | "sí" | "si" => return Some((Answer::Bool(true), AnswerShape::Standard)),
    "false" | "no" => return Some((Answer::Bool(false), AnswerShape::Standard)),
    _ => {}
  }
  if let Some((a, b)) = integer_pair(text, '×') {
    return Some((format!("{}{}{}", a, TIMES, b).into(), AnswerShape::ReverseMult));
  }
  if let Some((a, b)) = integer_pair(text, '+') {
    return Some((format!("{}{}{}", a, PLUS, b).into(), AnswerShape::ReverseAdd));
  }
  let fraction = match text.split_once('+') {
    Some((left, right)) => {
      FractionSum::new(left.trim().parse().ok()?, right.trim().parse().ok()?).to_string()
    }
    None => text.parse::<Fraction>().ok()?.to_string(),
  };
  Some((fraction.into(), AnswerShape::FractionStr))
}

fn integer_pair(text: &str, op: char) -> Option<(i64, i64)> {
  let (a, b) = text.split_once(op)?;
  Some((a.trim().parse().ok()?, b.trim().parse().ok()?))
}
