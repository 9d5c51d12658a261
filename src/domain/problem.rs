use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Canonical answer of a problem, and the representation every option shares.
///
/// Equality is exact: numbers by value, strings byte for byte, booleans by
/// identity. `"1/2"` and `"2/4"` are different answers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Answer {
  Integer(i64),
  Text(String),
  Bool(bool),
}

impl Answer {
  pub fn as_integer(&self) -> Option<i64> {
    match self {
      Self::Integer(n) => Some(*n),
      _ => None,
    }
  }

  pub fn as_text(&self) -> Option<&str> {
    match self {
      Self::Text(s) => Some(s),
      _ => None,
    }
  }

  pub fn as_bool(&self) -> Option<bool> {
    match self {
      Self::Bool(b) => Some(*b),
      _ => None,
    }
  }
}

impl fmt::Display for Answer {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Integer(n) => write!(f, "{}", n),
      Self::Text(s) => f.write_str(s),
      Self::Bool(b) => write!(f, "{}", b),
    }
  }
}

impl From<i64> for Answer {
  fn from(n: i64) -> Self {
    Self::Integer(n)
  }
}

impl From<String> for Answer {
  fn from(s: String) -> Self {
    Self::Text(s)
  }
}

impl From<bool> for Answer {
  fn from(b: bool) -> Self {
    Self::Bool(b)
  }
}

/// How decoys are built for a problem's answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AnswerShape {
  /// Plain integer, or boolean (told apart by the answer itself)
  Standard,
  /// `"a × b"` reconstructing a shown product
  ReverseMult,
  /// `"a + b"` reconstructing a shown sum
  ReverseAdd,
  /// `"n/d"`, or `"n/d + n/d"` for a reversed fraction sum
  FractionStr,
}

impl AnswerShape {
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Standard => "standard",
      Self::ReverseMult => "reverse-mult",
      Self::ReverseAdd => "reverse-add",
      Self::FractionStr => "fraction-str",
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseAnswerShapeError(pub String);

impl fmt::Display for ParseAnswerShapeError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "Unknown answer shape: {}", self.0)
  }
}

impl std::error::Error for ParseAnswerShapeError {}

impl FromStr for AnswerShape {
  type Err = ParseAnswerShapeError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "standard" => Ok(Self::Standard),
      "reverse-mult" => Ok(Self::ReverseMult),
      "reverse-add" => Ok(Self::ReverseAdd),
      "fraction-str" => Ok(Self::FractionStr),
      other => Err(ParseAnswerShapeError(other.to_string())),
    }
  }
}

/// A generated question: display text, canonical answer and decoy shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Problem {
  pub text: String,
  pub answer: Answer,
  pub shape: AnswerShape,
}

impl Problem {
  pub fn new(text: impl Into<String>, answer: impl Into<Answer>, shape: AnswerShape) -> Self {
    Self {
      text: text.into(),
      answer: answer.into(),
      shape,
    }
  }

  /// Exact comparison of a chosen option with the canonical answer
  pub fn is_correct(&self, choice: &Answer) -> bool {
    &self.answer == choice
  }
}
