use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Skill category practiced in a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
  Multiplication,
  Addition,
  Divisibility,
  Fractions,
}

impl Category {
  pub const ALL: [Category; 4] = [
    Category::Multiplication,
    Category::Addition,
    Category::Divisibility,
    Category::Fractions,
  ];

  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Multiplication => "multiplication",
      Self::Addition => "addition",
      Self::Divisibility => "divisibility",
      Self::Fractions => "fractions",
    }
  }
}

impl fmt::Display for Category {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// Error returned for a category name outside the fixed set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseCategoryError(pub String);

impl fmt::Display for ParseCategoryError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "Unknown category: {}", self.0)
  }
}

impl std::error::Error for ParseCategoryError {}

impl FromStr for Category {
  type Err = ParseCategoryError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "multiplication" => Ok(Self::Multiplication),
      "addition" => Ok(Self::Addition),
      "divisibility" => Ok(Self::Divisibility),
      "fractions" => Ok(Self::Fractions),
      other => Err(ParseCategoryError(other.to_string())),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_category_roundtrip() {
    for category in Category::ALL {
      assert_eq!(category.as_str().parse::<Category>(), Ok(category));
    }
  }

  #[test]
  fn test_category_invalid() {
    assert_eq!(
      "subtraction".parse::<Category>(),
      Err(ParseCategoryError("subtraction".to_string()))
    );
    assert!("Multiplication".parse::<Category>().is_err());
    assert!("".parse::<Category>().is_err());
  }

  #[test]
  fn test_category_serde_lowercase() {
    let json = serde_json::to_string(&Category::Fractions).unwrap();
    assert_eq!(json, "\"fractions\"");
    let parsed: Category = serde_json::from_str("\"divisibility\"").unwrap();
    assert_eq!(parsed, Category::Divisibility);
  }
}
