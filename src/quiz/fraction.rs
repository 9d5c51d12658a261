//! Exact integer fraction arithmetic.
//!
//! All reductions go through the Euclidean GCD; nothing here touches floats.

use std::fmt;
use std::str::FromStr;

/// Greatest common divisor (Euclid). `gcd(0, 0) == 0`.
pub fn gcd(a: i64, b: i64) -> i64 {
  let (mut a, mut b) = (a.abs(), b.abs());
  while b != 0 {
    let t = a % b;
    a = b;
    b = t;
  }
  a
}

/// Least common multiple via the GCD
pub fn lcm(a: i64, b: i64) -> i64 {
  let g = gcd(a, b);
  if g == 0 { 0 } else { (a / g * b).abs() }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fraction {
  pub num: i64,
  pub den: i64,
}

impl Fraction {
  pub fn new(num: i64, den: i64) -> Self {
    Self { num, den }
  }

  /// Divide numerator and denominator by their GCD
  pub fn simplified(self) -> Self {
    let g = gcd(self.num, self.den);
    if g <= 1 {
      return self;
    }
    Self::new(self.num / g, self.den / g)
  }

  pub fn is_simplified(&self) -> bool {
    gcd(self.num, self.den) == 1
  }

  /// Multiply top and bottom by `factor`
  pub fn scaled(self, factor: i64) -> Self {
    Self::new(self.num * factor, self.den * factor)
  }

  /// Sum over the least common denominator, reduced
  pub fn add(self, other: Fraction) -> Self {
    let common = lcm(self.den, other.den);
    let num = self.num * (common / self.den) + other.num * (common / other.den);
    Self::new(num, common).simplified()
  }

  /// Rational equality by cross-multiplication
  pub fn same_value(&self, other: &Fraction) -> bool {
    self.num * other.den == other.num * self.den
  }

  /// Ordering of the rational values (denominators assumed positive)
  pub fn cmp_value(&self, other: &Fraction) -> std::cmp::Ordering {
    (self.num * other.den).cmp(&(other.num * self.den))
  }

  pub fn is_positive(&self) -> bool {
    self.num > 0 && self.den > 0
  }
}

impl fmt::Display for Fraction {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}/{}", self.num, self.den)
  }
}

/// Error parsing a `"n/d"` or `"n/d + n/d"` string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseFractionError(pub String);

impl fmt::Display for ParseFractionError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "Malformed fraction: {}", self.0)
  }
}

impl std::error::Error for ParseFractionError {}

impl FromStr for Fraction {
  type Err = ParseFractionError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let err = || ParseFractionError(s.to_string());
    let (num, den) = s.split_once('/').ok_or_else(err)?;
    let num = num.trim().parse().map_err(|_| err())?;
    let den: i64 = den.trim().parse().map_err(|_| err())?;
    if den == 0 {
      return Err(err());
    }
    Ok(Self::new(num, den))
  }
}

/// Two addends written as `"a/b + c/d"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FractionSum {
  pub left: Fraction,
  pub right: Fraction,
}

impl FractionSum {
  pub const SEPARATOR: &'static str = " + ";

  pub fn new(left: Fraction, right: Fraction) -> Self {
    Self { left, right }
  }

  pub fn total(&self) -> Fraction {
    self.left.add(self.right)
  }
}

impl fmt::Display for FractionSum {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}{}{}", self.left, Self::SEPARATOR, self.right)
  }
}

impl FromStr for FractionSum {
  type Err = ParseFractionError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let (left, right) = s
      .split_once(Self::SEPARATOR)
      .ok_or_else(|| ParseFractionError(s.to_string()))?;
    Ok(Self::new(left.parse()?, right.parse()?))
  }
}
