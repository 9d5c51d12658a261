//! Random number source injected into problem and option generation.
//!
//! Production code wraps any `rand::Rng`; tests can script exact draws with
//! [`ScriptedRandom`] to force a particular problem. Slice picks and shuffles
//! go through `rand::seq` via [`RngAdapter`].

use rand::seq::{IndexedRandom, SliceRandom};
use rand::{Rng, RngCore};
use std::collections::VecDeque;

/// Capability to draw uniform floats in `[0, 1)`.
///
/// Every other helper is derived from `next_f64`, so a scripted sequence of
/// floats fully determines a generation.
pub trait RandomSource {
  fn next_f64(&mut self) -> f64;

  /// Uniform integer in `[0, n)`. Returns 0 when `n == 0`.
  fn below(&mut self, n: usize) -> usize {
    if n == 0 {
      return 0;
    }
    let idx = (self.next_f64() * n as f64).floor() as usize;
    idx.min(n - 1)
  }

  /// Uniform integer in `[lo, hi]`
  fn range_inclusive(&mut self, lo: i64, hi: i64) -> i64 {
    if hi <= lo {
      return lo;
    }
    lo + self.below((hi - lo + 1) as usize) as i64
  }

  /// True with probability `p`
  fn chance(&mut self, p: f64) -> bool {
    self.next_f64() < p
  }

  /// `rand::RngCore` view drawing from this source
  fn as_rng(&mut self) -> RngAdapter<'_, Self>
  where
    Self: Sized,
  {
    RngAdapter(self)
  }

  /// Uniform element of `items`. Panics on an empty slice, like indexing.
  fn pick<T: Copy>(&mut self, items: &[T]) -> T
  where
    Self: Sized,
  {
    *items.choose(&mut self.as_rng()).unwrap_or(&items[0])
  }

  fn shuffle<T>(&mut self, items: &mut [T])
  where
    Self: Sized,
  {
    SliceRandom::shuffle(items, &mut self.as_rng());
  }
}

impl<T: RandomSource + ?Sized> RandomSource for &mut T {
  fn next_f64(&mut self) -> f64 {
    (**self).next_f64()
  }
}

/// Feeds a [`RandomSource`] into `rand`. Every `next_u32`/`next_u64` consumes
/// exactly one float.
pub struct RngAdapter<'a, R: ?Sized>(&'a mut R);

impl<R: RandomSource + ?Sized> RngCore for RngAdapter<'_, R> {
  fn next_u32(&mut self) -> u32 {
    unit_bits(self.0.next_f64())
  }

  fn next_u64(&mut self) -> u64 {
    u64::from(unit_bits(self.0.next_f64())) << 32
  }

  fn fill_bytes(&mut self, dst: &mut [u8]) {
    rand::rand_core::impls::fill_bytes_via_next(self, dst);
  }
}

/// `v` scaled to 32 bits and bumped one step, so a bounded draw of `n`
/// lands in bucket `floor(v * n)` even when `v` sits a rounding error
/// below `k / n`.
fn unit_bits(v: f64) -> u32 {
  let scaled = (v.clamp(0.0, 1.0) * 4_294_967_296.0) as u64 + 1;
  scaled.min(u64::from(u32::MAX)) as u32
}

/// Adapter from any `rand::Rng` to [`RandomSource`].
pub struct RngSource<R>(pub R);

impl RngSource<rand::rngs::ThreadRng> {
  pub fn thread() -> Self {
    Self(rand::rng())
  }
}

impl<R: Rng> RandomSource for RngSource<R> {
  fn next_f64(&mut self) -> f64 {
    self.0.random::<f64>()
  }
}

/// Replays a fixed list of draws, then falls back to a seeded generator.
pub struct ScriptedRandom {
  script: VecDeque<f64>,
  fallback: RngSource<rand::rngs::StdRng>,
}

impl ScriptedRandom {
  pub fn new(script: &[f64]) -> Self {
    use rand::SeedableRng;
    Self {
      script: script.iter().copied().collect(),
      fallback: RngSource(rand::rngs::StdRng::seed_from_u64(0x5eed)),
    }
  }

  /// Draws still waiting in the script
  pub fn remaining(&self) -> usize {
    self.script.len()
  }
}

impl RandomSource for ScriptedRandom {
  fn next_f64(&mut self) -> f64 {
    match self.script.pop_front() {
      Some(v) => v.clamp(0.0, 0.999_999),
      None => self.fallback.next_f64(),
    }
  }
}
