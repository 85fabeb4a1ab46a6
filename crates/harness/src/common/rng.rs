//! Seeded pseudo-random number generation for bus stimulus.
//!
//! Randomized grant backpressure and error injection are test-coverage
//! features, so they must replay bit-identically under a fixed seed. A
//! xorshift generator is cheap, has no dependencies, and is more than good
//! enough for stimulus shaping; cryptographic quality is explicitly not a
//! goal here.

use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

/// Fallback state used when a run is seeded with zero.
///
/// Xorshift has a single absorbing state at zero, so a zero seed would
/// produce a constant stream.
const SEED_FALLBACK: u64 = 123_456_789;

/// 64-bit xorshift pseudo-random number generator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct XorShift64 {
    state: u64,
}

impl XorShift64 {
    /// Creates a generator from a seed; a zero seed is remapped to a
    /// fixed nonzero state.
    pub fn new(seed: u64) -> Self {
        Self {
            state: if seed == 0 { SEED_FALLBACK } else { seed },
        }
    }

    /// Advances the generator and returns the next value.
    pub fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }
}

/// A probability expressed as `num` chances out of `den` trials.
///
/// This mirrors how per-cycle bus randomization is conventionally written in
/// testbenches: each cycle draws one value and succeeds when
/// `draw % den < num`. The two degenerate forms are exact and draw nothing
/// from the generator, so non-randomized runs do not depend on the seed:
///
/// ```
/// use coretb_core::common::{Chance, XorShift64};
///
/// let mut rng = XorShift64::new(1);
/// assert!(Chance::always().roll(&mut rng));
/// assert!(!Chance::never().roll(&mut rng));
/// assert_eq!(rng, XorShift64::new(1));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
pub struct Chance {
    /// Number of succeeding outcomes per trial.
    pub num: u32,
    /// Number of possible outcomes per trial; must be nonzero.
    pub den: u32,
}

impl Chance {
    /// A trial that always succeeds.
    pub const fn always() -> Self {
        Self { num: 1, den: 1 }
    }

    /// A trial that never succeeds.
    pub const fn never() -> Self {
        Self { num: 0, den: 1 }
    }

    /// Whether this trial succeeds unconditionally.
    pub const fn is_certain(self) -> bool {
        self.num >= self.den
    }

    /// Whether this trial fails unconditionally.
    pub const fn is_impossible(self) -> bool {
        self.num == 0
    }

    /// Runs one trial, drawing from `rng` only when the outcome is not
    /// already determined.
    pub fn roll(self, rng: &mut XorShift64) -> bool {
        if self.is_certain() {
            true
        } else if self.is_impossible() {
            false
        } else {
            rng.next_u64() % u64::from(self.den) < u64::from(self.num)
        }
    }
}

impl fmt::Display for Chance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.num, self.den)
    }
}

impl FromStr for Chance {
    type Err = String;

    /// Parses `"X/Y"`, e.g. `"3/4"` for three chances in four.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (num, den) = s
            .split_once('/')
            .ok_or_else(|| format!("expected X/Y ratio, got '{s}'"))?;
        let num = num
            .trim()
            .parse::<u32>()
            .map_err(|e| format!("bad numerator in '{s}': {e}"))?;
        let den = den
            .trim()
            .parse::<u32>()
            .map_err(|e| format!("bad denominator in '{s}': {e}"))?;
        if den == 0 {
            return Err(format!("zero denominator in '{s}'"));
        }
        Ok(Self { num, den })
    }
}
