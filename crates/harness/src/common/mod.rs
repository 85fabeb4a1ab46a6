//! Common types shared across the harness.
//!
//! This module collects the leaf building blocks with no dependencies on the
//! rest of the crate:
//! 1. **Errors:** The [`error::HarnessError`] type used throughout.
//! 2. **Randomness:** The seeded PRNG and chance-ratio type driving bus
//!    backpressure and error injection.

/// Harness error type and fatal-error taxonomy.
pub mod error;
/// Seeded pseudo-random number generation and chance ratios.
pub mod rng;

pub use error::HarnessError;
pub use rng::{Chance, XorShift64};
