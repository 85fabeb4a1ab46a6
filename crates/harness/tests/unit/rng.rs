//! Seeded PRNG and Chance Unit Tests.
//!
//! Verifies replayability under a fixed seed, the zero-seed fallback, and
//! the chance-ratio semantics including the no-draw fast paths.

use coretb_core::common::{Chance, XorShift64};
use std::str::FromStr;

// ══════════════════════════════════════════════════════════
// 1. Generator determinism
// ══════════════════════════════════════════════════════════

#[test]
fn rng_same_seed_same_sequence() {
    let mut a = XorShift64::new(42);
    let mut b = XorShift64::new(42);
    for _ in 0..1000 {
        assert_eq!(a.next_u64(), b.next_u64());
    }
}

#[test]
fn rng_different_seeds_diverge() {
    let mut a = XorShift64::new(1);
    let mut b = XorShift64::new(2);
    let sa: Vec<u64> = (0..16).map(|_| a.next_u64()).collect();
    let sb: Vec<u64> = (0..16).map(|_| b.next_u64()).collect();
    assert_ne!(sa, sb);
}

#[test]
fn rng_zero_seed_is_not_stuck() {
    let mut rng = XorShift64::new(0);
    let first = rng.next_u64();
    let second = rng.next_u64();
    assert_ne!(first, 0);
    assert_ne!(first, second);
}

// ══════════════════════════════════════════════════════════
// 2. Chance semantics
// ══════════════════════════════════════════════════════════

#[test]
fn chance_certain_and_impossible_draw_nothing() {
    let mut rng = XorShift64::new(7);
    let baseline = rng.clone();

    assert!(Chance::always().roll(&mut rng));
    assert!(!Chance::never().roll(&mut rng));
    assert!(Chance { num: 5, den: 3 }.roll(&mut rng));
    assert_eq!(rng, baseline, "degenerate chances must not consume state");
}

#[test]
fn chance_ratio_is_roughly_respected() {
    let mut rng = XorShift64::new(99);
    let half = Chance { num: 1, den: 2 };
    let hits = (0..1000).filter(|_| half.roll(&mut rng)).count();
    assert!((300..=700).contains(&hits), "1/2 chance hit {hits}/1000");
}

#[test]
fn chance_rolls_replay_under_fixed_seed() {
    let chance = Chance { num: 1, den: 4 };
    let mut a = XorShift64::new(1234);
    let mut b = XorShift64::new(1234);
    let sa: Vec<bool> = (0..64).map(|_| chance.roll(&mut a)).collect();
    let sb: Vec<bool> = (0..64).map(|_| chance.roll(&mut b)).collect();
    assert_eq!(sa, sb);
}

// ══════════════════════════════════════════════════════════
// 3. Parsing and display
// ══════════════════════════════════════════════════════════

#[test]
fn chance_parses_ratio() {
    assert_eq!(Chance::from_str("3/4").ok(), Some(Chance { num: 3, den: 4 }));
    assert_eq!(
        Chance::from_str(" 1 / 2 ").ok(),
        Some(Chance { num: 1, den: 2 })
    );
}

#[test]
fn chance_rejects_bad_ratios() {
    assert!(Chance::from_str("nonsense").is_err());
    assert!(Chance::from_str("3").is_err());
    assert!(Chance::from_str("3/0").is_err());
    assert!(Chance::from_str("/4").is_err());
}

#[test]
fn chance_display_round_trips() {
    let chance = Chance { num: 2, den: 5 };
    assert_eq!(Chance::from_str(&chance.to_string()).ok(), Some(chance));
}
