//! Percentage dice shared by every stage.
//!
//! All randomness flows through a single `&mut dyn RngCore` handed to the
//! pipeline by its caller. Hosts that need replays seed a
//! [`ChaCha8Rng`](rand_chacha::ChaCha8Rng); nothing here keeps state.

use rand::{Rng, RngCore};

/// Rolls a d100 in `1..=100`.
///
/// Saving throws succeed when `roll <= threshold`.
pub fn roll_d100(rng: &mut dyn RngCore) -> i32 {
    rng.gen_range(1..=100)
}

/// Returns `true` with probability `chance` percent.
///
/// A chance of 3 succeeds on rolls 1, 2 and 3. Chances at or below zero
/// never succeed; chances of 100 or more always do.
pub fn success_roll(rng: &mut dyn RngCore, chance: i32) -> bool {
    roll_d100(rng) <= chance
}

/// Rolls a uniform float percentage in `0.0..100.0`.
///
/// Special infections use fractional chances (0.6%).
pub fn fractional_percent(rng: &mut dyn RngCore) -> f32 {
    rng.gen_range(0.0..100.0)
}

/// Rolls uniformly in the inclusive range `min..=max`.
///
/// An inverted range collapses to `min`.
pub fn roll_range(rng: &mut dyn RngCore, min: i32, max: i32) -> i32 {
    if max <= min {
        return min;
    }
    rng.gen_range(min..=max)
}
