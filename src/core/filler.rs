use std::collections::HashSet;

use rand::Rng;

use super::range::NumberRange;

/// Draws `needed` fresh in-range numbers, none colliding with `existing` or
/// with each other.
///
/// Rejection sampling over a uniform draw. Callers must ensure the range has
/// at least `needed` unused values left (enforced once at startup via
/// `Config::validate`); with that precondition the loop terminates with
/// probability 1. The RNG is injected so tests can seed it.
pub fn fill<R: Rng>(
    existing: &HashSet<i32>,
    needed: usize,
    range: NumberRange,
    rng: &mut R,
) -> Vec<i32> {
    let mut taken = existing.clone();
    let mut picked = Vec::with_capacity(needed);

    while picked.len() < needed {
        let candidate = rng.gen_range(range.min..=range.max);
        if taken.insert(candidate) {
            picked.push(candidate);
        }
    }

    picked
}
