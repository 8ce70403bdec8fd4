use std::collections::HashSet;

use rand::Rng;

use crate::models::SourceResult;

use super::{filler, range::NumberRange};

/// Merges one or more source candidate lists into exactly `target_count`
/// unique, in-range numbers.
///
/// Candidates are taken in source order (source 1 outranks source 2),
/// preserving each source's own ranking, with later duplicates dropped on
/// first occurrence. Out-of-range or fractional values from a misbehaving
/// backend are filtered rather than trusted. If fewer than `target_count`
/// candidates survive, random filler is appended after all real candidates,
/// so a model's picks always win the tie against synthetic ones.
///
/// Invoking with an empty source list is a caller bug.
pub fn merge<R: Rng>(
    sources: &[SourceResult],
    target_count: usize,
    range: NumberRange,
    rng: &mut R,
) -> Vec<i32> {
    debug_assert!(!sources.is_empty(), "merge requires at least one source");

    if target_count == 0 {
        return Vec::new();
    }

    let mut seen = HashSet::new();
    let mut selected = Vec::new();

    for source in sources {
        for &raw in &source.numbers {
            if selected.len() == target_count {
                break;
            }
            if let Some(number) = range.to_valid(raw) {
                if seen.insert(number) {
                    selected.push(number);
                }
            }
        }
    }

    let shortfall = target_count - selected.len();
    if shortfall > 0 {
        selected.extend(filler::fill(&seen, shortfall, range, rng));
    }

    selected
}
