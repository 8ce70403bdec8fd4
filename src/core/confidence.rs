/// Reduces per-source confidence scores into one reported value.
///
/// A single source passes through unchanged; multiple sources take the
/// unweighted mean. Weighting (say, by source track record) is a possible
/// future refinement; until then every source counts equally.
pub fn combine(confidences: &[f64]) -> f64 {
    match confidences {
        [] => 0.0,
        [only] => *only,
        many => many.iter().sum::<f64>() / many.len() as f64,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_source_passes_through() {
        assert_eq!(combine(&[0.8]), 0.8);
    }

    #[test]
    fn two_sources_average() {
        assert!((combine(&[0.8, 0.6]) - 0.7).abs() < 1e-12);
    }

    #[test]
    fn generalizes_to_more_sources() {
        assert!((combine(&[0.9, 0.6, 0.3]) - 0.6).abs() < 1e-12);
    }

    #[test]
    fn empty_input_yields_zero() {
        assert_eq!(combine(&[]), 0.0);
    }
}
