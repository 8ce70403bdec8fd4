/// Closed range of acceptable vault numbers.
///
/// Bounds come from configuration (10000..=99999 for the live event) rather
/// than hardcoded literals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumberRange {
    pub min: i32,
    pub max: i32,
}

impl NumberRange {
    pub fn new(min: i32, max: i32) -> Self {
        Self { min, max }
    }

    /// How many distinct values the range holds
    pub fn span(&self) -> i64 {
        (self.max as i64) - (self.min as i64) + 1
    }

    /// Whether a raw candidate is a whole number inside the range.
    ///
    /// Candidates arrive from model output as arbitrary JSON numbers, so the
    /// integrality check is load-bearing, not paranoia. Total: never panics,
    /// NaN and infinities simply fail.
    pub fn is_valid(&self, candidate: f64) -> bool {
        candidate.is_finite()
            && candidate.fract() == 0.0
            && candidate >= self.min as f64
            && candidate <= self.max as f64
    }

    /// Validates a raw candidate, returning it as a concrete number
    pub fn to_valid(&self, candidate: f64) -> Option<i32> {
        if self.is_valid(candidate) {
            Some(candidate as i32)
        } else {
            None
        }
    }
}
