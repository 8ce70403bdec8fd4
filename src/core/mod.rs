//! Recommendation aggregation engine.
//!
//! Pure logic with no I/O: range validation, first-occurrence merging of
//! candidate lists, random gap-filling, and confidence combination. The
//! orchestrator in `services::recommendation` drives these against live
//! AI backends.

pub mod confidence;
pub mod filler;
pub mod merge;
pub mod range;

pub use confidence::combine;
pub use filler::fill;
pub use merge::merge;
pub use range::NumberRange;
