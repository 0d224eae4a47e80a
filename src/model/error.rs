//! Error types for the alignment model.
//!
//! None of these surface to the user. Smart-constructor errors reject malformed
//! host input at the boundary (deserialization, explicit construction); the
//! stale-diff condition is carried as a value so the engine can log it and
//! degrade to a partial result until the next diff arrives.

use thiserror::Error;

use super::types::Side;

/// Error returned by [`LineRange::new`](super::LineRange::new) for invalid bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InvalidLineRange {
    /// Line numbers are 1-based; a range cannot start at line 0.
    #[error("line range cannot start at line 0 (end {end_exclusive})")]
    ZeroStart {
        /// The exclusive end that was supplied.
        end_exclusive: u32,
    },

    /// The exclusive end lies before the start.
    #[error("line range end {end_exclusive} is before start {start}")]
    Reversed {
        /// The start that was supplied.
        start: u32,
        /// The exclusive end that was supplied.
        end_exclusive: u32,
    },
}

/// A diff mapping refers to lines the current model no longer has.
///
/// Happens between an edit landing in the model and the diff being recomputed.
/// The alignment pass stops at the first such mapping and returns what it has.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("stale diff: {side} line {line_number_exclusive} exceeds line count {line_count}")]
pub struct StaleDiff {
    /// Side whose range is out of bounds.
    pub side: Side,
    /// Offending exclusive line bound.
    pub line_number_exclusive: u32,
    /// Current line count of that side's model.
    pub line_count: u32,
}
