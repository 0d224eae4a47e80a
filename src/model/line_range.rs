//! Half-open ranges of 1-based buffer line numbers.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::error::InvalidLineRange;

/// A half-open range `[start_line_number, end_line_number_exclusive)` of buffer lines.
///
/// # Invariants
/// - `start_line_number >= 1`
/// - `end_line_number_exclusive >= start_line_number`
///
/// An empty range still has a position: `[3, 3)` sits between line 2 and line 3,
/// which is how pure insertions and deletions are anchored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawLineRange", into = "RawLineRange")]
pub struct LineRange {
    start: u32,
    end_exclusive: u32,
}

/// Wire shape of a [`LineRange`], validated on deserialization.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct RawLineRange {
    start_line_number: u32,
    end_line_number_exclusive: u32,
}

impl TryFrom<RawLineRange> for LineRange {
    type Error = InvalidLineRange;

    fn try_from(raw: RawLineRange) -> Result<Self, Self::Error> {
        LineRange::new(raw.start_line_number, raw.end_line_number_exclusive)
    }
}

impl From<LineRange> for RawLineRange {
    fn from(range: LineRange) -> Self {
        Self {
            start_line_number: range.start,
            end_line_number_exclusive: range.end_exclusive,
        }
    }
}

impl LineRange {
    /// Smart constructor that validates both bounds.
    pub fn new(start: u32, end_exclusive: u32) -> Result<Self, InvalidLineRange> {
        if start == 0 {
            return Err(InvalidLineRange::ZeroStart { end_exclusive });
        }
        if end_exclusive < start {
            return Err(InvalidLineRange::Reversed {
                start,
                end_exclusive,
            });
        }
        Ok(Self {
            start,
            end_exclusive,
        })
    }

    /// Range of `length` lines starting at `start`.
    ///
    /// A `start` of 0 is lifted to 1.
    pub fn of_length(start: u32, length: u32) -> Self {
        let start = start.max(1);
        Self {
            start,
            end_exclusive: start.saturating_add(length),
        }
    }

    /// Empty range positioned before `line`.
    pub fn empty_at(line: u32) -> Self {
        Self::of_length(line, 0)
    }

    /// First line of the range.
    pub fn start_line_number(&self) -> u32 {
        self.start
    }

    /// Line just past the range.
    pub fn end_line_number_exclusive(&self) -> u32 {
        self.end_exclusive
    }

    /// Number of lines covered.
    pub fn len(&self) -> u32 {
        self.end_exclusive - self.start
    }

    /// True if the range covers no lines.
    pub fn is_empty(&self) -> bool {
        self.start == self.end_exclusive
    }

    /// True if `line` lies inside the range.
    pub fn contains(&self, line: u32) -> bool {
        self.start <= line && line < self.end_exclusive
    }

    /// Overlap of two ranges.
    ///
    /// Ranges that merely touch intersect in an empty range, so an empty
    /// alignment range sitting on a block boundary still counts as related.
    pub fn intersect(&self, other: &LineRange) -> Option<LineRange> {
        let start = self.start.max(other.start);
        let end_exclusive = self.end_exclusive.min(other.end_exclusive);
        (start <= end_exclusive).then_some(LineRange {
            start,
            end_exclusive,
        })
    }

    /// Shift both bounds by `offset` lines.
    ///
    /// The result is a raw `(start, end_exclusive)` pair because a shift
    /// below line 1 is meaningful for containment checks on line 0.
    pub fn delta(&self, offset: i64) -> (i64, i64) {
        (
            i64::from(self.start) + offset,
            i64::from(self.end_exclusive) + offset,
        )
    }

    /// Same start, length changed by `offset` lines; never shorter than empty.
    pub fn delta_length(&self, offset: i64) -> LineRange {
        let end_exclusive = (i64::from(self.end_exclusive) + offset)
            .clamp(i64::from(self.start), i64::from(u32::MAX));
        LineRange {
            start: self.start,
            end_exclusive: end_exclusive as u32,
        }
    }

    /// True if `line` lies inside this range widened by `margin` lines on both sides.
    pub fn contains_with_margin(&self, line: u32, margin: u32) -> bool {
        let margin = i64::from(margin);
        let (start, end_exclusive) = self.delta_length(2 * margin).delta(-margin);
        let line = i64::from(line);
        start <= line && line < end_exclusive
    }
}

impl fmt::Display for LineRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{},{})", self.start, self.end_exclusive)
    }
}
