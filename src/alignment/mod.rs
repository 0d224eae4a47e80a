//! Alignment layer - which line ranges of the two buffers must start at the same height
//!
//! # Module Structure
//!
//! - `computer`: AlignmentComputer - merges hunks and override streams into alignments
//! - `moved`: alignments inside a single moved-text block

pub mod computer;
pub mod moved;

use serde::Serialize;

use crate::model::{LineRange, LineRangeMapping};

pub use computer::{compute_alignments, AlignmentComputer, AlignmentWindow};
pub use moved::compute_moved_text_alignments;

/// A pair of line ranges, one per buffer, that render starting at the same
/// vertical offset, with the pixel height each side needs for its range.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Alignment {
    /// Lines of the original buffer.
    pub original_range: LineRange,
    /// Lines of the modified buffer.
    pub modified_range: LineRange,
    /// Height of `original_range` including its wrapped lines and foreign zones.
    pub original_height_in_px: f64,
    /// Height of `modified_range` including its wrapped lines and foreign zones.
    pub modified_height_in_px: f64,
    /// The hunk this alignment belongs to; `None` for unchanged regions and
    /// override points outside any hunk.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diff: Option<LineRangeMapping>,
}

impl Alignment {
    /// How much taller the modified side is than the original side.
    pub fn height_delta(&self) -> f64 {
        self.modified_height_in_px - self.original_height_in_px
    }
}
