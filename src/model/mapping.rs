//! Diff result shapes consumed from the diff collaborator.

use serde::{Deserialize, Serialize};

use super::line_range::LineRange;

/// A character range inside a buffer: 1-based lines and columns, end exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextRange {
    /// Line of the first character.
    pub start_line_number: u32,
    /// Column of the first character.
    pub start_column: u32,
    /// Line of the end position.
    pub end_line_number: u32,
    /// Column just past the last character.
    pub end_column: u32,
}

impl TextRange {
    /// Create a range from its four coordinates.
    pub fn new(start_line_number: u32, start_column: u32, end_line_number: u32, end_column: u32) -> Self {
        Self {
            start_line_number,
            start_column,
            end_line_number,
            end_column,
        }
    }

    /// True if the range starts and ends on the same line.
    pub fn is_single_line(&self) -> bool {
        self.start_line_number == self.end_line_number
    }
}

/// One column-level edit inside a hunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeMapping {
    /// Affected text in the original buffer.
    pub original_range: TextRange,
    /// Replacement text in the modified buffer.
    pub modified_range: TextRange,
}

/// One hunk: a pair of line ranges plus optional column-level detail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineRangeMapping {
    /// Lines in the original buffer.
    pub original: LineRange,
    /// Lines in the modified buffer.
    pub modified: LineRange,
    /// Column-level edits, ordered, when the diff computed them.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inner_changes: Option<Vec<RangeMapping>>,
}

impl LineRangeMapping {
    /// Hunk without inner changes.
    pub fn new(original: LineRange, modified: LineRange) -> Self {
        Self {
            original,
            modified,
            inner_changes: None,
        }
    }

    /// Attach column-level edits.
    pub fn with_inner_changes(mut self, inner_changes: Vec<RangeMapping>) -> Self {
        self.inner_changes = Some(inner_changes);
        self
    }

    /// Inner changes, empty when the diff did not compute any.
    pub fn inner_changes(&self) -> &[RangeMapping] {
        self.inner_changes.as_deref().unwrap_or(&[])
    }

    /// Whether this hunk can be drawn as in-line decorations instead of a
    /// deleted-code block: it needs inner changes, and every one of them must
    /// stay on a single line on both sides.
    pub fn allows_true_inline_rendering(&self) -> bool {
        match &self.inner_changes {
            None => false,
            Some(changes) => changes
                .iter()
                .all(|c| c.original_range.is_single_line() && c.modified_range.is_single_line()),
        }
    }
}

/// A block the diff reports as moved rather than edited in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovedText {
    /// The block's own ranges in both buffers.
    pub line_range_mapping: LineRangeMapping,
    /// Changes between the two copies of the block, in full-buffer coordinates.
    #[serde(default)]
    pub changes: Vec<LineRangeMapping>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range(start: u32, end: u32) -> LineRange {
        LineRange::new(start, end).unwrap()
    }

    #[test]
    fn true_inline_requires_inner_changes() {
        let mapping = LineRangeMapping::new(range(2, 3), range(2, 3));
        assert!(!mapping.allows_true_inline_rendering());
    }

    #[test]
    fn true_inline_accepts_single_line_changes() {
        let mapping = LineRangeMapping::new(range(2, 3), range(2, 3)).with_inner_changes(vec![
            RangeMapping {
                original_range: TextRange::new(2, 5, 2, 9),
                modified_range: TextRange::new(2, 5, 2, 7),
            },
        ]);
        assert!(mapping.allows_true_inline_rendering());
    }

    #[test]
    fn true_inline_rejects_multi_line_change() {
        let mapping = LineRangeMapping::new(range(2, 4), range(2, 3)).with_inner_changes(vec![
            RangeMapping {
                original_range: TextRange::new(2, 5, 3, 1),
                modified_range: TextRange::new(2, 5, 2, 7),
            },
        ]);
        assert!(!mapping.allows_true_inline_rendering());
    }

    #[test]
    fn inner_changes_defaults_to_empty_slice() {
        let mapping = LineRangeMapping::new(range(1, 1), range(1, 2));
        assert!(mapping.inner_changes().is_empty());
    }
}
