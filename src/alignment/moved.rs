//! Alignments inside one moved-text block.

use crate::layout::{EditorView, LineHeightOverride};
use crate::model::{MovedText, PerSide};

use super::computer::{AlignmentComputer, AlignmentWindow};
use super::Alignment;

/// Align the two copies of `moved` against each other.
///
/// The pass is windowed to the block's own ranges; changes and overrides
/// outside them are ignored, and so is every alignment that leaves the block
/// on either side.
pub fn compute_moved_text_alignments(
    moved: &MovedText,
    original_view: &dyn EditorView,
    modified_view: &dyn EditorView,
    overrides: PerSide<Vec<LineHeightOverride>>,
) -> Vec<Alignment> {
    let block = &moved.line_range_mapping;
    let window = AlignmentWindow::new(block.original, block.modified);

    let changes: Vec<_> = moved
        .changes
        .iter()
        .filter(|c| {
            block.original.intersect(&c.original).is_some()
                && block.modified.intersect(&c.modified).is_some()
        })
        .cloned()
        .collect();

    AlignmentComputer::new(window, original_view, modified_view, overrides)
        .run(&changes, true)
        .into_iter()
        .filter(|a| {
            block.original.intersect(&a.original_range).is_some()
                && block.modified.intersect(&a.modified_range).is_some()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{LineRange, LineRangeMapping};
    use crate::scenario::ScenarioView;

    fn range(start: u32, end: u32) -> LineRange {
        LineRange::new(start, end).unwrap()
    }

    fn no_overrides() -> PerSide<Vec<LineHeightOverride>> {
        PerSide::default()
    }

    #[test]
    fn block_without_changes_is_one_alignment() {
        // GIVEN lines 3..6 moved to 10..13
        let original = ScenarioView::with_lines(20);
        let modified = ScenarioView::with_lines(20);
        let moved = MovedText {
            line_range_mapping: LineRangeMapping::new(range(3, 6), range(10, 13)),
            changes: vec![],
        };

        let alignments = compute_moved_text_alignments(&moved, &original, &modified, no_overrides());

        assert_eq!(alignments.len(), 1);
        assert_eq!(alignments[0].original_range, range(3, 6));
        assert_eq!(alignments[0].modified_range, range(10, 13));
        assert_eq!(alignments[0].height_delta(), 0.0);
    }

    #[test]
    fn change_inside_block_splits_it() {
        // GIVEN a block where original line 4 became two modified lines 11..13
        let original = ScenarioView::with_lines(20);
        let modified = ScenarioView::with_lines(20);
        let moved = MovedText {
            line_range_mapping: LineRangeMapping::new(range(3, 6), range(10, 14)),
            changes: vec![
                LineRangeMapping::new(range(4, 5), range(11, 13)),
                // Unrelated change elsewhere in the file
                LineRangeMapping::new(range(15, 16), range(1, 2)),
            ],
        };

        let alignments = compute_moved_text_alignments(&moved, &original, &modified, no_overrides());

        let ranges: Vec<_> = alignments
            .iter()
            .map(|a| (a.original_range, a.modified_range))
            .collect();
        assert_eq!(
            ranges,
            vec![
                (range(3, 4), range(10, 11)),
                (range(4, 5), range(11, 13)),
                (range(5, 6), range(13, 14)),
            ]
        );
        assert_eq!(alignments[1].height_delta(), 20.0);
    }

    #[test]
    fn alignments_never_leave_the_block() {
        let original = ScenarioView::with_lines(30).with_wrapped(1, 3).with_wrapped(25, 2);
        let modified = ScenarioView::with_lines(30).with_wrapped(2, 2);
        let moved = MovedText {
            line_range_mapping: LineRangeMapping::new(range(8, 12), range(18, 21)),
            changes: vec![LineRangeMapping::new(range(9, 10), range(19, 19))],
        };
        let overrides = PerSide::new(
            crate::layout::compute_line_height_overrides(&original, &Default::default()),
            crate::layout::compute_line_height_overrides(&modified, &Default::default()),
        );

        let alignments = compute_moved_text_alignments(&moved, &original, &modified, overrides);

        assert!(!alignments.is_empty());
        for a in &alignments {
            assert!(a.original_range.start_line_number() >= 8);
            assert!(a.original_range.end_line_number_exclusive() <= 12);
            assert!(a.modified_range.start_line_number() >= 18);
            assert!(a.modified_range.end_line_number_exclusive() <= 21);
            assert_eq!(a.original_height_in_px, f64::from(a.original_range.len()) * 20.0);
        }
    }
}
