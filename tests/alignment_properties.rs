//! Property-based tests for alignment invariants.
//!
//! Tests validate, over random hunks, wraps and foreign zones:
//! 1. Alignments tile both buffers from line 1 to the end without gaps
//! 2. Each side's heights add up to that side's full rendered height
//! 3. Unchanged alignments span the same number of lines on both sides
//! 4. Each hunk is covered exactly by the alignments carrying it
//! 5. Column-level changes split hunks without breaking 1, 2 or 4
//! 6. Moved-block alignments stay inside the block and tile it

use diffsync::alignment::{compute_alignments, compute_moved_text_alignments, Alignment};
use diffsync::layout::{compute_line_height_overrides, EditorView, LineTops};
use diffsync::model::{LineRange, LineRangeMapping, MovedText, PerSide, RangeMapping, TextRange};
use diffsync::scenario::ScenarioView;
use proptest::prelude::*;
use std::collections::HashSet;

const LINE_HEIGHT: f64 = 20.0;

/// Two consistent buffers plus the hunks between them.
#[derive(Debug, Clone)]
struct DiffCase {
    original_lines: u32,
    modified_lines: u32,
    mappings: Vec<LineRangeMapping>,
}

/// `(unchanged gap, original lines, modified lines)` per hunk, then the
/// unchanged tail.
fn build_case(segments: &[(u32, u32, u32)], tail: u32) -> DiffCase {
    let mut original = 1;
    let mut modified = 1;
    let mut mappings = Vec::new();

    for (i, &(gap, original_len, modified_len)) in segments.iter().enumerate() {
        if original_len == 0 && modified_len == 0 {
            continue;
        }
        // Hunks never touch each other
        let gap = if i == 0 || mappings.is_empty() { gap } else { gap.max(1) };
        original += gap;
        modified += gap;
        mappings.push(LineRangeMapping::new(
            LineRange::of_length(original, original_len),
            LineRange::of_length(modified, modified_len),
        ));
        original += original_len;
        modified += modified_len;
    }

    DiffCase {
        original_lines: original - 1 + tail,
        modified_lines: modified - 1 + tail,
        mappings,
    }
}

fn diff_case() -> impl Strategy<Value = DiffCase> {
    (
        prop::collection::vec((0u32..4, 0u32..4, 0u32..4), 0..6),
        1u32..5,
    )
        .prop_map(|(segments, tail)| build_case(&segments, tail))
}

/// `(original step, modified step, original span, modified span, start
/// column, end column)` for one column-level change.
type InnerPick = (u32, u32, u32, u32, u32, u32);

/// Ordered changes inside `mapping`, walking both sides forward.
///
/// Hunks that are empty on either side get none.
fn inner_changes(mapping: &LineRangeMapping, picks: &[InnerPick]) -> Vec<RangeMapping> {
    let (original_len, modified_len) = (mapping.original.len(), mapping.modified.len());
    if original_len == 0 || modified_len == 0 {
        return Vec::new();
    }

    let mut changes = Vec::new();
    let (mut original_at, mut modified_at) = (0, 0);
    for &(original_step, modified_step, original_span, modified_span, start_column, end_column) in
        picks
    {
        let original_start = original_at + original_step;
        let modified_start = modified_at + modified_step;
        if original_start >= original_len || modified_start >= modified_len {
            break;
        }
        let original_end = (original_start + original_span).min(original_len - 1);
        let modified_end = (modified_start + modified_span).min(modified_len - 1);

        let text_range = |first: u32, start: u32, end: u32| {
            let end_column = if start == end { start_column + end_column } else { end_column };
            TextRange::new(first + start, start_column, first + end, end_column)
        };
        changes.push(RangeMapping {
            original_range: text_range(
                mapping.original.start_line_number(),
                original_start,
                original_end,
            ),
            modified_range: text_range(
                mapping.modified.start_line_number(),
                modified_start,
                modified_end,
            ),
        });
        original_at = original_end;
        modified_at = modified_end;
    }
    changes
}

/// Like [`diff_case`], with column-level changes inside the hunks.
fn diff_case_with_inner_changes() -> impl Strategy<Value = DiffCase> {
    let pick = (0u32..2, 0u32..2, 0u32..2, 0u32..2, 1u32..4, 1u32..60);
    (
        diff_case(),
        prop::collection::vec(prop::collection::vec(pick, 0..4), 6),
    )
        .prop_map(|(mut case, picks)| {
            for (mapping, picks) in case.mappings.iter_mut().zip(&picks) {
                let changes = inner_changes(mapping, picks);
                *mapping = mapping.clone().with_inner_changes(changes);
            }
            case
        })
}

fn shift_text(range: TextRange, lines: u32) -> TextRange {
    TextRange::new(
        range.start_line_number + lines,
        range.start_column,
        range.end_line_number + lines,
        range.end_column,
    )
}

/// `mapping` moved down by `original` and `modified` lines.
fn shifted(mapping: &LineRangeMapping, original: u32, modified: u32) -> LineRangeMapping {
    let changes = mapping
        .inner_changes()
        .iter()
        .map(|c| RangeMapping {
            original_range: shift_text(c.original_range, original),
            modified_range: shift_text(c.modified_range, modified),
        })
        .collect();
    let (o, m) = (mapping.original, mapping.modified);
    LineRangeMapping::new(
        LineRange::of_length(o.start_line_number() + original, o.len()),
        LineRange::of_length(m.start_line_number() + modified, m.len()),
    )
    .with_inner_changes(changes)
}

/// A moved block with its own edits, placed inside larger buffers.
#[derive(Debug, Clone)]
struct MovedCase {
    original_lines: u32,
    modified_lines: u32,
    moved: MovedText,
}

fn moved_case() -> impl Strategy<Value = MovedCase> {
    (diff_case_with_inner_changes(), 0u32..10, 0u32..10, 0u32..5).prop_map(
        |(inner, original_prefix, modified_prefix, suffix)| {
            let block = LineRangeMapping::new(
                LineRange::of_length(original_prefix + 1, inner.original_lines),
                LineRange::of_length(modified_prefix + 1, inner.modified_lines),
            );
            let mut changes: Vec<_> = inner
                .mappings
                .iter()
                .map(|m| shifted(m, original_prefix, modified_prefix))
                .collect();
            if suffix >= 2 {
                // An edit after the block that does not touch it
                changes.push(LineRangeMapping::new(
                    LineRange::of_length(block.original.end_line_number_exclusive() + 1, 1),
                    LineRange::of_length(block.modified.end_line_number_exclusive() + 1, 1),
                ));
            }
            MovedCase {
                original_lines: block.original.end_line_number_exclusive() - 1 + suffix,
                modified_lines: block.modified.end_line_number_exclusive() - 1 + suffix,
                moved: MovedText {
                    line_range_mapping: block,
                    changes,
                },
            }
        },
    )
}

/// `(line pick, view lines)` wraps and `(anchor pick, height)` zones.
fn decorations() -> impl Strategy<Value = (Vec<(u32, u32)>, Vec<(u32, u32)>)> {
    (
        prop::collection::vec((0u32..1000, 2u32..4), 0..4),
        prop::collection::vec((0u32..1000, 1u32..60), 0..4),
    )
}

fn decorate(line_count: u32, wraps: &[(u32, u32)], zones: &[(u32, u32)]) -> ScenarioView {
    let mut view = ScenarioView::with_lines(line_count);
    for &(pick, view_lines) in wraps {
        view = view.with_wrapped(1 + pick % line_count, view_lines);
    }
    for (i, &(pick, height)) in zones.iter().enumerate() {
        view = view.with_whitespace(i as u64 + 1, pick % (line_count + 1), f64::from(height));
    }
    view
}

fn total_height(view: &ScenarioView) -> f64 {
    let lines: u32 = (1..=view.line_count())
        .map(|line| view.view_line_count(line))
        .sum();
    let zones: f64 = view.whitespaces().iter().map(|w| w.height_in_px).sum();
    let height = f64::from(lines) * LINE_HEIGHT + zones;
    assert_eq!(LineTops::from_view(view).content_height(), height);
    height
}

fn overrides_for(
    original: &ScenarioView,
    modified: &ScenarioView,
) -> PerSide<Vec<diffsync::layout::LineHeightOverride>> {
    PerSide::new(
        compute_line_height_overrides(original, &HashSet::new()),
        compute_line_height_overrides(modified, &HashSet::new()),
    )
}

fn align(case: &DiffCase, original: &ScenarioView, modified: &ScenarioView) -> Vec<Alignment> {
    compute_alignments(
        &case.mappings,
        original,
        modified,
        overrides_for(original, modified),
        true,
    )
}

fn assert_tiles(
    ranges: impl Iterator<Item = LineRange>,
    line_count: u32,
) -> Result<(), TestCaseError> {
    assert_tiles_range(ranges, LineRange::of_length(1, line_count))
}

/// `ranges` follow each other without gaps from the start of `whole` to its end.
fn assert_tiles_range(
    ranges: impl Iterator<Item = LineRange>,
    whole: LineRange,
) -> Result<(), TestCaseError> {
    let mut cursor = whole.start_line_number();
    for range in ranges {
        prop_assert_eq!(range.start_line_number(), cursor, "gap or overlap at {}", cursor);
        cursor = range.end_line_number_exclusive();
    }
    prop_assert_eq!(
        cursor,
        whole.end_line_number_exclusive(),
        "alignments stop short of the end"
    );
    Ok(())
}

fn assert_hunks_covered(
    mappings: &[LineRangeMapping],
    alignments: &[Alignment],
) -> Result<(), TestCaseError> {
    for mapping in mappings {
        let own: Vec<&Alignment> = alignments
            .iter()
            .filter(|a| a.diff.as_ref() == Some(mapping))
            .collect();
        prop_assert!(!own.is_empty(), "hunk {:?} has no alignment", mapping);
        prop_assert_eq!(own[0].original_range.start_line_number(), mapping.original.start_line_number());
        prop_assert_eq!(own[0].modified_range.start_line_number(), mapping.modified.start_line_number());
        let last = own[own.len() - 1];
        prop_assert_eq!(last.original_range.end_line_number_exclusive(), mapping.original.end_line_number_exclusive());
        prop_assert_eq!(last.modified_range.end_line_number_exclusive(), mapping.modified.end_line_number_exclusive());
    }
    Ok(())
}

proptest! {
    #[test]
    fn alignments_tile_both_buffers(
        case in diff_case(),
        (original_wraps, original_zones) in decorations(),
        (modified_wraps, modified_zones) in decorations(),
    ) {
        let original = decorate(case.original_lines, &original_wraps, &original_zones);
        let modified = decorate(case.modified_lines, &modified_wraps, &modified_zones);

        let alignments = align(&case, &original, &modified);

        assert_tiles(alignments.iter().map(|a| a.original_range), case.original_lines)?;
        assert_tiles(alignments.iter().map(|a| a.modified_range), case.modified_lines)?;
    }

    #[test]
    fn heights_add_up_to_rendered_height(
        case in diff_case(),
        (original_wraps, original_zones) in decorations(),
        (modified_wraps, modified_zones) in decorations(),
    ) {
        let original = decorate(case.original_lines, &original_wraps, &original_zones);
        let modified = decorate(case.modified_lines, &modified_wraps, &modified_zones);

        let alignments = align(&case, &original, &modified);

        prop_assert!(alignments
            .iter()
            .all(|a| a.original_height_in_px >= 0.0 && a.modified_height_in_px >= 0.0));
        let original_sum: f64 = alignments.iter().map(|a| a.original_height_in_px).sum();
        let modified_sum: f64 = alignments.iter().map(|a| a.modified_height_in_px).sum();
        prop_assert_eq!(original_sum, total_height(&original));
        prop_assert_eq!(modified_sum, total_height(&modified));
    }

    #[test]
    fn unchanged_alignments_have_equal_lengths(
        case in diff_case(),
        (original_wraps, original_zones) in decorations(),
    ) {
        let original = decorate(case.original_lines, &original_wraps, &original_zones);
        let modified = ScenarioView::with_lines(case.modified_lines);

        let alignments = align(&case, &original, &modified);

        for alignment in alignments.iter().filter(|a| a.diff.is_none()) {
            prop_assert_eq!(alignment.original_range.len(), alignment.modified_range.len());
        }
    }

    #[test]
    fn hunks_are_covered_by_their_own_alignments(
        case in diff_case(),
        (modified_wraps, modified_zones) in decorations(),
    ) {
        let original = ScenarioView::with_lines(case.original_lines);
        let modified = decorate(case.modified_lines, &modified_wraps, &modified_zones);

        let alignments = align(&case, &original, &modified);

        assert_hunks_covered(&case.mappings, &alignments)?;
    }

    #[test]
    fn inner_changes_keep_tiling_and_heights(
        case in diff_case_with_inner_changes(),
        (original_wraps, original_zones) in decorations(),
        (modified_wraps, modified_zones) in decorations(),
    ) {
        let original = decorate(case.original_lines, &original_wraps, &original_zones);
        let modified = decorate(case.modified_lines, &modified_wraps, &modified_zones);

        let alignments = align(&case, &original, &modified);

        assert_tiles(alignments.iter().map(|a| a.original_range), case.original_lines)?;
        assert_tiles(alignments.iter().map(|a| a.modified_range), case.modified_lines)?;
        let original_sum: f64 = alignments.iter().map(|a| a.original_height_in_px).sum();
        let modified_sum: f64 = alignments.iter().map(|a| a.modified_height_in_px).sum();
        prop_assert_eq!(original_sum, total_height(&original));
        prop_assert_eq!(modified_sum, total_height(&modified));
        assert_hunks_covered(&case.mappings, &alignments)?;
    }

    #[test]
    fn moved_alignments_tile_the_block(case in moved_case()) {
        let original = ScenarioView::with_lines(case.original_lines);
        let modified = ScenarioView::with_lines(case.modified_lines);
        let block = &case.moved.line_range_mapping;

        let alignments = compute_moved_text_alignments(
            &case.moved,
            &original,
            &modified,
            overrides_for(&original, &modified),
        );

        assert_tiles_range(alignments.iter().map(|a| a.original_range), block.original)?;
        assert_tiles_range(alignments.iter().map(|a| a.modified_range), block.modified)?;
        for alignment in &alignments {
            prop_assert_eq!(
                alignment.original_height_in_px,
                f64::from(alignment.original_range.len()) * LINE_HEIGHT
            );
            prop_assert_eq!(
                alignment.modified_height_in_px,
                f64::from(alignment.modified_range.len()) * LINE_HEIGHT
            );
        }
        let inside: Vec<_> = case
            .moved
            .changes
            .iter()
            .filter(|c| c.original.end_line_number_exclusive() <= block.original.end_line_number_exclusive())
            .cloned()
            .collect();
        assert_hunks_covered(&inside, &alignments)?;
    }
}
