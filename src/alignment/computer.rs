//! Merge diff hunks and per-side override streams into one alignment sequence.
//!
//! The walk keeps one cursor per side. Between hunks the two buffers are
//! unchanged, so a line's distance from its side's cursor is comparable across
//! sides even though the raw line numbers are not; override points are paired
//! up by that distance. Inside a hunk, alignments are cut at the hunk
//! boundaries and, in side-by-side mode, at inner-change boundaries that have
//! untouched text on the same line.

use tracing::{debug, trace};

use crate::layout::{EditorView, LineHeightOverride, OverrideQueue};
use crate::model::{LineRange, LineRangeMapping, PerSide, Side, StaleDiff};

use super::Alignment;

/// The line ranges an alignment pass covers, one per side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlignmentWindow {
    /// Covered original lines.
    pub original: LineRange,
    /// Covered modified lines.
    pub modified: LineRange,
}

impl AlignmentWindow {
    /// Window over explicit ranges.
    pub fn new(original: LineRange, modified: LineRange) -> Self {
        Self { original, modified }
    }

    /// Window over both whole buffers.
    pub fn full_file(original_line_count: u32, modified_line_count: u32) -> Self {
        Self {
            original: LineRange::of_length(1, original_line_count),
            modified: LineRange::of_length(1, modified_line_count),
        }
    }

    fn starts_at_first_line(&self) -> bool {
        self.original.start_line_number() == 1 && self.modified.start_line_number() == 1
    }
}

/// Measurements of one side taken once per pass.
#[derive(Debug, Clone, Copy)]
struct SideMetrics {
    line_height: f64,
    line_count: u32,
}

/// Explicit state of one alignment pass.
pub struct AlignmentComputer<'a> {
    window: AlignmentWindow,
    original_view: &'a dyn EditorView,
    metrics: PerSide<SideMetrics>,
    queues: PerSide<OverrideQueue>,
    last_original: u32,
    last_modified: u32,
    result: Vec<Alignment>,
}

impl<'a> AlignmentComputer<'a> {
    /// Prepare a pass over `window`.
    ///
    /// `overrides` must be sorted by line number, as produced by
    /// [`compute_line_height_overrides`](crate::layout::compute_line_height_overrides).
    pub fn new(
        window: AlignmentWindow,
        original_view: &'a dyn EditorView,
        modified_view: &dyn EditorView,
        overrides: PerSide<Vec<LineHeightOverride>>,
    ) -> Self {
        Self {
            window,
            original_view,
            metrics: PerSide::new(
                SideMetrics {
                    line_height: original_view.line_height(),
                    line_count: original_view.line_count(),
                },
                SideMetrics {
                    line_height: modified_view.line_height(),
                    line_count: modified_view.line_count(),
                },
            ),
            queues: PerSide::new(
                OverrideQueue::new(overrides.original),
                OverrideQueue::new(overrides.modified),
            ),
            last_original: window.original.start_line_number(),
            last_modified: window.modified.start_line_number(),
            result: Vec::new(),
        }
    }

    /// Run the pass over `diffs` (ordered, non-overlapping).
    ///
    /// If a hunk points past the end of either model, the pass stops there and
    /// returns the alignments produced so far; the next diff recomputation
    /// supersedes them.
    pub fn run(mut self, diffs: &[LineRangeMapping], inner_hunk_alignment: bool) -> Vec<Alignment> {
        self.drain_leading_overrides();

        for mapping in diffs {
            if let Err(stale) = self.check_in_bounds(mapping) {
                debug!(%stale, emitted = self.result.len(), "diff is stale, returning partial alignments");
                return self.result;
            }

            self.handle_alignments_outside_of_diffs(
                mapping.original.start_line_number(),
                mapping.modified.start_line_number(),
            );
            self.emit_unchanged(
                mapping.original.start_line_number(),
                mapping.modified.start_line_number(),
            );
            self.emit_hunk(mapping, inner_hunk_alignment);
        }

        let original_end = self.window.original.end_line_number_exclusive();
        let modified_end = self.window.modified.end_line_number_exclusive();
        self.handle_alignments_outside_of_diffs(original_end, modified_end);
        self.emit_unchanged(original_end, modified_end);

        self.result
    }

    /// Overrides anchored before line 1 become one leading alignment with
    /// empty ranges. Windows starting further down just discard what lies
    /// above them.
    fn drain_leading_overrides(&mut self) {
        if self.window.starts_at_first_line() {
            let original = self.queues.original.take_below(1);
            let modified = self.queues.modified.take_below(1);
            if original > 0.0 || modified > 0.0 {
                self.result.push(Alignment {
                    original_range: LineRange::empty_at(1),
                    modified_range: LineRange::empty_at(1),
                    original_height_in_px: original,
                    modified_height_in_px: modified,
                    diff: None,
                });
            }
        } else {
            self.queues
                .original
                .skip_below(self.window.original.start_line_number());
            self.queues
                .modified
                .skip_below(self.window.modified.start_line_number());
        }
    }

    fn check_in_bounds(&self, mapping: &LineRangeMapping) -> Result<(), StaleDiff> {
        for side in Side::BOTH {
            let range = match side {
                Side::Original => mapping.original,
                Side::Modified => mapping.modified,
            };
            let line_count = self.metrics.get(side).line_count;
            if range.end_line_number_exclusive() > line_count + 1 {
                return Err(StaleDiff {
                    side,
                    line_number_exclusive: range.end_line_number_exclusive(),
                    line_count,
                });
            }
        }
        Ok(())
    }

    /// Pair up override points strictly below the bounds, emitting an
    /// unchanged gap before each one.
    fn handle_alignments_outside_of_diffs(
        &mut self,
        until_original_exclusive: u32,
        until_modified_exclusive: u32,
    ) {
        let until_original =
            until_original_exclusive.min(self.window.original.end_line_number_exclusive());
        let until_modified =
            until_modified_exclusive.min(self.window.modified.end_line_number_exclusive());

        loop {
            let next_original = self.queues.original.peek_below(until_original);
            let next_modified = self.queues.modified.peek_below(until_modified);

            let (original_line, modified_line) = match (next_original, next_modified) {
                (None, None) => break,
                (Some(o), None) => (o.line_number, self.map_to_modified(o.line_number)),
                (None, Some(m)) => (self.map_to_original(m.line_number), m.line_number),
                (Some(o), Some(m)) => {
                    let distance_original = o.line_number.saturating_sub(self.last_original);
                    let distance_modified = m.line_number.saturating_sub(self.last_modified);
                    match distance_original.cmp(&distance_modified) {
                        std::cmp::Ordering::Less => {
                            (o.line_number, self.map_to_modified(o.line_number))
                        }
                        std::cmp::Ordering::Greater => {
                            (self.map_to_original(m.line_number), m.line_number)
                        }
                        std::cmp::Ordering::Equal => (o.line_number, m.line_number),
                    }
                }
            };

            if original_line >= until_original || modified_line >= until_modified {
                // No counterpart fits on the other side; the next emission
                // absorbs the pending height.
                trace!(original_line, modified_line, "override has no counterpart in range");
                break;
            }

            self.emit_unchanged(original_line, modified_line);

            let original_extra = self.queues.original.take_below(original_line + 1);
            let modified_extra = self.queues.modified.take_below(modified_line + 1);
            self.result.push(Alignment {
                original_range: LineRange::of_length(original_line, 1),
                modified_range: LineRange::of_length(modified_line, 1),
                original_height_in_px: self.metrics.original.line_height + original_extra,
                modified_height_in_px: self.metrics.modified.line_height + modified_extra,
                diff: None,
            });
            self.last_original = original_line + 1;
            self.last_modified = modified_line + 1;
        }
    }

    fn map_to_modified(&self, original_line: u32) -> u32 {
        original_line.saturating_sub(self.last_original) + self.last_modified
    }

    fn map_to_original(&self, modified_line: u32) -> u32 {
        modified_line.saturating_sub(self.last_modified) + self.last_original
    }

    /// Advance both cursors over a region no hunk touches.
    fn emit_unchanged(&mut self, original_exclusive: u32, modified_exclusive: u32) {
        if original_exclusive < self.last_original || modified_exclusive < self.last_modified {
            trace!(
                original_exclusive,
                modified_exclusive,
                last_original = self.last_original,
                last_modified = self.last_modified,
                "dropping backward unchanged region"
            );
            return;
        }
        self.push_range_alignment(original_exclusive, modified_exclusive, None);
    }

    fn emit_hunk(&mut self, mapping: &LineRangeMapping, inner_hunk_alignment: bool) {
        let mut first = true;

        if inner_hunk_alignment {
            let original_line_count = self.metrics.original.line_count;
            for inner in mapping.inner_changes() {
                if inner.original_range.start_column > 1 && inner.modified_range.start_column > 1 {
                    // Untouched text precedes the change on its first line.
                    self.emit_in_hunk(
                        mapping,
                        inner.original_range.start_line_number,
                        inner.modified_range.start_line_number,
                        false,
                        &mut first,
                    );
                }
                let end_line = inner.original_range.end_line_number;
                let max_column = if end_line <= original_line_count {
                    self.original_view.line_max_column(end_line)
                } else {
                    u32::MAX
                };
                if inner.original_range.end_column < max_column {
                    // Untouched text follows the change on its last line.
                    self.emit_in_hunk(
                        mapping,
                        inner.original_range.end_line_number,
                        inner.modified_range.end_line_number,
                        false,
                        &mut first,
                    );
                }
            }
        }

        self.emit_in_hunk(
            mapping,
            mapping.original.end_line_number_exclusive(),
            mapping.modified.end_line_number_exclusive(),
            true,
            &mut first,
        );
    }

    fn emit_in_hunk(
        &mut self,
        mapping: &LineRangeMapping,
        original_exclusive: u32,
        modified_exclusive: u32,
        force: bool,
        first: &mut bool,
    ) {
        if original_exclusive < self.last_original || modified_exclusive < self.last_modified {
            trace!(
                original_exclusive,
                modified_exclusive,
                "dropping alignment that would move backward"
            );
            return;
        }
        if *first {
            *first = false;
        } else if !force
            && (original_exclusive == self.last_original
                || modified_exclusive == self.last_modified)
        {
            return;
        }
        self.push_range_alignment(original_exclusive, modified_exclusive, Some(mapping));
    }

    /// Emit `[last, exclusive)` on both sides and move the cursors there.
    fn push_range_alignment(
        &mut self,
        original_exclusive: u32,
        modified_exclusive: u32,
        diff: Option<&LineRangeMapping>,
    ) {
        let original_range = LineRange::of_length(
            self.last_original,
            original_exclusive - self.last_original,
        );
        let modified_range = LineRange::of_length(
            self.last_modified,
            modified_exclusive - self.last_modified,
        );
        if original_range.is_empty() && modified_range.is_empty() {
            return;
        }

        let original_extra = self.queues.original.take_below(original_exclusive);
        let modified_extra = self.queues.modified.take_below(modified_exclusive);

        self.result.push(Alignment {
            original_range,
            modified_range,
            original_height_in_px: f64::from(original_range.len())
                * self.metrics.original.line_height
                + original_extra,
            modified_height_in_px: f64::from(modified_range.len())
                * self.metrics.modified.line_height
                + modified_extra,
            diff: diff.cloned(),
        });
        self.last_original = original_exclusive;
        self.last_modified = modified_exclusive;
    }
}

/// Alignments over both whole buffers.
///
/// `inner_hunk_alignment` should be set only when the two sides render next
/// to each other; a single combined view has nothing to align within a line.
pub fn compute_alignments(
    diffs: &[LineRangeMapping],
    original_view: &dyn EditorView,
    modified_view: &dyn EditorView,
    overrides: PerSide<Vec<LineHeightOverride>>,
    inner_hunk_alignment: bool,
) -> Vec<Alignment> {
    let window =
        AlignmentWindow::full_file(original_view.line_count(), modified_view.line_count());
    AlignmentComputer::new(window, original_view, modified_view, overrides)
        .run(diffs, inner_hunk_alignment)
}

#[cfg(test)]
#[path = "computer_tests.rs"]
mod tests;
