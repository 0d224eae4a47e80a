//! Per-line extra heights the alignment pass must account for outside hunks.

use serde::{Deserialize, Serialize};
use std::collections::{HashSet, VecDeque};

use crate::model::ZoneId;

use super::EditorView;

/// Extra height forced at one buffer line of one side.
///
/// `line_number == 0` means "before the first line".
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LineHeightOverride {
    /// Buffer line the extra height follows.
    pub line_number: u32,
    /// Extra pixels beyond the line's base height.
    pub height_in_px: f64,
}

/// Collect the sorted override stream for one side.
///
/// Soft-wrapped lines contribute `line_height × (view_lines − 1)`; every
/// whitespace not in `ignore_zone_ids` contributes its height at the buffer
/// line owning its anchor. Entries on the same line are summed.
pub fn compute_line_height_overrides<V: EditorView + ?Sized>(
    view: &V,
    ignore_zone_ids: &HashSet<ZoneId>,
) -> Vec<LineHeightOverride> {
    let line_height = view.line_height();

    let mut entries: Vec<LineHeightOverride> = (1..=view.line_count())
        .filter_map(|line_number| {
            let count = view.view_line_count(line_number);
            (count > 1).then(|| LineHeightOverride {
                line_number,
                height_in_px: line_height * f64::from(count - 1),
            })
        })
        .collect();

    entries.extend(
        view.whitespaces()
            .into_iter()
            .filter(|w| !ignore_zone_ids.contains(&w.id))
            .map(|w| LineHeightOverride {
                line_number: if w.after_view_line_number == 0 {
                    0
                } else {
                    view.model_line_for_view_line(w.after_view_line_number)
                },
                height_in_px: w.height_in_px,
            }),
    );

    // Stable: wrap entries stay ahead of zone entries on the same line.
    entries.sort_by_key(|o| o.line_number);

    let mut merged: Vec<LineHeightOverride> = Vec::with_capacity(entries.len());
    for entry in entries {
        match merged.last_mut() {
            Some(last) if last.line_number == entry.line_number => {
                last.height_in_px += entry.height_in_px;
            }
            _ => merged.push(entry),
        }
    }
    merged
}

/// Consuming cursor over one side's sorted override stream.
#[derive(Debug, Clone, Default)]
pub struct OverrideQueue {
    items: VecDeque<LineHeightOverride>,
}

impl OverrideQueue {
    /// Wrap a sorted stream.
    pub fn new(overrides: impl IntoIterator<Item = LineHeightOverride>) -> Self {
        Self {
            items: overrides.into_iter().collect(),
        }
    }

    /// Next pending override.
    pub fn peek(&self) -> Option<&LineHeightOverride> {
        self.items.front()
    }

    /// Next pending override if it lies strictly below `exclusive`.
    pub fn peek_below(&self, exclusive: u32) -> Option<LineHeightOverride> {
        self.items
            .front()
            .filter(|o| o.line_number < exclusive)
            .copied()
    }

    /// Remove the next pending override.
    pub fn dequeue(&mut self) -> Option<LineHeightOverride> {
        self.items.pop_front()
    }

    /// Remove every override below `exclusive` and return their summed height.
    pub fn take_below(&mut self, exclusive: u32) -> f64 {
        let mut sum = 0.0;
        while let Some(o) = self.peek_below(exclusive) {
            sum += o.height_in_px;
            self.dequeue();
        }
        sum
    }

    /// Drop every override below `exclusive` without summing.
    pub fn skip_below(&mut self, exclusive: u32) {
        while self.peek_below(exclusive).is_some() {
            self.dequeue();
        }
    }

    /// True once every override has been consumed.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
