//! HeightIndex - O(log n) pixel prefix sums via Fenwick tree
//!
//! Answers "how far down is line N" and "which buffer line owns view line V"
//! for hosts that do not expose those queries natively.
//!
//! # Complexity
//!
//! - `set`: O(log n)
//! - `prefix_sum`: O(log n)
//! - `lower_bound`: O(log² n)
//! - `push`: O(log n)
//! - `total`: O(log n)

use crate::model::Side;

use super::EditorView;

/// Fenwick tree of per-line heights in pixels.
///
/// Entries are 0-indexed; entry `i` conventionally holds buffer line `i + 1`.
#[derive(Debug, Clone, Default)]
pub struct HeightIndex {
    /// Fenwick tree backing storage (1-indexed internally, 0-indexed API)
    tree: Vec<f64>,
    /// Number of valid entries (len <= tree.len())
    len: usize,
}

impl HeightIndex {
    /// Creates an empty index with pre-allocated capacity.
    ///
    /// # Examples
    ///
    /// ```
    /// # use diffsync::layout::height_index::HeightIndex;
    /// let index = HeightIndex::new(100);
    /// assert_eq!(index.len(), 0);
    /// assert_eq!(index.total(), 0.0);
    /// ```
    pub fn new(capacity: usize) -> Self {
        Self {
            tree: vec![0.0; capacity],
            len: 0,
        }
    }

    /// Builds an index from a height sequence.
    pub fn from_heights(heights: impl IntoIterator<Item = f64>) -> Self {
        let heights = heights.into_iter();
        let mut index = Self::new(heights.size_hint().0.max(1));
        for height in heights {
            index.push(height);
        }
        index
    }

    /// Sets the height at the given index.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len()`.
    pub fn set(&mut self, index: usize, height: f64) {
        assert!(
            index < self.len,
            "index {} out of bounds (len: {})",
            index,
            self.len
        );

        let delta = height - self.height(index);
        if delta != 0.0 {
            fenwick::array::update(&mut self.tree, index, delta);
        }
    }

    /// Height of a single entry.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len()`.
    pub fn height(&self, index: usize) -> f64 {
        if index == 0 {
            self.prefix_sum(0)
        } else {
            self.prefix_sum(index) - self.prefix_sum(index - 1)
        }
    }

    /// Cumulative height up to and including `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len()`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use diffsync::layout::height_index::HeightIndex;
    /// let index = HeightIndex::from_heights([18.0, 36.0, 18.0]);
    /// assert_eq!(index.prefix_sum(0), 18.0);
    /// assert_eq!(index.prefix_sum(1), 54.0);
    /// assert_eq!(index.prefix_sum(2), 72.0);
    /// ```
    pub fn prefix_sum(&self, index: usize) -> f64 {
        assert!(
            index < self.len,
            "index {} out of bounds (len: {})",
            index,
            self.len
        );

        fenwick::array::prefix_sum(&self.tree, index).max(0.0)
    }

    /// Cumulative height of all entries strictly before `index`.
    ///
    /// Unlike [`prefix_sum`](Self::prefix_sum) this accepts `index == len()`
    /// (and beyond), returning the total.
    pub fn sum_before(&self, index: usize) -> f64 {
        if index == 0 || self.is_empty() {
            0.0
        } else {
            self.prefix_sum(index.min(self.len) - 1)
        }
    }

    /// First index where `prefix_sum(index) > value`.
    ///
    /// Returns `None` if `value >= total()` or the index is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// # use diffsync::layout::height_index::HeightIndex;
    /// let index = HeightIndex::from_heights([10.0, 20.0, 15.0]);
    /// assert_eq!(index.lower_bound(0.0), Some(0));
    /// assert_eq!(index.lower_bound(10.0), Some(1));
    /// assert_eq!(index.lower_bound(30.0), Some(2));
    /// assert_eq!(index.lower_bound(100.0), None);
    /// ```
    pub fn lower_bound(&self, value: f64) -> Option<usize> {
        if self.is_empty() {
            return None;
        }

        let mut left = 0;
        let mut right = self.len;

        while left < right {
            let mid = left + (right - left) / 2;
            if self.prefix_sum(mid) > value {
                right = mid;
            } else {
                left = mid + 1;
            }
        }

        (left < self.len).then_some(left)
    }

    /// Total height of all entries.
    pub fn total(&self) -> f64 {
        if self.is_empty() {
            0.0
        } else {
            self.prefix_sum(self.len - 1)
        }
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.len
    }

    /// True if the index holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Appends an entry, growing the backing storage if necessary.
    pub fn push(&mut self, height: f64) {
        if self.len >= self.tree.len() {
            self.tree.resize(self.tree.len().max(1) * 2, 0.0);
            // Growing changes which slots a Fenwick update touches; rebuild so
            // existing partial sums cover the new tail.
            let heights: Vec<f64> = (0..self.len).map(|i| self.height(i)).collect();
            self.tree.iter_mut().for_each(|slot| *slot = 0.0);
            for (i, h) in heights.into_iter().enumerate() {
                fenwick::array::update(&mut self.tree, i, h);
            }
        }

        let idx = self.len;
        self.len += 1;
        fenwick::array::update(&mut self.tree, idx, height);
    }
}

/// Pixel tops of every buffer line of one side, view zones included.
#[derive(Debug, Clone)]
pub struct LineTops {
    /// Height of zones anchored before line 1.
    leading: f64,
    /// Entry `i` is line `i + 1` plus every zone anchored after it.
    lines: HeightIndex,
}

impl LineTops {
    /// Measure a view: wrapped line heights plus all of its whitespaces.
    pub fn from_view<V: EditorView + ?Sized>(view: &V) -> Self {
        let line_height = view.line_height();
        let line_count = view.line_count() as usize;
        let mut heights: Vec<f64> = (1..=view.line_count())
            .map(|line| f64::from(view.view_line_count(line).max(1)) * line_height)
            .collect();

        let mut leading = 0.0;
        for whitespace in view.whitespaces() {
            let line = if whitespace.after_view_line_number == 0 {
                0
            } else {
                view.model_line_for_view_line(whitespace.after_view_line_number)
            };
            match line as usize {
                0 => leading += whitespace.height_in_px,
                n if n <= line_count => heights[n - 1] += whitespace.height_in_px,
                _ => {
                    if let Some(last) = heights.last_mut() {
                        *last += whitespace.height_in_px;
                    }
                }
            }
        }

        Self {
            leading,
            lines: HeightIndex::from_heights(heights),
        }
    }

    /// Pixel top of `line_number`, counting every zone anchored above it.
    ///
    /// Lines past the end report the total content height.
    pub fn top_for_line_number(&self, line_number: u32) -> f64 {
        let before = line_number.saturating_sub(1) as usize;
        self.leading + self.lines.sum_before(before)
    }

    /// Total content height.
    pub fn content_height(&self) -> f64 {
        self.leading + self.lines.total()
    }
}

/// Maps view lines (after soft wrap) back to buffer lines.
#[derive(Debug, Clone)]
pub struct ViewLineMap {
    view_lines: HeightIndex,
}

impl ViewLineMap {
    /// Build from per-buffer-line view-line counts (entry `i` is line `i + 1`).
    pub fn new(view_line_counts: impl IntoIterator<Item = u32>) -> Self {
        Self {
            view_lines: HeightIndex::from_heights(
                view_line_counts.into_iter().map(|c| f64::from(c.max(1))),
            ),
        }
    }

    /// The buffer line owning 1-based `view_line_number`.
    ///
    /// View line 0 maps to 0; view lines past the end map to the last line.
    pub fn model_line(&self, view_line_number: u32) -> u32 {
        if view_line_number == 0 {
            return 0;
        }
        let last = self.view_lines.len() as u32;
        self.view_lines
            .lower_bound(f64::from(view_line_number - 1))
            .map_or(last, |index| index as u32 + 1)
    }

    /// Last view line belonging to buffer line `model_line_number`; 0 for line 0.
    pub fn last_view_line(&self, model_line_number: u32) -> u32 {
        self.view_lines.sum_before(model_line_number as usize) as u32
    }

    /// Total number of view lines.
    pub fn view_line_count(&self) -> u32 {
        self.view_lines.total() as u32
    }
}

/// Side-tagged pixel top, used by moved-text padding reconciliation.
pub fn top_for_line<V: EditorView + ?Sized>(view: &V, side: Side, line_number: u32) -> f64 {
    let top = view.top_for_line_number(line_number);
    tracing::trace!(%side, line_number, top, "measured line top");
    top
}
