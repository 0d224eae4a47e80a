//! Layout layer - the editor-view collaborator and what the engine reads from it
//!
//! # Module Structure
//!
//! - `overrides`: LineHeightOverride streams (soft wrap + foreign view zones)
//! - `height_index`: Fenwick-tree pixel prefix sums, line tops, view-line mapping

pub mod height_index;
pub mod overrides;

use serde::{Deserialize, Serialize};

use crate::model::ZoneId;

pub use height_index::{HeightIndex, LineTops, ViewLineMap};
pub use overrides::{compute_line_height_overrides, LineHeightOverride, OverrideQueue};

/// How a scroll write should be applied by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScrollType {
    /// Jump without animation.
    Immediate,
    /// Let the host animate.
    Smooth,
}

/// Vertical space a view has inserted after a view line: a view zone, an
/// inline widget, or any other whitespace.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Whitespace {
    /// Host identifier; zones installed by this engine are recognised by it.
    pub id: ZoneId,
    /// View line the space follows; 0 means above the first line.
    pub after_view_line_number: u32,
    /// Height of the space.
    pub height_in_px: f64,
}

/// One side's editor view, as far as alignment needs to see it.
pub trait EditorView {
    /// Number of buffer lines.
    fn line_count(&self) -> u32;

    /// Column just past the last character of `line_number`.
    fn line_max_column(&self, line_number: u32) -> u32;

    /// Base height of a single view line.
    fn line_height(&self) -> f64;

    /// Number of view lines `line_number` soft-wraps into (1 when unwrapped).
    fn view_line_count(&self, line_number: u32) -> u32;

    /// Buffer line containing the start of 1-based `view_line_number`.
    fn model_line_for_view_line(&self, view_line_number: u32) -> u32;

    /// Every whitespace currently in the view, including ones this engine installed.
    fn whitespaces(&self) -> Vec<Whitespace>;

    /// Pixel top of `line_number`, counting wrapped lines and every view zone above it.
    fn top_for_line_number(&self, line_number: u32) -> f64 {
        LineTops::from_view(self).top_for_line_number(line_number)
    }

    /// Current vertical scroll position.
    fn scroll_top(&self) -> f64;

    /// Current horizontal scroll position.
    fn scroll_left(&self) -> f64;

    /// Whether the text area holds keyboard focus.
    fn has_text_focus(&self) -> bool;

    /// Scroll vertically.
    fn set_scroll_top(&mut self, value: f64, scroll_type: ScrollType);

    /// Scroll horizontally.
    fn set_scroll_left(&mut self, value: f64);
}
