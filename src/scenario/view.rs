//! In-memory editor view driven by a declarative layout.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::layout::{EditorView, ScrollType, ViewLineMap, Whitespace};
use crate::model::ZoneId;
use crate::view_zone::ViewZoneDescriptor;

/// Line length assumed for lines without an explicit entry.
pub const DEFAULT_LINE_LENGTH: u32 = 40;

fn default_line_height() -> f64 {
    20.0
}

/// Static description of one side's view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SideLayout {
    /// Number of buffer lines.
    pub line_count: u32,
    /// Height of one view line.
    #[serde(default = "default_line_height")]
    pub line_height: f64,
    /// Characters per line, for lines that differ from [`DEFAULT_LINE_LENGTH`].
    #[serde(default)]
    pub line_lengths: BTreeMap<u32, u32>,
    /// View-line counts of soft-wrapped lines.
    #[serde(default)]
    pub wrapped_lines: BTreeMap<u32, u32>,
    /// Whitespaces owned by other features (inline widgets, foreign zones).
    #[serde(default)]
    pub whitespaces: Vec<Whitespace>,
    /// Initial vertical scroll position.
    #[serde(default)]
    pub scroll_top: f64,
    /// Initial horizontal scroll position.
    #[serde(default)]
    pub scroll_left: f64,
    /// Whether this side starts with keyboard focus.
    #[serde(default)]
    pub focused: bool,
}

impl SideLayout {
    /// Unwrapped layout of `line_count` lines at the default line height.
    pub fn new(line_count: u32) -> Self {
        Self {
            line_count,
            line_height: default_line_height(),
            line_lengths: BTreeMap::new(),
            wrapped_lines: BTreeMap::new(),
            whitespaces: Vec::new(),
            scroll_top: 0.0,
            scroll_left: 0.0,
            focused: false,
        }
    }
}

/// An [`EditorView`] over a [`SideLayout`] plus the zones the engine installed.
#[derive(Debug, Clone)]
pub struct ScenarioView {
    layout: SideLayout,
    view_lines: ViewLineMap,
    installed: Vec<Whitespace>,
    scroll_top: f64,
    scroll_left: f64,
    scroll_writes: Vec<(f64, ScrollType)>,
}

impl ScenarioView {
    /// Build a view from its layout.
    pub fn new(layout: SideLayout) -> Self {
        let view_lines = ViewLineMap::new(
            (1..=layout.line_count)
                .map(|line| layout.wrapped_lines.get(&line).copied().unwrap_or(1)),
        );
        Self {
            scroll_top: layout.scroll_top,
            scroll_left: layout.scroll_left,
            layout,
            view_lines,
            installed: Vec::new(),
            scroll_writes: Vec::new(),
        }
    }

    /// Unwrapped view of `line_count` lines.
    pub fn with_lines(line_count: u32) -> Self {
        Self::new(SideLayout::new(line_count))
    }

    /// Same view with `line_number` soft-wrapping into `view_lines` view lines.
    pub fn with_wrapped(mut self, line_number: u32, view_lines: u32) -> Self {
        self.layout.wrapped_lines.insert(line_number, view_lines);
        Self::new(self.layout)
    }

    /// Same view with a foreign whitespace after `after_view_line_number`.
    pub fn with_whitespace(mut self, id: u64, after_view_line_number: u32, height_in_px: f64) -> Self {
        self.layout.whitespaces.push(Whitespace {
            id: ZoneId(id),
            after_view_line_number,
            height_in_px,
        });
        self
    }

    /// Same view with `line_number` holding `length` characters.
    pub fn with_line_length(mut self, line_number: u32, length: u32) -> Self {
        self.layout.line_lengths.insert(line_number, length);
        self
    }

    /// Same view at a different line height.
    pub fn with_line_height(mut self, line_height: f64) -> Self {
        self.layout.line_height = line_height;
        self
    }

    /// Same view holding keyboard focus.
    pub fn focused(mut self) -> Self {
        self.layout.focused = true;
        self
    }

    /// Give or take keyboard focus.
    pub fn set_focused(&mut self, focused: bool) {
        self.layout.focused = focused;
    }

    /// Scroll as the user would, without recording an engine write.
    pub fn user_scroll_to(&mut self, scroll_top: f64) {
        self.scroll_top = scroll_top;
    }

    /// Scroll horizontally as the user would.
    pub fn user_scroll_left_to(&mut self, scroll_left: f64) {
        self.scroll_left = scroll_left;
    }

    /// Replace the engine-installed zones, returning their fresh ids.
    pub fn install_zones(
        &mut self,
        zones: &[ViewZoneDescriptor],
        mut next_id: impl FnMut() -> ZoneId,
    ) -> Vec<ZoneId> {
        self.installed = zones
            .iter()
            .map(|zone| Whitespace {
                id: next_id(),
                after_view_line_number: self.view_lines.last_view_line(zone.after_line_number),
                height_in_px: zone.height_in_px,
            })
            .collect();
        self.installed.iter().map(|w| w.id).collect()
    }

    /// Zones the engine installed most recently.
    pub fn installed_zones(&self) -> &[Whitespace] {
        &self.installed
    }

    /// Every scroll write the engine made, oldest first.
    pub fn scroll_writes(&self) -> &[(f64, ScrollType)] {
        &self.scroll_writes
    }

    /// The layout this view was built from.
    pub fn layout(&self) -> &SideLayout {
        &self.layout
    }
}

impl EditorView for ScenarioView {
    fn line_count(&self) -> u32 {
        self.layout.line_count
    }

    fn line_max_column(&self, line_number: u32) -> u32 {
        self.layout
            .line_lengths
            .get(&line_number)
            .copied()
            .unwrap_or(DEFAULT_LINE_LENGTH)
            + 1
    }

    fn line_height(&self) -> f64 {
        self.layout.line_height
    }

    fn view_line_count(&self, line_number: u32) -> u32 {
        self.layout
            .wrapped_lines
            .get(&line_number)
            .copied()
            .unwrap_or(1)
            .max(1)
    }

    fn model_line_for_view_line(&self, view_line_number: u32) -> u32 {
        self.view_lines.model_line(view_line_number)
    }

    fn whitespaces(&self) -> Vec<Whitespace> {
        self.layout
            .whitespaces
            .iter()
            .chain(&self.installed)
            .copied()
            .collect()
    }

    fn scroll_top(&self) -> f64 {
        self.scroll_top
    }

    fn scroll_left(&self) -> f64 {
        self.scroll_left
    }

    fn has_text_focus(&self) -> bool {
        self.layout.focused
    }

    fn set_scroll_top(&mut self, value: f64, scroll_type: ScrollType) {
        self.scroll_top = value;
        self.scroll_writes.push((value, scroll_type));
    }

    fn set_scroll_left(&mut self, value: f64) {
        self.scroll_left = value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrapped_line_shifts_tops_below_it() {
        // GIVEN line 2 wrapping into 3 view lines at 20px per line
        let view = ScenarioView::with_lines(4).with_wrapped(2, 3);

        // THEN line 3 starts after 1 + 3 view lines
        assert_eq!(view.top_for_line_number(1), 0.0);
        assert_eq!(view.top_for_line_number(3), 80.0);
        assert_eq!(view.model_line_for_view_line(4), 2);
    }

    #[test]
    fn installed_zone_anchors_after_last_view_line_of_its_line() {
        let mut view = ScenarioView::with_lines(3).with_wrapped(1, 2);
        let mut id = 100;
        let ids = view.install_zones(&[ViewZoneDescriptor::padding(1, 30.0)], || {
            id += 1;
            ZoneId(id)
        });

        assert_eq!(ids, vec![ZoneId(101)]);
        assert_eq!(view.installed_zones()[0].after_view_line_number, 2);
        assert_eq!(view.top_for_line_number(2), 70.0);
    }

    #[test]
    fn line_max_column_defaults_past_default_length() {
        let view = ScenarioView::with_lines(2).with_line_length(2, 5);
        assert_eq!(view.line_max_column(1), DEFAULT_LINE_LENGTH + 1);
        assert_eq!(view.line_max_column(2), 6);
    }

    #[test]
    fn layout_deserializes_with_defaults() {
        let layout: SideLayout =
            serde_json::from_str(r#"{"line_count": 3, "wrapped_lines": {"2": 4}}"#).unwrap();
        assert_eq!(layout.line_height, 20.0);
        assert_eq!(layout.wrapped_lines.get(&2), Some(&4));
        assert!(!layout.focused);
    }
}
