//! Keeps the two views' scroll positions locked together.

use serde::Serialize;
use tracing::{debug, trace};

use crate::layout::{EditorView, LineTops, ScrollType};
use crate::model::{PerSide, Side, Timestamp};

use super::animated::AnimatedOffset;

/// Snapshot of one side's scroll terms.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScrollState {
    /// Raw vertical scroll position.
    pub scroll_top: f64,
    /// Raw horizontal scroll position.
    pub scroll_left: f64,
    /// Padding inserted above the first line.
    pub extra_top_padding_px: f64,
    /// Current sample of the animated offset.
    pub animated_offset_px: f64,
    /// Full rendered height, view zones included.
    pub content_height_px: f64,
}

/// What a [`ScrollSynchronizer::advance`] call changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncTick {
    /// Top padding changed; view zones must be rebuilt.
    pub padding_changed: bool,
    /// An animated offset moved; scroll positions must be re-synced.
    pub offsets_changed: bool,
}

/// Scroll-lock state shared by both sides.
///
/// ```text
/// modified = original + (origOffset - modOffset) + (origPadding - modPadding)
/// original = modified + (modOffset - origOffset) + (modPadding - origPadding)
/// ```
#[derive(Debug, Clone)]
pub struct ScrollSynchronizer {
    top_padding: PerSide<f64>,
    offsets: PerSide<AnimatedOffset>,
    pending_padding_reset: Option<Timestamp>,
    top_padding_reset_delay_ms: u64,
    expected_left_echo: Option<(Side, f64)>,
}

impl ScrollSynchronizer {
    /// Synchronizer with zero offsets and paddings.
    pub fn new(top_padding_reset_delay_ms: u64, scroll_animation_ms: u64) -> Self {
        Self {
            top_padding: PerSide::default(),
            offsets: PerSide::new(
                AnimatedOffset::new(scroll_animation_ms),
                AnimatedOffset::new(scroll_animation_ms),
            ),
            pending_padding_reset: None,
            top_padding_reset_delay_ms,
            expected_left_echo: None,
        }
    }

    /// Apply new timing options; a running animation keeps its own duration.
    pub fn set_timing(&mut self, top_padding_reset_delay_ms: u64, scroll_animation_ms: u64) {
        self.top_padding_reset_delay_ms = top_padding_reset_delay_ms;
        for side in Side::BOTH {
            self.offsets.get_mut(side).set_duration(scroll_animation_ms);
        }
    }

    /// Scroll top the other side should have when `source` is at `source_scroll_top`.
    ///
    /// Never negative.
    pub fn target_scroll_top(&self, source: Side, source_scroll_top: f64) -> f64 {
        let other = source.other();
        let target = source_scroll_top
            + (self.offsets.get(source).value() - self.offsets.get(other).value())
            + (self.top_padding.get(source) - self.top_padding.get(other));
        target.max(0.0)
    }

    /// Push `source`'s scroll top onto `target_view`, if it is not there already.
    ///
    /// Returns the value written.
    pub fn sync_scroll_top<V: EditorView + ?Sized>(
        &self,
        source: Side,
        source_scroll_top: f64,
        target_view: &mut V,
    ) -> Option<f64> {
        let target = self.target_scroll_top(source, source_scroll_top);
        if target == target_view.scroll_top() {
            return None;
        }
        trace!(%source, source_scroll_top, target, "syncing scroll top");
        target_view.set_scroll_top(target, ScrollType::Immediate);
        Some(target)
    }

    /// Mirror `source`'s horizontal scroll onto `target_view`.
    ///
    /// The write comes back as a scroll event from the other side; that echo
    /// is swallowed instead of being mirrored again.
    pub fn sync_scroll_left<V: EditorView + ?Sized>(
        &mut self,
        source: Side,
        source_scroll_left: f64,
        target_view: &mut V,
    ) -> bool {
        if let Some((side, value)) = self.expected_left_echo.take() {
            if side == source && value == source_scroll_left {
                trace!(%source, "ignoring mirrored scroll left");
                return false;
            }
        }
        if target_view.scroll_left() == source_scroll_left {
            return false;
        }
        target_view.set_scroll_left(source_scroll_left);
        self.expected_left_echo = Some((source.other(), source_scroll_left));
        true
    }

    /// Recompute top paddings from where the compared moved block starts on
    /// each side, measured without any top padding. `None` means no block is
    /// compared.
    ///
    /// Returns true if either padding changed now. A zero delta schedules the
    /// reset instead of applying it; see [`advance`](Self::advance).
    pub fn reconcile_block_tops(
        &mut self,
        block_tops: Option<PerSide<f64>>,
        modified_focused: bool,
        now: Timestamp,
    ) -> bool {
        let delta = block_tops.map_or(0.0, |tops| tops.modified - tops.original);

        let before = self.top_padding;
        if delta > 0.0 {
            self.top_padding = PerSide::new(delta, 0.0);
            self.pending_padding_reset = None;
        } else if delta < 0.0 {
            self.top_padding = PerSide::new(0.0, -delta);
            self.pending_padding_reset = None;
        } else if self.has_padding() && self.pending_padding_reset.is_none() {
            self.pending_padding_reset = Some(now.saturating_add(self.top_padding_reset_delay_ms));
        }

        if modified_focused {
            let target = self.offsets.modified.target() - delta;
            self.offsets.original.set(target, true, now);
        } else {
            let target = self.offsets.original.target() + delta;
            self.offsets.modified.set(target, true, now);
        }

        let changed = before != self.top_padding;
        if changed {
            debug!(
                original = self.top_padding.original,
                modified = self.top_padding.modified,
                "top padding changed"
            );
        }
        changed
    }

    /// Fire a due padding reset and sample both offsets at `now`.
    pub fn advance(&mut self, now: Timestamp) -> SyncTick {
        let mut tick = SyncTick::default();
        if let Some(deadline) = self.pending_padding_reset {
            if now >= deadline {
                self.pending_padding_reset = None;
                tick.padding_changed = self.has_padding();
                self.top_padding = PerSide::default();
                trace!("top padding reset");
            }
        }
        for side in Side::BOTH {
            tick.offsets_changed |= self.offsets.get_mut(side).advance(now);
        }
        tick
    }

    /// Set one side's animated offset directly.
    pub fn set_offset(&mut self, side: Side, value: f64, animate: bool, now: Timestamp) {
        self.offsets.get_mut(side).set(value, animate, now);
    }

    /// Current top paddings.
    pub fn top_padding(&self) -> PerSide<f64> {
        self.top_padding
    }

    /// Current offset samples.
    pub fn offsets(&self) -> PerSide<f64> {
        PerSide::new(self.offsets.original.value(), self.offsets.modified.value())
    }

    /// When the scheduled padding reset fires, if one is pending.
    pub fn pending_padding_reset(&self) -> Option<Timestamp> {
        self.pending_padding_reset
    }

    /// True while an offset animation or a padding reset is outstanding.
    pub fn needs_ticks(&self) -> bool {
        self.pending_padding_reset.is_some()
            || self.offsets.original.is_animating()
            || self.offsets.modified.is_animating()
    }

    /// Snapshot of one side.
    pub fn state<V: EditorView + ?Sized>(&self, side: Side, view: &V) -> ScrollState {
        ScrollState {
            scroll_top: view.scroll_top(),
            scroll_left: view.scroll_left(),
            extra_top_padding_px: *self.top_padding.get(side),
            animated_offset_px: self.offsets.get(side).value(),
            content_height_px: LineTops::from_view(view).content_height(),
        }
    }

    fn has_padding(&self) -> bool {
        self.top_padding.original != 0.0 || self.top_padding.modified != 0.0
    }
}

#[cfg(test)]
#[path = "synchronizer_tests.rs"]
mod tests;
