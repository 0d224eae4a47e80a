//! Engine layer - runs the alignment pipeline against a host
//!
//! # Module Structure
//!
//! - `scheduler`: RecomputeScheduler (generation counter) and DisposableStore
//!
//! One pass always runs the same steps in the same order: line-height
//! overrides, alignment, moved-text alignment, view zones, moved-block top
//! padding, zone installation, scroll sync. Inputs only mark the engine dirty; [`DiffAlignmentEngine::flush`]
//! runs at most one pass per batch of changes.

pub mod scheduler;

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, trace};

use crate::alignment::{compute_alignments, compute_moved_text_alignments, Alignment};
use crate::config::EngineConfig;
use crate::layout::height_index::top_for_line;
use crate::layout::{compute_line_height_overrides, EditorView};
use crate::model::{LineRangeMapping, MovedText, PerSide, Side, Timestamp, ZoneId};
use crate::scroll::{ScrollState, ScrollSynchronizer};
use crate::view_zone::{
    build_view_zones, prepend_top_padding, ViewZoneDescriptor, ViewZoneInputs, ViewZoneOptions,
    ViewZones, ZonePayloads,
};

pub use scheduler::{DisposableStore, RecomputeScheduler};

/// One diff result as produced by the diff collaborator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DiffSnapshot {
    /// Hunks, ordered and non-overlapping on both sides.
    #[serde(default)]
    pub mappings: Vec<LineRangeMapping>,
    /// Every block detected as moved.
    #[serde(default)]
    pub moved_texts: Vec<MovedText>,
    /// The moved block the user is comparing, if any.
    #[serde(default)]
    pub moved_text_to_compare: Option<MovedText>,
    /// The diff no longer matches the models and a recomputation is pending.
    #[serde(default)]
    pub is_stale: bool,
}

/// The diff editor hosting both views.
pub trait DiffEditorHost: ZonePayloads {
    /// Editor view type of both sides.
    type View: EditorView;

    /// Borrow one side's view.
    fn view(&self, side: Side) -> &Self::View;

    /// Mutably borrow one side's view.
    fn view_mut(&mut self, side: Side) -> &mut Self::View;

    /// Replace every zone this engine installed on `side` with `zones`.
    ///
    /// Returns the ids of the installed zones, in order. Layout changes caused
    /// by this call must not be reported back as invalidations.
    fn replace_view_zones(&mut self, side: Side, zones: &[ViewZoneDescriptor]) -> Vec<ZoneId>;
}

/// Vertical alignment and scroll lock for one diff editor.
#[derive(Debug)]
pub struct DiffAlignmentEngine {
    config: EngineConfig,
    diff: Option<DiffSnapshot>,
    scheduler: RecomputeScheduler,
    disposables: DisposableStore,
    own_zone_ids: PerSide<HashSet<ZoneId>>,
    alignments: Vec<Alignment>,
    moved_text_alignments: Vec<Alignment>,
    view_zones: ViewZones,
    scroll: ScrollSynchronizer,
}

impl DiffAlignmentEngine {
    /// Engine with no diff yet; the first flush installs nothing but still syncs.
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            diff: None,
            scheduler: RecomputeScheduler::new(),
            disposables: DisposableStore::new(),
            own_zone_ids: PerSide::default(),
            alignments: Vec::new(),
            moved_text_alignments: Vec::new(),
            view_zones: ViewZones::default(),
            scroll: ScrollSynchronizer::new(
                config.top_padding_reset_delay_ms,
                config.scroll_animation_ms,
            ),
        }
    }

    /// Hand over a new diff result.
    pub fn set_diff(&mut self, diff: DiffSnapshot) {
        self.diff = Some(diff);
        self.scheduler.invalidate();
    }

    /// Change runtime options.
    pub fn set_config(&mut self, config: EngineConfig) {
        if config == self.config {
            return;
        }
        self.config = config;
        self.scroll
            .set_timing(config.top_padding_reset_delay_ms, config.scroll_animation_ms);
        self.scheduler.invalidate();
    }

    /// Record a layout change the engine did not cause (wrap, foreign zones,
    /// model edits, line height).
    pub fn invalidate(&mut self) {
        self.scheduler.invalidate();
    }

    /// True if a pass is owed.
    pub fn is_dirty(&self) -> bool {
        self.scheduler.is_dirty()
    }

    /// Run the owed pass, if any. Returns true if zones were reinstalled.
    pub fn flush<H: DiffEditorHost>(&mut self, host: &mut H, now: Timestamp) -> bool {
        if !self.scheduler.begin_pass() {
            return false;
        }

        let Some(diff) = &self.diff else {
            trace!("no diff yet");
            sync_from_focused(&self.scroll, host);
            return false;
        };

        if diff.is_stale {
            debug!(
                generation = self.scheduler.generation(),
                "diff is stale, keeping previous view zones"
            );
            sync_from_focused(&self.scroll, host);
            return false;
        }

        self.disposables.clear(host);

        let moved = diff.moved_text_to_compare.as_ref();

        let overrides = PerSide::new(
            compute_line_height_overrides(host.view(Side::Original), &self.own_zone_ids.original),
            compute_line_height_overrides(host.view(Side::Modified), &self.own_zone_ids.modified),
        );

        self.alignments = compute_alignments(
            &diff.mappings,
            host.view(Side::Original),
            host.view(Side::Modified),
            overrides.clone(),
            self.config.render_side_by_side,
        );
        self.moved_text_alignments = match moved {
            Some(moved) => compute_moved_text_alignments(
                moved,
                host.view(Side::Original),
                host.view(Side::Modified),
                overrides,
            ),
            None => Vec::new(),
        };

        let options = ViewZoneOptions {
            render_side_by_side: self.config.render_side_by_side,
            use_true_inline_diff_rendering: self.config.use_true_inline_diff_rendering,
            render_margin_revert_icon: self.config.render_margin_revert_icon,
            modified_line_height: host.view(Side::Modified).line_height(),
        };
        let mut zones = build_view_zones(
            ViewZoneInputs {
                alignments: &self.alignments,
                moved_text_alignments: &self.moved_text_alignments,
                synced_moved_text: moved,
                top_padding: PerSide::default(),
            },
            &options,
            host,
        );

        // Top padding is measured against the zones about to be installed.
        let block_tops =
            moved.map(|moved| block_start_tops(moved, &*host, &self.view_zones, &zones));
        let focused = host.view(Side::Modified).has_text_focus();
        self.scroll.reconcile_block_tops(block_tops, focused, now);
        prepend_top_padding(&mut zones, self.scroll.top_padding());
        self.disposables.track(&zones);

        for side in Side::BOTH {
            let ids = host.replace_view_zones(side, zones.get(side));
            *self.own_zone_ids.get_mut(side) = ids.into_iter().collect();
        }

        debug!(
            generation = self.scheduler.generation(),
            hunks = diff.mappings.len(),
            moved_blocks = diff.moved_texts.len(),
            alignments = self.alignments.len(),
            moved_alignments = self.moved_text_alignments.len(),
            original_zones = zones.original.len(),
            modified_zones = zones.modified.len(),
            "alignment pass complete"
        );
        self.view_zones = zones;

        sync_from_focused(&self.scroll, host);
        true
    }

    /// The host saw `side` scroll vertically; move the other side along.
    ///
    /// Returns the value written to the other side, if any.
    pub fn on_scroll<H: DiffEditorHost>(&mut self, host: &mut H, side: Side) -> Option<f64> {
        let source_top = host.view(side).scroll_top();
        self.scroll
            .sync_scroll_top(side, source_top, host.view_mut(side.other()))
    }

    /// The host saw `side` scroll horizontally.
    pub fn on_scroll_left<H: DiffEditorHost>(&mut self, host: &mut H, side: Side) -> bool {
        let source_left = host.view(side).scroll_left();
        self.scroll
            .sync_scroll_left(side, source_left, host.view_mut(side.other()))
    }

    /// Advance animations and delayed resets to `now`.
    ///
    /// Returns true if anything visible changed.
    pub fn tick<H: DiffEditorHost>(&mut self, host: &mut H, now: Timestamp) -> bool {
        let tick = self.scroll.advance(now);
        if tick.padding_changed {
            self.scheduler.invalidate();
            self.flush(host, now);
        } else if tick.offsets_changed {
            sync_from_focused(&self.scroll, host);
        }
        tick.padding_changed || tick.offsets_changed
    }

    /// True while animations or a delayed reset still need ticks.
    pub fn needs_ticks(&self) -> bool {
        self.scroll.needs_ticks()
    }

    /// Remove everything this engine installed and release its payloads.
    pub fn dispose<H: DiffEditorHost>(&mut self, host: &mut H) {
        self.disposables.clear(host);
        for side in Side::BOTH {
            host.replace_view_zones(side, &[]);
            self.own_zone_ids.get_mut(side).clear();
        }
        self.view_zones = ViewZones::default();
        self.alignments.clear();
        self.moved_text_alignments.clear();
    }

    /// Alignments of the last completed pass.
    pub fn alignments(&self) -> &[Alignment] {
        &self.alignments
    }

    /// Moved-text alignments of the last completed pass.
    pub fn moved_text_alignments(&self) -> &[Alignment] {
        &self.moved_text_alignments
    }

    /// Zones installed by the last completed pass.
    pub fn view_zones(&self) -> &ViewZones {
        &self.view_zones
    }

    /// Scroll-lock state.
    pub fn scroll(&self) -> &ScrollSynchronizer {
        &self.scroll
    }

    /// Snapshot of one side's scroll terms.
    pub fn scroll_state<H: DiffEditorHost>(&self, host: &H, side: Side) -> ScrollState {
        self.scroll.state(side, host.view(side))
    }

    /// Current options.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}

/// Tops of the moved block's first lines once `next` replaces `installed`,
/// not counting top padding.
fn block_start_tops<H: DiffEditorHost>(
    moved: &MovedText,
    host: &H,
    installed: &ViewZones,
    next: &ViewZones,
) -> PerSide<f64> {
    let block = &moved.line_range_mapping;
    let top = |side: Side, line_number: u32| {
        let above = |zones: &[ViewZoneDescriptor]| {
            zones
                .iter()
                .filter(|zone| zone.after_line_number < line_number)
                .map(|zone| zone.height_in_px)
                .sum::<f64>()
        };
        top_for_line(host.view(side), side, line_number) - above(installed.get(side).as_slice())
            + above(next.get(side).as_slice())
    };
    PerSide::new(
        top(Side::Original, block.original.start_line_number()),
        top(Side::Modified, block.modified.start_line_number()),
    )
}

/// Sync from the modified side if it has focus, from the original otherwise.
fn sync_from_focused<H: DiffEditorHost>(scroll: &ScrollSynchronizer, host: &mut H) {
    let source = if host.view(Side::Modified).has_text_focus() {
        Side::Modified
    } else {
        Side::Original
    };
    let source_top = host.view(source).scroll_top();
    scroll.sync_scroll_top(source, source_top, host.view_mut(source.other()));
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
