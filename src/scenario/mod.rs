//! Scenario host - an in-memory diff editor for the driver and for tests
//!
//! A scenario file describes both sides' layouts and a diff result. The host
//! keeps the views, hands out payload and zone ids from counters, and records
//! what the engine asked it to do.

pub mod view;

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::alignment::Alignment;
use crate::engine::{DiffAlignmentEngine, DiffEditorHost, DiffSnapshot};
use crate::layout::EditorView;
use crate::model::{LineRange, LineRangeMapping, PayloadHandle, PerSide, Side, ZoneId};
use crate::scroll::ScrollState;
use crate::view_zone::{RenderedDeletion, ViewZoneDescriptor, ViewZones, ZonePayloads};

pub use view::{ScenarioView, SideLayout, DEFAULT_LINE_LENGTH};

/// Pixel width of one character when sizing deleted-code blocks.
pub const CHARACTER_WIDTH_PX: f64 = 8.0;

/// Errors reading a scenario file.
#[derive(Debug, Error)]
pub enum ScenarioError {
    /// The file could not be read.
    #[error("Failed to read scenario at {path}: {source}")]
    Read {
        /// Path that failed to read.
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The file is not a valid scenario.
    #[error("Invalid scenario in {path}: {source}")]
    Parse {
        /// Path with invalid content.
        path: PathBuf,
        /// Parse error details.
        #[source]
        source: serde_json::Error,
    },
}

/// Both layouts plus the diff between them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Scenario {
    /// Layout of the original side.
    pub original: SideLayout,
    /// Layout of the modified side.
    pub modified: SideLayout,
    /// Diff result handed to the engine.
    #[serde(default)]
    pub diff: DiffSnapshot,
}

impl Scenario {
    /// Read a scenario from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read or is not a valid scenario.
    pub fn load(path: &Path) -> Result<Self, ScenarioError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ScenarioError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&contents).map_err(|source| ScenarioError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// In-memory [`DiffEditorHost`].
#[derive(Debug, Clone)]
pub struct ScenarioHost {
    views: PerSide<ScenarioView>,
    next_payload: u64,
    next_zone_id: u64,
    live_payloads: BTreeSet<PayloadHandle>,
    released: Vec<PayloadHandle>,
}

impl ScenarioHost {
    /// Host over two views.
    pub fn new(original: ScenarioView, modified: ScenarioView) -> Self {
        Self {
            views: PerSide::new(original, modified),
            next_payload: 0,
            // Leave room below for ids used by foreign whitespaces in scenario files.
            next_zone_id: 1_000_000,
            live_payloads: BTreeSet::new(),
            released: Vec::new(),
        }
    }

    /// Host over a scenario's layouts.
    pub fn from_scenario(scenario: &Scenario) -> Self {
        Self::new(
            ScenarioView::new(scenario.original.clone()),
            ScenarioView::new(scenario.modified.clone()),
        )
    }

    /// Payloads created and not yet released.
    pub fn live_payloads(&self) -> &BTreeSet<PayloadHandle> {
        &self.live_payloads
    }

    /// Every payload released so far, in release order.
    pub fn released_payloads(&self) -> &[PayloadHandle] {
        &self.released
    }

    fn allocate_payload(&mut self) -> PayloadHandle {
        self.next_payload += 1;
        let handle = PayloadHandle(self.next_payload);
        self.live_payloads.insert(handle);
        handle
    }
}

impl ZonePayloads for ScenarioHost {
    fn render_deleted_lines(
        &mut self,
        original_range: LineRange,
        _mapping: &LineRangeMapping,
    ) -> RenderedDeletion {
        let original = &self.views.original;
        let lines = original_range.start_line_number()..original_range.end_line_number_exclusive();
        let view_line_counts = lines
            .clone()
            .map(|line| original.view_line_count(line))
            .collect();
        let widest = lines
            .map(|line| original.line_max_column(line).saturating_sub(1))
            .max()
            .unwrap_or(0);

        RenderedDeletion {
            payload: self.allocate_payload(),
            margin_payload: self.allocate_payload(),
            view_line_counts,
            min_width_in_px: f64::from(widest) * CHARACTER_WIDTH_PX,
        }
    }

    fn create_revert_affordance(&mut self, _mapping: &LineRangeMapping) -> PayloadHandle {
        self.allocate_payload()
    }

    fn release_payload(&mut self, payload: PayloadHandle) {
        if self.live_payloads.remove(&payload) {
            self.released.push(payload);
        }
    }
}

impl DiffEditorHost for ScenarioHost {
    type View = ScenarioView;

    fn view(&self, side: Side) -> &ScenarioView {
        self.views.get(side)
    }

    fn view_mut(&mut self, side: Side) -> &mut ScenarioView {
        self.views.get_mut(side)
    }

    fn replace_view_zones(&mut self, side: Side, zones: &[ViewZoneDescriptor]) -> Vec<ZoneId> {
        let next_zone_id = &mut self.next_zone_id;
        self.views.get_mut(side).install_zones(zones, || {
            *next_zone_id += 1;
            ZoneId(*next_zone_id)
        })
    }
}

/// Everything one driver run produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScenarioReport {
    /// Full-buffer alignments.
    pub alignments: Vec<Alignment>,
    /// Alignments inside the compared moved block.
    pub moved_text_alignments: Vec<Alignment>,
    /// Installed zones per side.
    pub view_zones: ViewZones,
    /// Scroll terms per side after the run.
    pub scroll: PerSide<ScrollState>,
}

impl ScenarioReport {
    /// Capture the engine's last pass and the host's scroll positions.
    pub fn capture(engine: &DiffAlignmentEngine, host: &ScenarioHost) -> Self {
        Self {
            alignments: engine.alignments().to_vec(),
            moved_text_alignments: engine.moved_text_alignments().to_vec(),
            view_zones: engine.view_zones().clone(),
            scroll: PerSide::new(
                engine.scroll_state(host, Side::Original),
                engine.scroll_state(host, Side::Modified),
            ),
        }
    }
}
