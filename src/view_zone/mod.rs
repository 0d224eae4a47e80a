//! View zones - the padding and deleted-code blocks handed to the host
//!
//! The engine never draws. Every zone it asks for is a descriptor: an anchor
//! line, a height, and opaque payload handles the host allocated through
//! [`ZonePayloads`].

pub mod builder;

use serde::Serialize;

use crate::model::{LineRange, LineRangeMapping, PayloadHandle, PerSide};

pub use builder::{build_view_zones, prepend_top_padding, ViewZoneInputs, ViewZoneOptions};

/// What fills a zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum ZoneContent {
    /// Blank filler lines.
    Padding,
    /// Deleted original lines rendered into the modified view.
    DeletedLines {
        /// Host handle of the rendered block.
        payload: PayloadHandle,
    },
}

/// What the gutter shows next to a zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum ZoneMargin {
    /// "Lines deleted here" gutter marker.
    GutterDelete,
    /// Affordance that restores a purely deleted hunk.
    RevertArrow {
        /// Host handle of the affordance.
        payload: PayloadHandle,
    },
    /// Line numbers and actions for an inline deleted-code block.
    DeletedLines {
        /// Host handle of the margin content.
        payload: PayloadHandle,
    },
}

/// One view zone to install into one side.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ViewZoneDescriptor {
    /// Buffer line the zone follows; 0 places it above the first line.
    pub after_line_number: u32,
    /// Zone height.
    pub height_in_px: f64,
    /// Zone body.
    pub content: ZoneContent,
    /// Gutter content, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub margin: Option<ZoneMargin>,
    /// Minimum horizontal extent the content needs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_width_in_px: Option<f64>,
}

impl ViewZoneDescriptor {
    /// Blank padding after `after_line_number`.
    pub fn padding(after_line_number: u32, height_in_px: f64) -> Self {
        Self {
            after_line_number,
            height_in_px,
            content: ZoneContent::Padding,
            margin: None,
            min_width_in_px: None,
        }
    }

    /// Same zone with gutter content.
    pub fn with_margin(mut self, margin: ZoneMargin) -> Self {
        self.margin = Some(margin);
        self
    }

    /// Every payload handle the zone references.
    pub fn payloads(&self) -> impl Iterator<Item = PayloadHandle> {
        let content = match self.content {
            ZoneContent::DeletedLines { payload } => Some(payload),
            ZoneContent::Padding => None,
        };
        let margin = match self.margin {
            Some(ZoneMargin::RevertArrow { payload }) | Some(ZoneMargin::DeletedLines { payload }) => {
                Some(payload)
            }
            Some(ZoneMargin::GutterDelete) | None => None,
        };
        content.into_iter().chain(margin)
    }
}

/// Zones for both sides.
pub type ViewZones = PerSide<Vec<ViewZoneDescriptor>>;

/// Deleted lines rendered by the host for inline display.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedDeletion {
    /// Handle of the rendered block.
    pub payload: PayloadHandle,
    /// Handle of the block's gutter content.
    pub margin_payload: PayloadHandle,
    /// View lines each deleted line wrapped into, in order.
    pub view_line_counts: Vec<u32>,
    /// Widest rendered line.
    pub min_width_in_px: f64,
}

impl RenderedDeletion {
    /// Total view lines of the block.
    pub fn height_in_lines(&self) -> u32 {
        self.view_line_counts.iter().sum()
    }
}

/// Host-side content factory for zones that carry more than blank space.
pub trait ZonePayloads {
    /// Render `original_range` of the original buffer for display inside the
    /// modified view.
    fn render_deleted_lines(
        &mut self,
        original_range: LineRange,
        mapping: &LineRangeMapping,
    ) -> RenderedDeletion;

    /// Create the "revert this change" affordance for a pure deletion.
    fn create_revert_affordance(&mut self, mapping: &LineRangeMapping) -> PayloadHandle;

    /// Release content created in an earlier pass.
    fn release_payload(&mut self, payload: PayloadHandle);
}
