//! Turn alignments into view zones for each side.

use tracing::trace;

use crate::alignment::Alignment;
use crate::model::{MovedText, PerSide, Side};

use super::{ViewZoneDescriptor, ViewZones, ZoneContent, ZoneMargin, ZonePayloads};

/// Rendering options that decide how a hunk is padded.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewZoneOptions {
    /// Two views next to each other; otherwise one combined inline view.
    pub render_side_by_side: bool,
    /// In inline mode, draw hunks made only of single-line inner changes as
    /// decorations rather than deleted-code blocks.
    pub use_true_inline_diff_rendering: bool,
    /// Offer a revert affordance next to padding for purely deleted hunks.
    pub render_margin_revert_icon: bool,
    /// Line height of the modified view; deleted lines render at this height.
    pub modified_line_height: f64,
}

/// Everything one build reads.
#[derive(Debug, Clone, Copy)]
pub struct ViewZoneInputs<'a> {
    /// Full-buffer alignments.
    pub alignments: &'a [Alignment],
    /// Alignments inside the synced moved block.
    pub moved_text_alignments: &'a [Alignment],
    /// The moved block currently shown side by side, if any.
    pub synced_moved_text: Option<&'a MovedText>,
    /// Padding each side needs above its first line.
    pub top_padding: PerSide<f64>,
}

/// Build both sides' zone lists.
///
/// Deleted-code blocks and revert affordances are created through `payloads`;
/// the caller owns their release.
pub fn build_view_zones<P: ZonePayloads + ?Sized>(
    inputs: ViewZoneInputs<'_>,
    options: &ViewZoneOptions,
    payloads: &mut P,
) -> ViewZones {
    let mut zones = ViewZones::default();

    for alignment in inputs.alignments {
        if let Some(diff) = &alignment.diff {
            let inline = !options.render_side_by_side
                && (!options.use_true_inline_diff_rendering
                    || !diff.allows_true_inline_rendering());
            if inline {
                push_inline_deletion(&mut zones, alignment, options, payloads);
                continue;
            }
        }
        push_height_delta(&mut zones, alignment, inputs.synced_moved_text, options, payloads);
    }

    if let Some(moved) = inputs.synced_moved_text {
        let block = &moved.line_range_mapping;
        for alignment in inputs.moved_text_alignments {
            if block.original.intersect(&alignment.original_range).is_none()
                || block.modified.intersect(&alignment.modified_range).is_none()
            {
                continue;
            }
            let delta = alignment.height_delta();
            if delta > 0.0 {
                zones.original.push(ViewZoneDescriptor::padding(
                    alignment.original_range.end_line_number_exclusive() - 1,
                    delta,
                ));
            } else if delta < 0.0 {
                zones.modified.push(ViewZoneDescriptor::padding(
                    alignment.modified_range.end_line_number_exclusive() - 1,
                    -delta,
                ));
            }
        }
    }

    prepend_top_padding(&mut zones, inputs.top_padding);
    zones
}

/// Put a zone above line 1 on each side with positive top padding.
pub fn prepend_top_padding(zones: &mut ViewZones, top_padding: PerSide<f64>) {
    for side in Side::BOTH {
        let padding = *top_padding.get(side);
        if padding > 0.0 {
            zones
                .get_mut(side)
                .insert(0, ViewZoneDescriptor::padding(0, padding));
        }
    }
}

/// Inline mode: deleted lines shown inside the modified view.
fn push_inline_deletion<P: ZonePayloads + ?Sized>(
    zones: &mut ViewZones,
    alignment: &Alignment,
    options: &ViewZoneOptions,
    payloads: &mut P,
) {
    let Some(diff) = &alignment.diff else {
        return;
    };
    let line_height = options.modified_line_height;

    if !alignment.original_range.is_empty() {
        let rendered = payloads.render_deleted_lines(alignment.original_range, diff);

        // The original view does not wrap these lines the way the block does;
        // pad it so both stay the same height.
        for (i, &count) in rendered.view_line_counts.iter().enumerate() {
            if count > 1 {
                zones.original.push(ViewZoneDescriptor::padding(
                    alignment.original_range.start_line_number() + i as u32,
                    f64::from(count - 1) * line_height,
                ));
            }
        }

        zones.modified.push(ViewZoneDescriptor {
            after_line_number: alignment.modified_range.start_line_number() - 1,
            height_in_px: f64::from(rendered.height_in_lines()) * line_height,
            content: ZoneContent::DeletedLines {
                payload: rendered.payload,
            },
            margin: Some(ZoneMargin::DeletedLines {
                payload: rendered.margin_payload,
            }),
            min_width_in_px: Some(rendered.min_width_in_px),
        });
    }

    zones.original.push(
        ViewZoneDescriptor::padding(
            alignment.original_range.end_line_number_exclusive() - 1,
            alignment.modified_height_in_px,
        )
        .with_margin(ZoneMargin::GutterDelete),
    );
}

/// Pad whichever side is shorter.
fn push_height_delta<P: ZonePayloads + ?Sized>(
    zones: &mut ViewZones,
    alignment: &Alignment,
    synced_moved_text: Option<&MovedText>,
    options: &ViewZoneOptions,
    payloads: &mut P,
) {
    let delta = alignment.height_delta();

    if delta > 0.0 {
        let after = alignment.original_range.end_line_number_exclusive() - 1;
        if synced_moved_text
            .is_some_and(|m| m.line_range_mapping.original.contains_with_margin(after, 1))
        {
            trace!(after, "padding owned by synced moved text");
            return;
        }
        zones
            .original
            .push(ViewZoneDescriptor::padding(after, delta));
    } else if delta < 0.0 {
        let after = alignment.modified_range.end_line_number_exclusive() - 1;
        if synced_moved_text
            .is_some_and(|m| m.line_range_mapping.modified.contains_with_margin(after, 1))
        {
            trace!(after, "padding owned by synced moved text");
            return;
        }
        let mut zone = ViewZoneDescriptor::padding(after, -delta);
        if let Some(diff) = &alignment.diff {
            if diff.modified.is_empty() && options.render_margin_revert_icon {
                zone = zone.with_margin(ZoneMargin::RevertArrow {
                    payload: payloads.create_revert_affordance(diff),
                });
            }
        }
        zones.modified.push(zone);
    }
}

#[cfg(test)]
#[path = "builder_tests.rs"]
mod tests;
