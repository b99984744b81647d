//! SVG diagnostic overlays.
//!
//! One vector document per frame: dashed zone outlines, an outline per
//! detected node circle, and a short playhead tick. Purely diagnostic; the
//! per-frame record never depends on this module, and callers are expected
//! to swallow write failures instead of aborting the frame loop.

use std::io;
use std::path::Path;

use dv_core::Rect;
use dv_hough::Circle;
use dv_layout::ZoneSet;
use svg::Document;
use svg::node::element::{Circle as CircleElement, Rectangle};

const ZONE_COLORS: [&str; 5] = ["#00FF00", "#FFAA00", "#00AEEF", "#FF00AA", "#AA00FF"];
const NODE_COLOR: &str = "#00AEEF";
const PLAYHEAD_COLOR: &str = "#00FF00";

/// Builds the overlay document for one frame.
///
/// The playhead tick is drawn only for `x > 0`; a marker at column zero is
/// indistinguishable from the zone border and is dropped, as is `None`.
pub fn overlay_document(
    frame_w: u32,
    frame_h: u32,
    zones: &ZoneSet,
    circles: &[Circle],
    playhead_x: Option<u32>,
) -> Document {
    let mut doc = Document::new()
        .set("width", frame_w)
        .set("height", frame_h);

    let zone_rects = [
        zones.header,
        zones.left,
        zones.main,
        zones.right,
        zones.timeline,
    ];
    for (rect, color) in zone_rects.iter().zip(ZONE_COLORS) {
        doc = doc.add(dashed_rect(rect, color));
    }

    for c in circles {
        doc = doc.add(
            CircleElement::new()
                .set("cx", c.x)
                .set("cy", c.y)
                .set("r", c.r)
                .set("fill", "none")
                .set("stroke", NODE_COLOR)
                .set("stroke-width", 2),
        );
    }

    if let Some(x) = playhead_x {
        if x > 0 {
            doc = doc.add(
                Rectangle::new()
                    .set("x", x)
                    .set("y", zones.timeline.y)
                    .set("width", 2)
                    .set("height", zones.timeline.height / 2)
                    .set("fill", PLAYHEAD_COLOR),
            );
        }
    }

    doc
}

/// Writes the document; failures are the caller's to log and discard.
pub fn save_overlay(path: &Path, doc: &Document) -> io::Result<()> {
    svg::save(path, doc)
}

fn dashed_rect(rect: &Rect, color: &str) -> Rectangle {
    Rectangle::new()
        .set("x", rect.x)
        .set("y", rect.y)
        .set("width", rect.width)
        .set("height", rect.height)
        .set("fill", "none")
        .set("stroke", color)
        .set("stroke-dasharray", "6,4")
}
