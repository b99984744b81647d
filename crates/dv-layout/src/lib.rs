//! Proportional zone segmentation.
//!
//! A dashboard frame is split into five rectangular zones (header, left
//! panel, main canvas, right panel, timeline) by scaling a fixed reference
//! layout to the frame's actual resolution. Horizontal and vertical scales
//! are independent, so non-16:9 captures still segment sensibly.
//!
//! Zones may be degenerate (zero area) for very small frames, or extend past
//! the frame for unusual aspect ratios. Callers must check `Rect::is_empty`
//! (or crop against the frame) before touching pixels; segmentation itself
//! never clamps beyond keeping widths and heights non-negative.

use dv_core::Rect;

/// Zone rectangle definitions against a fixed reference resolution.
///
/// Immutable configuration: pass one instance into the pipeline rather than
/// reading ambient constants, so tests can segment against alternate layouts.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceLayout {
    pub ref_w: u32,
    pub ref_h: u32,
    pub header_h: u32,
    pub left_x: u32,
    pub left_w: u32,
    pub main_w: u32,
    pub right_x: u32,
    pub right_w: u32,
    pub timeline_h: u32,
}

impl Default for ReferenceLayout {
    /// The dashboard layout measured at 1365x768.
    fn default() -> Self {
        Self {
            ref_w: 1365,
            ref_h: 768,
            header_h: 72,
            left_x: 24,
            left_w: 258,
            main_w: 576,
            right_x: 858,
            right_w: 360,
            timeline_h: 148,
        }
    }
}

/// The five zones of one frame, in frame-pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZoneSet {
    pub header: Rect,
    pub left: Rect,
    pub main: Rect,
    pub right: Rect,
    pub timeline: Rect,
}

impl ReferenceLayout {
    /// Scales the reference layout to a `frame_w` x `frame_h` frame.
    ///
    /// Pure arithmetic: identical inputs always yield identical zones.
    pub fn zones(&self, frame_w: u32, frame_h: u32) -> ZoneSet {
        let scale_w = f64::from(frame_w) / f64::from(self.ref_w);
        let scale_h = f64::from(frame_h) / f64::from(self.ref_h);

        let header_h = scale_round(self.header_h, scale_h);
        let left_x = scale_round(self.left_x, scale_w);
        let left_w = scale_round(self.left_w, scale_w);
        let main_x = left_x + left_w;
        let main_w = scale_round(self.main_w, scale_w);
        let right_x = scale_round(self.right_x, scale_w);
        let right_w = scale_round(self.right_w, scale_w);
        let timeline_h = scale_round(self.timeline_h, scale_h);

        // Vertical band shared by the three columns; collapses to zero height
        // when header and timeline overlap on tiny frames.
        let band_top = i64::from(header_h);
        let band_bottom = i64::from(frame_h) - i64::from(timeline_h);
        let band_h = (band_bottom - band_top).max(0) as u32;

        ZoneSet {
            header: Rect::new(0, 0, frame_w, header_h),
            left: Rect::new(left_x as i32, header_h as i32, left_w, band_h),
            main: Rect::new(main_x as i32, header_h as i32, main_w, band_h),
            right: Rect::new(right_x as i32, header_h as i32, right_w, band_h),
            // Timeline origin goes negative when the frame is shorter than
            // the scaled timeline; cropping clips it later.
            timeline: Rect::new(
                0,
                (i64::from(frame_h) - i64::from(timeline_h)) as i32,
                frame_w,
                timeline_h,
            ),
        }
    }
}

fn scale_round(v: u32, scale: f64) -> u32 {
    (f64::from(v) * scale).round() as u32
}

#[cfg(test)]
mod tests {
    use super::{ReferenceLayout, ZoneSet};
    use dv_core::Rect;

    #[test]
    fn reference_resolution_is_identity() {
        let layout = ReferenceLayout::default();
        let z = layout.zones(1365, 768);

        assert_eq!(z.header, Rect::new(0, 0, 1365, 72));
        assert_eq!(z.left, Rect::new(24, 72, 258, 548));
        assert_eq!(z.main, Rect::new(282, 72, 576, 548));
        assert_eq!(z.right, Rect::new(858, 72, 360, 548));
        assert_eq!(z.timeline, Rect::new(0, 620, 1365, 148));
    }

    #[test]
    fn segmentation_is_deterministic() {
        let layout = ReferenceLayout::default();
        let a = layout.zones(1920, 1080);
        let b = layout.zones(1920, 1080);
        assert_eq!(a, b);
    }

    #[test]
    fn double_resolution_scales_linearly() {
        let layout = ReferenceLayout::default();
        let z = layout.zones(2730, 1536);

        assert_eq!(z.header.height, 144);
        assert_eq!(z.main.x, 564);
        assert_eq!(z.main.width, 1152);
        assert_eq!(z.timeline.height, 296);
        assert_eq!(z.left.height, 1536 - 144 - 296);
    }

    #[test]
    fn narrow_frame_collapses_left_column() {
        let layout = ReferenceLayout::default();
        let z = layout.zones(2, 768);

        // 258 * 2 / 1365 rounds to zero width.
        assert!(z.left.is_empty());
        assert_eq!(z.header.width, 2);
    }

    #[test]
    fn overlapping_bands_collapse_to_zero_height() {
        // Alternate layout where header and timeline together exceed the
        // frame height; the column band must clamp at zero, not go negative.
        let layout = ReferenceLayout {
            ref_w: 100,
            ref_h: 100,
            header_h: 60,
            left_x: 5,
            left_w: 20,
            main_w: 40,
            right_x: 70,
            right_w: 25,
            timeline_h: 60,
        };
        let z = layout.zones(100, 100);

        assert!(z.main.is_empty());
        assert!(z.left.is_empty());
        assert!(z.right.is_empty());
        assert_eq!(z.main.height, 0);
        assert_eq!(z.timeline, Rect::new(0, 40, 100, 60));
    }

    #[test]
    fn zero_frame_yields_all_empty() {
        let z = ReferenceLayout::default().zones(0, 0);
        let ZoneSet {
            header,
            left,
            main,
            right,
            timeline,
        } = z;
        for r in [header, left, main, right, timeline] {
            assert!(r.is_empty());
        }
    }
}
