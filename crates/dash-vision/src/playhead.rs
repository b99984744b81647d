use dv_core::{ImageView, Rgb, to_luma};
use dv_edge::{EdgeMapConfig, EdgeMapDetector, column_sums};

/// Playhead localization parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayheadConfig {
    pub edges: EdgeMapConfig,
    /// Minimum column-sum of the 0/255 edge map for a confident marker.
    pub noise_floor: u64,
}

impl Default for PlayheadConfig {
    fn default() -> Self {
        Self {
            edges: EdgeMapConfig::new(50.0, 150.0),
            noise_floor: 10,
        }
    }
}

/// Finds the strongest vertical edge in the timeline zone.
///
/// Returns the zone-local column of the maximum per-column edge sum (first
/// column on ties), or `None` when the zone is empty or the maximum stays
/// below the noise floor.
pub fn locate_playhead(
    det: &mut EdgeMapDetector,
    timeline: &ImageView<'_, Rgb>,
    cfg: &PlayheadConfig,
) -> Option<u32> {
    if timeline.is_empty() {
        return None;
    }

    let luma = to_luma(timeline);
    let map = det.detect(&luma.as_view(), &cfg.edges);
    let sums = column_sums(&map.as_view());

    let mut best_x = 0usize;
    let mut best = 0u64;
    for (x, &s) in sums.iter().enumerate() {
        if s > best {
            best = s;
            best_x = x;
        }
    }

    if best < cfg.noise_floor {
        return None;
    }
    Some(best_x as u32)
}

#[cfg(test)]
mod tests {
    use dv_core::{Image, Rgb};
    use dv_edge::EdgeMapDetector;

    use crate::playhead::{PlayheadConfig, locate_playhead};

    fn timeline_with_line(w: usize, h: usize, x0: usize, line_w: usize) -> Image<Rgb> {
        let mut img = Image::new_fill(w, h, Rgb::new(25, 25, 25));
        for y in 0..h {
            for x in x0..(x0 + line_w).min(w) {
                img.data_mut()[y * w + x] = Rgb::new(240, 240, 240);
            }
        }
        img
    }

    #[test]
    fn uniform_timeline_has_no_playhead() {
        let img = Image::new_fill(300, 60, Rgb::new(40, 40, 40));
        let mut det = EdgeMapDetector::new();
        assert_eq!(
            locate_playhead(&mut det, &img.as_view(), &PlayheadConfig::default()),
            None
        );
    }

    #[test]
    fn empty_timeline_has_no_playhead() {
        let img = Image::new_fill(0, 0, Rgb::default());
        let mut det = EdgeMapDetector::new();
        assert_eq!(
            locate_playhead(&mut det, &img.as_view(), &PlayheadConfig::default()),
            None
        );
    }

    #[test]
    fn single_line_is_located_within_its_boundary_response() {
        // The edge response of a thin line sits on its boundary columns, so
        // the located column lands within one pixel of the line itself.
        let img = timeline_with_line(300, 60, 120, 1);
        let mut det = EdgeMapDetector::new();
        let x = locate_playhead(&mut det, &img.as_view(), &PlayheadConfig::default())
            .expect("confident marker");
        assert!(x.abs_diff(120) <= 1, "located {x}");
    }

    #[test]
    fn wider_marker_is_located_within_two_pixels() {
        let img = timeline_with_line(300, 60, 200, 3);
        let mut det = EdgeMapDetector::new();
        let x = locate_playhead(&mut det, &img.as_view(), &PlayheadConfig::default())
            .expect("confident marker");
        assert!(x.abs_diff(200) <= 2, "located {x}");
    }
}
