//! Gradient-guided Hough circle transform.
//!
//! Edge pixels vote along their gradient line (both polarities) into a
//! downscaled center accumulator. Local accumulator maxima above the vote
//! threshold become center candidates; candidates closer than the minimum
//! center distance to an accepted circle are suppressed. Each accepted
//! center's radius is the mode of the distance histogram over edge pixels
//! whose gradient runs through the candidate center, and the mode's support
//! must scale with the circumference it claims.
//!
//! Parameters are empirically tuned for rendered UI nodes and must stay
//! fixed across runs for metric comparability; change them only together
//! with every consumer of the emitted records.

use dv_core::{Image, ImageView};
use dv_edge::{EdgeMapConfig, EdgeMapDetector};

/// Detected circle in the input's local pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Circle {
    pub x: i32,
    pub y: i32,
    pub r: i32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HoughConfig {
    /// Inverse accumulator resolution; centers are localized on a grid of
    /// `dp` pixels.
    pub dp: f32,
    /// Minimum distance between accepted circle centers, in pixels.
    pub min_dist: f32,
    /// High hysteresis threshold for the internal edge map; low is half.
    pub edge_thresh: f32,
    /// Minimum votes for a center candidate; also the floor of the
    /// radius-support requirement.
    pub acc_thresh: u32,
    pub min_radius: u32,
    pub max_radius: u32,
}

impl Default for HoughConfig {
    fn default() -> Self {
        Self {
            dp: 1.2,
            min_dist: 20.0,
            edge_thresh: 60.0,
            acc_thresh: 22,
            min_radius: 6,
            max_radius: 200,
        }
    }
}

/// Minimum |cosine| between an edge gradient and the center-to-pixel
/// direction for the pixel to support a radius.
const GRAD_ALIGN: f32 = 0.8;

/// Radius-bin support floor per pixel of radius; keeps the floor
/// proportional to the claimed circumference.
const RADIUS_SUPPORT: f32 = 1.5;

/// Edge pixel with its unit gradient direction.
#[derive(Debug, Clone, Copy)]
struct EdgePoint {
    x: f32,
    y: f32,
    nx: f32,
    ny: f32,
}

/// Reusable circle detector; scratch buffers persist across frames.
#[derive(Debug, Clone)]
pub struct CircleDetector {
    edges: EdgeMapDetector,
    acc: Vec<u32>,
    edge_px: Vec<EdgePoint>,
}

impl CircleDetector {
    pub fn new() -> Self {
        Self {
            edges: EdgeMapDetector::new(),
            acc: Vec::new(),
            edge_px: Vec::new(),
        }
    }

    /// Detects circles in a single-channel image (callers pre-smooth).
    ///
    /// Returns circles ordered by descending center votes. Degenerate input
    /// or an unsatisfiable radius range yields an empty result, never an
    /// error.
    pub fn detect(&mut self, img: &ImageView<'_, u8>, cfg: &HoughConfig) -> Vec<Circle> {
        let w = img.width();
        let h = img.height();
        if w == 0 || h == 0 || cfg.min_radius == 0 || cfg.max_radius < cfg.min_radius {
            return Vec::new();
        }
        if !(cfg.dp.is_finite() && cfg.dp > 0.0) {
            return Vec::new();
        }

        let ecfg = EdgeMapConfig::new(0.5 * cfg.edge_thresh, cfg.edge_thresh);
        self.edges.detect(img, &ecfg);

        let acc_w = ((w as f32 / cfg.dp).ceil() as usize).max(1);
        let acc_h = ((h as f32 / cfg.dp).ceil() as usize).max(1);
        self.acc.clear();
        self.acc.resize(acc_w * acc_h, 0);
        self.edge_px.clear();

        self.vote_centers(w, h, acc_w, cfg);
        let candidates = self.center_candidates(acc_w, acc_h, cfg);
        self.confirm_circles(&candidates, cfg)
    }

    fn vote_centers(&mut self, w: usize, h: usize, acc_w: usize, cfg: &HoughConfig) {
        let map = self.edges.map().data();
        let gx = self.edges.gradient().gx().data();
        let gy = self.edges.gradient().gy().data();
        let mag = self.edges.gradient().mag().data();

        for y in 0..h {
            for x in 0..w {
                let idx = y * w + x;
                if map[idx] == 0 {
                    continue;
                }
                let m = mag[idx];
                if m <= 1e-6 {
                    continue;
                }

                let dx = gx[idx] / m;
                let dy = gy[idx] / m;
                self.edge_px.push(EdgePoint {
                    x: x as f32,
                    y: y as f32,
                    nx: dx,
                    ny: dy,
                });

                for sign in [1.0f32, -1.0] {
                    for r in cfg.min_radius..=cfg.max_radius {
                        let cx = x as f32 + sign * dx * r as f32;
                        let cy = y as f32 + sign * dy * r as f32;
                        if cx < 0.0 || cy < 0.0 || cx >= w as f32 || cy >= h as f32 {
                            // Monotonic in r: once outside, stay outside.
                            break;
                        }
                        let a = (cx / cfg.dp) as usize;
                        let b = (cy / cfg.dp) as usize;
                        self.acc[b * acc_w + a] += 1;
                    }
                }
            }
        }
    }

    /// Accumulator cells that beat the vote threshold and their 4-neighbors,
    /// sorted by descending votes (row-major index as a deterministic
    /// tiebreak).
    fn center_candidates(&self, acc_w: usize, acc_h: usize, cfg: &HoughConfig) -> Vec<(u32, usize, usize)> {
        let mut out = Vec::new();
        for b in 0..acc_h {
            for a in 0..acc_w {
                let v = self.acc[b * acc_w + a];
                if v < cfg.acc_thresh {
                    continue;
                }

                let left = if a > 0 { self.acc[b * acc_w + a - 1] } else { 0 };
                let right = if a + 1 < acc_w {
                    self.acc[b * acc_w + a + 1]
                } else {
                    0
                };
                let up = if b > 0 { self.acc[(b - 1) * acc_w + a] } else { 0 };
                let down = if b + 1 < acc_h {
                    self.acc[(b + 1) * acc_w + a]
                } else {
                    0
                };

                if v >= left && v >= right && v >= up && v >= down {
                    out.push((v, a, b));
                }
            }
        }

        out.sort_by(|x, y| y.0.cmp(&x.0).then(x.2.cmp(&y.2)).then(x.1.cmp(&y.1)));
        out
    }

    fn confirm_circles(&self, candidates: &[(u32, usize, usize)], cfg: &HoughConfig) -> Vec<Circle> {
        let mut out = Vec::new();
        let mut kept: Vec<(f32, f32)> = Vec::new();
        let min_dist2 = cfg.min_dist * cfg.min_dist;
        let nbins = (cfg.max_radius - cfg.min_radius + 1) as usize;
        let mut hist = vec![0u32; nbins];

        for &(_, a, b) in candidates {
            let cx = (a as f32 + 0.5) * cfg.dp;
            let cy = (b as f32 + 0.5) * cfg.dp;

            let too_close = kept.iter().any(|&(kx, ky)| {
                let dx = kx - cx;
                let dy = ky - cy;
                dx * dx + dy * dy < min_dist2
            });
            if too_close {
                continue;
            }

            hist.fill(0);
            for p in &self.edge_px {
                let dx = p.x - cx;
                let dy = p.y - cy;
                let d = (dx * dx + dy * dy).sqrt();
                if d <= 1e-3 {
                    continue;
                }
                // Only pixels whose gradient line passes through the
                // candidate center belong to its circumference; the rest is
                // other structure at a coincidental distance.
                let align = (dx * p.nx + dy * p.ny) / d;
                if align.abs() < GRAD_ALIGN {
                    continue;
                }

                let bin = (d - cfg.min_radius as f32).round();
                if bin < 0.0 || bin as usize >= nbins {
                    continue;
                }
                hist[bin as usize] += 1;
            }

            // Windowed mode: a circumference straddling bin boundaries still
            // counts as one radius. First maximum wins, so ties pick the
            // smaller radius.
            let mut best_bin = 0usize;
            let mut best_votes = 0u32;
            for i in 0..nbins {
                let lo = i.saturating_sub(1);
                let hi = (i + 1).min(nbins - 1);
                let votes: u32 = hist[lo..=hi].iter().sum();
                if votes > best_votes {
                    best_votes = votes;
                    best_bin = i;
                }
            }

            let r = cfg.min_radius + best_bin as u32;
            let needed = cfg.acc_thresh.max((RADIUS_SUPPORT * r as f32).round() as u32);
            if best_votes < needed {
                continue;
            }

            kept.push((cx, cy));
            out.push(Circle {
                x: cx.round() as i32,
                y: cy.round() as i32,
                r: r as i32,
            });
        }

        out
    }
}

impl Default for CircleDetector {
    fn default() -> Self {
        Self::new()
    }
}

/// Paints a filled disc; shared by tests and benches.
pub fn paint_disc(img: &mut Image<u8>, cx: i32, cy: i32, r: i32, value: u8) {
    let w = img.width() as i32;
    let h = img.height() as i32;
    let data = img.data_mut();
    for y in (cy - r).max(0)..=(cy + r).min(h - 1) {
        for x in (cx - r).max(0)..=(cx + r).min(w - 1) {
            let dx = x - cx;
            let dy = y - cy;
            if dx * dx + dy * dy <= r * r {
                data[(y * w + x) as usize] = value;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use dv_core::Image;

    use crate::{CircleDetector, HoughConfig, paint_disc};

    fn cfg_for(max_radius: u32) -> HoughConfig {
        HoughConfig {
            max_radius,
            ..HoughConfig::default()
        }
    }

    #[test]
    fn blank_image_has_no_circles() {
        let img = Image::new_fill(120, 90, 15u8);
        let mut det = CircleDetector::new();
        assert!(det.detect(&img.as_view(), &cfg_for(45)).is_empty());
    }

    #[test]
    fn empty_image_has_no_circles() {
        let img = Image::new_fill(0, 0, 0u8);
        let mut det = CircleDetector::new();
        assert!(det.detect(&img.as_view(), &cfg_for(45)).is_empty());
    }

    #[test]
    fn unsatisfiable_radius_range_is_rejected() {
        let mut img = Image::new_fill(120, 90, 15u8);
        paint_disc(&mut img, 60, 45, 15, 230);
        let mut det = CircleDetector::new();
        assert!(det.detect(&img.as_view(), &cfg_for(4)).is_empty());
    }

    #[test]
    fn single_disc_is_found_with_tight_radius() {
        let mut img = Image::new_fill(200, 150, 20u8);
        paint_disc(&mut img, 60, 70, 15, 220);

        let mut det = CircleDetector::new();
        let circles = det.detect(&img.as_view(), &cfg_for(75));

        assert_eq!(circles.len(), 1);
        let c = circles[0];
        assert!((c.x - 60).abs() <= 2, "center x {}", c.x);
        assert!((c.y - 70).abs() <= 2, "center y {}", c.y);
        assert!((c.r - 15).abs() <= 2, "radius {}", c.r);
    }

    #[test]
    fn separated_discs_are_counted_and_largest_wins() {
        let mut img = Image::new_fill(240, 160, 25u8);
        paint_disc(&mut img, 60, 80, 18, 230);
        paint_disc(&mut img, 170, 60, 11, 230);

        let mut det = CircleDetector::new();
        let circles = det.detect(&img.as_view(), &cfg_for(80));

        assert_eq!(circles.len(), 2);
        let largest = circles.iter().max_by_key(|c| c.r).expect("non-empty");
        assert!((largest.r - 18).abs() <= 2, "largest radius {}", largest.r);
        assert!((largest.x - 60).abs() <= 2);
        assert!((largest.y - 80).abs() <= 2);
    }

    #[test]
    fn main_zone_sized_canvas_reports_only_true_discs() {
        // Reference-resolution main zone: 576x548, max radius half the
        // smaller dimension. Wide radius ranges let foreign circumferences
        // land in large-radius bins, so every accepted circle must be backed
        // by gradient-consistent support.
        let mut img = Image::new_fill(576, 548, 18u8);
        paint_disc(&mut img, 150, 150, 25, 230);
        paint_disc(&mut img, 420, 170, 40, 230);
        paint_disc(&mut img, 230, 400, 15, 230);

        let mut det = CircleDetector::new();
        let circles = det.detect(&img.as_view(), &cfg_for(274));

        assert_eq!(circles.len(), 3, "got {circles:?}");
        let largest = circles.iter().max_by_key(|c| c.r).expect("non-empty");
        assert!((largest.r - 40).abs() <= 2, "largest radius {}", largest.r);
        assert!((largest.x - 420).abs() <= 2, "largest x {}", largest.x);
        assert!((largest.y - 170).abs() <= 2, "largest y {}", largest.y);
    }

    #[test]
    fn detection_is_deterministic() {
        let mut img = Image::new_fill(200, 150, 20u8);
        paint_disc(&mut img, 60, 70, 15, 220);
        paint_disc(&mut img, 150, 90, 9, 220);

        let mut det = CircleDetector::new();
        let first = det.detect(&img.as_view(), &cfg_for(75));
        let second = det.detect(&img.as_view(), &cfg_for(75));
        assert_eq!(first, second);
    }
}
