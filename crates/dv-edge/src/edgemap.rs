use dv_core::{Image, ImageView};

use crate::GradientField;

/// Hysteresis thresholds against the L2 gradient magnitude.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeMapConfig {
    pub low_thresh: f32,
    pub high_thresh: f32,
}

impl EdgeMapConfig {
    pub fn new(low_thresh: f32, high_thresh: f32) -> Self {
        Self {
            low_thresh,
            high_thresh,
        }
    }
}

/// Binary edge map detector with reusable scratch buffers.
///
/// Output pixels are 0 or 255, so summing the map matches the magnitude
/// conventions of the downstream density and column metrics.
#[derive(Debug, Clone)]
pub struct EdgeMapDetector {
    grad: GradientField,
    nms: Image<f32>,
    map: Image<u8>,
    weak: Vec<u8>,
    visited: Vec<u8>,
    stack: Vec<usize>,
}

impl EdgeMapDetector {
    pub fn new() -> Self {
        Self {
            grad: GradientField::new(),
            nms: Image::new_fill(0, 0, 0.0),
            map: Image::new_fill(0, 0, 0u8),
            weak: Vec::new(),
            visited: Vec::new(),
            stack: Vec::new(),
        }
    }

    /// Gradient field of the last `detect` call.
    pub fn gradient(&self) -> &GradientField {
        &self.grad
    }

    /// Edge map of the last `detect` call.
    pub fn map(&self) -> &Image<u8> {
        &self.map
    }

    /// Runs gradient, non-maximum suppression and hysteresis, returning the
    /// 0/255 edge map. An empty input yields an empty map.
    pub fn detect(&mut self, img: &ImageView<'_, u8>, cfg: &EdgeMapConfig) -> &Image<u8> {
        let w = img.width();
        let h = img.height();
        self.ensure_dims(w, h);
        if w == 0 || h == 0 {
            return &self.map;
        }

        self.grad.compute(img);
        self.non_max_suppression();
        self.hysteresis(cfg);
        &self.map
    }

    /// Convenience reduction: sum of the edge map divided by the pixel
    /// count. Zero-area input yields `0.0`.
    pub fn density(&mut self, img: &ImageView<'_, u8>, cfg: &EdgeMapConfig) -> f64 {
        let n = img.width() * img.height();
        if n == 0 {
            return 0.0;
        }

        let map = self.detect(img, cfg);
        let sum: u64 = map.data().iter().map(|&v| u64::from(v)).sum();
        sum as f64 / n as f64
    }

    fn ensure_dims(&mut self, w: usize, h: usize) {
        if self.nms.width() != w || self.nms.height() != h {
            self.nms = Image::new_fill(w, h, 0.0);
            self.map = Image::new_fill(w, h, 0u8);
        }

        let n = w.saturating_mul(h);
        if self.weak.len() != n {
            self.weak = vec![0; n];
            self.visited = vec![0; n];
        }
    }

    fn non_max_suppression(&mut self) {
        let w = self.nms.width();
        let h = self.nms.height();
        let gx = self.grad.gx().data();
        let gy = self.grad.gy().data();
        let mag = self.grad.mag().data();
        let nms = self.nms.data_mut();

        nms.fill(0.0);
        if w < 3 || h < 3 {
            return;
        }

        const TAN22_5: f32 = 0.414_213_57;
        const TAN67_5: f32 = 2.414_213_7;

        for y in 1..(h - 1) {
            for x in 1..(w - 1) {
                let idx = y * w + x;
                let m = mag[idx];
                if m <= 0.0 {
                    continue;
                }

                let gxx = gx[idx];
                let gyy = gy[idx];
                let ax = gxx.abs();
                let ay = gyy.abs();

                let (i1, i2) = if ay <= ax * TAN22_5 {
                    (idx - 1, idx + 1)
                } else if ay >= ax * TAN67_5 {
                    (idx - w, idx + w)
                } else if gxx * gyy > 0.0 {
                    (idx - w - 1, idx + w + 1)
                } else {
                    (idx - w + 1, idx + w - 1)
                };

                if m >= mag[i1] && m >= mag[i2] {
                    nms[idx] = m;
                }
            }
        }
    }

    fn hysteresis(&mut self, cfg: &EdgeMapConfig) {
        let w = self.nms.width();
        let h = self.nms.height();
        let n = w * h;

        self.weak.fill(0);
        self.visited.fill(0);
        self.stack.clear();

        let mut low = cfg.low_thresh;
        let mut high = cfg.high_thresh;
        if high < low {
            core::mem::swap(&mut high, &mut low);
        }

        for idx in 0..n {
            let v = self.nms.data()[idx];
            if v <= 0.0 {
                continue;
            }
            if v >= low {
                self.weak[idx] = 1;
            }
            if v >= high {
                self.visited[idx] = 1;
                self.stack.push(idx);
            }
        }

        while let Some(idx) = self.stack.pop() {
            let x = idx % w;
            let y = idx / w;

            let y0 = y.saturating_sub(1);
            let y1 = (y + 1).min(h - 1);
            let x0 = x.saturating_sub(1);
            let x1 = (x + 1).min(w - 1);

            for ny in y0..=y1 {
                for nx in x0..=x1 {
                    let nidx = ny * w + nx;
                    if self.visited[nidx] == 0 && self.weak[nidx] != 0 {
                        self.visited[nidx] = 1;
                        self.stack.push(nidx);
                    }
                }
            }
        }

        let map = self.map.data_mut();
        for idx in 0..n {
            map[idx] = if self.visited[idx] != 0 { 255 } else { 0 };
        }
    }
}

impl Default for EdgeMapDetector {
    fn default() -> Self {
        Self::new()
    }
}

/// Sums the edge map along each column.
pub fn column_sums(map: &ImageView<'_, u8>) -> Vec<u64> {
    let mut sums = vec![0u64; map.width()];
    for y in 0..map.height() {
        for (sum, &v) in sums.iter_mut().zip(map.row(y)) {
            *sum += u64::from(v);
        }
    }
    sums
}

#[cfg(test)]
mod tests {
    use dv_core::Image;

    use crate::{EdgeMapConfig, EdgeMapDetector, column_sums};

    fn vertical_step(w: usize, h: usize, step_x: usize) -> Image<u8> {
        let mut img = Image::new_fill(w, h, 10u8);
        for y in 0..h {
            for x in step_x..w {
                img.data_mut()[y * w + x] = 220;
            }
        }
        img
    }

    #[test]
    fn uniform_image_has_zero_density() {
        let img = Image::new_fill(32, 24, 128u8);
        let mut det = EdgeMapDetector::new();
        let d = det.density(&img.as_view(), &EdgeMapConfig::new(40.0, 120.0));
        assert_eq!(d, 0.0);
    }

    #[test]
    fn empty_image_has_zero_density() {
        let img = Image::new_fill(0, 0, 0u8);
        let mut det = EdgeMapDetector::new();
        let d = det.density(&img.as_view(), &EdgeMapConfig::new(40.0, 120.0));
        assert_eq!(d, 0.0);
    }

    #[test]
    fn step_edge_marks_one_thin_line() {
        let img = vertical_step(40, 20, 18);
        let mut det = EdgeMapDetector::new();
        let map = det.detect(&img.as_view(), &EdgeMapConfig::new(40.0, 120.0));

        let sums = column_sums(&map.as_view());
        let peak = sums
            .iter()
            .enumerate()
            .max_by_key(|(_, &s)| s)
            .map(|(i, _)| i)
            .expect("non-empty sums");

        // NMS keeps a single-pixel-wide response at or next to the step.
        assert!(peak.abs_diff(18) <= 1);
        let marked_cols = sums.iter().filter(|&&s| s > 0).count();
        assert!(marked_cols <= 2);
    }

    #[test]
    fn density_scales_with_edge_content() {
        let one_edge = vertical_step(40, 20, 20);
        let mut two_edges = vertical_step(40, 20, 10);
        for y in 0..20 {
            for x in 30..40 {
                two_edges.data_mut()[y * 40 + x] = 10;
            }
        }

        let cfg = EdgeMapConfig::new(40.0, 120.0);
        let mut det = EdgeMapDetector::new();
        let d1 = det.density(&one_edge.as_view(), &cfg);
        let d2 = det.density(&two_edges.as_view(), &cfg);

        assert!(d1 > 0.0);
        assert!(d2 > d1);
    }

    #[test]
    fn unreachable_threshold_suppresses_everything() {
        let img = vertical_step(40, 20, 18);
        let mut det = EdgeMapDetector::new();
        let d = det.density(&img.as_view(), &EdgeMapConfig::new(1.0e9, 1.0e9));
        assert_eq!(d, 0.0);
    }
}
