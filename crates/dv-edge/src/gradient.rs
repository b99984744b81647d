use dv_core::{Image, ImageView};

/// Reusable Sobel gradient field.
///
/// Buffers are reallocated only when the input dimensions change, so one
/// field instance serves a whole frame sequence without churn.
#[derive(Debug, Clone)]
pub struct GradientField {
    gx: Image<f32>,
    gy: Image<f32>,
    mag: Image<f32>,
}

impl GradientField {
    pub fn new() -> Self {
        Self {
            gx: Image::new_fill(0, 0, 0.0),
            gy: Image::new_fill(0, 0, 0.0),
            mag: Image::new_fill(0, 0, 0.0),
        }
    }

    pub fn width(&self) -> usize {
        self.mag.width()
    }

    pub fn height(&self) -> usize {
        self.mag.height()
    }

    pub fn gx(&self) -> &Image<f32> {
        &self.gx
    }

    pub fn gy(&self) -> &Image<f32> {
        &self.gy
    }

    pub fn mag(&self) -> &Image<f32> {
        &self.mag
    }

    /// Computes 3x3 Sobel derivatives with clamped borders.
    pub fn compute(&mut self, src: &ImageView<'_, u8>) {
        let w = src.width();
        let h = src.height();
        self.ensure_dims(w, h);
        if w == 0 || h == 0 {
            return;
        }

        let gx = self.gx.data_mut();
        let gy = self.gy.data_mut();
        let mag = self.mag.data_mut();

        for y in 0..h {
            let ym1 = y.saturating_sub(1);
            let yp1 = (y + 1).min(h - 1);
            let r0 = src.row(ym1);
            let r1 = src.row(y);
            let r2 = src.row(yp1);

            for x in 0..w {
                let xm1 = x.saturating_sub(1);
                let xp1 = (x + 1).min(w - 1);

                let p00 = r0[xm1] as f32;
                let p01 = r0[x] as f32;
                let p02 = r0[xp1] as f32;
                let p10 = r1[xm1] as f32;
                let p12 = r1[xp1] as f32;
                let p20 = r2[xm1] as f32;
                let p21 = r2[x] as f32;
                let p22 = r2[xp1] as f32;

                let gxx = (p02 + 2.0 * p12 + p22) - (p00 + 2.0 * p10 + p20);
                let gyy = (p20 + 2.0 * p21 + p22) - (p00 + 2.0 * p01 + p02);

                let idx = y * w + x;
                gx[idx] = gxx;
                gy[idx] = gyy;
                mag[idx] = (gxx * gxx + gyy * gyy).sqrt();
            }
        }
    }

    fn ensure_dims(&mut self, w: usize, h: usize) {
        if self.mag.width() != w || self.mag.height() != h {
            self.gx = Image::new_fill(w, h, 0.0);
            self.gy = Image::new_fill(w, h, 0.0);
            self.mag = Image::new_fill(w, h, 0.0);
        }
    }
}

impl Default for GradientField {
    fn default() -> Self {
        Self::new()
    }
}
