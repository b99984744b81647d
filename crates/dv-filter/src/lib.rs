//! Spatial pre-filters.
//!
//! Border handling is replicate (edge pixels repeat outward), matching the
//! clamp indexing used by the gradient and edge stages.

use dv_core::{Image, ImageView};

/// 5x5 median blur over a single-channel image.
///
/// Suppresses speckle noise ahead of circle detection while keeping disc
/// boundaries sharp, which a box or Gaussian blur would smear.
pub fn median_blur5_u8(src: &ImageView<'_, u8>) -> Image<u8> {
    let w = src.width();
    let h = src.height();
    let mut out = Image::new_fill(w, h, 0u8);
    if w == 0 || h == 0 {
        return out;
    }

    let mut window = [0u8; 25];
    let dst = out.data_mut();

    for y in 0..h {
        for x in 0..w {
            let mut i = 0;
            for dy in -2isize..=2 {
                let ny = (y as isize + dy).clamp(0, h as isize - 1) as usize;
                let row = src.row(ny);
                for dx in -2isize..=2 {
                    let nx = (x as isize + dx).clamp(0, w as isize - 1) as usize;
                    window[i] = row[nx];
                    i += 1;
                }
            }
            window.sort_unstable();
            dst[y * w + x] = window[12];
        }
    }

    out
}
