//! Zone color summaries.
//!
//! Mean colors truncate each channel mean toward zero before encoding, and
//! an empty region reports the `#000000` sentinel without touching pixels;
//! consumers of the emitted table rely on both behaviors.
//!
//! Dominant-palette extraction is a strategy chosen at construction time:
//! [`KMeansPalette`] is the full-quality clustering path, [`SpreadPalette`]
//! the degraded even-step sampler. Both are deterministic for a fixed seed.

mod palette;

use dv_core::{ImageView, Rgb};

pub use palette::{KMeansPalette, PaletteExtractor, PaletteQuality, SpreadPalette};

/// Lowercase `#rrggbb` encoding.
pub fn hex_string(c: Rgb) -> String {
    format!("#{:02x}{:02x}{:02x}", c.r, c.g, c.b)
}

/// Parses `#rrggbb`; the inverse of [`hex_string`].
pub fn parse_hex(s: &str) -> Option<Rgb> {
    let hex = s.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(Rgb::new(r, g, b))
}

/// Per-channel arithmetic mean, truncated to integers.
///
/// A zero-area region returns black, the "absent zone" sentinel.
pub fn mean_color(region: &ImageView<'_, Rgb>) -> Rgb {
    let count = (region.width() * region.height()) as u64;
    if count == 0 {
        return Rgb::default();
    }

    let mut sums = [0u64; 3];
    for y in 0..region.height() {
        for px in region.row(y) {
            sums[0] += u64::from(px.r);
            sums[1] += u64::from(px.g);
            sums[2] += u64::from(px.b);
        }
    }

    Rgb::new(
        (sums[0] / count) as u8,
        (sums[1] / count) as u8,
        (sums[2] / count) as u8,
    )
}

/// `;`-joined hex list, empty for an empty palette.
pub fn palette_string(colors: &[Rgb]) -> String {
    colors
        .iter()
        .map(|&c| hex_string(c))
        .collect::<Vec<_>>()
        .join(";")
}

#[cfg(test)]
mod tests {
    use dv_core::{Image, Rgb};

    use crate::{hex_string, mean_color, palette_string, parse_hex};

    #[test]
    fn hex_is_lowercase_and_round_trips() {
        let c = Rgb::new(0xAB, 0x05, 0xFF);
        assert_eq!(hex_string(c), "#ab05ff");
        assert_eq!(parse_hex("#ab05ff"), Some(c));
        assert_eq!(parse_hex("ab05ff"), None);
        assert_eq!(parse_hex("#ab05f"), None);
    }

    #[test]
    fn uniform_region_means_exactly() {
        let img = Image::new_fill(13, 7, Rgb::new(17, 200, 91));
        assert_eq!(mean_color(&img.as_view()), Rgb::new(17, 200, 91));
    }

    #[test]
    fn empty_region_means_black_sentinel() {
        let img = Image::new_fill(0, 5, Rgb::new(255, 255, 255));
        assert_eq!(mean_color(&img.as_view()), Rgb::default());
        assert_eq!(hex_string(mean_color(&img.as_view())), "#000000");
    }

    #[test]
    fn mean_truncates_toward_zero() {
        // Two pixels averaging to 127.5 per channel must report 127.
        let img = Image::from_vec(2, 1, vec![Rgb::new(127, 0, 255), Rgb::new(128, 1, 254)])
            .expect("valid image");
        assert_eq!(mean_color(&img.as_view()), Rgb::new(127, 0, 254));
    }

    #[test]
    fn palette_string_joins_with_semicolons() {
        let colors = [Rgb::new(0, 0, 0), Rgb::new(255, 255, 255)];
        assert_eq!(palette_string(&colors), "#000000;#ffffff");
        assert_eq!(palette_string(&[]), "");
    }
}
