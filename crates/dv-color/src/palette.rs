use dv_core::{ImageView, Rgb};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::index;

/// Whether the palette came from real clustering or the degraded sampler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaletteQuality {
    Full,
    Degraded,
}

/// Dominant-palette extraction strategy, chosen at pipeline construction.
pub trait PaletteExtractor {
    /// Representative colors for the region; empty for an empty region.
    fn extract(&self, region: &ImageView<'_, Rgb>) -> Vec<Rgb>;

    fn quality(&self) -> PaletteQuality;
}

/// Full-quality extractor: k-means over a bounded random subsample.
///
/// Samples are normalized to `[0, 1]`, clustered with farthest-point
/// initialization and a fixed iteration count, then centroids are re-scaled
/// and truncated to bytes. Output order is centroid order (stable for a
/// fixed seed). If the region holds fewer than `k` pixels the palette is
/// shorter than `k`.
#[derive(Debug, Clone)]
pub struct KMeansPalette {
    pub k: usize,
    pub seed: u64,
    pub max_samples: usize,
    pub iterations: usize,
}

impl KMeansPalette {
    pub fn new(k: usize, seed: u64) -> Self {
        Self {
            k,
            seed,
            max_samples: 20_000,
            iterations: 10,
        }
    }
}

impl PaletteExtractor for KMeansPalette {
    fn extract(&self, region: &ImageView<'_, Rgb>) -> Vec<Rgb> {
        let samples = subsample(region, self.max_samples, self.seed);
        if samples.is_empty() || self.k == 0 {
            return Vec::new();
        }

        let normalized: Vec<[f32; 3]> = samples
            .iter()
            .map(|c| {
                [
                    c.r as f32 / 255.0,
                    c.g as f32 / 255.0,
                    c.b as f32 / 255.0,
                ]
            })
            .collect();

        let centroids = kmeans(&normalized, self.k.min(normalized.len()), self.iterations);
        centroids
            .iter()
            .map(|c| {
                Rgb::new(
                    (c[0] * 255.0) as u8,
                    (c[1] * 255.0) as u8,
                    (c[2] * 255.0) as u8,
                )
            })
            .collect()
    }

    fn quality(&self) -> PaletteQuality {
        PaletteQuality::Full
    }
}

/// Degraded extractor for clustering-free operation: takes every
/// `len / k`-th color of a small random subsample.
///
/// The integer step means the output holds approximately `k` colors
/// (`k + 1` is common); consumers treat the count as approximate and must
/// label the palette quality as degraded.
#[derive(Debug, Clone)]
pub struct SpreadPalette {
    pub k: usize,
    pub seed: u64,
    pub max_samples: usize,
}

impl SpreadPalette {
    pub fn new(k: usize, seed: u64) -> Self {
        Self {
            k,
            seed,
            max_samples: 1_000,
        }
    }
}

impl PaletteExtractor for SpreadPalette {
    fn extract(&self, region: &ImageView<'_, Rgb>) -> Vec<Rgb> {
        let samples = subsample(region, self.max_samples, self.seed);
        if samples.is_empty() || self.k == 0 {
            return Vec::new();
        }

        let step = (samples.len() / self.k).max(1);
        samples.iter().step_by(step).copied().collect()
    }

    fn quality(&self) -> PaletteQuality {
        PaletteQuality::Degraded
    }
}

/// Up to `max_samples` pixels drawn uniformly without replacement, or every
/// pixel in row-major order when the region is small enough.
fn subsample(region: &ImageView<'_, Rgb>, max_samples: usize, seed: u64) -> Vec<Rgb> {
    let w = region.width();
    let h = region.height();
    let total = w * h;
    if total == 0 || max_samples == 0 {
        return Vec::new();
    }

    if total <= max_samples {
        let mut out = Vec::with_capacity(total);
        for y in 0..h {
            out.extend_from_slice(region.row(y));
        }
        return out;
    }

    let mut rng = StdRng::seed_from_u64(seed);
    index::sample(&mut rng, total, max_samples)
        .into_iter()
        .map(|i| region.row(i / w)[i % w])
        .collect()
}

fn kmeans(samples: &[[f32; 3]], k: usize, iterations: usize) -> Vec<[f32; 3]> {
    let mut centroids: Vec<[f32; 3]> = Vec::with_capacity(k);
    centroids.push(samples[0]);

    // Farthest-point seeding keeps well-separated colors apart without
    // random restarts.
    while centroids.len() < k {
        let mut max_dist = -1.0f32;
        let mut best = samples[0];
        for s in samples {
            let d = centroids
                .iter()
                .map(|c| dist2(s, c))
                .fold(f32::INFINITY, f32::min);
            if d > max_dist {
                max_dist = d;
                best = *s;
            }
        }
        centroids.push(best);
    }

    for _ in 0..iterations {
        let mut sums = vec![[0.0f64; 3]; k];
        let mut counts = vec![0usize; k];

        for s in samples {
            let nearest = nearest_centroid(s, &centroids);
            sums[nearest][0] += s[0] as f64;
            sums[nearest][1] += s[1] as f64;
            sums[nearest][2] += s[2] as f64;
            counts[nearest] += 1;
        }

        for (i, c) in centroids.iter_mut().enumerate() {
            if counts[i] > 0 {
                let n = counts[i] as f64;
                c[0] = (sums[i][0] / n) as f32;
                c[1] = (sums[i][1] / n) as f32;
                c[2] = (sums[i][2] / n) as f32;
            }
        }
    }

    centroids
}

fn nearest_centroid(s: &[f32; 3], centroids: &[[f32; 3]]) -> usize {
    let mut best = 0;
    let mut best_d = f32::INFINITY;
    for (i, c) in centroids.iter().enumerate() {
        let d = dist2(s, c);
        if d < best_d {
            best_d = d;
            best = i;
        }
    }
    best
}

fn dist2(a: &[f32; 3], b: &[f32; 3]) -> f32 {
    let dr = a[0] - b[0];
    let dg = a[1] - b[1];
    let db = a[2] - b[2];
    dr * dr + dg * dg + db * db
}
