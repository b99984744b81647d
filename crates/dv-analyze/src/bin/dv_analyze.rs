use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::Parser;
use dash_vision::{
    AnalyzerConfig, FrameAnalyzer, Image, KMeansPalette, PaletteExtractor, Rgb, SpreadPalette,
    overlay_document, save_overlay, timestamp_ms,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "dv_analyze")]
#[command(about = "Extract per-frame visual metrics from decoded dashboard frames")]
struct Cli {
    /// Directory of decoded frame images, processed in file-name order.
    frames_dir: PathBuf,
    /// Capture frame rate of the source recording.
    #[arg(long, default_value_t = 30.0)]
    fps: f64,
    #[arg(long, default_value = "analysis_out")]
    outdir: PathBuf,
    /// Upper bound on emitted rows.
    #[arg(long, default_value_t = 2000)]
    max_frames: usize,
    /// Keep every n-th source frame.
    #[arg(long, default_value_t = 1)]
    every: usize,
    /// Also write one SVG overlay per processed frame.
    #[arg(long, default_value_t = false)]
    overlays: bool,
    /// Use the degraded even-step palette sampler instead of k-means.
    #[arg(long, default_value_t = false)]
    degraded_palette: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    if cli.every == 0 {
        bail!("--every must be at least 1");
    }

    fs::create_dir_all(&cli.outdir)
        .with_context(|| format!("creating output directory {}", cli.outdir.display()))?;

    let cfg = AnalyzerConfig {
        fps: cli.fps,
        ..AnalyzerConfig::default()
    };
    let palette: Box<dyn PaletteExtractor> = if cli.degraded_palette {
        warn!("degraded palette sampler selected; palette quality is approximate");
        Box::new(SpreadPalette::new(cfg.palette_k, cfg.palette_seed))
    } else {
        Box::new(KMeansPalette::new(cfg.palette_k, cfg.palette_seed))
    };
    let mut analyzer = FrameAnalyzer::new(cfg, palette)?;

    let paths = frame_paths(&cli.frames_dir)?;
    if paths.is_empty() {
        bail!("no frame images found in {}", cli.frames_dir.display());
    }
    info!(frames = paths.len(), fps = cli.fps, "starting analysis");

    let csv_path = cli.outdir.join("frames_analysis.csv");
    let mut writer = csv::Writer::from_path(&csv_path)
        .with_context(|| format!("creating {}", csv_path.display()))?;

    let mut emitted = 0usize;
    for (source_idx, path) in paths.iter().enumerate() {
        if emitted >= cli.max_frames {
            break;
        }
        if source_idx % cli.every != 0 {
            continue;
        }

        let frame = load_frame(path)
            .with_context(|| format!("loading frame {}", path.display()))?;
        let view = frame.as_view();
        let analysis = analyzer.analyze(&view);
        let record = analysis.to_record(
            emitted as u64,
            timestamp_ms(source_idx as u64, cli.fps),
        );

        if cli.overlays {
            // Match the table: only the largest node is visualized.
            let circles: Vec<_> = analysis.nodes.largest.into_iter().collect();
            let doc = overlay_document(
                analysis.frame_w,
                analysis.frame_h,
                &analysis.zones,
                &circles,
                analysis.playhead_x,
            );
            let svg_path = cli.outdir.join(format!("frame_{emitted:05}.svg"));
            if let Err(err) = save_overlay(&svg_path, &doc) {
                // Overlays are diagnostic; a failed write never aborts the run.
                warn!(frame = emitted, error = %err, "overlay write failed");
            }
        }

        writer
            .serialize(&record)
            .with_context(|| format!("writing record {emitted}"))?;
        emitted += 1;
    }

    writer.flush().context("flushing csv output")?;
    info!(rows = emitted, output = %csv_path.display(), "analysis complete");
    Ok(())
}

fn frame_paths(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for entry in fs::read_dir(dir).with_context(|| format!("reading {}", dir.display()))? {
        let path = entry?.path();
        let supported = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| {
                matches!(e.to_ascii_lowercase().as_str(), "png" | "jpg" | "jpeg" | "bmp")
            });
        if supported {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}

fn load_frame(path: &Path) -> Result<Image<Rgb>> {
    let img = image::open(path)?.to_rgb8();
    let (w, h) = img.dimensions();
    let data: Vec<Rgb> = img
        .pixels()
        .map(|p| Rgb::new(p[0], p[1], p[2]))
        .collect();
    Ok(Image::from_vec(w as usize, h as usize, data)?)
}
