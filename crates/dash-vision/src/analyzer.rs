use core::fmt;

use dv_color::{PaletteExtractor, PaletteQuality, hex_string, mean_color, palette_string};
use dv_core::{ImageView, Rect, Rgb, to_luma};
use dv_edge::{EdgeMapConfig, EdgeMapDetector};
use dv_filter::median_blur5_u8;
use dv_hough::{Circle, CircleDetector, HoughConfig};
use dv_layout::{ReferenceLayout, ZoneSet};
use tracing::debug;

use crate::playhead::{PlayheadConfig, locate_playhead};
use crate::record::{FrameRecord, NodeSummary, ZoneMeans, timestamp_ms};

#[derive(Debug, Clone, PartialEq)]
pub enum AnalyzeError {
    /// Frame rate must be positive and finite; anything else is a caller
    /// contract violation, not a recoverable condition.
    InvalidFps(f64),
}

impl fmt::Display for AnalyzeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidFps(fps) => write!(f, "invalid frame rate: {fps}"),
        }
    }
}

impl std::error::Error for AnalyzeError {}

/// Fixed per-run configuration of the pipeline.
///
/// Detection thresholds are tuned constants, not knobs: records are only
/// comparable across runs that share a configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyzerConfig {
    pub layout: ReferenceLayout,
    /// Edge-density thresholds for the main canvas.
    pub density_edges: EdgeMapConfig,
    pub playhead: PlayheadConfig,
    /// Circle-transform parameters; `max_radius` is overridden per frame to
    /// half the smaller main-zone dimension.
    pub nodes: HoughConfig,
    pub palette_k: usize,
    pub palette_seed: u64,
    pub fps: f64,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            layout: ReferenceLayout::default(),
            density_edges: EdgeMapConfig::new(40.0, 120.0),
            playhead: PlayheadConfig::default(),
            nodes: HoughConfig::default(),
            palette_k: 6,
            palette_seed: 0,
            fps: 30.0,
        }
    }
}

/// Typed per-frame result; sentinel-free.
#[derive(Debug, Clone)]
pub struct FrameAnalysis {
    pub frame_w: u32,
    pub frame_h: u32,
    pub zones: ZoneSet,
    pub means: ZoneMeans,
    pub nodes: NodeSummary,
    pub edges_density: f64,
    pub playhead_x: Option<u32>,
    pub palette: Vec<Rgb>,
}

impl FrameAnalysis {
    /// Projects to the flat record schema; `-1`/`#000000`/empty-string
    /// sentinels appear only here.
    pub fn to_record(&self, frame_idx: u64, timestamp_ms: i64) -> FrameRecord {
        let (nx, ny, nr) = match self.nodes.largest {
            Some(c) => (c.x, c.y, c.r),
            None => (-1, -1, -1),
        };

        FrameRecord {
            frame_idx,
            timestamp_ms,
            frame_w: self.frame_w,
            frame_h: self.frame_h,
            zone_header_mean: hex_string(self.means.header),
            zone_left_mean: hex_string(self.means.left),
            zone_main_mean: hex_string(self.means.main),
            zone_right_mean: hex_string(self.means.right),
            zone_timeline_mean: hex_string(self.means.timeline),
            nodes_count: self.nodes.count,
            largest_node_x: nx,
            largest_node_y: ny,
            largest_node_r: nr,
            edges_density: self.edges_density,
            playhead_x: self.playhead_x.map_or(-1, |x| x as i32),
            dominant_palette: palette_string(&self.palette),
            notes: String::new(),
        }
    }
}

/// Runs one frame at a time through segmentation, per-zone analysis and
/// record assembly. Detector scratch buffers persist across frames, so one
/// analyzer should serve a whole sequence.
pub struct FrameAnalyzer {
    cfg: AnalyzerConfig,
    palette: Box<dyn PaletteExtractor>,
    density_edges: EdgeMapDetector,
    playhead_edges: EdgeMapDetector,
    circles: CircleDetector,
}

impl FrameAnalyzer {
    pub fn new(
        cfg: AnalyzerConfig,
        palette: Box<dyn PaletteExtractor>,
    ) -> Result<Self, AnalyzeError> {
        if !(cfg.fps.is_finite() && cfg.fps > 0.0) {
            return Err(AnalyzeError::InvalidFps(cfg.fps));
        }

        Ok(Self {
            cfg,
            palette,
            density_edges: EdgeMapDetector::new(),
            playhead_edges: EdgeMapDetector::new(),
            circles: CircleDetector::new(),
        })
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.cfg
    }

    pub fn palette_quality(&self) -> PaletteQuality {
        self.palette.quality()
    }

    /// Analyzes one frame. Degenerate zones produce neutral results, never
    /// errors; frame geometry was already validated when the pixel buffer
    /// was constructed.
    pub fn analyze(&mut self, frame: &ImageView<'_, Rgb>) -> FrameAnalysis {
        let frame_w = frame.width() as u32;
        let frame_h = frame.height() as u32;
        let zones = self.cfg.layout.zones(frame_w, frame_h);

        let means = ZoneMeans {
            header: zone_mean(frame, zones.header),
            left: zone_mean(frame, zones.left),
            main: zone_mean(frame, zones.main),
            right: zone_mean(frame, zones.right),
            timeline: zone_mean(frame, zones.timeline),
        };

        let mut nodes = NodeSummary::default();
        let mut edges_density = 0.0;
        let mut palette = Vec::new();

        if let Some(main) = frame.crop(zones.main) {
            let luma = to_luma(&main);
            edges_density = self
                .density_edges
                .density(&luma.as_view(), &self.cfg.density_edges);

            let blurred = median_blur5_u8(&luma.as_view());
            let hough = HoughConfig {
                max_radius: (main.width().min(main.height()) / 2) as u32,
                ..self.cfg.nodes.clone()
            };
            let local = self.circles.detect(&blurred.as_view(), &hough);
            nodes.count = local.len();
            nodes.largest = local.iter().max_by_key(|c| c.r).map(|c| Circle {
                x: c.x + zones.main.x,
                y: c.y + zones.main.y,
                r: c.r,
            });

            palette = self.palette.extract(&main);
        }

        let playhead_x = frame.crop(zones.timeline).and_then(|timeline| {
            locate_playhead(&mut self.playhead_edges, &timeline, &self.cfg.playhead)
        });

        debug!(
            nodes = nodes.count,
            edges_density,
            playhead = playhead_x.map_or(-1i64, i64::from),
            "frame analyzed"
        );

        FrameAnalysis {
            frame_w,
            frame_h,
            zones,
            means,
            nodes,
            edges_density,
            playhead_x,
            palette,
        }
    }

    /// Analyzes one frame and emits its record.
    pub fn record(
        &mut self,
        frame: &ImageView<'_, Rgb>,
        frame_idx: u64,
        source_idx: u64,
    ) -> FrameRecord {
        let analysis = self.analyze(frame);
        analysis.to_record(frame_idx, timestamp_ms(source_idx, self.cfg.fps))
    }
}

/// Emits records for an ordered `(source_idx, frame)` sequence, numbering
/// emitted rows from zero.
pub fn analyze_sequence<'a, I>(analyzer: &mut FrameAnalyzer, frames: I) -> Vec<FrameRecord>
where
    I: IntoIterator<Item = (u64, ImageView<'a, Rgb>)>,
{
    let mut records = Vec::new();
    for (source_idx, frame) in frames {
        let frame_idx = records.len() as u64;
        records.push(analyzer.record(&frame, frame_idx, source_idx));
    }
    records
}

fn zone_mean(frame: &ImageView<'_, Rgb>, zone: Rect) -> Rgb {
    match frame.crop(zone) {
        Some(view) => mean_color(&view),
        None => Rgb::default(),
    }
}
