//! Umbrella crate for the `dash-vision` workspace.
//!
//! Re-exports the leaf crates and layers the per-frame pipeline on top:
//! zone segmentation, per-zone color/edge/node/playhead analysis, and the
//! fixed-schema [`FrameRecord`] handed to the external serializer.
//!
//! The pipeline is synchronous and frame-at-a-time; frames are independent,
//! so callers may fan out across frames as long as emitted records are
//! re-ordered by ascending `frame_idx` before serialization.

pub use dv_color::*;
pub use dv_core::*;
pub use dv_edge::*;
pub use dv_filter::*;
pub use dv_hough::*;
pub use dv_layout::*;
pub use dv_overlay::*;

mod analyzer;
mod playhead;
mod record;

pub use analyzer::{AnalyzeError, AnalyzerConfig, FrameAnalysis, FrameAnalyzer, analyze_sequence};
pub use playhead::{PlayheadConfig, locate_playhead};
pub use record::{FrameRecord, NodeSummary, ZoneMeans, timestamp_ms};
