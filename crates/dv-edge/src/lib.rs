//! Edge extraction for dashboard zones.
//!
//! The detector produces a binary (0/255) edge map via Sobel gradients,
//! non-maximum suppression and double-threshold hysteresis. Two reductions
//! sit on top:
//! - edge density: mean map value over the zone, used as a busyness metric
//!   for the main canvas;
//! - per-column sums, used to localize the strongest vertical marker in the
//!   timeline zone.
//!
//! Thresholds are fixed per call site and apply to the L2 gradient
//! magnitude. There is no auto-thresholding: metric comparability across
//! runs requires identical parameters.

mod edgemap;
mod gradient;

pub use edgemap::{EdgeMapConfig, EdgeMapDetector, column_sums};
pub use gradient::GradientField;
