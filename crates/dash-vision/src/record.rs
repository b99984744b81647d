use dv_core::Rgb;
use dv_hough::Circle;
use serde::Serialize;

/// Node-detection outcome for one frame, in frame-global coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NodeSummary {
    pub count: usize,
    pub largest: Option<Circle>,
}

/// Mean color of each zone (black sentinel for empty zones).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ZoneMeans {
    pub header: Rgb,
    pub left: Rgb,
    pub main: Rgb,
    pub right: Rgb,
    pub timeline: Rgb,
}

/// One emitted row per processed frame.
///
/// Field order is the external table contract; the serializer derives the
/// header from it, so fields must not be reordered. Absent detections are
/// projected to `-1` sentinels here and nowhere else; upstream types stay
/// optional.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameRecord {
    pub frame_idx: u64,
    pub timestamp_ms: i64,
    pub frame_w: u32,
    pub frame_h: u32,
    pub zone_header_mean: String,
    pub zone_left_mean: String,
    pub zone_main_mean: String,
    pub zone_right_mean: String,
    pub zone_timeline_mean: String,
    pub nodes_count: usize,
    pub largest_node_x: i32,
    pub largest_node_y: i32,
    pub largest_node_r: i32,
    pub edges_density: f64,
    pub playhead_x: i32,
    pub dominant_palette: String,
    /// Reserved for future annotations; always empty today.
    pub notes: String,
}

/// Milliseconds of a source frame at the capture frame rate.
///
/// Callers validate `fps > 0` before reaching this point.
pub fn timestamp_ms(source_idx: u64, fps: f64) -> i64 {
    (source_idx as f64 / fps * 1000.0).round() as i64
}

#[cfg(test)]
mod tests {
    use super::{FrameRecord, timestamp_ms};

    #[test]
    fn timestamps_round_to_nearest_ms() {
        assert_eq!(timestamp_ms(0, 30.0), 0);
        assert_eq!(timestamp_ms(1, 30.0), 33);
        assert_eq!(timestamp_ms(2, 30.0), 67);
        assert_eq!(timestamp_ms(30, 30.0), 1000);
        assert_eq!(timestamp_ms(3, 60.0), 50);
    }

    #[test]
    fn csv_header_matches_table_contract() {
        let record = FrameRecord {
            frame_idx: 0,
            timestamp_ms: 0,
            frame_w: 1365,
            frame_h: 768,
            zone_header_mean: "#000000".into(),
            zone_left_mean: "#000000".into(),
            zone_main_mean: "#000000".into(),
            zone_right_mean: "#000000".into(),
            zone_timeline_mean: "#000000".into(),
            nodes_count: 0,
            largest_node_x: -1,
            largest_node_y: -1,
            largest_node_r: -1,
            edges_density: 0.0,
            playhead_x: -1,
            dominant_palette: String::new(),
            notes: String::new(),
        };

        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.serialize(&record).expect("serializable record");
        let bytes = writer.into_inner().expect("flushed buffer");
        let out = String::from_utf8(bytes).expect("utf8 csv");
        let header = out.lines().next().expect("header line");

        assert_eq!(
            header,
            "frame_idx,timestamp_ms,frame_w,frame_h,\
             zone_header_mean,zone_left_mean,zone_main_mean,zone_right_mean,zone_timeline_mean,\
             nodes_count,largest_node_x,largest_node_y,largest_node_r,edges_density,playhead_x,\
             dominant_palette,notes"
        );
    }
}
