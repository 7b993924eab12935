//! The assembled result of analysing one dump file.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::frame::{DeviceMetadata, FpsBuckets, FrameRecord};
use crate::metrics::{FpsMetricsBlock, JankAnalysisBlock, TargetFpsResult};

/// Everything known about one run: identity, display header, device
/// properties, target detection, both FPS blocks, jank analysis, and the raw
/// frames (kept so charts can rebuild the time axis).
///
/// Built once by the assembler and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunResult {
    // Identity
    pub app_name: String,
    pub package_name: String,
    /// When the dump was ingested.
    pub timestamp: DateTime<Utc>,
    pub file_name: String,

    // Display
    pub refresh_period_ns: i64,
    /// Refresh rate as printed in the dump header.
    pub refresh_rate_hz: f64,
    /// Refresh rate derived from the refresh period.
    pub device_refresh_rate: f64,

    pub device_info: DeviceMetadata,
    pub fps_buckets: Option<FpsBuckets>,

    // Target detection
    pub target_fps: TargetFpsResult,

    /// Metrics from the actual presentation timestamps.
    pub metrics: FpsMetricsBlock,
    /// Metrics from the scheduled (vsync) timestamps.
    pub vsync_metrics: FpsMetricsBlock,
    pub jank: JankAnalysisBlock,

    /// Approximate session length: avg actual frame time × frame count.
    pub elapsed_time_seconds: f64,
    /// Number of actual frame intervals.
    pub total_frames: usize,

    pub frames: Vec<FrameRecord>,
}

impl RunResult {
    /// Short label used in summaries, e.g. "Netflix (run_01.txt)".
    pub fn display_name(&self) -> String {
        format!("{} ({})", self.app_name, self.file_name)
    }

    /// Same run with the raw frame list dropped, for compact output.
    pub fn without_frames(&self) -> Self {
        Self {
            frames: Vec::new(),
            ..self.clone()
        }
    }
}
