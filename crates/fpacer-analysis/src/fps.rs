//! FPS and frame-time statistics for one timestamp source.

use fpacer_core::{round_series, round_to, FpsMetricsBlock, FrameRecord};

const NS_PER_MS: f64 = 1_000_000.0;

/// Which timestamp column a metrics block is computed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimestampSource {
    /// Scheduled (vsync-aligned) time.
    Scheduled,
    /// Actual presentation time.
    Actual,
}

impl TimestampSource {
    /// Pull this source's timestamp out of every frame, in frame order.
    pub fn timestamps(self, frames: &[FrameRecord]) -> Vec<Option<i64>> {
        frames
            .iter()
            .map(|f| match self {
                TimestampSource::Scheduled => f.vsync_time,
                TimestampSource::Actual => f.presentation_time,
            })
            .collect()
    }
}

/// Interval between two timestamps in milliseconds, or `None` when either
/// side is missing or the interval is not strictly positive.
fn interval_ms(prev: Option<i64>, curr: Option<i64>) -> Option<f64> {
    let delta_ns = curr?.checked_sub(prev?)?;
    let ms = delta_ns as f64 / NS_PER_MS;
    (ms.is_finite() && ms > 0.0).then_some(ms)
}

/// Compute frame-time and instantaneous-FPS statistics.
///
/// Both per-frame series have `timestamps.len() - 1` entries. Average FPS is
/// the mean of the instantaneous FPS values, not `1000 / avg frame time`.
/// Fewer than two timestamps yield an all-zero block.
pub fn compute_fps_metrics(timestamps: &[Option<i64>]) -> FpsMetricsBlock {
    if timestamps.len() < 2 {
        return FpsMetricsBlock::default();
    }

    let frame_times: Vec<Option<f64>> = timestamps
        .windows(2)
        .map(|pair| interval_ms(pair[0], pair[1]))
        .collect();
    let instant_fps: Vec<Option<f64>> = frame_times
        .iter()
        .map(|ft| ft.map(|ms| 1000.0 / ms))
        .collect();

    let (avg_frame_time, min_frame_time, max_frame_time) = summarize(&frame_times);
    let (avg_fps, min_fps, max_fps) = summarize(&instant_fps);

    FpsMetricsBlock {
        avg_fps: round_to(avg_fps, 2),
        min_fps: round_to(min_fps, 2),
        max_fps: round_to(max_fps, 2),
        avg_frame_time_ms: round_to(avg_frame_time, 2),
        min_frame_time_ms: round_to(min_frame_time, 2),
        max_frame_time_ms: round_to(max_frame_time, 2),
        frame_times_ms: round_series(&frame_times, 2),
        instant_fps: round_series(&instant_fps, 2),
    }
}

/// Mean, min, and max over the valid entries; zeros when there are none.
fn summarize(values: &[Option<f64>]) -> (f64, f64, f64) {
    let mut count = 0usize;
    let mut sum = 0.0;
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;

    for v in values.iter().flatten() {
        count += 1;
        sum += v;
        min = min.min(*v);
        max = max.max(*v);
    }

    if count == 0 {
        (0.0, 0.0, 0.0)
    } else {
        (sum / count as f64, min, max)
    }
}
