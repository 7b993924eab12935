//! Jank classification of the actual frame-time series.
//!
//! Two independent checks run in one pass:
//! - slow frame: the frame overran the target frame time by a fixed factor
//! - instability: the frame spiked relative to the frame before it

use fpacer_core::{round_series, round_to, ChoppinessRating, JankAnalysisBlock, PerformanceRating};

/// Factors that decide when a frame counts as slow or unstable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JankThresholds {
    /// Slow when frame time > target frame time × this factor.
    pub slow_frame_factor: f64,
    /// Unstable when frame time > previous frame time × this factor.
    pub instability_factor: f64,
}

impl Default for JankThresholds {
    fn default() -> Self {
        Self {
            slow_frame_factor: 1.5,
            instability_factor: 1.3,
        }
    }
}

/// Classify every frame of `frame_times_ms`.
///
/// `None` entries produce `None` in both output series and are not counted.
/// Both comparisons are strict: a frame exactly on a threshold is neither
/// slow nor unstable. Percentages are over the full series length.
pub fn classify_jank(
    frame_times_ms: &[Option<f64>],
    target_fps: u32,
    avg_fps: f64,
    thresholds: &JankThresholds,
) -> JankAnalysisBlock {
    let target = f64::from(target_fps.max(1));
    let slow_threshold_ms = 1000.0 / target * thresholds.slow_frame_factor;

    let mut slow_frames_count = 0u32;
    let mut total_slow_excess = 0.0;
    let mut instability_count = 0u32;
    let mut total_instability = 0.0;

    let mut slow_frame_excess_ms = Vec::with_capacity(frame_times_ms.len());
    let mut instability_ms = Vec::with_capacity(frame_times_ms.len());

    for (i, frame_time) in frame_times_ms.iter().enumerate() {
        let Some(ft) = *frame_time else {
            slow_frame_excess_ms.push(None);
            instability_ms.push(None);
            continue;
        };

        let excess = (ft - slow_threshold_ms).max(0.0);
        if excess > 0.0 {
            slow_frames_count += 1;
            total_slow_excess += excess;
        }
        slow_frame_excess_ms.push(Some(excess));

        let prev = i.checked_sub(1).and_then(|p| frame_times_ms[p]);
        let spike = match prev {
            Some(prev) if ft > prev * thresholds.instability_factor => {
                instability_count += 1;
                let spike = ft - prev;
                total_instability += spike;
                spike
            }
            _ => 0.0,
        };
        instability_ms.push(Some(spike));
    }

    let total = frame_times_ms.len();
    let jank_instability_percentage = percentage(instability_count, total);

    JankAnalysisBlock {
        slow_frames_count,
        slow_frame_percentage: percentage(slow_frames_count, total),
        avg_slow_frame_excess: average(total_slow_excess, slow_frames_count),
        max_slow_frame_excess: round_to(positive_max(&slow_frame_excess_ms), 2),
        jank_instability_count: instability_count,
        jank_instability_percentage,
        avg_jank_instability: average(total_instability, instability_count),
        max_jank_instability: round_to(positive_max(&instability_ms), 2),
        performance_rating: PerformanceRating::classify(avg_fps, target),
        choppiness_rating: ChoppinessRating::classify(jank_instability_percentage),
        slow_frame_excess_ms: round_series(&slow_frame_excess_ms, 2),
        instability_ms: round_series(&instability_ms, 2),
    }
}

fn percentage(count: u32, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    round_to(f64::from(count) / total as f64 * 100.0, 1)
}

fn average(total: f64, count: u32) -> f64 {
    if count == 0 {
        return 0.0;
    }
    round_to(total / f64::from(count), 2)
}

fn positive_max(values: &[Option<f64>]) -> f64 {
    values
        .iter()
        .flatten()
        .copied()
        .filter(|v| *v > 0.0)
        .fold(0.0, f64::max)
}
