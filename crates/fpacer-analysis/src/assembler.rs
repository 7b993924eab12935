//! Merge the pipeline outputs into one [`RunResult`].

use chrono::{DateTime, Utc};
use fpacer_core::{FpsMetricsBlock, JankAnalysisBlock, RunResult, TargetFpsResult};
use fpacer_parse::ParsedDump;

/// Build the result record for one run.
///
/// `actual` is the block computed from the actual presentation timestamps and
/// becomes [`RunResult::metrics`]; `scheduled` becomes
/// [`RunResult::vsync_metrics`].
pub fn assemble(
    parsed: ParsedDump,
    target: TargetFpsResult,
    actual: FpsMetricsBlock,
    scheduled: FpsMetricsBlock,
    jank: JankAnalysisBlock,
    timestamp: DateTime<Utc>,
) -> RunResult {
    let total_frames = actual.frame_times_ms.len();
    // Approximation: ignores gaps left by invalid intervals. Not rounded.
    let elapsed_time_seconds = actual.avg_frame_time_ms * total_frames as f64 / 1000.0;

    RunResult {
        app_name: parsed.app_name,
        package_name: parsed.package_name,
        timestamp,
        file_name: parsed.file_name,
        refresh_period_ns: parsed.header.refresh_period_ns,
        refresh_rate_hz: parsed.header.refresh_rate_hz,
        device_refresh_rate: parsed.header.derived_refresh_rate(),
        device_info: parsed.device_info,
        fps_buckets: parsed.fps_buckets,
        target_fps: target,
        metrics: actual,
        vsync_metrics: scheduled,
        jank,
        elapsed_time_seconds,
        total_frames,
        frames: parsed.frames,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fpacer_core::{DeviceMetadata, SessionHeader};

    fn parsed() -> ParsedDump {
        ParsedDump {
            file_name: "run.txt".into(),
            header: SessionHeader {
                refresh_period_ns: 8_333_333,
                refresh_rate_hz: 120.0,
            },
            frames: Vec::new(),
            package_name: "com.example.game".into(),
            app_name: "Game".into(),
            device_info: DeviceMetadata::default(),
            fps_buckets: None,
        }
    }

    #[test]
    fn test_assemble_derived_fields() {
        let actual = FpsMetricsBlock {
            avg_frame_time_ms: 22.0,
            frame_times_ms: vec![Some(16.0), Some(17.0), Some(33.0)],
            ..Default::default()
        };
        let jank = crate::jank::classify_jank(
            &actual.frame_times_ms,
            30,
            50.54,
            &crate::jank::JankThresholds::default(),
        );

        let run = assemble(
            parsed(),
            crate::target::detect_target(&[], &[30]),
            actual,
            FpsMetricsBlock::default(),
            jank,
            Utc::now(),
        );

        assert_eq!(run.total_frames, 3);
        assert_eq!(run.elapsed_time_seconds, 0.066);
        assert_eq!(run.device_refresh_rate, 120.0);
        assert_eq!(run.refresh_rate_hz, 120.0);
        assert_eq!(run.app_name, "Game");
        assert_eq!(run.metrics.avg_frame_time_ms, 22.0);
    }
}
