//! Full analysis of one dump: extract, detect, measure, classify, assemble.

use chrono::Utc;
use fpacer_core::prelude::*;
use fpacer_core::RunResult;

use crate::assembler::assemble;
use crate::config::AnalysisSettings;
use crate::fps::{compute_fps_metrics, TimestampSource};
use crate::jank::classify_jank;
use crate::target::detect_target;

/// Analyse one raw dump into a [`RunResult`].
///
/// # Errors
///
/// Propagates the fatal parse errors of [`fpacer_parse::extract`].
pub fn analyze(
    raw: &str,
    file_name: Option<&str>,
    app_name_override: Option<&str>,
    settings: &AnalysisSettings,
) -> Result<RunResult> {
    let parsed = fpacer_parse::extract(raw, file_name, app_name_override)?;

    let target = detect_target(&parsed.frames, &settings.target_candidates);
    let actual = compute_fps_metrics(&TimestampSource::Actual.timestamps(&parsed.frames));
    let scheduled = compute_fps_metrics(&TimestampSource::Scheduled.timestamps(&parsed.frames));
    let jank = classify_jank(
        &actual.frame_times_ms,
        target.target,
        actual.avg_fps,
        &settings.jank_thresholds(),
    );

    debug!(
        file = %parsed.file_name,
        target = target.target,
        confidence = %target.confidence,
        avg_fps = actual.avg_fps,
        valid_intervals = actual.valid_frame_count(),
        slow_frames = jank.slow_frames_count,
        "Analysed dump"
    );

    Ok(assemble(parsed, target, actual, scheduled, jank, Utc::now()))
}
