//! Side-by-side comparison of several runs.

use fpacer_core::{round_to, ChoppinessRating, PerformanceRating, RunResult};
use serde::Serialize;

use crate::store::RunId;

/// One run's headline numbers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonRow {
    pub id: RunId,
    pub app_name: String,
    pub file_name: String,
    pub avg_fps: f64,
    pub avg_frame_time_ms: f64,
    pub slow_frame_percentage: f64,
    pub jank_instability_percentage: f64,
    pub performance_rating: PerformanceRating,
    pub choppiness_rating: ChoppinessRating,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunComparison {
    pub rows: Vec<ComparisonRow>,
    /// Highest average FPS (first run wins ties)
    pub best: RunId,
    /// Lowest average FPS (first run wins ties)
    pub worst: RunId,
    pub mean_avg_fps: f64,
    pub mean_slow_frame_percentage: f64,
    pub mean_instability_percentage: f64,
}

/// Compare runs in the given order. Returns `None` for an empty selection.
pub fn compare_runs(runs: &[(RunId, &RunResult)]) -> Option<RunComparison> {
    let rows: Vec<ComparisonRow> = runs
        .iter()
        .map(|(id, run)| ComparisonRow {
            id: *id,
            app_name: run.app_name.clone(),
            file_name: run.file_name.clone(),
            avg_fps: run.metrics.avg_fps,
            avg_frame_time_ms: run.metrics.avg_frame_time_ms,
            slow_frame_percentage: run.jank.slow_frame_percentage,
            jank_instability_percentage: run.jank.jank_instability_percentage,
            performance_rating: run.jank.performance_rating,
            choppiness_rating: run.jank.choppiness_rating,
        })
        .collect();

    let first = rows.first()?;
    let mut best = first;
    let mut worst = first;
    for row in &rows[1..] {
        if row.avg_fps > best.avg_fps {
            best = row;
        }
        if row.avg_fps < worst.avg_fps {
            worst = row;
        }
    }
    let (best, worst) = (best.id, worst.id);

    let mean = |f: fn(&ComparisonRow) -> f64| {
        round_to(rows.iter().map(f).sum::<f64>() / rows.len() as f64, 2)
    };
    let mean_avg_fps = mean(|r| r.avg_fps);
    let mean_slow_frame_percentage = mean(|r| r.slow_frame_percentage);
    let mean_instability_percentage = mean(|r| r.jank_instability_percentage);

    Some(RunComparison {
        rows,
        best,
        worst,
        mean_avg_fps,
        mean_slow_frame_percentage,
        mean_instability_percentage,
    })
}
