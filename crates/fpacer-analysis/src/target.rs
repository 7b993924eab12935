//! Target frame-rate detection.
//!
//! Scores each candidate target against the FPS and delta times reported by
//! the capture tool and keeps the best one.

use fpacer_core::{round_to, CandidateScore, Confidence, FrameRecord, TargetFpsResult};

/// Candidate targets used when none are configured.
pub const DEFAULT_TARGET_CANDIDATES: &[u32] = &[30];

/// Target reported when the frames carry no usable FPS or delta values.
pub const FALLBACK_TARGET_FPS: u32 = 30;

/// Delta times within this band around the expected interval count as matches.
const DELTA_MATCH_LOW: f64 = 0.8;
const DELTA_MATCH_HIGH: f64 = 2.5;

/// Infer which frame-rate target the session was aiming for.
///
/// Never fails. With no usable reported FPS or delta values the result is
/// [`FALLBACK_TARGET_FPS`] at [`Confidence::Low`]. Ties go to the candidate
/// listed first.
pub fn detect_target(frames: &[FrameRecord], candidates: &[u32]) -> TargetFpsResult {
    let fps_values: Vec<f64> = frames
        .iter()
        .filter_map(|f| f.instant_fps)
        .filter(|v| *v > 0.0)
        .collect();
    let deltas: Vec<f64> = frames
        .iter()
        .filter_map(|f| f.delta_time_ms)
        .filter(|v| *v > 0.0)
        .collect();

    let candidates: Vec<u32> = candidates.iter().copied().filter(|t| *t > 0).collect();
    if fps_values.is_empty() || deltas.is_empty() || candidates.is_empty() {
        return fallback(candidates.first().copied());
    }

    let avg_fps = mean(&fps_values);
    let avg_delta = mean(&deltas);

    let scores: Vec<CandidateScore> = candidates
        .iter()
        .map(|&target| score_candidate(target, avg_fps, &deltas))
        .collect();

    let mut best = &scores[0];
    for score in &scores[1..] {
        if score.total > best.total {
            best = score;
        }
    }
    let (target, total) = (best.target, best.total);

    TargetFpsResult {
        target,
        confidence: Confidence::from_score(total),
        score: round_to(total, 2),
        performance_ratio: round_to(avg_fps / f64::from(target), 2),
        avg_delta_time_ms: round_to(avg_delta, 2),
        candidates: scores,
    }
}

/// Score one candidate target.
///
/// - ratio band: +50 when avg/target is in [0.4, 0.8], else +25 in [0.2, 1.0]
/// - delta match: up to +30 by the share of deltas in [0.8x, 2.5x] the
///   expected interval
/// - consistency: +20 when avg/target is in [0.5, 0.8]
pub fn score_candidate(target: u32, avg_fps: f64, deltas: &[f64]) -> CandidateScore {
    let target_f = f64::from(target);
    let expected_interval = 1000.0 / target_f;
    let ratio = avg_fps / target_f;

    let ratio_score = if (0.4..=0.8).contains(&ratio) {
        50.0
    } else if (0.2..=1.0).contains(&ratio) {
        25.0
    } else {
        0.0
    };

    let delta_match_score = if deltas.is_empty() {
        0.0
    } else {
        let low = expected_interval * DELTA_MATCH_LOW;
        let high = expected_interval * DELTA_MATCH_HIGH;
        let matching = deltas.iter().filter(|d| (low..=high).contains(*d)).count();
        30.0 * matching as f64 / deltas.len() as f64
    };

    let consistency_bonus = if (0.5..=0.8).contains(&ratio) {
        20.0
    } else {
        0.0
    };

    CandidateScore {
        target,
        ratio_score,
        delta_match_score,
        consistency_bonus,
        total: ratio_score + delta_match_score + consistency_bonus,
    }
}

fn fallback(target: Option<u32>) -> TargetFpsResult {
    TargetFpsResult {
        target: target.unwrap_or(FALLBACK_TARGET_FPS),
        confidence: Confidence::Low,
        score: 0.0,
        performance_ratio: 0.0,
        avg_delta_time_ms: 0.0,
        candidates: Vec::new(),
    }
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}
