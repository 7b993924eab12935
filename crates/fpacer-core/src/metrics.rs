//! # Frame-Pacing Metric Types
//!
//! Output records of the analysis pipeline: target-FPS detection, per
//! timestamp-source FPS statistics, and jank classification.
//!
//! Per-frame series use `Option<f64>`. `None` marks a frame whose interval was
//! non-positive or non-numeric; it keeps its slot so every series stays
//! aligned with the frame index.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Round half away from zero to `decimals` places.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Round every valid entry of a per-frame series to `decimals` places.
pub fn round_series(values: &[Option<f64>], decimals: i32) -> Vec<Option<f64>> {
    values
        .iter()
        .map(|v| v.map(|x| round_to(x, decimals)))
        .collect()
}

// ── TargetFpsResult ──────────────────────────────────────────────────────────

/// How sure the detector is about the chosen target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Confidence {
    #[default]
    Low,
    Medium,
    High,
}

impl Confidence {
    /// Map a detector score onto a confidence label.
    pub fn from_score(score: f64) -> Self {
        if score >= 70.0 {
            Confidence::High
        } else if score >= 50.0 {
            Confidence::Medium
        } else {
            Confidence::Low
        }
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Confidence::Low => "LOW",
            Confidence::Medium => "MEDIUM",
            Confidence::High => "HIGH",
        };
        f.write_str(label)
    }
}

/// Score breakdown for one candidate target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateScore {
    pub target: u32,
    /// Points from the avg-FPS / target ratio band.
    pub ratio_score: f64,
    /// Points from the share of delta times near the expected interval.
    pub delta_match_score: f64,
    /// Bonus for a ratio in the throttled-but-steady band.
    pub consistency_bonus: f64,
    pub total: f64,
}

/// Inferred nominal frame-rate target of a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetFpsResult {
    pub target: u32,
    pub confidence: Confidence,
    pub score: f64,
    /// Reported average FPS divided by the chosen target.
    pub performance_ratio: f64,
    /// Mean of the reported delta times, in milliseconds.
    pub avg_delta_time_ms: f64,
    pub candidates: Vec<CandidateScore>,
}

// ── FpsMetricsBlock ──────────────────────────────────────────────────────────

/// FPS and frame-time statistics for one timestamp source.
///
/// Scalars are rounded to 2 decimals. `frame_times_ms` and `instant_fps` have
/// one entry per adjacent timestamp pair.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FpsMetricsBlock {
    /// Mean of the valid instantaneous FPS values.
    pub avg_fps: f64,
    pub min_fps: f64,
    pub max_fps: f64,
    pub avg_frame_time_ms: f64,
    pub min_frame_time_ms: f64,
    pub max_frame_time_ms: f64,
    pub frame_times_ms: Vec<Option<f64>>,
    pub instant_fps: Vec<Option<f64>>,
}

impl FpsMetricsBlock {
    /// Number of valid (non-`None`) frame intervals.
    pub fn valid_frame_count(&self) -> usize {
        self.frame_times_ms.iter().filter(|v| v.is_some()).count()
    }
}

// ── JankAnalysisBlock ────────────────────────────────────────────────────────

/// Overall smoothness relative to the target frame rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PerformanceRating {
    Excellent,
    Good,
    Poor,
}

impl PerformanceRating {
    pub fn classify(avg_fps: f64, target_fps: f64) -> Self {
        if avg_fps >= 0.9 * target_fps {
            PerformanceRating::Excellent
        } else if avg_fps >= 0.7 * target_fps {
            PerformanceRating::Good
        } else {
            PerformanceRating::Poor
        }
    }
}

impl fmt::Display for PerformanceRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Frame-to-frame steadiness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChoppinessRating {
    Smooth,
    Moderate,
    Choppy,
}

impl ChoppinessRating {
    pub fn classify(instability_percentage: f64) -> Self {
        if instability_percentage <= 5.0 {
            ChoppinessRating::Smooth
        } else if instability_percentage <= 15.0 {
            ChoppinessRating::Moderate
        } else {
            ChoppinessRating::Choppy
        }
    }
}

impl fmt::Display for ChoppinessRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Slow-frame and instability classification of the actual frame times.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JankAnalysisBlock {
    pub slow_frames_count: u32,
    pub slow_frame_percentage: f64,
    pub avg_slow_frame_excess: f64,
    pub max_slow_frame_excess: f64,
    pub jank_instability_count: u32,
    pub jank_instability_percentage: f64,
    pub avg_jank_instability: f64,
    pub max_jank_instability: f64,
    pub performance_rating: PerformanceRating,
    pub choppiness_rating: ChoppinessRating,
    /// Milliseconds over the slow-frame threshold, per frame.
    pub slow_frame_excess_ms: Vec<Option<f64>>,
    /// Milliseconds of spike over the previous frame, per frame.
    pub instability_ms: Vec<Option<f64>>,
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(58.823529, 2), 58.82);
        assert_eq!(round_to(12.345, 1), 12.3);
        assert_eq!(round_to(0.125, 2), 0.13);
        assert_eq!(round_to(-1.005, 0), -1.0);
    }

    #[test]
    fn test_round_series_keeps_invalid_slots() {
        let rounded = round_series(&[Some(1.234), None, Some(2.0)], 2);
        assert_eq!(rounded, vec![Some(1.23), None, Some(2.0)]);
    }

    #[test]
    fn test_confidence_thresholds() {
        assert_eq!(Confidence::from_score(70.0), Confidence::High);
        assert_eq!(Confidence::from_score(69.99), Confidence::Medium);
        assert_eq!(Confidence::from_score(50.0), Confidence::Medium);
        assert_eq!(Confidence::from_score(49.9), Confidence::Low);
    }

    #[test]
    fn test_confidence_serializes_uppercase() {
        let json = serde_json::to_string(&Confidence::Medium).unwrap();
        assert_eq!(json, "\"MEDIUM\"");
    }

    #[test]
    fn test_performance_rating_bands() {
        assert_eq!(PerformanceRating::classify(28.0, 30.0), PerformanceRating::Excellent);
        assert_eq!(PerformanceRating::classify(22.0, 30.0), PerformanceRating::Good);
        assert_eq!(PerformanceRating::classify(20.0, 30.0), PerformanceRating::Poor);
    }

    #[test]
    fn test_choppiness_rating_bands() {
        assert_eq!(ChoppinessRating::classify(5.0), ChoppinessRating::Smooth);
        assert_eq!(ChoppinessRating::classify(5.1), ChoppinessRating::Moderate);
        assert_eq!(ChoppinessRating::classify(15.0), ChoppinessRating::Moderate);
        assert_eq!(ChoppinessRating::classify(15.1), ChoppinessRating::Choppy);
    }

    #[test]
    fn test_valid_frame_count() {
        let block = FpsMetricsBlock {
            frame_times_ms: vec![Some(16.0), None, Some(17.0)],
            instant_fps: vec![Some(62.5), None, Some(58.82)],
            ..Default::default()
        };
        assert_eq!(block.valid_frame_count(), 2);
    }
}
