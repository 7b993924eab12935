//! Configuration types for Frame Pacer

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use fpacer_core::prelude::*;

use crate::jank::JankThresholds;
use crate::target::DEFAULT_TARGET_CANDIDATES;

/// Application settings (.fpacer/config.toml)
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Settings {
    #[serde(default)]
    pub analysis: AnalysisSettings,

    #[serde(default)]
    pub output: OutputSettings,
}

/// Analysis tuning
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct AnalysisSettings {
    /// Frame-rate targets the detector chooses between, in priority order
    #[serde(default = "default_target_candidates")]
    pub target_candidates: Vec<u32>,

    /// A frame is slow when it exceeds the target frame time by this factor
    #[serde(default = "default_slow_frame_factor")]
    pub slow_frame_factor: f64,

    /// A frame is unstable when it exceeds the previous frame by this factor
    #[serde(default = "default_instability_factor")]
    pub instability_factor: f64,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            target_candidates: default_target_candidates(),
            slow_frame_factor: default_slow_frame_factor(),
            instability_factor: default_instability_factor(),
        }
    }
}

impl AnalysisSettings {
    /// Thresholds for the jank classifier.
    pub fn jank_thresholds(&self) -> JankThresholds {
        JankThresholds {
            slow_frame_factor: self.slow_frame_factor,
            instability_factor: self.instability_factor,
        }
    }

    /// Reject values the pipeline cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.target_candidates.is_empty() {
            return Err(Error::config("analysis.target_candidates must not be empty"));
        }
        if self.target_candidates.contains(&0) {
            return Err(Error::config("analysis.target_candidates must be positive"));
        }
        if !(self.slow_frame_factor.is_finite() && self.slow_frame_factor > 0.0) {
            return Err(Error::config("analysis.slow_frame_factor must be positive"));
        }
        if !(self.instability_factor.is_finite() && self.instability_factor > 0.0) {
            return Err(Error::config("analysis.instability_factor must be positive"));
        }
        Ok(())
    }
}

fn default_target_candidates() -> Vec<u32> {
    DEFAULT_TARGET_CANDIDATES.to_vec()
}

fn default_slow_frame_factor() -> f64 {
    JankThresholds::default().slow_frame_factor
}

fn default_instability_factor() -> f64 {
    JankThresholds::default().instability_factor
}

/// How results are written to stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One JSON event per line
    #[default]
    Ndjson,
    /// A single JSON array of runs
    Json,
    /// One human-readable line per run
    Summary,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ndjson" => Ok(OutputFormat::Ndjson),
            "json" => Ok(OutputFormat::Json),
            "summary" => Ok(OutputFormat::Summary),
            other => Err(format!(
                "unknown format '{other}' (expected ndjson, json, or summary)"
            )),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OutputFormat::Ndjson => "ndjson",
            OutputFormat::Json => "json",
            OutputFormat::Summary => "summary",
        };
        f.write_str(name)
    }
}

/// Output settings
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct OutputSettings {
    #[serde(default)]
    pub format: OutputFormat,

    /// Include the raw frame list in JSON output
    #[serde(default)]
    pub include_frames: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_classifier_constants() {
        let analysis = AnalysisSettings::default();
        assert_eq!(analysis.target_candidates, vec![30]);
        assert_eq!(analysis.slow_frame_factor, 1.5);
        assert_eq!(analysis.instability_factor, 1.3);
        assert!(analysis.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut analysis = AnalysisSettings {
            target_candidates: vec![],
            ..Default::default()
        };
        assert!(analysis.validate().is_err());

        analysis.target_candidates = vec![30, 0];
        assert!(analysis.validate().is_err());

        analysis.target_candidates = vec![30];
        analysis.instability_factor = -1.0;
        assert!(analysis.validate().is_err());

        analysis.instability_factor = 1.3;
        analysis.slow_frame_factor = f64::NAN;
        assert!(analysis.validate().is_err());
    }

    #[test]
    fn test_output_format_from_str() {
        assert_eq!("json".parse::<OutputFormat>(), Ok(OutputFormat::Json));
        assert_eq!("SUMMARY".parse::<OutputFormat>(), Ok(OutputFormat::Summary));
        assert_eq!(" ndjson ".parse::<OutputFormat>(), Ok(OutputFormat::Ndjson));
        assert!("xml".parse::<OutputFormat>().is_err());
    }
}
