//! # Frame Dump Domain Types
//!
//! Types produced by parsing one rendering timestamp dump: the refresh-period
//! header, the per-frame rows, the trailing device metadata blob, and the
//! optional pre-aggregated FPS histogram.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

// ── SessionHeader ────────────────────────────────────────────────────────────

/// Refresh period assumed when the dump header cannot be read (60 Hz).
pub const DEFAULT_REFRESH_PERIOD_NS: i64 = 16_666_667;

/// Refresh rate assumed when the dump header cannot be read.
pub const DEFAULT_REFRESH_RATE_HZ: f64 = 60.0;

/// Display refresh information from the first line of a dump.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SessionHeader {
    /// Display refresh period in nanoseconds.
    pub refresh_period_ns: i64,
    /// Refresh rate in Hz as printed in the header.
    pub refresh_rate_hz: f64,
}

impl Default for SessionHeader {
    fn default() -> Self {
        Self {
            refresh_period_ns: DEFAULT_REFRESH_PERIOD_NS,
            refresh_rate_hz: DEFAULT_REFRESH_RATE_HZ,
        }
    }
}

impl SessionHeader {
    /// Refresh rate derived from the period, rounded to 2 decimals.
    pub fn derived_refresh_rate(&self) -> f64 {
        if self.refresh_period_ns <= 0 {
            return 0.0;
        }
        crate::metrics::round_to(1e9 / self.refresh_period_ns as f64, 2)
    }
}

// ── FrameRecord ──────────────────────────────────────────────────────────────

/// One row of the dump's frame table.
///
/// The dump labels its second column "Presentation Time" and its fourth
/// column "Vsync Time". The second column is the vsync-aligned target and is
/// stored in `vsync_time`; the fourth is the observed presentation and is
/// stored in `presentation_time`. All "actual experience" metrics key off
/// `presentation_time`.
///
/// Timestamps are `None` when the column was not numeric, which turns the
/// surrounding intervals invalid instead of dropping the row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameRecord {
    /// Test identifier from the first column.
    pub test_id: String,
    /// Scheduled (vsync-aligned) timestamp in nanoseconds.
    pub vsync_time: Option<i64>,
    /// Fence timestamp in nanoseconds.
    pub fence_time: Option<i64>,
    /// Actual presentation timestamp in nanoseconds.
    pub presentation_time: Option<i64>,
    /// Delta time in milliseconds as reported by the capture tool.
    pub delta_time_ms: Option<f64>,
    /// Instantaneous FPS as reported by the capture tool.
    pub instant_fps: Option<f64>,
    /// Latency in milliseconds, 0 when the column is absent.
    pub latency_ms: f64,
}

// ── DeviceMetadata ───────────────────────────────────────────────────────────

/// Free-form device properties from the trailing metadata blob.
///
/// Keys follow Android system-property naming. Non-string JSON values are
/// stored in their JSON text form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeviceMetadata(BTreeMap<String, String>);

impl DeviceMetadata {
    pub const MANUFACTURER: &'static str = "ro.product.manufacturer";
    pub const MODEL: &'static str = "ro.product.model";
    pub const SOC_MODEL: &'static str = "ro.soc.model";
    pub const MEMORY_TOTAL_KB: &'static str = "MemTotal";
    pub const APP_NAME: &'static str = "appName";

    pub fn new(entries: BTreeMap<String, String>) -> Self {
        Self(entries)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn manufacturer(&self) -> Option<&str> {
        self.get(Self::MANUFACTURER)
    }

    pub fn model(&self) -> Option<&str> {
        self.get(Self::MODEL)
    }

    pub fn soc_model(&self) -> Option<&str> {
        self.get(Self::SOC_MODEL)
    }

    /// Total device memory in kB, if the property is present and numeric.
    pub fn memory_total_kb(&self) -> Option<u64> {
        self.get(Self::MEMORY_TOTAL_KB)
            .and_then(|v| v.trim().trim_end_matches("kB").trim().parse().ok())
    }

    /// Human-readable device label, e.g. "samsung SM-G991B".
    pub fn device_label(&self) -> Option<String> {
        match (self.manufacturer(), self.model()) {
            (Some(make), Some(model)) => Some(format!("{make} {model}")),
            (None, Some(model)) => Some(model.to_string()),
            (Some(make), None) => Some(make.to_string()),
            (None, None) => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

// ── FpsBuckets ───────────────────────────────────────────────────────────────

/// Number of histogram buckets in the trailing metadata row.
pub const FPS_BUCKET_COUNT: usize = 14;

/// FPS range labels, in bucket order.
pub const FPS_BUCKET_LABELS: [&str; FPS_BUCKET_COUNT] = [
    "0-3", "3-5", "5-7", "7-9", "9-11", "11-13", "13-16", "16-19", "19-22", "22-26", "26-35",
    "35-50", "50-70", "70+",
];

/// Pre-aggregated FPS histogram and session summary written by the capture
/// tool into the trailing metadata row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FpsBuckets {
    /// Frame counts per FPS range, see [`FPS_BUCKET_LABELS`].
    pub buckets: [u64; FPS_BUCKET_COUNT],
    /// Average FPS as reported by the capture tool.
    pub avg_fps: f64,
    /// Elapsed capture time as reported by the capture tool.
    pub elapsed_time: f64,
    pub total_frames: u64,
    pub start_battery: f64,
    pub end_battery: f64,
    pub battery_drain: f64,
    pub refresh_rate: f64,
}

impl FpsBuckets {
    /// Iterate `(label, count)` pairs in bucket order.
    pub fn labelled(&self) -> impl Iterator<Item = (&'static str, u64)> + '_ {
        FPS_BUCKET_LABELS.iter().copied().zip(self.buckets.iter().copied())
    }

    /// Sum of all bucket counts.
    pub fn bucketed_frames(&self) -> u64 {
        self.buckets.iter().sum()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
