//! # fpacer-core - Core Domain Types
//!
//! Foundation crate for Frame Pacer. Provides domain types, error handling,
//! and logging setup.
//!
//! This crate has **zero internal dependencies** -- it only depends on external
//! crates (serde, chrono, thiserror, tracing).
//!
//! ## Public API
//!
//! ### Dump Types (`frame`)
//! - [`FrameRecord`] - One row of a frame timestamp table
//! - [`SessionHeader`] - Display refresh period and rate
//! - [`DeviceMetadata`] - Device properties from the trailing metadata blob
//! - [`FpsBuckets`] - Pre-aggregated FPS histogram written by the capture tool
//!
//! ### Metric Types (`metrics`)
//! - [`TargetFpsResult`] - Inferred frame-rate target with [`Confidence`]
//! - [`FpsMetricsBlock`] - FPS and frame-time statistics for one timestamp source
//! - [`JankAnalysisBlock`] - Slow-frame and instability classification
//!
//! ### Results (`run`)
//! - [`RunResult`] - The assembled analysis of one dump file
//!
//! ### Error Handling (`error`)
//! - [`Error`] - Custom error enum with `fatal` vs `recoverable` classification
//! - [`Result`] - Type alias for `std::result::Result<T, Error>`
//! - [`ResultExt`] - Extension trait for adding error context
//!
//! ## Prelude
//!
//! Import commonly used types with:
//! ```rust
//! use fpacer_core::prelude::*;
//! ```

pub mod error;
pub mod frame;
pub mod logging;
pub mod metrics;
pub mod prelude;
pub mod run;

// Re-export commonly used types at crate root for convenience
pub use error::{Error, Result, ResultExt};
pub use frame::{
    DeviceMetadata, FpsBuckets, FrameRecord, SessionHeader, DEFAULT_REFRESH_PERIOD_NS,
    DEFAULT_REFRESH_RATE_HZ, FPS_BUCKET_COUNT, FPS_BUCKET_LABELS,
};
pub use metrics::{
    round_series, round_to, CandidateScore, ChoppinessRating, Confidence, FpsMetricsBlock,
    JankAnalysisBlock, PerformanceRating, TargetFpsResult,
};
pub use run::RunResult;
