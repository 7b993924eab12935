//! fpacer-analysis - Frame-pacing metrics and run management for Frame Pacer
//!
//! Takes parsed dumps from `fpacer-parse` through target detection, FPS
//! statistics, and jank classification, and keeps the resulting runs in a
//! [`RunStore`]. Also owns configuration loading, batch ingestion, and run
//! comparison.

pub mod assembler;
pub mod batch;
pub mod compare;
pub mod config;
pub mod fps;
pub mod jank;
pub mod pipeline;
pub mod store;
pub mod target;

// Re-export primary types
pub use assembler::assemble;
pub use batch::{ingest_batch, BatchFailure, BatchReport, UploadedFile};
pub use compare::{compare_runs, ComparisonRow, RunComparison};
pub use config::{AnalysisSettings, OutputFormat, OutputSettings, Settings};
pub use fps::{compute_fps_metrics, TimestampSource};
pub use jank::{classify_jank, JankThresholds};
pub use pipeline::analyze;
pub use store::{RunId, RunStore};
pub use target::{detect_target, DEFAULT_TARGET_CANDIDATES};
