//! Frame Pacer Library
//!
//! Batch analysis of mobile rendering timestamp dumps, with NDJSON, JSON, or
//! plain-text reporting.

pub mod report;

// Re-export main entry points
pub use report::runner::{run_report, ReportOptions};
pub use report::ReportEvent;
