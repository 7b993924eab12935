//! Report output - NDJSON events for scripted consumers
//!
//! In `ndjson` mode every outcome of a batch is written as one JSON object
//! per line, tagged by its "event" field.
//!
//! # Example Output
//!
//! ```json
//! {"event":"run_parsed","run_id":1,"run":{"app_name":"Netflix",...},"timestamp":1704700001000}
//! {"event":"run_failed","file_name":"empty.txt","reason":"Dump file is empty","timestamp":1704700001002}
//! {"event":"batch_completed","succeeded":1,"failed":1,"summary":"1 succeeded, 1 failed","timestamp":1704700001003}
//! ```

pub mod runner;

use std::io::{self, Write};

use chrono::Utc;
use fpacer_analysis::{RunComparison, RunId};
use fpacer_core::RunResult;
use serde::Serialize;

/// Events emitted in `ndjson` mode
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ReportEvent {
    /// A dump was analysed and stored
    RunParsed {
        run_id: RunId,
        run: Box<RunResult>,
        timestamp: i64,
    },

    /// A dump could not be read or analysed
    RunFailed {
        file_name: String,
        reason: String,
        timestamp: i64,
    },

    /// Comparison across every stored run
    Comparison {
        comparison: RunComparison,
        timestamp: i64,
    },

    /// The batch is done
    BatchCompleted {
        succeeded: usize,
        failed: usize,
        summary: String,
        timestamp: i64,
    },
}

impl ReportEvent {
    /// Write this event as one NDJSON line and flush
    pub fn write_line<W: Write>(&self, out: &mut W) -> io::Result<()> {
        let json = serde_json::to_string(self).map_err(io::Error::other)?;
        writeln!(out, "{}", json)?;
        out.flush()
    }

    /// Get current timestamp in milliseconds
    fn now() -> i64 {
        Utc::now().timestamp_millis()
    }

    // ─────────────────────────────────────────────────────────
    // Convenience constructors
    // ─────────────────────────────────────────────────────────

    pub fn run_parsed(run_id: RunId, run: RunResult) -> Self {
        Self::RunParsed {
            run_id,
            run: Box::new(run),
            timestamp: Self::now(),
        }
    }

    pub fn run_failed(file_name: &str, reason: &str) -> Self {
        Self::RunFailed {
            file_name: file_name.to_string(),
            reason: reason.to_string(),
            timestamp: Self::now(),
        }
    }

    pub fn comparison(comparison: RunComparison) -> Self {
        Self::Comparison {
            comparison,
            timestamp: Self::now(),
        }
    }

    pub fn batch_completed(succeeded: usize, failed: usize, summary: String) -> Self {
        Self::BatchCompleted {
            succeeded,
            failed,
            summary,
            timestamp: Self::now(),
        }
    }
}
