//! Sequential multi-file ingestion with partial-failure reporting.

use std::path::Path;

use fpacer_core::prelude::*;
use serde::Serialize;

use crate::config::AnalysisSettings;
use crate::pipeline::analyze;
use crate::store::{RunId, RunStore};

/// One dump handed to a batch.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub contents: String,
    /// Name the user gave this file's app; wins over anything in the dump.
    pub app_name_override: Option<String>,
}

impl UploadedFile {
    pub fn new(file_name: impl Into<String>, contents: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            contents: contents.into(),
            app_name_override: None,
        }
    }

    pub fn with_app_name(mut self, app_name: impl Into<String>) -> Self {
        self.app_name_override = Some(app_name.into());
        self
    }

    /// Read a dump from disk; the file name is the path's last component.
    pub fn read(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Cannot read {}", path.display()))?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self::new(file_name, contents))
    }
}

/// A file the batch could not turn into a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchFailure {
    pub file_name: String,
    pub reason: String,
}

/// Outcome of one batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    /// IDs of the stored runs, in file order
    pub succeeded: Vec<RunId>,
    pub failures: Vec<BatchFailure>,
}

impl BatchReport {
    pub fn success_count(&self) -> usize {
        self.succeeded.len()
    }

    pub fn error_count(&self) -> usize {
        self.failures.len()
    }

    /// Record a file that failed before it reached the pipeline.
    pub fn record_failure(&mut self, file_name: impl Into<String>, error: &Error) {
        self.failures.push(BatchFailure {
            file_name: file_name.into(),
            reason: error.to_string(),
        });
    }

    /// e.g. "3 succeeded, 1 failed"
    pub fn summary(&self) -> String {
        format!(
            "{} succeeded, {} failed",
            self.success_count(),
            self.error_count()
        )
    }
}

/// Analyse `files` one by one and add every successful run to `store`.
///
/// A failing file is logged and recorded in the report; the batch carries on
/// with the next file.
pub fn ingest_batch(
    store: &mut RunStore,
    files: impl IntoIterator<Item = UploadedFile>,
    settings: &AnalysisSettings,
) -> BatchReport {
    let mut report = BatchReport::default();

    for file in files {
        match analyze(
            &file.contents,
            Some(&file.file_name),
            file.app_name_override.as_deref(),
            settings,
        ) {
            Ok(run) => {
                let id = store.insert(run);
                debug!("Stored {} as run {}", file.file_name, id);
                report.succeeded.push(id);
            }
            Err(e) if e.is_fatal() => {
                warn!("Skipping {}: {}", file.file_name, e);
                report.record_failure(file.file_name, &e);
            }
            Err(e) => {
                error!("Unexpected failure analysing {}: {}", file.file_name, e);
                report.record_failure(file.file_name, &e);
            }
        }
    }

    info!("Batch finished: {}", report.summary());
    report
}
