//! Batch runner - reads dump files, analyses them, and writes the report

use std::io::Write;
use std::path::PathBuf;

use fpacer_analysis::{
    compare_runs, ingest_batch, AnalysisSettings, BatchReport, OutputFormat, RunComparison, RunId,
    RunStore, UploadedFile,
};
use fpacer_core::prelude::*;
use fpacer_core::{FpsBuckets, RunResult};
use serde::Serialize;

use super::ReportEvent;

/// What to analyse and how to print it
#[derive(Debug, Clone, Default)]
pub struct ReportOptions {
    pub files: Vec<PathBuf>,
    /// Applied to every file
    pub app_name: Option<String>,
    pub format: OutputFormat,
    pub include_frames: bool,
    pub compare: bool,
}

/// Analyse every file and write the report to `out`.
///
/// Unreadable files are counted as failures like unparsable ones. Only a
/// failure to write the report itself is returned as an error.
pub fn run_report<W: Write>(
    options: &ReportOptions,
    settings: &AnalysisSettings,
    out: &mut W,
) -> Result<BatchReport> {
    info!("Analysing {} file(s)", options.files.len());

    let mut read_failures = BatchReport::default();
    let mut uploads = Vec::with_capacity(options.files.len());
    for path in &options.files {
        match UploadedFile::read(path) {
            Ok(file) => uploads.push(match &options.app_name {
                Some(name) => file.with_app_name(name.clone()),
                None => file,
            }),
            Err(e) => {
                read_failures.record_failure(path.display().to_string(), &e);
            }
        }
    }

    let mut store = RunStore::new();
    let mut report = ingest_batch(&mut store, uploads, settings);
    read_failures.failures.append(&mut report.failures);
    report.failures = read_failures.failures;

    let runs: Vec<(RunId, RunResult)> = store
        .iter()
        .map(|(id, run)| {
            let run = if options.include_frames {
                run.clone()
            } else {
                run.without_frames()
            };
            (id, run)
        })
        .collect();

    match options.format {
        OutputFormat::Ndjson => write_ndjson(&store, runs, &report, options.compare, out)?,
        OutputFormat::Json => write_json(&store, &runs, options.compare, out)?,
        OutputFormat::Summary => write_summary(&store, &runs, &report, options.compare, out)?,
    }

    info!("Report written: {}", report.summary());
    Ok(report)
}

fn write_ndjson<W: Write>(
    store: &RunStore,
    runs: Vec<(RunId, RunResult)>,
    report: &BatchReport,
    compare: bool,
    out: &mut W,
) -> Result<()> {
    for (id, run) in runs {
        ReportEvent::run_parsed(id, run).write_line(out)?;
    }
    for failure in &report.failures {
        ReportEvent::run_failed(&failure.file_name, &failure.reason).write_line(out)?;
    }
    if compare {
        let all: Vec<_> = store.iter().collect();
        if let Some(comparison) = compare_runs(&all) {
            ReportEvent::comparison(comparison).write_line(out)?;
        }
    }
    ReportEvent::batch_completed(report.success_count(), report.error_count(), report.summary())
        .write_line(out)?;
    Ok(())
}

/// `--compare` output: one document holding both the runs and the comparison
#[derive(Serialize)]
struct ComparedRuns<'a> {
    runs: Vec<&'a RunResult>,
    comparison: Option<RunComparison>,
}

fn write_json<W: Write>(
    store: &RunStore,
    runs: &[(RunId, RunResult)],
    compare: bool,
    out: &mut W,
) -> Result<()> {
    let runs: Vec<&RunResult> = runs.iter().map(|(_, run)| run).collect();
    if compare {
        let all: Vec<_> = store.iter().collect();
        let document = ComparedRuns {
            runs,
            comparison: compare_runs(&all),
        };
        serde_json::to_writer_pretty(&mut *out, &document)?;
    } else {
        serde_json::to_writer_pretty(&mut *out, &runs)?;
    }
    writeln!(out)?;
    Ok(())
}

fn write_summary<W: Write>(
    store: &RunStore,
    runs: &[(RunId, RunResult)],
    report: &BatchReport,
    compare: bool,
    out: &mut W,
) -> Result<()> {
    for (id, run) in runs {
        writeln!(out, "[{}] {}", id, summary_line(run))?;
        if let Some(buckets) = &run.fps_buckets {
            writeln!(out, "    reported: {}", buckets_line(buckets))?;
        }
    }
    for failure in &report.failures {
        writeln!(out, "FAILED {}: {}", failure.file_name, failure.reason)?;
    }

    if compare {
        let all: Vec<_> = store.iter().collect();
        if let Some(comparison) = compare_runs(&all) {
            let label = |id: RunId| {
                store
                    .get(id)
                    .map(RunResult::display_name)
                    .unwrap_or_else(|| id.to_string())
            };
            writeln!(
                out,
                "Best: {} | Worst: {} | mean {:.2} fps, slow {:.1}%, unstable {:.1}%",
                label(comparison.best),
                label(comparison.worst),
                comparison.mean_avg_fps,
                comparison.mean_slow_frame_percentage,
                comparison.mean_instability_percentage,
            )?;
        }
    }

    writeln!(out, "{}", report.summary())?;
    Ok(())
}

/// One human-readable line per run
pub fn summary_line(run: &RunResult) -> String {
    let device = run
        .device_info
        .device_label()
        .map(|label| format!(" on {label}"))
        .unwrap_or_default();
    format!(
        "{}{}: {:.2} fps avg (target {} {}), {:.2} ms/frame, slow {:.1}%, unstable {:.1}%, {} / {}",
        run.display_name(),
        device,
        run.metrics.avg_fps,
        run.target_fps.target,
        run.target_fps.confidence,
        run.metrics.avg_frame_time_ms,
        run.jank.slow_frame_percentage,
        run.jank.jank_instability_percentage,
        run.jank.performance_rating,
        run.jank.choppiness_rating,
    )
}

/// Capture-tool histogram, non-empty buckets only
fn buckets_line(buckets: &FpsBuckets) -> String {
    let counts: Vec<String> = buckets
        .labelled()
        .filter(|(_, count)| *count > 0)
        .map(|(label, count)| format!("{label} fps: {count}"))
        .collect();
    format!(
        "{:.1} fps avg over {} frames ({})",
        buckets.avg_fps,
        buckets.total_frames,
        counts.join(", ")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const GOOD: &str = "\
Refresh Period: 16666666 ns (60.00 Hz)
Test ID,Presentation Time,Fence Time,Vsync Time,Delta Time,Instant FPS
t1,0,0,0,33.3,30.0
t2,33000000,0,33000000,33.3,30.0
t3,66000000,0,66000000,33.3,30.0
";

    fn options(dir: &std::path::Path, format: OutputFormat) -> ReportOptions {
        let good = dir.join("good.txt");
        std::fs::write(&good, GOOD).unwrap();
        ReportOptions {
            files: vec![good, dir.join("missing.txt")],
            format,
            ..Default::default()
        }
    }

    #[test]
    fn test_ndjson_report() {
        let temp = tempdir().unwrap();
        let mut out = Vec::new();
        let opts = ReportOptions {
            compare: true,
            ..options(temp.path(), OutputFormat::Ndjson)
        };

        let report = run_report(&opts, &AnalysisSettings::default(), &mut out).unwrap();

        assert_eq!(report.summary(), "1 succeeded, 1 failed");
        let text = String::from_utf8(out).unwrap();
        let events: Vec<serde_json::Value> = text
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        let names: Vec<&str> = events.iter().map(|e| e["event"].as_str().unwrap()).collect();
        assert_eq!(
            names,
            vec!["run_parsed", "run_failed", "comparison", "batch_completed"]
        );
        assert_eq!(events[0]["run"]["file_name"], "good.txt");
        assert!(events[0]["run"]["frames"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_json_report_includes_frames_on_request() {
        let temp = tempdir().unwrap();
        let mut out = Vec::new();
        let opts = ReportOptions {
            include_frames: true,
            app_name: Some("Game".into()),
            ..options(temp.path(), OutputFormat::Json)
        };

        run_report(&opts, &AnalysisSettings::default(), &mut out).unwrap();

        let runs: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(runs.as_array().unwrap().len(), 1);
        assert_eq!(runs[0]["app_name"], "Game");
        assert_eq!(runs[0]["frames"].as_array().unwrap().len(), 3);
    }

    #[test]
    fn test_json_report_with_comparison_is_one_document() {
        let temp = tempdir().unwrap();
        let mut out = Vec::new();
        let opts = ReportOptions {
            compare: true,
            ..options(temp.path(), OutputFormat::Json)
        };

        run_report(&opts, &AnalysisSettings::default(), &mut out).unwrap();

        let doc: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(doc["runs"].as_array().unwrap().len(), 1);
        assert_eq!(doc["runs"][0]["file_name"], "good.txt");
        assert_eq!(doc["comparison"]["best"], 1);
        assert_eq!(doc["comparison"]["rows"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_summary_shows_device_and_reported_buckets() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("racer.txt");
        let dump = format!(
            "{GOOD}run-7,x,com.example.racer,0,0,1,0,2,0,0,3,0,5,10,40,300,12,57.3,10.2,373,88,86,2,60.0,\
{{\"ro.product.manufacturer\":\"Google\",\"ro.product.model\":\"Pixel 7\"}}\n"
        );
        std::fs::write(&path, dump).unwrap();
        let opts = ReportOptions {
            files: vec![path],
            format: OutputFormat::Summary,
            ..Default::default()
        };
        let mut out = Vec::new();

        run_report(&opts, &AnalysisSettings::default(), &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert!(lines[0].starts_with("[1] Racer (racer.txt) on Google Pixel 7: "));
        assert_eq!(
            lines[1],
            "    reported: 57.3 fps avg over 373 frames (5-7 fps: 1, 9-11 fps: 2, \
16-19 fps: 3, 22-26 fps: 5, 26-35 fps: 10, 35-50 fps: 40, 50-70 fps: 300, 70+ fps: 12)"
        );
        assert_eq!(lines[2], "1 succeeded, 0 failed");
    }

    #[test]
    fn test_summary_report() {
        let temp = tempdir().unwrap();
        let mut out = Vec::new();

        let report = run_report(
            &options(temp.path(), OutputFormat::Summary),
            &AnalysisSettings::default(),
            &mut out,
        )
        .unwrap();

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("[1] Unknown App (good.txt): 30.30 fps avg (target 30"));
        assert!(lines[1].starts_with("FAILED "));
        assert_eq!(lines[2], report.summary());
    }

    #[test]
    fn test_all_files_failing() {
        let mut out = Vec::new();
        let opts = ReportOptions {
            files: vec![PathBuf::from("/nonexistent/dump.txt")],
            ..Default::default()
        };

        let report = run_report(&opts, &AnalysisSettings::default(), &mut out).unwrap();
        assert_eq!(report.success_count(), 0);
        assert_eq!(report.error_count(), 1);
    }
}
