//! Frame Pacer - frame-pacing metrics for mobile rendering timestamp dumps
//!
//! This is the binary entry point. All logic lives in the library crates.

use std::path::PathBuf;

use clap::Parser;
use fpacer_analysis::config::{init_config_dir, load_settings, load_settings_file};
use fpacer_analysis::OutputFormat;
use fpacer_core::prelude::*;
use frame_pacer::{run_report, ReportOptions};

/// Frame Pacer - frame-pacing metrics for mobile rendering timestamp dumps
#[derive(Parser, Debug)]
#[command(name = "fpacer")]
#[command(about = "Analyse rendering timestamp dumps for FPS and jank", long_about = None)]
struct Args {
    /// Timestamp dump files to analyse
    #[arg(value_name = "FILES", required_unless_present = "init_config")]
    files: Vec<PathBuf>,

    /// App name to report for every file, overriding names found in the dumps
    #[arg(long, value_name = "NAME")]
    app_name: Option<String>,

    /// Output format: ndjson, json, or summary
    #[arg(long, value_name = "FORMAT")]
    format: Option<OutputFormat>,

    /// Settings file (default: .fpacer/config.toml in the current directory)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Also report a comparison across all analysed runs
    #[arg(long)]
    compare: bool,

    /// Include raw frame rows in the output
    #[arg(long)]
    include_frames: bool,

    /// Write a default .fpacer/config.toml and exit
    #[arg(long)]
    init_config: bool,
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let args = Args::parse();

    // Logging goes to a file; stdout carries the report
    if let Err(e) = fpacer_core::logging::init() {
        eprintln!("Logging disabled: {}", e);
    }

    let cwd = std::env::current_dir().context("Cannot resolve the working directory")?;

    if args.init_config {
        init_config_dir(&cwd)?;
        eprintln!("Wrote default settings to .fpacer/config.toml");
        return Ok(());
    }

    let settings = match &args.config {
        Some(path) => load_settings_file(path)?,
        None => load_settings(&cwd),
    };

    let options = ReportOptions {
        files: args.files,
        app_name: args.app_name,
        format: args.format.unwrap_or(settings.output.format),
        include_frames: args.include_frames || settings.output.include_frames,
        compare: args.compare,
    };

    let mut stdout = std::io::stdout().lock();
    let report = run_report(&options, &settings.analysis, &mut stdout)?;

    if report.success_count() == 0 {
        error!("No file could be analysed: {}", report.summary());
        if let Ok(log_file) = fpacer_core::logging::get_current_log_file() {
            eprintln!("No file could be analysed. See {}", log_file.display());
        }
        std::process::exit(1);
    }

    Ok(())
}
