//! Frame record extraction from a raw timestamp dump.
//!
//! A dump looks like:
//!
//! ```text
//! Refresh Period: 16666666 ns (60.00 Hz)
//! ...optional preamble...
//! Test ID,Presentation Time,Fence Time,Vsync Time,Delta Time,Instant FPS,Latency
//! <testId>,<scheduledNs>,<fenceNs>,<actualNs>,<deltaMs>,<fps>[,<latencyMs>]
//! ...
//! <testId>,<unused>,<package>,...,{"ro.product.model":"..."}
//! ```

use fpacer_core::prelude::*;
use fpacer_core::{DeviceMetadata, FpsBuckets, FrameRecord, SessionHeader};

use crate::app_names::{app_name_from_package, package_from_test_id, UNKNOWN_APP, UNKNOWN_PACKAGE};
use crate::header::parse_header;
use crate::metadata::{is_metadata_line, parse_trailing_line, TrailingMetadata};

/// Substring that marks the frame table header line.
pub const TABLE_HEADER_MARKER: &str = "Test ID,Presentation Time";

/// Minimum comma-separated fields for a frame row to be kept.
pub const MIN_ROW_FIELDS: usize = 6;

/// Fallback file name when the caller does not supply one.
const UNNAMED_FILE: &str = "unnamed";

/// Everything extracted from one dump before any metric is computed.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedDump {
    pub file_name: String,
    pub header: SessionHeader,
    pub frames: Vec<FrameRecord>,
    pub package_name: String,
    pub app_name: String,
    pub device_info: DeviceMetadata,
    pub fps_buckets: Option<FpsBuckets>,
}

/// Parse a raw dump.
///
/// `app_name_override` is the name the user supplied for this file and wins
/// over every name found in the dump.
///
/// # Errors
///
/// - [`Error::EmptyInput`] if the text has no non-blank line
/// - [`Error::MissingTableHeader`] if no line contains [`TABLE_HEADER_MARKER`]
/// - [`Error::NoValidFrames`] if no row has at least [`MIN_ROW_FIELDS`] fields
pub fn extract(
    raw: &str,
    file_name: Option<&str>,
    app_name_override: Option<&str>,
) -> Result<ParsedDump> {
    let file_name = file_name.unwrap_or(UNNAMED_FILE).to_string();
    let lines: Vec<&str> = raw
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();

    let first = lines.first().ok_or(Error::EmptyInput)?;

    let header = parse_header(first).unwrap_or_else(|| {
        warn!(
            "{}: refresh header not recognised, assuming 60 Hz: {:?}",
            file_name, first
        );
        SessionHeader::default()
    });

    let header_index = lines
        .iter()
        .position(|l| l.contains(TABLE_HEADER_MARKER))
        .ok_or_else(|| Error::missing_table_header(TABLE_HEADER_MARKER))?;

    let (table, trailing) = split_trailing_metadata(&lines[header_index + 1..]);

    let frames: Vec<FrameRecord> = table.iter().filter_map(|line| parse_row(line)).collect();
    if frames.is_empty() {
        return Err(Error::no_valid_frames(file_name));
    }

    let package_name = resolve_package_name(&trailing, &frames);
    let app_name = resolve_app_name(app_name_override, &trailing, &package_name);

    debug!(
        "{}: {} frames, package={}, app={}, buckets={}",
        file_name,
        frames.len(),
        package_name,
        app_name,
        trailing.fps_buckets.is_some()
    );

    Ok(ParsedDump {
        file_name,
        header,
        frames,
        package_name,
        app_name,
        device_info: trailing.device_info,
        fps_buckets: trailing.fps_buckets,
    })
}

/// Parse one frame row. Rows with too few fields are dropped.
///
/// Column 1 ("Presentation Time" in the header) holds the scheduled vsync
/// time and column 3 ("Vsync Time") holds the actual presentation time; the
/// record fields are named for what the values are.
pub fn parse_row(line: &str) -> Option<FrameRecord> {
    let fields: Vec<&str> = line.split(',').map(str::trim).collect();
    if fields.len() < MIN_ROW_FIELDS {
        return None;
    }

    Some(FrameRecord {
        test_id: fields[0].to_string(),
        vsync_time: parse_timestamp(fields[1]),
        fence_time: parse_timestamp(fields[2]),
        presentation_time: parse_timestamp(fields[3]),
        delta_time_ms: parse_float(fields[4]),
        instant_fps: parse_float(fields[5]),
        latency_ms: fields.get(6).and_then(|f| parse_float(f)).unwrap_or(0.0),
    })
}

/// Separate the trailing metadata row (if any) from the frame rows.
fn split_trailing_metadata<'a>(rows: &'a [&'a str]) -> (&'a [&'a str], TrailingMetadata) {
    match rows.split_last() {
        Some((last, rest)) if is_metadata_line(last) => {
            (rest, parse_trailing_line(last).unwrap_or_default())
        }
        _ => (rows, TrailingMetadata::default()),
    }
}

/// App name resolution order: user override, CSV field, blob `appName`,
/// package-derived name, [`UNKNOWN_APP`].
pub fn resolve_app_name(
    app_name_override: Option<&str>,
    trailing: &TrailingMetadata,
    package_name: &str,
) -> String {
    if let Some(name) = app_name_override.map(str::trim).filter(|n| !n.is_empty()) {
        return name.to_string();
    }
    if let Some(name) = trailing.app_name.as_deref() {
        return name.to_string();
    }
    if let Some(name) = trailing.blob_app_name() {
        return name.to_string();
    }
    if package_name != UNKNOWN_PACKAGE {
        return app_name_from_package(package_name);
    }
    UNKNOWN_APP.to_string()
}

/// Package name resolution order: CSV field, package-like prefix of the first
/// row's test id, [`UNKNOWN_PACKAGE`].
fn resolve_package_name(trailing: &TrailingMetadata, frames: &[FrameRecord]) -> String {
    trailing
        .package_name
        .clone()
        .or_else(|| frames.first().and_then(|f| package_from_test_id(&f.test_id)))
        .unwrap_or_else(|| UNKNOWN_PACKAGE.to_string())
}

/// Integer nanosecond timestamp; fractional input is truncated.
fn parse_timestamp(raw: &str) -> Option<i64> {
    if let Ok(v) = raw.parse::<i64>() {
        return Some(v);
    }
    raw.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .map(|v| v.trunc() as i64)
}

fn parse_float(raw: &str) -> Option<f64> {
    raw.parse::<f64>().ok().filter(|v| v.is_finite())
}
