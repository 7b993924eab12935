//! Trailing metadata row: CSV identity fields, optional FPS histogram, and
//! the device property blob.
//!
//! ```text
//! <testId>,<unused>,<package>,<appName or bucket fields...>,{"key":"value",...}
//! ```

use fpacer_core::prelude::*;
use fpacer_core::{DeviceMetadata, FpsBuckets, FPS_BUCKET_COUNT};

use crate::app_names::{is_plain_package, UNKNOWN_APP};
use crate::lenient_json;

/// Minimum number of CSV fields before the blob for a histogram to be present.
pub const MIN_BUCKET_FIELDS: usize = 24;

/// Offset of the first histogram field.
const BUCKET_OFFSET: usize = 3;

/// Histogram buckets plus seven summary fields.
const BUCKET_FIELD_COUNT: usize = FPS_BUCKET_COUNT + 7;

/// Parsed trailing metadata row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrailingMetadata {
    pub package_name: Option<String>,
    pub app_name: Option<String>,
    pub device_info: DeviceMetadata,
    pub fps_buckets: Option<FpsBuckets>,
}

impl TrailingMetadata {
    /// The `appName` property from the device blob, if set.
    pub fn blob_app_name(&self) -> Option<&str> {
        self.device_info
            .get(DeviceMetadata::APP_NAME)
            .map(str::trim)
            .filter(|name| is_usable_app_name(name))
    }
}

/// Whether a line carries a metadata blob (contains both `{` and `}`).
pub fn is_metadata_line(line: &str) -> bool {
    line.contains('{') && line.contains('}')
}

/// Parse the trailing metadata row.
///
/// Returns `None` if the line has no blob. Blob and histogram failures are
/// logged and leave the corresponding fields empty.
pub fn parse_trailing_line(line: &str) -> Option<TrailingMetadata> {
    let open = line.find('{')?;
    let close = line.rfind('}')?;
    if close < open {
        return None;
    }

    let fields: Vec<&str> = line[..open].split(',').map(clean_field).collect();

    let device_info = match lenient_json::parse_object(&line[open..=close]) {
        Some(map) => DeviceMetadata::new(map),
        None => {
            warn!("Could not parse device metadata blob, continuing without it");
            DeviceMetadata::default()
        }
    };

    let fps_buckets = if fields.len() >= MIN_BUCKET_FIELDS {
        let parsed = parse_buckets(&fields);
        if parsed.is_none() {
            warn!("FPS bucket fields present but unreadable, ignoring histogram");
        }
        parsed
    } else {
        debug!(
            "{} metadata fields, fewer than {} needed for FPS buckets",
            fields.len(),
            MIN_BUCKET_FIELDS
        );
        None
    };

    Some(TrailingMetadata {
        package_name: package_field(&fields),
        app_name: fields
            .get(3)
            .filter(|name| is_usable_app_name(name) && !is_numeric(name))
            .map(|name| name.to_string()),
        device_info,
        fps_buckets,
    })
}

/// Parse the fixed histogram slice. All-or-nothing: any structural problem
/// drops the whole record.
pub fn parse_buckets(fields: &[&str]) -> Option<FpsBuckets> {
    let slice = fields.get(BUCKET_OFFSET..BUCKET_OFFSET + BUCKET_FIELD_COUNT)?;
    let (counts, summary) = slice.split_at(FPS_BUCKET_COUNT);

    let mut buckets = [0u64; FPS_BUCKET_COUNT];
    for (slot, raw) in buckets.iter_mut().zip(counts) {
        *slot = coerce_int(raw);
    }

    Some(FpsBuckets {
        buckets,
        avg_fps: coerce_float(summary[0]),
        elapsed_time: coerce_float(summary[1]),
        total_frames: coerce_int(summary[2]),
        start_battery: coerce_float(summary[3]),
        end_battery: coerce_float(summary[4]),
        battery_drain: coerce_float(summary[5]),
        refresh_rate: coerce_float(summary[6]),
    })
}

/// Package from the 3rd field, or from the 1st when it is a bare package.
///
/// A test id in the 1st field is not a package; the caller falls back to the
/// prefix of the first frame's test id instead.
fn package_field(fields: &[&str]) -> Option<String> {
    let third = fields.get(2).filter(|f| !f.is_empty() && !is_numeric(f));
    let first = fields.first().filter(|f| is_plain_package(f));
    third.or(first).map(|f| f.to_string())
}

fn is_usable_app_name(name: &str) -> bool {
    !name.is_empty() && name != UNKNOWN_APP
}

fn clean_field(raw: &str) -> &str {
    raw.trim().trim_matches('"').trim()
}

fn is_numeric(s: &str) -> bool {
    s.parse::<f64>().is_ok()
}

/// Integer coercion with `0` fallback; fractional input is truncated.
fn coerce_int(raw: &str) -> u64 {
    let raw = raw.trim();
    if let Ok(v) = raw.parse::<u64>() {
        return v;
    }
    match raw.parse::<f64>() {
        Ok(v) if v.is_finite() && v >= 0.0 => v.trunc() as u64,
        _ => 0,
    }
}

/// Float coercion with `0.0` fallback.
fn coerce_float(raw: &str) -> f64 {
    match raw.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => v,
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bucket_line(blob: &str) -> String {
        let buckets = "0,0,1,0,2,0,0,3,0,5,10,40,300,12";
        let summary = "57.3,10.2,373,88,86,2,60.0";
        format!("run-7,x,com.example.racer,{buckets},{summary},{blob}")
    }

    #[test]
    fn test_no_blob_is_not_metadata() {
        assert!(!is_metadata_line("a,b,c,d,e,f"));
        assert!(parse_trailing_line("a,b,c,d,e,f").is_none());
    }

    #[test]
    fn test_package_from_first_field() {
        let meta = parse_trailing_line("com.netflix.mediaclient,,,{}").unwrap();
        assert_eq!(meta.package_name.as_deref(), Some("com.netflix.mediaclient"));
        assert_eq!(meta.app_name, None);
        assert!(meta.device_info.is_empty());
        assert!(meta.fps_buckets.is_none());
    }

    #[test]
    fn test_test_id_in_first_field_is_not_a_package() {
        let meta = parse_trailing_line("com.example.shooter.GameActivity#0,run-01,,{}").unwrap();
        assert_eq!(meta.package_name, None);

        let meta = parse_trailing_line("com.example/shooter.Main,run-01,,{}").unwrap();
        assert_eq!(meta.package_name, None);
    }

    #[test]
    fn test_package_and_app_name_fields() {
        let meta =
            parse_trailing_line(r#"run-1,0,com.example.racer,Turbo Racer,{"appName":"Racer"}"#)
                .unwrap();
        assert_eq!(meta.package_name.as_deref(), Some("com.example.racer"));
        assert_eq!(meta.app_name.as_deref(), Some("Turbo Racer"));
        assert_eq!(meta.blob_app_name(), Some("Racer"));
    }

    #[test]
    fn test_unknown_app_field_ignored() {
        let meta = parse_trailing_line("run-1,0,com.example.racer,Unknown App,{}").unwrap();
        assert_eq!(meta.app_name, None);
    }

    #[test]
    fn test_quoted_blob_and_fields() {
        let line = r#"run-1,0,"com.example.racer","{""ro.product.model"":""Pixel 7""}""#;
        let meta = parse_trailing_line(line).unwrap();
        assert_eq!(meta.package_name.as_deref(), Some("com.example.racer"));
        assert_eq!(meta.device_info.model(), Some("Pixel 7"));
    }

    #[test]
    fn test_bad_blob_is_recoverable() {
        let meta = parse_trailing_line("run-1,0,com.example.racer,{oops}").unwrap();
        assert!(meta.device_info.is_empty());
        assert_eq!(meta.package_name.as_deref(), Some("com.example.racer"));
    }

    #[test]
    fn test_buckets_parsed() {
        let meta = parse_trailing_line(&bucket_line("{}")).unwrap();
        let buckets = meta.fps_buckets.expect("buckets");
        assert_eq!(buckets.buckets[12], 300);
        assert_eq!(buckets.buckets[13], 12);
        assert_eq!(buckets.avg_fps, 57.3);
        assert_eq!(buckets.total_frames, 373);
        assert_eq!(buckets.battery_drain, 2.0);
        assert_eq!(buckets.refresh_rate, 60.0);
        // Bucket fields occupy the app-name slot.
        assert_eq!(meta.app_name, None);
    }

    #[test]
    fn test_bucket_fields_coerce_to_zero() {
        let fields: Vec<&str> = "a,b,c,x,1.9,,3,4,5,6,7,8,9,10,11,12,13,n/a,2,3,4,5,6,7"
            .split(',')
            .collect();
        let buckets = parse_buckets(&fields).unwrap();
        assert_eq!(buckets.buckets[0], 0);
        assert_eq!(buckets.buckets[1], 1);
        assert_eq!(buckets.buckets[2], 0);
        assert_eq!(buckets.avg_fps, 0.0);
    }

    #[test]
    fn test_too_few_fields_no_buckets() {
        let fields: Vec<&str> = "a,b,c,1,2".split(',').collect();
        assert!(parse_buckets(&fields).is_none());
    }
}
