//! Lenient parsing of the device metadata blob.
//!
//! Capture tools write the blob as a CSV cell, so it often arrives wrapped in
//! one layer of quotes with every inner quote doubled:
//!
//! ```text
//! "{""ro.product.model"":""Pixel 7"",""ro.soc.model"":""""}"
//! ```
//!
//! [`parse_object`] first tries the text as-is. Only if that fails does it
//! strip the wrapping quotes and collapse each run of doubled quotes, which
//! turns `""""` (an escaped empty string) into `""` and `""` into `"`.

use std::collections::BTreeMap;

use serde_json::Value;

/// Parse a JSON object into string key/value pairs, repairing CSV quote
/// escaping if needed.
///
/// Non-string values are kept in their JSON text form and `null` becomes an
/// empty string. Returns `None` if the text is not an object even after
/// repair.
pub fn parse_object(raw: &str) -> Option<BTreeMap<String, String>> {
    let trimmed = raw.trim();
    if let Some(map) = parse_strict(trimmed) {
        return Some(map);
    }
    parse_strict(&repair(trimmed))
}

/// Undo one level of CSV quoting.
pub fn repair(raw: &str) -> String {
    let unwrapped = strip_wrapping_quotes(raw.trim());
    collapse_doubled_quotes(unwrapped)
}

fn strip_wrapping_quotes(s: &str) -> &str {
    if s.len() >= 2 && s.starts_with('"') && s.ends_with('"') {
        &s[1..s.len() - 1]
    } else {
        s
    }
}

/// Halve every run of consecutive quotes, rounding up so a stray single
/// quote survives.
fn collapse_doubled_quotes(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut run = 0usize;
    for ch in s.chars() {
        if ch == '"' {
            run += 1;
            continue;
        }
        flush_quotes(&mut out, run);
        run = 0;
        out.push(ch);
    }
    flush_quotes(&mut out, run);
    out
}

fn flush_quotes(out: &mut String, run: usize) {
    for _ in 0..run.div_ceil(2) {
        out.push('"');
    }
}

fn parse_strict(s: &str) -> Option<BTreeMap<String, String>> {
    match serde_json::from_str::<Value>(s).ok()? {
        Value::Object(map) => Some(
            map.into_iter()
                .map(|(k, v)| (k, value_to_string(v)))
                .collect(),
        ),
        _ => None,
    }
}

fn value_to_string(value: Value) -> String {
    match value {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_json_parses_unchanged() {
        let map = parse_object(r#"{"ro.product.model":"Pixel 7","appName":""}"#).unwrap();
        assert_eq!(map["ro.product.model"], "Pixel 7");
        // A legitimate empty string must not be mangled by the repair pass.
        assert_eq!(map["appName"], "");
    }

    #[test]
    fn test_csv_doubled_quotes() {
        let map = parse_object(r#"{""ro.product.manufacturer"":""Google""}"#).unwrap();
        assert_eq!(map["ro.product.manufacturer"], "Google");
    }

    #[test]
    fn test_wrapping_quotes_stripped() {
        let map = parse_object(r#""{""ro.product.model"":""SM-G991B""}""#).unwrap();
        assert_eq!(map["ro.product.model"], "SM-G991B");
    }

    #[test]
    fn test_escaped_empty_string() {
        let map = parse_object(r#"{""ro.soc.model"":"""",""MemTotal"":""7812344""}"#).unwrap();
        assert_eq!(map["ro.soc.model"], "");
        assert_eq!(map["MemTotal"], "7812344");
    }

    #[test]
    fn test_non_string_values_stringified() {
        let map = parse_object(r#"{"cores":8,"debuggable":false,"extra":null}"#).unwrap();
        assert_eq!(map["cores"], "8");
        assert_eq!(map["debuggable"], "false");
        assert_eq!(map["extra"], "");
    }

    #[test]
    fn test_empty_object() {
        let map = parse_object("{}").unwrap();
        assert!(map.is_empty());
    }

    #[test]
    fn test_unrecoverable_input() {
        assert!(parse_object("{not json at all}").is_none());
        assert!(parse_object(r#"["a","b"]"#).is_none());
        assert!(parse_object("").is_none());
    }

    #[test]
    fn test_repair_rounds_odd_runs_up() {
        assert_eq!(repair(r#"{""a"":"""}"#), r#"{"a":""}"#);
        assert_eq!(repair(r#"a""b"#), r#"a"b"#);
    }
}
