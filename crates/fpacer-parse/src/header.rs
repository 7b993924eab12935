//! Refresh-period header line parsing.

use regex::Regex;
use std::sync::LazyLock;

use fpacer_core::SessionHeader;

/// Matches the first dump line: `Refresh Period: 16666666 ns (60.00 Hz)`
/// Captures: 1=period_ns, 2=rate_hz
pub static REFRESH_HEADER_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Refresh Period:\s*(\d+)\s*ns\s*\(\s*(\d+(?:\.\d+)?)\s*Hz\s*\)")
        .expect("Invalid REFRESH_HEADER_REGEX")
});

/// Parse the refresh header. Returns `None` when the line does not match.
pub fn parse_header(line: &str) -> Option<SessionHeader> {
    let caps = REFRESH_HEADER_REGEX.captures(line)?;
    let refresh_period_ns = caps.get(1)?.as_str().parse().ok()?;
    let refresh_rate_hz = caps.get(2)?.as_str().parse().ok()?;
    Some(SessionHeader {
        refresh_period_ns,
        refresh_rate_hz,
    })
}
