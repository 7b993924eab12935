//! fpacer-parse - Timestamp dump parsing for Frame Pacer
//!
//! Turns the text of one rendering timestamp dump into a [`ParsedDump`]:
//! refresh header, frame rows, device metadata, optional FPS histogram, and
//! the resolved package and app names.

pub mod app_names;
pub mod extractor;
pub mod header;
pub mod lenient_json;
pub mod metadata;

pub use app_names::{app_name_from_package, package_from_test_id, UNKNOWN_APP, UNKNOWN_PACKAGE};
pub use extractor::{extract, parse_row, ParsedDump, MIN_ROW_FIELDS, TABLE_HEADER_MARKER};
pub use header::parse_header;
pub use metadata::{parse_trailing_line, TrailingMetadata};
