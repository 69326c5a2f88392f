use chrono::{DateTime, NaiveDateTime};

use crate::image_pipeline::common::error::{PaiError, Result};

/// Layouts accepted for the capture time column, tried in order.
///
/// `%.f` also matches a missing fraction.
pub const TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    // EXIF DateTimeDigitized
    "%Y:%m:%d %H:%M:%S",
];

/// Same layouts with a UTC offset; the wall-clock time is kept.
const OFFSET_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S%.f%:z", "%Y-%m-%dT%H:%M:%S%.f%:z"];

/// Parses the capture time of a photograph as local wall-clock time.
pub fn parse_timestamp(text: &str) -> Result<NaiveDateTime> {
    let trimmed = text.trim();
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(trimmed, format).ok())
        .or_else(|| {
            OFFSET_FORMATS
                .iter()
                .find_map(|format| DateTime::parse_from_str(trimmed, format).ok())
                .map(|stamp| stamp.naive_local())
        })
        .ok_or_else(|| PaiError::InvalidTimestamp(text.to_string()))
}
