//! Illumination screen
//!
//! Keeps only photographs taken in month-dependent time-of-day windows, so
//! that images compared across a season were shot under similar sun angles.

mod schedule;
mod timestamp;


pub use schedule::{IlluminationSchedule, ScheduleRule, TimeWindow};
pub use timestamp::{parse_timestamp, TIMESTAMP_FORMATS};
