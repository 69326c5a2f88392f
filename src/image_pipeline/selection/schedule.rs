use chrono::{Datelike, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Inclusive time-of-day interval, `(hour, minute)` bounds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start: (u32, u32),
    pub end: (u32, u32),
}

impl TimeWindow {
    pub const fn new(start: (u32, u32), end: (u32, u32)) -> Self {
        Self { start, end }
    }

    /// False for a window whose bounds are not valid times.
    pub fn contains(&self, time: NaiveTime) -> bool {
        match (
            NaiveTime::from_hms_opt(self.start.0, self.start.1, 0),
            NaiveTime::from_hms_opt(self.end.0, self.end.1, 0),
        ) {
            (Some(start), Some(end)) => start <= time && time <= end,
            _ => false,
        }
    }
}

/// Windows applying to a set of calendar months (1 = January).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleRule {
    pub months: Vec<u32>,
    pub windows: Vec<TimeWindow>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IlluminationSchedule {
    pub rules: Vec<ScheduleRule>,
}

impl Default for IlluminationSchedule {
    /// Longer windows around the summer months, narrower ones in winter when
    /// the sun stays low.
    fn default() -> Self {
        Self {
            rules: vec![
                ScheduleRule {
                    months: vec![4, 5, 8, 9],
                    windows: vec![TimeWindow::new((7, 0), (12, 0)), TimeWindow::new((12, 0), (18, 0))],
                },
                ScheduleRule {
                    months: vec![6, 7],
                    windows: vec![TimeWindow::new((6, 0), (12, 0)), TimeWindow::new((12, 0), (19, 0))],
                },
                ScheduleRule {
                    months: vec![10, 11, 12, 1, 2, 3],
                    windows: vec![TimeWindow::new((8, 0), (17, 0)), TimeWindow::new((9, 0), (16, 0))],
                },
            ],
        }
    }
}

impl IlluminationSchedule {
    pub fn accepts(&self, timestamp: &NaiveDateTime) -> bool {
        let month = timestamp.month();
        self.rules
            .iter()
            .filter(|rule| rule.months.contains(&month))
            .flat_map(|rule| rule.windows.iter())
            .any(|window| window.contains(timestamp.time()))
    }

    /// Keeps rows taken inside a window, in chronological order, without exact duplicates.
    pub fn screen<T, F>(&self, rows: &[T], timestamp_of: F) -> Vec<T>
    where
        T: Clone + Ord,
        F: Fn(&T) -> NaiveDateTime,
    {
        let mut kept: Vec<T> = rows
            .iter()
            .filter(|row| self.accepts(&timestamp_of(row)))
            .cloned()
            .collect();
        kept.sort_by(|a, b| timestamp_of(a).cmp(&timestamp_of(b)).then_with(|| a.cmp(b)));
        kept.dedup();

        debug!(input = rows.len(), kept = kept.len(), "Illumination screen applied");
        kept
    }
}
