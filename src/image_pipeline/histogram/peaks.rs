use serde::Serialize;
use tracing::debug;

use crate::image_pipeline::config::PaiConfig;
use crate::image_pipeline::histogram::types::BlueHistogram;

/// Direction in which the search cursor walks the histogram.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanDirection {
    /// Starts at `left_bin_skip` and moves right; finds the canopy mode.
    FromLeft,
    /// Starts at `right_bin_skip` and moves left; finds the sky mode.
    FromRight,
}

impl ScanDirection {
    /// The window maximum must not sit on the edge the cursor is moving towards
    /// (last bin when scanning right, first bin when scanning left).
    fn accepts_position(self, offset: usize, window_len: usize) -> bool {
        match self {
            ScanDirection::FromLeft => offset + 1 != window_len,
            ScanDirection::FromRight => offset != 0,
        }
    }
}

/// Result of one directional search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SidePeak {
    /// Bin index of the accepted maximum, or of the last candidate when not found
    pub bin: usize,
    pub count: u64,
    pub found: bool,
}

/// Canopy (left) and sky (right) modes of a histogram.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PeakSearch {
    pub left: SidePeak,
    pub right: SidePeak,
}

impl PeakSearch {
    pub fn both_found(&self) -> bool {
        self.left.found && self.right.found
    }
}

/// Slides a `stride`-bin window from one skip bound towards the other and
/// returns the first window maximum that is accepted for `direction` and
/// whose count exceeds `min_count`.
///
/// Stops unsuccessfully once the cursor reaches the opposite bound.
pub fn search_peak(
    counts: &[u64],
    min_count: f64,
    left_bound: usize,
    right_bound: usize,
    stride: usize,
    direction: ScanDirection,
) -> SidePeak {
    let stride = stride.max(1);
    let mut last = SidePeak {
        bin: match direction {
            ScanDirection::FromLeft => left_bound,
            ScanDirection::FromRight => right_bound,
        },
        count: 0,
        found: false,
    };

    let mut step = match direction {
        ScanDirection::FromLeft => 0,
        ScanDirection::FromRight => 1,
    };

    loop {
        let start = match direction {
            ScanDirection::FromLeft => {
                let start = left_bound + stride * step;
                if start >= right_bound {
                    break;
                }
                start
            }
            ScanDirection::FromRight => match right_bound.checked_sub(stride * step) {
                Some(start) if start > left_bound => start,
                _ => break,
            },
        };
        step += 1;

        let end = (start + stride).min(counts.len());
        if start >= end {
            continue;
        }
        let window = &counts[start..end];

        // first maximum, like argmax
        let (offset, &count) = window
            .iter()
            .enumerate()
            .fold((0, &window[0]), |best, cur| if cur.1 > best.1 { cur } else { best });

        last = SidePeak {
            bin: start + offset,
            count,
            found: false,
        };

        if direction.accepts_position(offset, window.len()) && count as f64 > min_count {
            last.found = true;
            break;
        }
    }

    last
}

/// Locates both modes of `histogram` using the search bounds in `config`.
pub fn find_peaks(histogram: &BlueHistogram, config: &PaiConfig) -> PeakSearch {
    let min_count = histogram.median_count() * config.peak_median_multiplier;
    let counts = histogram.counts();

    let left = search_peak(
        counts,
        min_count,
        config.left_bin_skip,
        config.right_bin_skip,
        config.window_stride,
        ScanDirection::FromLeft,
    );
    let right = search_peak(
        counts,
        min_count,
        config.left_bin_skip,
        config.right_bin_skip,
        config.window_stride,
        ScanDirection::FromRight,
    );

    debug!(
        left_bin = left.bin,
        left_count = left.count,
        left_found = left.found,
        right_bin = right.bin,
        right_count = right.count,
        right_found = right.found,
        "Histogram peak search complete"
    );

    PeakSearch { left, right }
}
