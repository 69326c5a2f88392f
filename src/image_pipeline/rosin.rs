//! Rosin corner thresholding
//!
//! Fits a line from the histogram floor to the opposite mode and picks the
//! bin lying furthest below it. Applied once from each side of the histogram.

use serde::Serialize;
use tracing::debug;

use crate::image_pipeline::common::error::{PaiError, Result};
use crate::image_pipeline::histogram::{BlueHistogram, PeakSearch};

#[cfg(test)]
mod tests;

/// Straight line through two points in (DN, count) space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FloorLine {
    pub from: (f64, f64),
    pub to: (f64, f64),
}

impl FloorLine {
    pub fn length(&self) -> f64 {
        (self.to.0 - self.from.0).hypot(self.to.1 - self.from.1)
    }

    /// Signed perpendicular distance of `point`, positive for points below the line.
    ///
    /// Orientation-independent: lines running right-to-left are handled by
    /// flipping the sign of the cross product.
    pub fn distance(&self, point: (f64, f64)) -> f64 {
        let dx = self.to.0 - self.from.0;
        let dy = self.to.1 - self.from.1;
        let cross = dx * (self.from.1 - point.1) - dy * (self.from.0 - point.0);
        let signed = cross / self.length();
        if dx < 0.0 { -signed } else { signed }
    }
}

/// Bins chosen by the two Rosin fits.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RosinCut {
    /// Bin furthest below the line from the first non-empty bin to the sky peak
    pub left_cut_bin: usize,
    /// Bin furthest below the line from the last non-empty bin to the canopy peak
    pub right_cut_bin: usize,
    pub left_line: FloorLine,
    pub right_line: FloorLine,
}

fn furthest_below(histogram: &BlueHistogram, line: &FloorLine, bins: std::ops::Range<usize>) -> usize {
    let mut best_bin = bins.start;
    let mut best_distance = f64::NEG_INFINITY;
    for bin in bins {
        let point = (histogram.edge(bin) as f64, histogram.count(bin) as f64);
        let distance = line.distance(point);
        // strict comparison keeps the first maximum
        if distance > best_distance {
            best_distance = distance;
            best_bin = bin;
        }
    }
    best_bin
}

/// Runs the two-sided Rosin fit between the peaks found in `peaks`.
///
/// Fails with [`PaiError::DegenerateHistogram`] when the peaks are missing,
/// coincide, are inverted, or have no bin between them.
pub fn rosin_cut(histogram: &BlueHistogram, peaks: &PeakSearch) -> Result<RosinCut> {
    if !peaks.both_found() {
        return Err(PaiError::DegenerateHistogram("histogram is unimodal".to_string()));
    }
    let (left, right) = (peaks.left, peaks.right);
    if left.bin + 1 >= right.bin {
        return Err(PaiError::DegenerateHistogram(format!(
            "peaks at bins {} and {} leave no bin between them",
            left.bin, right.bin
        )));
    }

    let (first, last) = match (histogram.first_nonempty(), histogram.last_nonempty()) {
        (Some(first), Some(last)) => (first, last),
        _ => return Err(PaiError::DegenerateHistogram("histogram is empty".to_string())),
    };

    let left_line = FloorLine {
        from: (histogram.edge(first) as f64, 0.0),
        to: (histogram.edge(right.bin) as f64, right.count as f64),
    };
    let right_line = FloorLine {
        from: (histogram.edge(last) as f64, 0.0),
        to: (histogram.edge(left.bin) as f64, left.count as f64),
    };
    if left_line.length() == 0.0 || right_line.length() == 0.0 {
        return Err(PaiError::DegenerateHistogram("floor line has zero length".to_string()));
    }

    let between = (left.bin + 1)..right.bin;
    let left_cut_bin = furthest_below(histogram, &left_line, between.clone());
    let right_cut_bin = furthest_below(histogram, &right_line, between);

    debug!(
        left_cut = histogram.edge(left_cut_bin),
        right_cut = histogram.edge(right_cut_bin),
        "Rosin cuts found"
    );

    Ok(RosinCut {
        left_cut_bin,
        right_cut_bin,
        left_line,
        right_line,
    })
}
