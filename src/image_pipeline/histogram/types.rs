use serde::Serialize;

use crate::image_pipeline::config::INTENSITY_LEVELS;
use crate::image_pipeline::source::{CanopyImage, Channel};

/// Binned counts of the blue channel of one image.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlueHistogram {
    bin_width: u32,
    counts: Vec<u64>,
}

impl BlueHistogram {
    /// Builds the histogram with `ceil(256 / bin_width)` bins.
    pub fn from_image(image: &CanopyImage, bin_width: u32) -> Self {
        let bin_width = bin_width.max(1);
        let mut counts = vec![0u64; INTENSITY_LEVELS.div_ceil(bin_width) as usize];
        for value in image.channel(Channel::Blue) {
            counts[(value as u32 / bin_width) as usize] += 1;
        }
        Self { bin_width, counts }
    }

    pub fn from_counts(counts: Vec<u64>, bin_width: u32) -> Self {
        Self {
            bin_width: bin_width.max(1),
            counts,
        }
    }

    pub fn bin_width(&self) -> u32 {
        self.bin_width
    }

    pub fn counts(&self) -> &[u64] {
        &self.counts
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.iter().all(|&c| c == 0)
    }

    pub fn count(&self, bin: usize) -> u64 {
        self.counts.get(bin).copied().unwrap_or(0)
    }

    /// Lower DN edge of `bin`.
    pub fn edge(&self, bin: usize) -> u32 {
        bin as u32 * self.bin_width
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    pub fn max_count(&self) -> u64 {
        self.counts.iter().copied().max().unwrap_or(0)
    }

    /// Median of the bin counts (mean of the middle pair for an even number of bins).
    pub fn median_count(&self) -> f64 {
        if self.counts.is_empty() {
            return 0.0;
        }
        let mut sorted = self.counts.clone();
        sorted.sort_unstable();
        let mid = sorted.len() / 2;
        if sorted.len() % 2 == 0 {
            (sorted[mid - 1] as f64 + sorted[mid] as f64) / 2.0
        } else {
            sorted[mid] as f64
        }
    }

    pub fn first_nonempty(&self) -> Option<usize> {
        self.counts.iter().position(|&c| c > 0)
    }

    pub fn last_nonempty(&self) -> Option<usize> {
        self.counts.iter().rposition(|&c| c > 0)
    }
}
