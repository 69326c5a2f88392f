//! Large canopy gap detection
//!
//! Binarises the frame at the classification threshold, groups sky pixels
//! into 8-connected regions and keeps only the regions above an area limit.

mod labeling;
pub mod mask;

#[cfg(test)]
mod tests;

pub use labeling::{label_regions, RegionLabels, NEIGHBORHOOD};
pub use mask::{BinaryMask, CANOPY, LARGE_GAP, SKY};

use serde::Serialize;
use tracing::debug;

use crate::image_pipeline::source::CanopyImage;

/// Gap statistics of one binarised frame.
#[derive(Debug, Clone, PartialEq)]
pub struct GapAnalysis {
    /// Canopy (0) / sky (1) classification
    pub mask: BinaryMask,
    /// Copy of `mask` with every large gap filled with [`LARGE_GAP`]
    pub large_gap_mask: BinaryMask,
    pub stats: GapStats,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GapStats {
    pub total_pixels: usize,
    pub sky_pixels: usize,
    pub large_gap_pixels: usize,
    /// Number of sky regions above the area limit
    pub large_gap_count: usize,
    /// GF, sky pixels over all pixels, taken from the unfiltered mask
    pub gap_fraction: f64,
    /// CC, one minus the large gap fraction
    pub crown_cover: f64,
    /// Smallest large gap as a percentage of the frame, or `None` when there are none
    pub min_large_gap_pct: Option<f64>,
}

/// Pixel count of the large-gap regions found at `min_area`, without building the masks.
pub fn large_gap_pixels(labels: &RegionLabels, min_area: usize) -> usize {
    labels.areas().iter().filter(|&&a| a > min_area).sum()
}

pub fn detect_gaps(image: &CanopyImage, threshold: i32, min_area: usize) -> GapAnalysis {
    let mask = BinaryMask::from_threshold(image, threshold);
    let labels = label_regions(&mask);

    let large: Vec<bool> = labels.areas().iter().map(|&a| a > min_area).collect();
    let mut large_gap_mask = mask.clone();
    for (value, label) in large_gap_mask.data_mut().iter_mut().zip(labels.labels()) {
        if let Some(region) = label {
            if large[*region as usize] {
                *value = LARGE_GAP;
            }
        }
    }

    let total_pixels = image.pixel_count();
    let sky_pixels = mask.count(SKY);
    let large_gap_pixels = large_gap_mask.count(LARGE_GAP);
    let min_large_gap = labels.areas().iter().copied().filter(|&a| a > min_area).min();

    let stats = GapStats {
        total_pixels,
        sky_pixels,
        large_gap_pixels,
        large_gap_count: large.iter().filter(|&&l| l).count(),
        gap_fraction: sky_pixels as f64 / total_pixels as f64,
        crown_cover: 1.0 - large_gap_pixels as f64 / total_pixels as f64,
        min_large_gap_pct: min_large_gap.map(|a| a as f64 / total_pixels as f64 * 100.0),
    };

    debug!(
        regions = labels.region_count(),
        large_gaps = stats.large_gap_count,
        large_gap_pixels,
        sky_pixels,
        gap_fraction = stats.gap_fraction,
        crown_cover = stats.crown_cover,
        "Gap analysis complete"
    );

    GapAnalysis {
        mask,
        large_gap_mask,
        stats,
    }
}
