//! Clear/cloudy sky classification and the canopy/sky threshold

use serde::Serialize;
use tracing::debug;

use crate::image_pipeline::config::PaiConfig;
use crate::image_pipeline::histogram::BlueHistogram;
use crate::image_pipeline::rosin::RosinCut;
use crate::image_pipeline::source::CanopyImage;


/// Outcome of the sky check for one image.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SkyClassification {
    /// DN above which pixels are taken as certain sky for the sky index
    pub strict_threshold: i32,
    /// Blue sky index, ΣB / (ΣR + ΣG) over the strict sky pixels
    pub sky_index: f64,
    pub is_cloudy: bool,
    /// Canopy/sky weight actually applied
    pub weight: f64,
    /// Final binarisation DN (TM); pixels with blue >= TM are sky
    pub threshold: i32,
}

/// Interpolates between the right cut (low DN) and the left cut edge.
pub fn weighted_threshold(left_cut_edge: u32, right_cut_edge: u32, weight: f64) -> i32 {
    let span = left_cut_edge as f64 - right_cut_edge as f64;
    right_cut_edge as i32 + (span * weight).round() as i32
}

/// Blue sky index over pixels whose blue value is at least `strict_threshold`.
///
/// Returns 0.0 when no pixel qualifies.
pub fn blue_sky_index(image: &CanopyImage, strict_threshold: i32) -> f64 {
    let (mut red, mut green, mut blue) = (0u64, 0u64, 0u64);
    let mut candidates = 0usize;
    for [r, g, b] in image.pixels() {
        if b as i32 >= strict_threshold {
            red += r as u64;
            green += g as u64;
            blue += b as u64;
            candidates += 1;
        }
    }
    if candidates == 0 {
        return 0.0;
    }
    if red + green == 0 {
        return f64::INFINITY;
    }
    blue as f64 / (red + green) as f64
}

pub fn classify_sky(
    image: &CanopyImage,
    histogram: &BlueHistogram,
    cut: &RosinCut,
    config: &PaiConfig,
) -> SkyClassification {
    let left_edge = histogram.edge(cut.left_cut_bin);
    let right_edge = histogram.edge(cut.right_cut_bin);

    let strict_threshold = weighted_threshold(left_edge, right_edge, config.sky_strict_weight);
    let sky_index = blue_sky_index(image, strict_threshold);
    let is_cloudy = sky_index < config.cloud_index_threshold;
    let weight = if is_cloudy {
        config.cloudy_sky_weight
    } else {
        config.clear_sky_weight
    };
    let threshold = weighted_threshold(left_edge, right_edge, weight);

    debug!(
        sky_index,
        cloud_index_threshold = config.cloud_index_threshold,
        is_cloudy,
        threshold,
        "Sky classified"
    );

    SkyClassification {
        strict_threshold,
        sky_index,
        is_cloudy,
        weight,
        threshold,
    }
}
