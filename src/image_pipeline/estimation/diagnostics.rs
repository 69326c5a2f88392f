use std::path::Path;

use serde::Serialize;

use crate::image_pipeline::estimation::types::{ImageAnalysis, ImageState};
use crate::image_pipeline::gaps::GapStats;
use crate::image_pipeline::histogram::PeakSearch;
use crate::image_pipeline::rosin::RosinCut;
use crate::image_pipeline::sky::SkyClassification;

/// `hist_<camera>_<file stem>`, the prefix of every diagnostic file for one image.
pub fn diagnostic_stem(camera: &str, filename: &str) -> String {
    let stem = Path::new(filename)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| filename.to_string());
    format!("hist_{camera}_{stem}")
}

/// Histogram, fitted lines and thresholds of one image, written as JSON
/// so the classification can be plotted and inspected later.
#[derive(Debug, Serialize)]
pub struct HistogramSidecar<'a> {
    pub camera: &'a str,
    pub filename: &'a str,
    pub state: ImageState,
    pub bin_width: u32,
    pub edges: Vec<u32>,
    pub counts: &'a [u64],
    /// Tallest bin, for scaling plots
    pub max_count: u64,
    pub peaks: &'a PeakSearch,
    pub rosin: Option<&'a RosinCut>,
    pub rosin_left_edge: Option<u32>,
    pub rosin_right_edge: Option<u32>,
    pub sky: Option<&'a SkyClassification>,
    pub gaps: Option<&'a GapStats>,
    pub crown_porosity: Option<f64>,
    pub pai: Option<f64>,
}

impl<'a> HistogramSidecar<'a> {
    pub fn new(camera: &'a str, filename: &'a str, analysis: &'a ImageAnalysis) -> Self {
        let histogram = &analysis.histogram;
        Self {
            camera,
            filename,
            state: analysis.state,
            bin_width: histogram.bin_width(),
            edges: (0..histogram.len()).map(|bin| histogram.edge(bin)).collect(),
            counts: histogram.counts(),
            max_count: histogram.max_count(),
            peaks: &analysis.peaks,
            rosin: analysis.rosin.as_ref(),
            rosin_left_edge: analysis.rosin.map(|c| histogram.edge(c.left_cut_bin)),
            rosin_right_edge: analysis.rosin.map(|c| histogram.edge(c.right_cut_bin)),
            sky: analysis.sky.as_ref(),
            gaps: analysis.gaps.as_ref().map(|g| &g.stats),
            // JSON has no NaN, keep only finite values
            crown_porosity: analysis.crown_porosity.filter(|v| v.is_finite()),
            pai: analysis.pai,
        }
    }
}
