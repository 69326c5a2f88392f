//! Analysis result types

use serde::Serialize;

use crate::image_pipeline::gaps::GapAnalysis;
use crate::image_pipeline::histogram::{BlueHistogram, PeakSearch};
use crate::image_pipeline::rosin::RosinCut;
use crate::image_pipeline::sky::SkyClassification;

/// Terminal state reached by one image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageState {
    /// PAI computed
    PaiComputed,
    /// Classified, but crown porosity was not positive
    PaiFailed,
    /// The peak search did not find both modes
    Unimodal,
    /// Both modes found but no Rosin cut is possible between them
    Degenerate,
    /// The image could not be read, decoded or cropped
    LoadFailed,
}

impl ImageState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageState::PaiComputed => "ok",
            ImageState::PaiFailed => "invalid_porosity",
            ImageState::Unimodal => "unimodal",
            ImageState::Degenerate => "degenerate_histogram",
            ImageState::LoadFailed => "load_failed",
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ImageState::PaiComputed)
    }
}

impl std::fmt::Display for ImageState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything computed for one image. Stages after the first failure are `None`.
#[derive(Debug, Clone)]
pub struct ImageAnalysis {
    pub histogram: BlueHistogram,
    pub peaks: PeakSearch,
    pub rosin: Option<RosinCut>,
    pub sky: Option<SkyClassification>,
    pub gaps: Option<GapAnalysis>,
    /// Also set when PAI failed, so the offending value can be reported
    pub crown_porosity: Option<f64>,
    pub pai: Option<f64>,
    pub state: ImageState,
}

impl ImageAnalysis {
    pub(crate) fn unclassified(histogram: BlueHistogram, peaks: PeakSearch, state: ImageState) -> Self {
        Self {
            histogram,
            peaks,
            rosin: None,
            sky: None,
            gaps: None,
            crown_porosity: None,
            pai: None,
            state,
        }
    }
}
