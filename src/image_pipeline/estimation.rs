//! Per-image canopy analysis
//!
//! Orchestrates histogram, Rosin, sky, gap and PAI stages for one
//! photograph and records which terminal state it reached.

mod canopy_to_pai;
mod diagnostics;
pub mod types;


pub use canopy_to_pai::CanopyPaiPipeline;
pub use diagnostics::{diagnostic_stem, HistogramSidecar};
pub use types::{ImageAnalysis, ImageState};
