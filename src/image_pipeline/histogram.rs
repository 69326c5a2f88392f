//! Blue-channel histogram analysis
//!
//! Builds the binned histogram of a canopy frame and locates the dark
//! (canopy) and bright (sky) modes with a bounded windowed search.

mod peaks;
pub mod types;


pub use peaks::{find_peaks, search_peak, PeakSearch, ScanDirection, SidePeak};
pub use types::BlueHistogram;
