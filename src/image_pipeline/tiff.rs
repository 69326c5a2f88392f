//! TIFF writing module
//!
//! Writes classification masks as 8-bit greyscale TIFF diagnostics.

mod writer;
mod standard_tiff_writer;
pub mod types;

#[cfg(test)]
mod tests;

pub use writer::MaskWriter;
pub use standard_tiff_writer::TiffMaskWriter;
pub use types::{TiffCompression, MaskExportConfig, MaskExportConfigBuilder};
