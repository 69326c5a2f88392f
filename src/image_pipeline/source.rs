//! Canopy photograph reading module
//!
//! Decodes upward-looking camera frames into 8-bit RGB rasters.

mod reader;
mod image_crate_reader;
pub mod types;

#[cfg(test)]
mod tests;

pub use reader::CanopyImageReader;
pub use image_crate_reader::ImageCrateReader;
pub use types::{CanopyImage, Channel};
