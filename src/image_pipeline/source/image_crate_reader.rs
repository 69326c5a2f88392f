//! Image reader implementation using the image library.
//!
//! Any format the image library can decode (JPEG, PNG, TIFF) is accepted.
//! Higher bit depths and alpha channels are reduced to 8-bit RGB.

use tracing::debug;

use crate::image_pipeline::common::error::{PaiError, Result};
use crate::image_pipeline::source::reader::CanopyImageReader;
use crate::image_pipeline::source::types::CanopyImage;

pub struct ImageCrateReader;

impl CanopyImageReader for ImageCrateReader {
    fn read_image(&self, data: &[u8]) -> Result<CanopyImage> {
        debug!("Decoding canopy image, {} bytes", data.len());

        let decoded = image::load_from_memory(data).map_err(|e| PaiError::Decode(e.to_string()))?;
        let rgb = decoded.to_rgb8();
        let (width, height) = rgb.dimensions();

        debug!("Decoded image: {}x{}", width, height);

        CanopyImage::new(width as usize, height as usize, rgb.into_raw())
    }
}
