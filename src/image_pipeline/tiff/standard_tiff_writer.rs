use std::io::Write;
use tracing::debug;
use crate::image_pipeline::common::error::{Result, PaiError};
use crate::image_pipeline::gaps::{BinaryMask, CANOPY, LARGE_GAP, SKY};
use crate::image_pipeline::tiff::types::{MaskExportConfig, TiffCompression};
use crate::image_pipeline::tiff::writer::MaskWriter;

/// Grey level written for each mask value.
pub fn display_level(value: u8) -> u8 {
    match value {
        CANOPY => 0,
        SKY => 127,
        LARGE_GAP => 255,
        other => other,
    }
}

pub struct TiffMaskWriter;

impl MaskWriter for TiffMaskWriter {
    fn write_mask(&self, mask: &BinaryMask, output: &mut dyn Write, config: &MaskExportConfig) -> Result<()> {
        debug!("Encoding mask TIFF: {}x{}", mask.width, mask.height);

        let mut buffer = Vec::new();

        let compression = match config.compression {
            TiffCompression::None => tiff::encoder::Compression::Uncompressed,
            TiffCompression::Lzw => tiff::encoder::Compression::Lzw,
            TiffCompression::DeflateFast => tiff::encoder::Compression::Deflate(tiff::encoder::compression::DeflateLevel::Fast),
            TiffCompression::DeflateBalanced => tiff::encoder::Compression::Deflate(tiff::encoder::compression::DeflateLevel::Balanced),
            TiffCompression::DeflateBest => tiff::encoder::Compression::Deflate(tiff::encoder::compression::DeflateLevel::Best),
        };

        let mut encoder = tiff::encoder::TiffEncoder::new(std::io::Cursor::new(&mut buffer))
            .map_err(|e| PaiError::Encode(e.to_string()))?
            .with_compression(compression);

        if config.horizontal_predictor {
            encoder = encoder.with_predictor(tiff::tags::Predictor::Horizontal);
        }

        let levels: Vec<u8> = mask.data().iter().map(|&v| display_level(v)).collect();

        encoder.write_image::<tiff::encoder::colortype::Gray8>(
            mask.width as u32,
            mask.height as u32,
            &levels,
        ).map_err(|e| PaiError::Encode(e.to_string()))?;

        output.write_all(&buffer)?;

        debug!("Mask TIFF encoding complete");
        Ok(())
    }
}
