use std::io::Write;
use crate::image_pipeline::common::error::Result;
use crate::image_pipeline::gaps::BinaryMask;
use crate::image_pipeline::tiff::types::MaskExportConfig;

pub trait MaskWriter {
    fn write_mask(&self, mask: &BinaryMask, output: &mut dyn Write, config: &MaskExportConfig) -> Result<()>;
}
