use crate::image_pipeline::common::error::Result;
use crate::image_pipeline::source::types::CanopyImage;

pub trait CanopyImageReader {
    fn read_image(&self, data: &[u8]) -> Result<CanopyImage>;
}
