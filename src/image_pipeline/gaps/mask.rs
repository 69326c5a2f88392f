use crate::image_pipeline::source::{CanopyImage, Channel};

pub const CANOPY: u8 = 0;
pub const SKY: u8 = 1;
/// Fill value for sky pixels belonging to a large gap
pub const LARGE_GAP: u8 = 255;

/// Per-pixel classification, row-major
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryMask {
    pub width: usize,
    pub height: usize,
    data: Vec<u8>,
}

impl BinaryMask {
    /// Sky where the blue value is at least `threshold`.
    pub fn from_threshold(image: &CanopyImage, threshold: i32) -> Self {
        let data = image
            .channel(Channel::Blue)
            .map(|b| if b as i32 >= threshold { SKY } else { CANOPY })
            .collect();
        Self {
            width: image.width,
            height: image.height,
            data,
        }
    }

    /// Wraps raw mask values; `None` when the buffer does not match the size.
    pub fn from_raw(width: usize, height: usize, data: Vec<u8>) -> Option<Self> {
        (data.len() == width * height).then_some(Self { width, height, data })
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub(crate) fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn get(&self, x: usize, y: usize) -> u8 {
        self.data[y * self.width + x]
    }

    pub fn count(&self, value: u8) -> usize {
        self.data.iter().filter(|&&v| v == value).count()
    }
}
