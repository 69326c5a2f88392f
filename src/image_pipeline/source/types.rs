//! Canopy image data types

use crate::image_pipeline::common::error::{PaiError, Result};

/// Colour channel of an interleaved RGB pixel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Red = 0,
    Green = 1,
    Blue = 2,
}

/// Decoded 8-bit RGB photograph
#[derive(Debug, Clone, PartialEq)]
pub struct CanopyImage {
    /// Width of the image in pixels
    pub width: usize,
    /// Height of the image in pixels
    pub height: usize,
    /// Pixel data interleaved [R, G, B, R, G, B, ...], row-major
    pub data: Vec<u8>,
}

impl CanopyImage {
    pub fn new(width: usize, height: usize, data: Vec<u8>) -> Result<Self> {
        if width == 0 || height == 0 || data.len() != width * height * 3 {
            return Err(PaiError::InvalidDimensions(width, height));
        }
        Ok(Self { width, height, data })
    }

    /// Drops `rows` rows from the bottom of the frame.
    ///
    /// Fails when nothing would be left to analyse.
    pub fn crop_bottom(mut self, rows: usize) -> Result<Self> {
        if rows >= self.height {
            return Err(PaiError::InvalidDimensions(self.width, self.height.saturating_sub(rows)));
        }
        self.height -= rows;
        self.data.truncate(self.width * self.height * 3);
        Ok(self)
    }

    pub fn pixel_count(&self) -> usize {
        self.width * self.height
    }

    pub fn pixels(&self) -> impl Iterator<Item = [u8; 3]> + '_ {
        self.data.chunks_exact(3).map(|p| [p[0], p[1], p[2]])
    }

    pub fn channel(&self, channel: Channel) -> impl Iterator<Item = u8> + '_ {
        self.data.iter().skip(channel as usize).step_by(3).copied()
    }
}
