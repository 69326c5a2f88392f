//! Synthetic canopy frames for tests and benchmarks
//!
//! Renders a bright sky band above a dark canopy band, optionally sprinkled
//! with isolated one-pixel sky gaps, and a camera overlay strip at the bottom.

use crate::image_pipeline::source::CanopyImage;

#[derive(Debug, Clone)]
pub struct SyntheticCanopy {
    pub width: usize,
    /// Rows left after the overlay is cropped
    pub height: usize,
    /// Rows of open sky at the top of the frame
    pub sky_rows: usize,
    /// Rows of camera overlay appended below `height`
    pub overlay_rows: usize,
    pub canopy_color: [u8; 3],
    pub sky_color: [u8; 3],
    pub overlay_color: [u8; 3],
    /// Spacing of the isolated gap grid inside the canopy band
    pub gap_spacing: Option<usize>,
}

impl Default for SyntheticCanopy {
    fn default() -> Self {
        Self {
            width: 120,
            height: 100,
            sky_rows: 40,
            overlay_rows: 10,
            canopy_color: [30, 40, 40],
            sky_color: [120, 160, 220],
            overlay_color: [255, 255, 255],
            gap_spacing: Some(5),
        }
    }
}

impl SyntheticCanopy {
    fn is_small_gap(&self, x: usize, y: usize) -> bool {
        match self.gap_spacing {
            // keep a clear row between the gaps and the sky band
            Some(spacing) if spacing >= 2 && y >= self.sky_rows + 2 => {
                x % spacing == 2 % spacing && y % spacing == 2 % spacing
            }
            _ => false,
        }
    }

    pub fn pixel(&self, x: usize, y: usize) -> [u8; 3] {
        if y >= self.height {
            self.overlay_color
        } else if y < self.sky_rows || self.is_small_gap(x, y) {
            self.sky_color
        } else {
            self.canopy_color
        }
    }

    /// Number of isolated gap pixels in the canopy band.
    pub fn small_gap_count(&self) -> usize {
        (self.sky_rows..self.height)
            .flat_map(|y| (0..self.width).map(move |x| (x, y)))
            .filter(|&(x, y)| self.is_small_gap(x, y))
            .count()
    }

    pub fn render(&self) -> CanopyImage {
        let rows = self.height + self.overlay_rows;
        let data = (0..rows)
            .flat_map(|y| (0..self.width).map(move |x| (x, y)))
            .flat_map(|(x, y)| self.pixel(x, y))
            .collect();
        CanopyImage {
            width: self.width,
            height: rows,
            data,
        }
    }

    /// Renders the frame and encodes it as PNG.
    pub fn encode_png(&self) -> image::ImageResult<Vec<u8>> {
        let rows = self.height + self.overlay_rows;
        let buffer = image::RgbImage::from_fn(self.width as u32, rows as u32, |x, y| {
            image::Rgb(self.pixel(x as usize, y as usize))
        });
        let mut bytes = std::io::Cursor::new(Vec::new());
        buffer.write_to(&mut bytes, image::ImageFormat::Png)?;
        Ok(bytes.into_inner())
    }
}
