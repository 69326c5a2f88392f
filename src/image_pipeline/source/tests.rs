use image::{ImageBuffer, Rgb};

use crate::image_pipeline::common::error::PaiError;
use crate::image_pipeline::source::{CanopyImage, CanopyImageReader, Channel, ImageCrateReader};

fn encode_png(width: u32, height: u32, pixel: impl Fn(u32, u32) -> [u8; 3]) -> Vec<u8> {
    let buffer = ImageBuffer::from_fn(width, height, |x, y| Rgb(pixel(x, y)));
    let mut bytes = std::io::Cursor::new(Vec::new());
    buffer.write_to(&mut bytes, image::ImageFormat::Png).unwrap();
    bytes.into_inner()
}

#[test]
fn test_new_rejects_mismatched_buffer() {
    let result = CanopyImage::new(4, 4, vec![0u8; 10]);
    assert!(matches!(result, Err(PaiError::InvalidDimensions(4, 4))));
}

#[test]
fn test_crop_bottom_keeps_top_rows() {
    let data: Vec<u8> = (0..4u8).flat_map(|row| [row, row, row].repeat(2)).collect();
    let image = CanopyImage::new(2, 4, data).unwrap();

    let cropped = image.crop_bottom(1).unwrap();
    assert_eq!(cropped.height, 3);
    assert_eq!(cropped.pixel_count(), 6);
    assert_eq!(cropped.data.len(), 2 * 3 * 3);
    assert_eq!(cropped.channel(Channel::Red).max(), Some(2));
}

#[test]
fn test_crop_everything_fails() {
    let image = CanopyImage::new(2, 2, vec![0u8; 12]).unwrap();
    assert!(matches!(image.crop_bottom(2), Err(PaiError::InvalidDimensions(2, 0))));
}

#[test]
fn test_channel_extraction() {
    let image = CanopyImage::new(2, 1, vec![1, 2, 3, 4, 5, 6]).unwrap();
    assert_eq!(image.channel(Channel::Red).collect::<Vec<_>>(), vec![1, 4]);
    assert_eq!(image.channel(Channel::Green).collect::<Vec<_>>(), vec![2, 5]);
    assert_eq!(image.channel(Channel::Blue).collect::<Vec<_>>(), vec![3, 6]);
}

#[test]
fn test_reader_decodes_png() {
    let png = encode_png(3, 2, |x, y| [x as u8, y as u8, 200]);
    let image = ImageCrateReader.read_image(&png).unwrap();

    assert_eq!((image.width, image.height), (3, 2));
    assert_eq!(image.pixels().nth(4), Some([1, 1, 200]));
}

#[test]
fn test_reader_rejects_garbage() {
    let result = ImageCrateReader.read_image(b"not an image");
    assert!(matches!(result, Err(PaiError::Decode(_))));
}
