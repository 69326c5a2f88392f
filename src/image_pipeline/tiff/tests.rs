use std::io::Cursor;

use tiff::decoder::{Decoder, DecodingResult};

use crate::image_pipeline::gaps::{BinaryMask, CANOPY, LARGE_GAP, SKY};
use crate::image_pipeline::tiff::{MaskExportConfig, MaskWriter, TiffCompression, TiffMaskWriter};

fn sample_mask() -> BinaryMask {
    BinaryMask::from_raw(3, 2, vec![CANOPY, SKY, LARGE_GAP, LARGE_GAP, CANOPY, SKY]).unwrap()
}

fn decode(bytes: Vec<u8>) -> ((u32, u32), Vec<u8>) {
    let mut decoder = Decoder::new(Cursor::new(bytes)).unwrap();
    let dimensions = decoder.dimensions().unwrap();
    match decoder.read_image().unwrap() {
        DecodingResult::U8(data) => (dimensions, data),
        _ => panic!("expected 8-bit data"),
    }
}

#[test]
fn test_export_config_builder() {
    let config = MaskExportConfig::builder()
        .enabled(true)
        .compression(TiffCompression::DeflateBest)
        .horizontal_predictor(true)
        .build();

    assert!(config.enabled);
    assert_eq!(config.compression, TiffCompression::DeflateBest);
    assert!(config.horizontal_predictor);
    assert!(!MaskExportConfig::default().enabled);
}

#[test]
fn test_mask_round_trips_as_display_levels() {
    for compression in [TiffCompression::None, TiffCompression::Lzw, TiffCompression::DeflateFast] {
        let config = MaskExportConfig::builder().compression(compression).build();
        let mut output = Vec::new();
        TiffMaskWriter.write_mask(&sample_mask(), &mut output, &config).unwrap();

        let (dimensions, data) = decode(output);
        assert_eq!(dimensions, (3, 2));
        assert_eq!(data, vec![0, 127, 255, 255, 0, 127]);
    }
}
