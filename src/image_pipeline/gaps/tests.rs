use approx::assert_relative_eq;

use crate::image_pipeline::gaps::{
    detect_gaps, label_regions, large_gap_pixels, BinaryMask, CANOPY, LARGE_GAP, SKY,
};
use crate::image_pipeline::source::CanopyImage;

/// `#` is sky (blue 200), anything else canopy (blue 20).
fn image_from_rows(rows: &[&str]) -> CanopyImage {
    let width = rows[0].len();
    let data = rows
        .iter()
        .flat_map(|row| row.chars())
        .flat_map(|c| if c == '#' { [90, 120, 200] } else { [20, 30, 20] })
        .collect();
    CanopyImage::new(width, rows.len(), data).unwrap()
}

const SCENE: [&str; 6] = [
    "####....",
    "####..#.",
    "###.....",
    "........",
    ".#....##",
    "......##",
];

#[test]
fn test_mask_threshold_is_inclusive() {
    let image = CanopyImage::new(3, 1, vec![0, 0, 99, 0, 0, 100, 0, 0, 101]).unwrap();
    let mask = BinaryMask::from_threshold(&image, 100);
    assert_eq!(mask.data(), &[CANOPY, SKY, SKY]);
}

#[test]
fn test_regions_are_eight_connected() {
    let image = image_from_rows(&["#..", ".#.", "..#"]);
    let labels = label_regions(&BinaryMask::from_threshold(&image, 100));

    assert_eq!(labels.region_count(), 1);
    assert_eq!(labels.areas(), &[3]);
}

#[test]
fn test_labels_follow_row_major_order() {
    let image = image_from_rows(&SCENE);
    let labels = label_regions(&BinaryMask::from_threshold(&image, 100));

    assert_eq!(labels.areas(), &[11, 1, 1, 4]);
}

#[test]
fn test_large_gaps_are_filled_and_counted() {
    let image = image_from_rows(&SCENE);
    let gaps = detect_gaps(&image, 100, 3);
    let stats = gaps.stats;

    assert_eq!(stats.total_pixels, 48);
    assert_eq!(stats.sky_pixels, 17);
    assert_eq!(stats.large_gap_count, 2);
    assert_eq!(stats.large_gap_pixels, 15);
    assert_relative_eq!(stats.gap_fraction, 17.0 / 48.0);
    assert_relative_eq!(stats.crown_cover, 1.0 - 15.0 / 48.0);
    assert_relative_eq!(stats.min_large_gap_pct.unwrap(), 4.0 / 48.0 * 100.0);

    assert_eq!(gaps.large_gap_mask.get(0, 0), LARGE_GAP);
    assert_eq!(gaps.large_gap_mask.get(6, 1), SKY);
    assert_eq!(gaps.large_gap_mask.get(7, 5), LARGE_GAP);
    // the plain mask is untouched
    assert_eq!(gaps.mask.get(0, 0), SKY);
}

#[test]
fn test_area_limit_is_strict() {
    let image = image_from_rows(&SCENE);
    let stats = detect_gaps(&image, 100, 4).stats;

    assert_eq!(stats.large_gap_count, 1);
    assert_eq!(stats.large_gap_pixels, 11);
}

#[test]
fn test_no_qualifying_region_still_reports_fractions() {
    let image = image_from_rows(&SCENE);
    let stats = detect_gaps(&image, 100, 1_000).stats;

    assert_eq!(stats.large_gap_count, 0);
    assert_eq!(stats.min_large_gap_pct, None);
    assert_relative_eq!(stats.crown_cover, 1.0);
    assert_relative_eq!(stats.gap_fraction, 17.0 / 48.0);
}

#[test]
fn test_gap_fraction_counts_small_gaps_but_crown_cover_does_not() {
    // GF comes from the unfiltered mask while CC only sees large gaps,
    // so the two disagree whenever small gaps exist.
    let image = image_from_rows(&SCENE);
    let stats = detect_gaps(&image, 100, 3).stats;

    assert!(stats.gap_fraction > 1.0 - stats.crown_cover);
    assert_eq!(stats.sky_pixels - stats.large_gap_pixels, 2);
}

#[test]
fn test_detection_is_deterministic() {
    let image = image_from_rows(&SCENE);
    let first = detect_gaps(&image, 100, 3);
    let second = detect_gaps(&image, 100, 3);

    assert_eq!(first, second);
}

#[test]
fn test_raising_area_limit_never_grows_large_gaps() {
    let image = image_from_rows(&SCENE);
    let labels = label_regions(&BinaryMask::from_threshold(&image, 100));

    let mut previous = usize::MAX;
    for min_area in 0..20 {
        let pixels = large_gap_pixels(&labels, min_area);
        assert!(pixels <= previous);
        assert_eq!(pixels, detect_gaps(&image, 100, min_area).stats.large_gap_pixels);
        previous = pixels;
    }
}

#[test]
fn test_enclosed_canopy_island_is_not_filled() {
    // a canopy clump surrounded by one large gap stays canopy
    let image = image_from_rows(&[
        "#######",
        "#######",
        "##...##",
        "##...##",
        "##...##",
        "#######",
        "#######",
    ]);
    let gaps = detect_gaps(&image, 100, 10);
    let stats = gaps.stats;

    assert_eq!(stats.large_gap_count, 1);
    assert_eq!(stats.large_gap_pixels, 40);
    assert_eq!(gaps.large_gap_mask.get(3, 3), CANOPY);
    assert_eq!(gaps.large_gap_mask.get(0, 0), LARGE_GAP);
    assert_relative_eq!(stats.crown_cover, 1.0 - 40.0 / 49.0);
}
