use crate::image_pipeline::common::error::PaiError;
use crate::image_pipeline::histogram::{BlueHistogram, PeakSearch, SidePeak};
use crate::image_pipeline::rosin::{rosin_cut, FloorLine};

fn peak(bin: usize, count: u64) -> SidePeak {
    SidePeak { bin, count, found: true }
}

fn bimodal() -> (BlueHistogram, PeakSearch) {
    let mut counts = vec![0u64; 64];
    for (bin, count) in [(8, 20), (9, 60), (10, 100), (11, 60), (12, 20)] {
        counts[bin] = count;
    }
    for (bin, count) in [(48, 30), (49, 90), (50, 150), (51, 90), (52, 30)] {
        counts[bin] = count;
    }
    let peaks = PeakSearch {
        left: peak(10, 100),
        right: peak(50, 150),
    };
    (BlueHistogram::from_counts(counts, 4), peaks)
}

#[test]
fn test_distance_is_positive_below_line() {
    let line = FloorLine { from: (0.0, 0.0), to: (10.0, 10.0) };
    assert!(line.distance((5.0, 0.0)) > 0.0);
    assert!(line.distance((5.0, 10.0)) < 0.0);
    assert!(line.distance((5.0, 5.0)).abs() < 1e-12);

    let reversed = FloorLine { from: (10.0, 0.0), to: (0.0, 10.0) };
    assert!(reversed.distance((5.0, 0.0)) > 0.0);
    assert!(reversed.distance((5.0, 10.0)) < 0.0);
}

#[test]
fn test_cuts_lie_strictly_between_peaks() {
    let (histogram, peaks) = bimodal();
    let cut = rosin_cut(&histogram, &peaks).unwrap();

    for bin in [cut.left_cut_bin, cut.right_cut_bin] {
        assert!(bin > peaks.left.bin && bin < peaks.right.bin);
    }
}

#[test]
fn test_cuts_hug_the_valley_edges() {
    let (histogram, peaks) = bimodal();
    let cut = rosin_cut(&histogram, &peaks).unwrap();

    // last empty bin before the sky shoulder, first empty bin after the canopy shoulder
    assert_eq!(cut.left_cut_bin, 47);
    assert_eq!(cut.right_cut_bin, 13);
    assert_eq!(cut.left_line.from, (32.0, 0.0));
    assert_eq!(cut.right_line.from, (208.0, 0.0));
}

#[test]
fn test_equal_distances_pick_first_bin() {
    let mut counts = vec![0u64; 64];
    counts[0] = 5;
    counts[9] = 4;
    counts[10] = 40;
    let histogram = BlueHistogram::from_counts(counts, 4);
    let peaks = PeakSearch {
        left: peak(0, 5),
        right: peak(10, 40),
    };

    let cut = rosin_cut(&histogram, &peaks).unwrap();
    assert_eq!(cut.left_cut_bin, 8);
}

#[test]
fn test_missing_peak_is_degenerate() {
    let (histogram, mut peaks) = bimodal();
    peaks.right.found = false;

    let result = rosin_cut(&histogram, &peaks);
    assert!(matches!(result, Err(PaiError::DegenerateHistogram(_))));
}

#[test]
fn test_coincident_or_inverted_peaks_are_degenerate() {
    let (histogram, _) = bimodal();

    for (left, right) in [(30, 30), (50, 10), (10, 11)] {
        let peaks = PeakSearch {
            left: peak(left, 100),
            right: peak(right, 100),
        };
        let result = rosin_cut(&histogram, &peaks);
        assert!(matches!(result, Err(PaiError::DegenerateHistogram(_))));
    }
}
