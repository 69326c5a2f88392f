use crate::image_pipeline::common::error::PaiError;
use crate::image_pipeline::config::PaiConfig;

#[test]
fn test_default_config_is_valid() {
    let config = PaiConfig::default();
    assert!(config.validate().is_ok());
    assert_eq!(config.bin_count(), 64);
}

#[test]
fn test_config_builder() {
    let config = PaiConfig::builder()
        .bin_width(8)
        .bin_skip(1, 30)
        .window_stride(3)
        .large_gap_min_area(500)
        .extinction_coefficient(0.5)
        .skip_bottom_rows(0)
        .build();

    assert_eq!(config.bin_width, 8);
    assert_eq!(config.left_bin_skip, 1);
    assert_eq!(config.right_bin_skip, 30);
    assert_eq!(config.window_stride, 3);
    assert_eq!(config.large_gap_min_area, 500);
    assert_eq!(config.extinction_coefficient, 0.5);
    assert_eq!(config.skip_bottom_rows, 0);
    assert_eq!(config.cloud_index_threshold, 0.54);
    assert_eq!(config.bin_count(), 32);
}

#[test]
fn test_bin_count_rounds_up() {
    let config = PaiConfig::builder().bin_width(5).build();
    assert_eq!(config.bin_count(), 52);
}

#[test]
fn test_divisor_other_than_one_is_rejected() {
    let result = PaiConfig::builder().window_divisor(2).try_build();
    assert!(matches!(
        result,
        Err(PaiError::InvalidConfig { ref parameter, .. }) if parameter == "window_divisor"
    ));
}

#[test]
fn test_skip_range_must_fit_histogram() {
    let result = PaiConfig::builder().bin_skip(2, 65).try_build();
    assert!(matches!(
        result,
        Err(PaiError::InvalidConfig { ref parameter, .. }) if parameter == "right_bin_skip"
    ));

    let result = PaiConfig::builder().bin_skip(40, 40).try_build();
    assert!(matches!(
        result,
        Err(PaiError::InvalidConfig { ref parameter, .. }) if parameter == "left_bin_skip"
    ));
}

#[test]
fn test_weights_out_of_range_are_rejected() {
    let result = PaiConfig::builder().cloudy_sky_weight(1.5).try_build();
    assert!(matches!(
        result,
        Err(PaiError::InvalidConfig { ref parameter, .. }) if parameter == "cloudy_sky_weight"
    ));

    let result = PaiConfig::builder().extinction_coefficient(0.0).try_build();
    assert!(result.is_err());
}

#[test]
fn test_json_round_trip_with_partial_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(&path, r#"{ "large_gap_min_area": 50000, "cloudy_sky_weight": 0.5 }"#).unwrap();

    let config = PaiConfig::from_json_file(&path).unwrap();
    assert_eq!(config.large_gap_min_area, 50_000);
    assert_eq!(config.cloudy_sky_weight, 0.5);
    assert_eq!(config.bin_width, 4);

    let saved = dir.path().join("saved.json");
    config.to_json_file(&saved).unwrap();
    assert_eq!(PaiConfig::from_json_file(&saved).unwrap(), config);
}

#[test]
fn test_json_file_with_invalid_values_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(&path, r#"{ "window_divisor": 3 }"#).unwrap();

    assert!(PaiConfig::from_json_file(&path).is_err());
}
