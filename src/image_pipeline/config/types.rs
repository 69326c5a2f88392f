//! Tunable parameters of the canopy classification and PAI model

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::image_pipeline::common::error::{PaiError, Result};

/// Number of intensity levels in an 8-bit channel.
pub const INTENSITY_LEVELS: u32 = 256;

/// Configuration for per-image canopy analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaiConfig {
    /// Histogram bin width in DN (4 gives 64 bins for 8-bit data)
    pub bin_width: u32,
    /// First bin index considered by the peak search
    pub left_bin_skip: usize,
    /// Bin index after which the peak search stops
    pub right_bin_skip: usize,
    /// Number of bins examined per search window
    pub window_stride: usize,
    /// Window overlap divisor. Only 1 is supported.
    pub window_divisor: usize,
    /// A local maximum must exceed `median(counts) * peak_median_multiplier`
    pub peak_median_multiplier: f64,
    /// Weight between the Rosin cuts used to pick strict sky pixels for the sky index
    pub sky_strict_weight: f64,
    /// Canopy/sky weight used under clear sky
    pub clear_sky_weight: f64,
    /// Canopy/sky weight used under overcast sky
    pub cloudy_sky_weight: f64,
    /// Blue sky index below which the sky is considered cloudy
    pub cloud_index_threshold: f64,
    /// Sky regions strictly larger than this many pixels are large gaps
    pub large_gap_min_area: usize,
    /// Extinction coefficient k, from the G function and camera field of view
    pub extinction_coefficient: f64,
    /// Rows removed from the bottom of each photograph (camera info overlay)
    pub skip_bottom_rows: usize,
}

impl Default for PaiConfig {
    fn default() -> Self {
        Self {
            bin_width: 4,
            left_bin_skip: 2,
            right_bin_skip: 62,
            window_stride: 5,
            window_divisor: 1,
            peak_median_multiplier: 0.5,
            sky_strict_weight: 0.75,
            clear_sky_weight: 0.25,
            cloudy_sky_weight: 0.25,
            cloud_index_threshold: 0.54,
            large_gap_min_area: 10_000,
            extinction_coefficient: 0.65,
            skip_bottom_rows: 100,
        }
    }
}

impl PaiConfig {
    pub fn builder() -> PaiConfigBuilder {
        PaiConfigBuilder::default()
    }

    /// Number of histogram bins implied by `bin_width`.
    pub fn bin_count(&self) -> usize {
        INTENSITY_LEVELS.div_ceil(self.bin_width.max(1)) as usize
    }

    /// Checks every parameter against its supported range.
    pub fn validate(&self) -> Result<()> {
        if self.bin_width == 0 || self.bin_width > INTENSITY_LEVELS / 2 {
            return Err(PaiError::invalid_config("bin_width", self.bin_width));
        }
        if self.window_stride < 2 {
            return Err(PaiError::invalid_config("window_stride", self.window_stride));
        }
        if self.window_divisor != 1 {
            return Err(PaiError::invalid_config("window_divisor", self.window_divisor));
        }
        if self.right_bin_skip > self.bin_count() {
            return Err(PaiError::invalid_config("right_bin_skip", self.right_bin_skip));
        }
        if self.left_bin_skip >= self.right_bin_skip {
            return Err(PaiError::invalid_config("left_bin_skip", self.left_bin_skip));
        }
        if !(self.peak_median_multiplier >= 0.0 && self.peak_median_multiplier.is_finite()) {
            return Err(PaiError::invalid_config(
                "peak_median_multiplier",
                self.peak_median_multiplier,
            ));
        }
        for (name, weight) in [
            ("sky_strict_weight", self.sky_strict_weight),
            ("clear_sky_weight", self.clear_sky_weight),
            ("cloudy_sky_weight", self.cloudy_sky_weight),
        ] {
            if !(0.0..=1.0).contains(&weight) {
                return Err(PaiError::invalid_config(name, weight));
            }
        }
        if !(self.cloud_index_threshold > 0.0 && self.cloud_index_threshold.is_finite()) {
            return Err(PaiError::invalid_config(
                "cloud_index_threshold",
                self.cloud_index_threshold,
            ));
        }
        if !(self.extinction_coefficient > 0.0 && self.extinction_coefficient.is_finite()) {
            return Err(PaiError::invalid_config(
                "extinction_coefficient",
                self.extinction_coefficient,
            ));
        }
        Ok(())
    }

    /// Load and validate a configuration from a JSON file.
    ///
    /// Missing fields take their default values.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content).map_err(|e| {
            PaiError::invalid_config(path.display().to_string(), e)
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a JSON file
    pub fn to_json_file(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| PaiError::OutputWrite(e.to_string()))?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

/// Builder for PaiConfig
#[derive(Default)]
pub struct PaiConfigBuilder {
    config: Option<PaiConfig>,
    bin_width: Option<u32>,
    left_bin_skip: Option<usize>,
    right_bin_skip: Option<usize>,
    window_stride: Option<usize>,
    window_divisor: Option<usize>,
    peak_median_multiplier: Option<f64>,
    sky_strict_weight: Option<f64>,
    clear_sky_weight: Option<f64>,
    cloudy_sky_weight: Option<f64>,
    cloud_index_threshold: Option<f64>,
    large_gap_min_area: Option<usize>,
    extinction_coefficient: Option<f64>,
    skip_bottom_rows: Option<usize>,
}

impl PaiConfigBuilder {
    /// Start from an existing configuration instead of the defaults.
    pub fn base(mut self, config: PaiConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn bin_width(mut self, width: u32) -> Self {
        self.bin_width = Some(width);
        self
    }

    pub fn bin_skip(mut self, left: usize, right: usize) -> Self {
        self.left_bin_skip = Some(left);
        self.right_bin_skip = Some(right);
        self
    }

    pub fn window_stride(mut self, stride: usize) -> Self {
        self.window_stride = Some(stride);
        self
    }

    pub fn window_divisor(mut self, divisor: usize) -> Self {
        self.window_divisor = Some(divisor);
        self
    }

    pub fn peak_median_multiplier(mut self, multiplier: f64) -> Self {
        self.peak_median_multiplier = Some(multiplier);
        self
    }

    pub fn sky_strict_weight(mut self, weight: f64) -> Self {
        self.sky_strict_weight = Some(weight);
        self
    }

    pub fn clear_sky_weight(mut self, weight: f64) -> Self {
        self.clear_sky_weight = Some(weight);
        self
    }

    pub fn cloudy_sky_weight(mut self, weight: f64) -> Self {
        self.cloudy_sky_weight = Some(weight);
        self
    }

    pub fn cloud_index_threshold(mut self, threshold: f64) -> Self {
        self.cloud_index_threshold = Some(threshold);
        self
    }

    pub fn large_gap_min_area(mut self, area: usize) -> Self {
        self.large_gap_min_area = Some(area);
        self
    }

    pub fn extinction_coefficient(mut self, k: f64) -> Self {
        self.extinction_coefficient = Some(k);
        self
    }

    pub fn skip_bottom_rows(mut self, rows: usize) -> Self {
        self.skip_bottom_rows = Some(rows);
        self
    }

    pub fn build(self) -> PaiConfig {
        let default = self.config.unwrap_or_default();
        PaiConfig {
            bin_width: self.bin_width.unwrap_or(default.bin_width),
            left_bin_skip: self.left_bin_skip.unwrap_or(default.left_bin_skip),
            right_bin_skip: self.right_bin_skip.unwrap_or(default.right_bin_skip),
            window_stride: self.window_stride.unwrap_or(default.window_stride),
            window_divisor: self.window_divisor.unwrap_or(default.window_divisor),
            peak_median_multiplier: self
                .peak_median_multiplier
                .unwrap_or(default.peak_median_multiplier),
            sky_strict_weight: self.sky_strict_weight.unwrap_or(default.sky_strict_weight),
            clear_sky_weight: self.clear_sky_weight.unwrap_or(default.clear_sky_weight),
            cloudy_sky_weight: self.cloudy_sky_weight.unwrap_or(default.cloudy_sky_weight),
            cloud_index_threshold: self
                .cloud_index_threshold
                .unwrap_or(default.cloud_index_threshold),
            large_gap_min_area: self.large_gap_min_area.unwrap_or(default.large_gap_min_area),
            extinction_coefficient: self
                .extinction_coefficient
                .unwrap_or(default.extinction_coefficient),
            skip_bottom_rows: self.skip_bottom_rows.unwrap_or(default.skip_bottom_rows),
        }
    }

    /// Build and validate in one step.
    pub fn try_build(self) -> Result<PaiConfig> {
        let config = self.build();
        config.validate()?;
        Ok(config)
    }
}
