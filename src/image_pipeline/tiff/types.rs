//! Diagnostic export configuration types

/// TIFF compression methods
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TiffCompression {
    /// No compression (fastest, largest file)
    None,
    /// LZW compression
    Lzw,
    /// Deflate compression - fast level
    DeflateFast,
    /// Deflate compression - best compression (slower)
    DeflateBest,
    /// Deflate compression - balanced
    DeflateBalanced,
}

/// Configuration for diagnostic mask export
#[derive(Debug, Clone)]
pub struct MaskExportConfig {
    /// Write masks and the histogram sidecar at all
    pub enabled: bool,
    /// Compression method to use
    pub compression: TiffCompression,
    /// Horizontal differencing before compression. Masks are mostly flat
    /// runs, so this helps LZW and Deflate.
    pub horizontal_predictor: bool,
}

impl Default for MaskExportConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            compression: TiffCompression::Lzw,
            horizontal_predictor: false,
        }
    }
}

impl MaskExportConfig {
    pub fn builder() -> MaskExportConfigBuilder {
        MaskExportConfigBuilder::default()
    }
}

/// Builder for MaskExportConfig
#[derive(Default)]
pub struct MaskExportConfigBuilder {
    enabled: Option<bool>,
    compression: Option<TiffCompression>,
    horizontal_predictor: Option<bool>,
}

impl MaskExportConfigBuilder {
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = Some(enabled);
        self
    }

    pub fn compression(mut self, compression: TiffCompression) -> Self {
        self.compression = Some(compression);
        self
    }

    pub fn horizontal_predictor(mut self, enable: bool) -> Self {
        self.horizontal_predictor = Some(enable);
        self
    }

    pub fn build(self) -> MaskExportConfig {
        let default = MaskExportConfig::default();
        MaskExportConfig {
            enabled: self.enabled.unwrap_or(default.enabled),
            compression: self.compression.unwrap_or(default.compression),
            horizontal_predictor: self.horizontal_predictor.unwrap_or(default.horizontal_predictor),
        }
    }
}
