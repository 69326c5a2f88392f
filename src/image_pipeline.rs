//! Canopy photograph analysis pipeline
//!
//! Turns upward-looking canopy photographs into Plant Area Index estimates,
//! with separate modules for image decoding, blue-histogram thresholding,
//! gap detection, the PAI model and batch orchestration.

pub mod batch;
pub mod common;
pub mod config;
pub mod estimation;
pub mod gaps;
pub mod histogram;
pub mod pai;
pub mod rosin;
pub mod selection;
pub mod sky;
pub mod source;
pub mod synthetic;
pub mod tiff;
pub mod timing;

pub use common::{
    PaiError,
    Result,
};

pub use config::{
    PaiConfig,
    PaiConfigBuilder,
};

pub use source::{
    CanopyImage,
    CanopyImageReader,
    ImageCrateReader,
};

pub use tiff::{
    MaskExportConfig,
    MaskExportConfigBuilder,
    MaskWriter,
    TiffCompression,
    TiffMaskWriter,
};

pub use estimation::{
    CanopyPaiPipeline,
    ImageAnalysis,
    ImageState,
};

pub use batch::{
    BatchDriver,
    BatchOptions,
    BatchSummary,
};

pub use selection::IlluminationSchedule;
