use std::fs::File;
use std::path::Path;

use tracing::{info, instrument, warn};

use crate::image_pipeline::{
    common::error::{PaiError, Result},
    config::PaiConfig,
    estimation::diagnostics::{diagnostic_stem, HistogramSidecar},
    estimation::types::{ImageAnalysis, ImageState},
    gaps::detect_gaps,
    histogram::{find_peaks, BlueHistogram},
    pai::estimate_pai,
    rosin::rosin_cut,
    sky::classify_sky,
    source::{CanopyImage, CanopyImageReader, ImageCrateReader},
    tiff::{MaskExportConfig, MaskWriter, TiffMaskWriter},
    timing::PipelineTimings,
};

pub struct CanopyPaiPipeline<R: CanopyImageReader, W: MaskWriter> {
    reader: R,
    writer: W,
    config: PaiConfig,
    export: MaskExportConfig,
}

impl CanopyPaiPipeline<ImageCrateReader, TiffMaskWriter> {
    pub fn new(config: PaiConfig, export: MaskExportConfig) -> Result<Self> {
        Self::with_custom(ImageCrateReader, TiffMaskWriter, config, export)
    }
}

impl<R: CanopyImageReader, W: MaskWriter> CanopyPaiPipeline<R, W> {
    pub fn with_custom(reader: R, writer: W, config: PaiConfig, export: MaskExportConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            reader,
            writer,
            config,
            export,
        })
    }

    /// Runs every stage on an already decoded frame.
    ///
    /// Only a crop that leaves no rows is an error; unimodal, degenerate and
    /// invalid-porosity outcomes are reported through [`ImageAnalysis::state`].
    pub fn analyze(&self, image: CanopyImage) -> Result<ImageAnalysis> {
        let mut timings = PipelineTimings::new();
        self.analyze_timed(image, &mut timings)
    }

    #[instrument(skip_all, fields(width = image.width, height = image.height))]
    fn analyze_timed(&self, image: CanopyImage, timings: &mut PipelineTimings) -> Result<ImageAnalysis> {
        let config = &self.config;
        let image = image.crop_bottom(config.skip_bottom_rows)?;

        let histogram = timings.time("histogram", || BlueHistogram::from_image(&image, config.bin_width));
        let peaks = timings.time("peak_search", || find_peaks(&histogram, config));

        if !peaks.both_found() {
            warn!(
                left_found = peaks.left.found,
                right_found = peaks.right.found,
                "Unimodal histogram, skipping classification"
            );
            return Ok(ImageAnalysis::unclassified(histogram, peaks, ImageState::Unimodal));
        }

        let cut = match timings.time("rosin", || rosin_cut(&histogram, &peaks)) {
            Ok(cut) => cut,
            Err(e) => {
                warn!(category = e.category(), "{}", e);
                return Ok(ImageAnalysis::unclassified(histogram, peaks, ImageState::Degenerate));
            }
        };

        let sky = timings.time("classify_sky", || classify_sky(&image, &histogram, &cut, config));

        let gaps = {
            let _span = tracing::info_span!("detect_gaps", threshold = sky.threshold).entered();
            timings.time("detect_gaps", || detect_gaps(&image, sky.threshold, config.large_gap_min_area))
        };

        let estimate = timings.time("pai", || {
            estimate_pai(gaps.stats.crown_cover, gaps.stats.gap_fraction, config.extinction_coefficient)
        });

        let (crown_porosity, pai, state) = match estimate {
            Ok(estimate) => (Some(estimate.crown_porosity), Some(estimate.pai), ImageState::PaiComputed),
            Err(PaiError::InvalidPorosity { porosity }) => {
                warn!(
                    category = "invalid_porosity",
                    porosity,
                    crown_cover = gaps.stats.crown_cover,
                    gap_fraction = gaps.stats.gap_fraction,
                    "PAI undefined for this image"
                );
                (Some(porosity), None, ImageState::PaiFailed)
            }
            Err(e) => return Err(e),
        };

        Ok(ImageAnalysis {
            histogram,
            peaks,
            rosin: Some(cut),
            sky: Some(sky),
            gaps: Some(gaps),
            crown_porosity,
            pai,
            state,
        })
    }

    pub fn analyze_bytes(&self, input_data: &[u8]) -> Result<ImageAnalysis> {
        let (analysis, _) = self.analyze_bytes_with_timings(input_data)?;
        Ok(analysis)
    }

    #[instrument(skip(self, input_data), fields(input_size = input_data.len()))]
    pub fn analyze_bytes_with_timings(&self, input_data: &[u8]) -> Result<(ImageAnalysis, PipelineTimings)> {
        let mut timings = PipelineTimings::new();

        let image = {
            let _span = tracing::info_span!("decode_image").entered();
            timings.time("decode", || self.reader.read_image(input_data))?
        };

        let analysis = self.analyze_timed(image, &mut timings)?;
        Ok((analysis, timings))
    }

    #[instrument(skip(self, input_path))]
    pub fn analyze_file<P: AsRef<Path>>(&self, input_path: P) -> Result<(ImageAnalysis, PipelineTimings)> {
        let input_path = input_path.as_ref();
        let mut timings = PipelineTimings::new();

        let input_data = timings.time("read_input_file", || {
            std::fs::read(input_path).map_err(|e| {
                PaiError::ImageRead(format!("{}: {}", input_path.display(), e))
            })
        })?;

        let (analysis, stage_timings) = self.analyze_bytes_with_timings(&input_data)?;
        timings.merge(&stage_timings);

        info!(state = %analysis.state, pai = ?analysis.pai, "Image analysed");
        Ok((analysis, timings))
    }

    /// Writes the histogram sidecar and, for classified images, both masks
    /// into `output_dir`. Does nothing when export is disabled.
    pub fn export_diagnostics(
        &self,
        analysis: &ImageAnalysis,
        output_dir: &Path,
        camera: &str,
        filename: &str,
    ) -> Result<()> {
        if !self.export.enabled {
            return Ok(());
        }
        let stem = diagnostic_stem(camera, filename);

        let sidecar = HistogramSidecar::new(camera, filename, analysis);
        let sidecar_path = output_dir.join(format!("{stem}.json"));
        let file = File::create(&sidecar_path).map_err(|e| {
            PaiError::OutputWrite(format!("{}: {}", sidecar_path.display(), e))
        })?;
        serde_json::to_writer_pretty(file, &sidecar)
            .map_err(|e| PaiError::OutputWrite(format!("{}: {}", sidecar_path.display(), e)))?;

        if let Some(gaps) = &analysis.gaps {
            for (suffix, mask) in [("mask", &gaps.mask), ("gaps", &gaps.large_gap_mask)] {
                let path = output_dir.join(format!("{stem}_{suffix}.tiff"));
                let mut output = File::create(&path).map_err(|e| {
                    PaiError::OutputWrite(format!("{}: {}", path.display(), e))
                })?;
                self.writer.write_mask(mask, &mut output, &self.export)?;
            }
        }

        Ok(())
    }

    pub fn config(&self) -> &PaiConfig {
        &self.config
    }

    pub fn export_config(&self) -> &MaskExportConfig {
        &self.export
    }

    pub fn set_config(&mut self, config: PaiConfig) -> Result<()> {
        config.validate()?;
        self.config = config;
        Ok(())
    }
}
