use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use rayon::prelude::*;
use tracing::{info, info_span, instrument, warn};

use crate::image_pipeline::batch::table::{
    discover_input_table, output_table_path, read_input_table, write_output_table, ImageResult,
    InputRow,
};
use crate::image_pipeline::common::error::{PaiError, Result};
use crate::image_pipeline::config::PaiConfig;
use crate::image_pipeline::estimation::{CanopyPaiPipeline, ImageState};
use crate::image_pipeline::selection::IlluminationSchedule;
use crate::image_pipeline::source::{CanopyImageReader, ImageCrateReader};
use crate::image_pipeline::tiff::{MaskExportConfig, MaskWriter, TiffMaskWriter};
use crate::image_pipeline::timing::PipelineTimings;

/// How a camera directory is processed
#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// Image list to use instead of the discovered `1_blurscreen*.csv`
    pub input_table: Option<PathBuf>,
    /// Worker threads. 1 runs sequentially, 0 uses every core.
    pub jobs: usize,
    /// Drop rows outside the illumination windows before processing
    pub hour_screen: Option<IlluminationSchedule>,
    /// Recompute even when the output table already exists
    pub force: bool,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            input_table: None,
            jobs: 1,
            hour_screen: None,
            force: false,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct BatchSummary {
    pub camera: String,
    pub output: PathBuf,
    /// True when an existing output table was left untouched
    pub skipped: bool,
    pub rows: usize,
    pub succeeded: usize,
    /// Non-success rows per status label
    pub failures: BTreeMap<&'static str, usize>,
    pub timings: PipelineTimings,
}

pub struct BatchDriver<R: CanopyImageReader, W: MaskWriter> {
    pipeline: CanopyPaiPipeline<R, W>,
    options: BatchOptions,
}

impl BatchDriver<ImageCrateReader, TiffMaskWriter> {
    pub fn new(config: PaiConfig, export: MaskExportConfig, options: BatchOptions) -> Result<Self> {
        Ok(Self::with_pipeline(CanopyPaiPipeline::new(config, export)?, options))
    }
}

impl<R, W> BatchDriver<R, W>
where
    R: CanopyImageReader + Sync,
    W: MaskWriter + Sync,
{
    pub fn with_pipeline(pipeline: CanopyPaiPipeline<R, W>, options: BatchOptions) -> Self {
        Self { pipeline, options }
    }

    pub fn pipeline(&self) -> &CanopyPaiPipeline<R, W> {
        &self.pipeline
    }

    pub fn options(&self) -> &BatchOptions {
        &self.options
    }

    /// Processes every row of the camera's image list and writes
    /// `2_process_<camera>.csv` beside it.
    ///
    /// Per-image failures become sentinel rows; only table and output
    /// errors abort the run.
    #[instrument(skip(self), fields(camera = %camera_dir.display()))]
    pub fn run_camera(&self, camera_dir: &Path) -> Result<BatchSummary> {
        let camera = camera_dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let output = output_table_path(camera_dir);

        if output.exists() && !self.options.force {
            info!(output = %output.display(), "Output table exists, skipping camera");
            return Ok(BatchSummary {
                camera,
                output,
                skipped: true,
                ..BatchSummary::default()
            });
        }

        let table = match &self.options.input_table {
            Some(path) if path.is_absolute() => path.clone(),
            Some(path) => camera_dir.join(path),
            None => discover_input_table(camera_dir)?,
        };
        let mut rows = read_input_table(&table)?;
        info!(table = %table.display(), rows = rows.len(), "Input table loaded");

        if let Some(schedule) = &self.options.hour_screen {
            rows = schedule.screen(&rows, |row| row.timestamp);
            info!(rows = rows.len(), "Rows left after illumination screen");
        }

        let (results, timings) = self.process_rows(camera_dir, &camera, &rows)?;
        write_output_table(&output, &results)?;

        let mut summary = BatchSummary {
            camera,
            output,
            skipped: false,
            rows: results.len(),
            succeeded: 0,
            failures: BTreeMap::new(),
            timings,
        };
        for result in &results {
            if result.state.is_success() {
                summary.succeeded += 1;
            } else {
                *summary.failures.entry(result.state.as_str()).or_insert(0) += 1;
            }
        }

        info!(
            rows = summary.rows,
            succeeded = summary.succeeded,
            failures = ?summary.failures,
            output = %summary.output.display(),
            "Camera processed"
        );
        Ok(summary)
    }

    /// Runs every row and returns results in input order with merged stage timings.
    pub fn process_rows(
        &self,
        camera_dir: &Path,
        camera: &str,
        rows: &[InputRow],
    ) -> Result<(Vec<ImageResult>, PipelineTimings)> {
        let total = rows.len();
        let processed = AtomicUsize::new(0);
        let timings = Mutex::new(PipelineTimings::new());

        let run = |row: &InputRow| {
            let result = self.process_row(camera_dir, camera, row, &timings);
            let count = processed.fetch_add(1, Ordering::SeqCst) + 1;
            info!(
                file = %row.filename,
                status = result.state.as_str(),
                "[{}/{}] Image done",
                count,
                total
            );
            result
        };

        let results: Vec<ImageResult> = if self.options.jobs == 1 {
            rows.iter().map(run).collect()
        } else {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(self.options.jobs)
                .build()
                .map_err(|e| PaiError::invalid_config("jobs", e))?;
            pool.install(|| rows.par_iter().map(run).collect())
        };

        let timings = timings.into_inner().unwrap_or_else(|poisoned| poisoned.into_inner());
        Ok((results, timings))
    }

    fn process_row(
        &self,
        camera_dir: &Path,
        camera: &str,
        row: &InputRow,
        timings: &Mutex<PipelineTimings>,
    ) -> ImageResult {
        let _span = info_span!("image", file = %row.filename).entered();
        let path = camera_dir.join(&row.filename);

        let (analysis, image_timings) = match self.pipeline.analyze_file(&path) {
            Ok(done) => done,
            Err(e) => {
                warn!(category = e.category(), file = %row.filename, "Image not processed: {}", e);
                return ImageResult::load_failed(row);
            }
        };

        if let Ok(mut merged) = timings.lock() {
            merged.merge(&image_timings);
        }

        match analysis.state {
            ImageState::PaiComputed => {}
            state => warn!(category = state.as_str(), file = %row.filename, "No PAI for image"),
        }

        if let Err(e) = self
            .pipeline
            .export_diagnostics(&analysis, camera_dir, camera, &row.filename)
        {
            warn!(category = e.category(), file = %row.filename, "Diagnostics not written: {}", e);
        }

        ImageResult::from_analysis(row, &analysis)
    }
}
