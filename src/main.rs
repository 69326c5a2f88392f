use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::{error, info};

use canopy_pai_rs::image_pipeline::{
    BatchDriver, BatchOptions, IlluminationSchedule, MaskExportConfig, PaiConfig,
};
use canopy_pai_rs::image_pipeline::timing::Timer;
use canopy_pai_rs::logger;

#[derive(Parser)]
#[command(name = "canopy_pai")]
#[command(version, about = "Plant Area Index from upward-looking canopy photographs", long_about = None)]
struct Cli {
    /// Camera directory, or the root holding camera directories when --prefix is given
    #[arg(short, long, value_name = "DIR")]
    indir: PathBuf,

    /// Process every sub-directory of DIR whose name starts with this prefix
    #[arg(short, long, value_name = "PREFIX")]
    prefix: Option<String>,

    /// Image list to read instead of the first 1_blurscreen*.csv
    #[arg(long, value_name = "FILE")]
    input_table: Option<PathBuf>,

    /// JSON file overriding the analysis parameters
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Worker threads (0 = all cores)
    #[arg(short = 'j', long, value_name = "N", default_value_t = 1)]
    jobs: usize,

    /// Write histogram sidecars and mask TIFFs next to the images
    #[arg(long)]
    diagnostics: bool,

    /// Only keep photographs taken inside the illumination windows
    #[arg(long)]
    hour_screen: bool,

    /// Recompute cameras that already have an output table
    #[arg(long)]
    force: bool,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn camera_dirs(root: &Path, prefix: &str) -> Result<Vec<PathBuf>> {
    let mut dirs: Vec<PathBuf> = std::fs::read_dir(root)
        .with_context(|| format!("Failed to list {}", root.display()))?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_dir()
                && path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| n.starts_with(prefix))
        })
        .collect();
    dirs.sort();
    Ok(dirs)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logger::init(logger::level_for_verbosity(cli.verbose));

    info!("Starting canopy_pai...");

    let config = match &cli.config {
        Some(path) => PaiConfig::from_json_file(path)
            .with_context(|| format!("Failed to load configuration {}", path.display()))?,
        None => PaiConfig::default(),
    };
    let export = MaskExportConfig::builder().enabled(cli.diagnostics).build();
    let options = BatchOptions {
        input_table: cli.input_table.clone(),
        jobs: cli.jobs,
        hour_screen: cli.hour_screen.then(IlluminationSchedule::default),
        force: cli.force,
    };

    let driver = BatchDriver::new(config, export, options)?;
    info!("PAI pipeline initialized");
    info!("Bin width: {} DN", driver.pipeline().config().bin_width);
    info!("Large gap area: > {} px", driver.pipeline().config().large_gap_min_area);
    info!(
        "Diagnostics: {}",
        if driver.pipeline().export_config().enabled {
            "enabled"
        } else {
            "disabled"
        }
    );

    let cameras = match &cli.prefix {
        Some(prefix) => camera_dirs(&cli.indir, prefix)?,
        None => vec![cli.indir.clone()],
    };
    if cameras.is_empty() {
        bail!("No camera directories found in {}", cli.indir.display());
    }

    let mut failed = 0usize;
    for camera in &cameras {
        info!("Working on PAI for {}", camera.display());
        let timer = Timer::start(camera.display().to_string());
        match driver.run_camera(camera) {
            Ok(summary) if summary.skipped => {
                info!("Skipped {}, output already exists", summary.camera);
            }
            Ok(summary) => {
                summary.timings.log_summary();
                info!(
                    "{}: {}/{} images with PAI",
                    summary.camera, summary.succeeded, summary.rows
                );
            }
            Err(e) => {
                error!(category = e.category(), "Camera {} failed: {}", camera.display(), e);
                failed += 1;
            }
        }
        let (_, elapsed) = timer.stop();
        info!("Time for PAI is {:.3} seconds", elapsed.as_secs_f64());
    }

    if failed > 0 {
        bail!("{} of {} camera directories failed", failed, cameras.len());
    }
    Ok(())
}
