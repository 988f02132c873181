//! patchblend CLI - composite a fill image into a masked base image.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use patchblend::image::{load_raster, save_raster};
use patchblend::{blend, BlendStrategy, ClassicalInpainter, ImageData};

/// Composite a generated fill patch into a masked base image.
#[derive(Parser, Debug)]
#[command(name = "patchblend")]
#[command(version, about, long_about = None)]
struct Args {
    /// Masked base image path.
    #[arg(value_name = "IMAGE")]
    image: PathBuf,

    /// Fill image path (same dimensions as the base image).
    #[arg(value_name = "FILL")]
    fill: PathBuf,

    /// Output image path.
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,

    /// Compositing strategy.
    #[arg(short, long, value_enum, default_value_t = Strategy::Alpha)]
    strategy: Strategy,

    /// Directory for intermediate debug images (inpaint strategy only).
    #[arg(long, value_name = "DIR")]
    debug_dir: Option<PathBuf>,

    /// Enable verbose output.
    #[arg(short, long)]
    verbose: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum Strategy {
    /// Distance-weighted alpha blending.
    Alpha,
    /// Gradient-domain Poisson composite.
    Poisson,
    /// Classical inpainting of the fill region.
    Inpaint,
}

fn main() -> ExitCode {
    let args = Args::parse();

    // Initialize logging
    let log_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("patchblend={log_level}").into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    if let Err(err) = run(&args) {
        tracing::error!("{err:#}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

fn run(args: &Args) -> Result<()> {
    if !args.image.exists() {
        anyhow::bail!("Base image does not exist: {}", args.image.display());
    }
    if !args.fill.exists() {
        anyhow::bail!("Fill image does not exist: {}", args.fill.display());
    }

    let img = ImageData::Raster(load_raster(&args.image).context("Failed to load base image")?);
    let fill = ImageData::Raster(load_raster(&args.fill).context("Failed to load fill image")?);

    tracing::info!(
        "Compositing {} into {} with {:?}",
        args.fill.display(),
        args.image.display(),
        args.strategy
    );

    let blended = match (args.strategy, &args.debug_dir) {
        (Strategy::Inpaint, Some(dir)) => {
            let inpainter = ClassicalInpainter {
                debug_dir: Some(dir.clone()),
                ..ClassicalInpainter::default()
            };
            let keep = derive_keep_mask(&fill);
            inpainter.inpaint(&img, &keep)
        }
        (Strategy::Inpaint, None) => blend(&img, &fill, BlendStrategy::ClassicalInpaint),
        (Strategy::Alpha, _) => blend(&img, &fill, BlendStrategy::Alpha),
        (Strategy::Poisson, _) => blend(&img, &fill, BlendStrategy::Poisson),
    }
    .context("Failed to composite images")?;

    save_raster(&blended, &args.output).context("Failed to save output image")?;

    println!(
        "Successfully composited {} -> {}",
        args.fill.display(),
        args.output.display()
    );

    Ok(())
}

/// The fill's footprint marks the hole; everything else is kept.
fn derive_keep_mask(fill: &ImageData) -> ImageData {
    let raster = fill.to_raster();
    let occupancy = patchblend::compositor::occupancy_mask(&raster);
    let (height, width) = occupancy.dim();

    let mut keep = patchblend::Raster::zeros((height, width, 1));
    for y in 0..height {
        for x in 0..width {
            if occupancy[[y, x]] == 0 {
                keep[[y, x, 0]] = 1;
            }
        }
    }
    ImageData::Raster(keep)
}
