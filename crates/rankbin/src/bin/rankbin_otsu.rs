//! Otsu segmentation of a single-channel image.
//!
//! `rankbin-otsu [-t THRESHOLD] <INPUT> <OUTPUT>` computes the Otsu threshold
//! of INPUT (or uses THRESHOLD), maps pixels above it to 255 and the rest to
//! 0, and writes the result to OUTPUT.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use log::{info, LevelFilter};
use rankbin::io::{load_image, save_channel, BitDepth, ImageIoError};
use rankbin::report::{OtsuReport, ReportError};
use rankbin::{run_otsu, OtsuError, OtsuParams, SegmentParams};

#[derive(Debug, Parser)]
#[command(
    name = "rankbin-otsu",
    version,
    about = "Segment a single-channel image with an Otsu threshold"
)]
struct Args {
    /// Use this threshold instead of computing one.
    #[arg(short = 't', long = "threshold", value_parser = clap::value_parser!(u8).range(0..=255))]
    threshold: Option<u8>,

    /// Bits per channel of the output image (8 or 16).
    #[arg(long, default_value = "8", value_parser = parse_bit_depth)]
    bits: BitDepth,

    /// Write a JSON report of the run to this path.
    #[arg(long)]
    report: Option<PathBuf>,

    /// Log level (off, error, warn, info, debug, trace).
    #[arg(long, default_value = "warn", value_parser = parse_level)]
    log_level: LevelFilter,

    /// Input image.
    input: PathBuf,

    /// Output image; the format follows the extension.
    output: PathBuf,
}

#[derive(thiserror::Error, Debug)]
enum CliError {
    #[error(transparent)]
    Image(#[from] ImageIoError),
    #[error(transparent)]
    Otsu(#[from] OtsuError),
    #[error(transparent)]
    Report(#[from] ReportError),
    #[error("expected a single-channel image, got {channels} channels")]
    MultiChannel { channels: usize },
}

fn parse_bit_depth(raw: &str) -> Result<BitDepth, String> {
    raw.parse::<u8>()
        .ok()
        .and_then(BitDepth::from_bits)
        .ok_or_else(|| format!("unsupported bit depth `{raw}`, expected 8 or 16"))
}

fn parse_level(raw: &str) -> Result<LevelFilter, String> {
    raw.parse::<LevelFilter>()
        .map_err(|_| format!("unknown log level `{raw}`"))
}

fn main() -> ExitCode {
    let args = Args::parse();

    #[cfg(feature = "tracing")]
    rankbin::core::init_tracing(false);
    #[cfg(not(feature = "tracing"))]
    if let Err(err) = rankbin::core::init_with_level(args.log_level) {
        eprintln!("warning: logger not installed: {err}");
    }

    match run(&args) {
        Ok(threshold) => {
            println!("threshold: {threshold}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

#[cfg_attr(feature = "tracing", tracing::instrument(level = "info", skip(args)))]
fn run(args: &Args) -> Result<u8, CliError> {
    let img = load_image(&args.input)?;
    let channels = img.num_channels();
    let Some(view) = img.view(0).filter(|_| channels == 1) else {
        return Err(CliError::MultiChannel { channels });
    };
    info!(
        "loaded {} ({}x{})",
        args.input.display(),
        img.width,
        img.height
    );

    let params = OtsuParams {
        threshold_override: args.threshold,
        segment: SegmentParams::default(),
    };
    let result = run_otsu(&view, &params)?;

    if let Some(mask) = result.segmented.view(0) {
        save_channel(&args.output, &mask, args.bits)?;
    }
    info!("wrote {}", args.output.display());

    if let Some(path) = &args.report {
        OtsuReport::new(&args.input, &args.output, &result).write_json(path)?;
        info!("wrote report to {}", path.display());
    }

    Ok(result.threshold)
}
