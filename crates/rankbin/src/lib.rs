//! High-level facade crate for the `rankbin` workspace.
//!
//! This crate provides:
//! - re-exports of the numeric core (`rankbin-core`): the rank-ordered
//!   binning container and Otsu thresholding;
//! - (feature `image`) loading and saving images as planar `f32` channels;
//! - JSON reports for segmentation and binning runs;
//! - (feature `cli`) the `rankbin-otsu` command-line segmentation tool.
//!
//! ## Quickstart
//!
//! ```no_run
//! use rankbin::io::{load_image, save_channel, BitDepth};
//! use rankbin::{run_otsu, OtsuParams};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let img = load_image("cells.png")?;
//! let view = img.view(0).ok_or("no channels")?;
//! let res = run_otsu(&view, &OtsuParams::default())?;
//! println!("threshold: {}", res.threshold);
//! if let Some(mask) = res.segmented.view(0) {
//!     save_channel("mask.png", &mask, BitDepth::Eight)?;
//! }
//! # Ok(())
//! # }
//! ```
//!
//! Binning pixels by intensity:
//!
//! ```
//! use rankbin::{BinningParams, RankedBinner};
//!
//! let intensity = [12.0, 250.0, 3.0, 128.0, 64.0, 200.0];
//! let pixel_index: Vec<usize> = (0..intensity.len()).collect();
//! let bins = RankedBinner::new(&pixel_index, &intensity, &BinningParams::adaptive(3)).unwrap();
//! assert_eq!(bins.data(0).unwrap(), &[2, 0]);
//! assert_eq!(bins.limit_end(2).unwrap(), 250.0);
//! ```
//!
//! ## API map
//! - `rankbin::core`: the whole numeric crate.
//! - `rankbin::io` (feature `image`): [`io::load_image`], [`io::save_channel`].
//! - `rankbin::report`: [`report::OtsuReport`], [`report::BinningReport`].

pub use rankbin_core as core;

pub use rankbin_core::{
    otsu_threshold, run_otsu, segment, BinSummary, BinView, BinningError, BinningMode,
    BinningParams, BoundaryPolicy, FloatImage, FloatImageView, IntensityHistogram, OtsuError,
    OtsuParams, OtsuResult, OtsuThreshold, RankedBinner, SegmentParams,
};

#[cfg(feature = "image")]
pub mod io;
pub mod report;
