//! Rank-ordered binning and intensity thresholding.
//!
//! The crate is purely numeric: inputs are flat slices and
//! [`FloatImageView`]s, and it does *not* depend on any image codec.
//!
//! - [`RankedBinner`] partitions a payload array into bins ordered by a rank
//!   array, by equal rank width or by equal population.
//! - [`IntensityHistogram`], [`otsu_threshold`] and [`run_otsu`] implement
//!   Otsu thresholding and two-level segmentation of one channel.

mod binner;
mod budget;
mod error;
mod histogram;
mod image;
mod logger;
mod otsu;
mod params;
mod ranking;

pub use binner::{BinSummary, BinView, RankedBinner};
pub use budget::{scratch_capacity, SAVE_MEMORY_THRESHOLD};
pub use error::{BinningError, ImageError, OtsuError};
pub use histogram::{IntensityHistogram, NUM_BUCKETS};
pub use image::{FloatImage, FloatImageView};
pub use otsu::{
    otsu_threshold, run_otsu, segment, OtsuParams, OtsuResult, OtsuThreshold, SegmentParams,
};
pub use params::{BinningMode, BinningParams, BoundaryPolicy};

#[cfg(feature = "tracing")]
pub use logger::init_tracing;

pub use logger::init_with_level;
