/// Errors returned by [`crate::RankedBinner`] construction and accessors.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum BinningError {
    #[error("bin index {bin} out of range (histogram has {bins} bins)")]
    OutOfRange { bin: usize, bins: usize },

    #[error("data and rank lengths differ (data={data}, rank={rank})")]
    LengthMismatch { data: usize, rank: usize },

    #[error("cannot bin an empty input")]
    EmptyInput,

    #[error("bin count must be at least 1")]
    ZeroBins,

    #[error("rank value at index {index} is not finite ({value})")]
    NonFiniteRank { index: usize, value: f32 },
}

/// Errors produced by the Otsu threshold search.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum OtsuError {
    #[error("histogram is empty, no threshold to compute")]
    EmptyHistogram,
}

/// Errors produced when assembling a [`crate::FloatImage`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ImageError {
    #[error("invalid image dimensions (width={width}, height={height})")]
    InvalidDimensions { width: usize, height: usize },

    #[error("channel {channel} has {got} samples, expected {expected}")]
    ChannelLength {
        channel: usize,
        expected: usize,
        got: usize,
    },
}
