use serde::{Deserialize, Serialize};

/// How bin boundaries are chosen.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BinningMode {
    /// Every bin spans `(max - min) / bins` of the rank range.
    #[default]
    EqualWidth,
    /// Every bin but the last holds `floor(n / bins)` elements; the last
    /// one absorbs the remainder.
    Adaptive,
}

impl BinningMode {
    pub fn is_adaptive(self) -> bool {
        matches!(self, BinningMode::Adaptive)
    }
}

/// What happens to the element whose rank closes a bin.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundaryPolicy {
    /// The element opens the next bin. Every input lands in exactly one bin.
    #[default]
    AssignAll,
    /// The element is discarded, one per internal boundary.
    ///
    /// Kept for consumers that were calibrated against the historic counts.
    DropTrigger,
}

/// Configuration for [`crate::RankedBinner`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BinningParams {
    /// Number of bins, at least 1.
    pub bins: usize,
    pub mode: BinningMode,
    pub boundary: BoundaryPolicy,
}

impl Default for BinningParams {
    fn default() -> Self {
        Self {
            bins: 16,
            mode: BinningMode::EqualWidth,
            boundary: BoundaryPolicy::AssignAll,
        }
    }
}

impl BinningParams {
    /// Equal-width binning with the default boundary policy.
    pub fn equal_width(bins: usize) -> Self {
        Self {
            bins,
            mode: BinningMode::EqualWidth,
            ..Self::default()
        }
    }

    /// Equal-population binning with the default boundary policy.
    pub fn adaptive(bins: usize) -> Self {
        Self {
            bins,
            mode: BinningMode::Adaptive,
            ..Self::default()
        }
    }

    pub fn with_boundary(mut self, boundary: BoundaryPolicy) -> Self {
        self.boundary = boundary;
        self
    }
}
