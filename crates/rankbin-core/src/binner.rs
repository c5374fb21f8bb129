//! Rank-ordered binning container.
//!
//! [`RankedBinner`] partitions a payload array into a fixed number of bins
//! using an auxiliary rank array as the sort and partition key. Bins are
//! either equal in rank width or equal in population, and each one owns a
//! copy of its payload and ranks.

use log::debug;
use serde::{Deserialize, Serialize};

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::budget::scratch_capacity;
use crate::error::BinningError;
use crate::params::{BinningMode, BinningParams, BoundaryPolicy};
use crate::ranking::{argsort, first_non_finite};

#[derive(Clone, Debug)]
struct Bin<T> {
    begin: f32,
    end: f32,
    data: Box<[T]>,
    rank: Box<[f32]>,
}

impl<T> Bin<T> {
    fn empty_at(limit: f32) -> Self {
        Self {
            begin: limit,
            end: limit,
            data: Box::default(),
            rank: Box::default(),
        }
    }
}

/// Elements of the bin being filled. Reused across bins.
struct Scratch<T> {
    data: Vec<T>,
    rank: Vec<f32>,
}

impl<T: Copy> Scratch<T> {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            data: Vec::with_capacity(capacity),
            rank: Vec::with_capacity(capacity),
        }
    }

    fn len(&self) -> usize {
        self.data.len()
    }

    fn push(&mut self, value: T, rank: f32) {
        self.data.push(value);
        self.rank.push(rank);
    }

    /// Copy the buffered elements into an exact-size bin and clear the buffer.
    fn commit(&mut self, begin: f32, end: f32) -> Bin<T> {
        let bin = Bin {
            begin,
            end,
            data: Box::from(self.data.as_slice()),
            rank: Box::from(self.rank.as_slice()),
        };
        self.data.clear();
        self.rank.clear();
        bin
    }
}

/// Borrowed view of one bin.
#[derive(Clone, Copy, Debug)]
pub struct BinView<'a, T> {
    pub index: usize,
    /// Lower rank bound.
    pub begin: f32,
    /// Upper rank bound.
    pub end: f32,
    pub data: &'a [T],
    pub rank: &'a [f32],
}

impl<T> BinView<'_, T> {
    pub fn count(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Bounds and population of one bin, for reports.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BinSummary {
    pub index: usize,
    pub begin: f32,
    pub end: f32,
    pub count: usize,
}

/// A fixed set of rank-contiguous bins built once from `data` and `rank`.
///
/// Invariants, for `B = bin_count()`:
/// - `limit_begin(0) == min(rank)` and `limit_end(B - 1) == max(rank)`;
/// - `limit_end(b) == limit_begin(b + 1)`;
/// - the element counts sum to the input length under
///   [`BoundaryPolicy::AssignAll`], and to the input length minus the
///   number of internal closures under [`BoundaryPolicy::DropTrigger`].
///
/// The container never aliases the input slices and has no mutating API.
#[derive(Clone, Debug)]
pub struct RankedBinner<T> {
    params: BinningParams,
    min_rank: f32,
    max_rank: f32,
    input_len: usize,
    bins: Vec<Bin<T>>,
}

impl<T: Copy> RankedBinner<T> {
    /// Partition `data` by `rank`.
    ///
    /// Fails when the slices differ in length, are empty, contain a
    /// non-finite rank, or when `params.bins == 0`. Requesting more bins
    /// than elements is allowed; the surplus bins are empty.
    #[cfg_attr(
        feature = "tracing",
        instrument(
            level = "debug",
            skip(data, rank, params),
            fields(n = data.len(), bins = params.bins, mode = ?params.mode)
        )
    )]
    pub fn new(data: &[T], rank: &[f32], params: &BinningParams) -> Result<Self, BinningError> {
        if data.len() != rank.len() {
            return Err(BinningError::LengthMismatch {
                data: data.len(),
                rank: rank.len(),
            });
        }
        if data.is_empty() {
            return Err(BinningError::EmptyInput);
        }
        if params.bins == 0 {
            return Err(BinningError::ZeroBins);
        }
        if let Some((index, value)) = first_non_finite(rank) {
            return Err(BinningError::NonFiniteRank { index, value });
        }

        let n = data.len();
        let bin_count = params.bins;
        let last_bin = bin_count - 1;

        let order = argsort(rank);
        let min_rank = rank[order[0]];
        let max_rank = rank[order[n - 1]];

        let samples_per_bin = n / bin_count;
        let step = (max_rank - min_rank) / bin_count as f32;

        let mut scratch = Scratch::with_capacity(scratch_capacity(n, bin_count, params.mode));
        let mut bins: Vec<Bin<T>> = Vec::with_capacity(bin_count);
        let mut lim0 = min_rank;
        let mut dropped = 0usize;

        for &idx in &order {
            let candidate = rank[idx];
            let closes = bins.len() != last_bin
                && match params.mode {
                    BinningMode::Adaptive => scratch.len() >= samples_per_bin,
                    // A zero step means all ranks are equal: keep them in one bin.
                    BinningMode::EqualWidth => step > 0.0 && candidate - lim0 >= step,
                };

            if closes {
                let bin = scratch.commit(lim0, candidate);
                debug!(
                    "bin {}: [{}, {}) {} elements",
                    bins.len(),
                    bin.begin,
                    bin.end,
                    bin.data.len()
                );
                bins.push(bin);
                lim0 = candidate;

                if params.boundary == BoundaryPolicy::DropTrigger {
                    dropped += 1;
                    continue;
                }
            }

            scratch.push(data[idx], candidate);
        }

        // Flush the open bin, then pad bins that were never reached.
        let bin = scratch.commit(lim0, max_rank);
        debug!(
            "bin {}: [{}, {}] {} elements",
            bins.len(),
            bin.begin,
            bin.end,
            bin.data.len()
        );
        bins.push(bin);
        while bins.len() < bin_count {
            bins.push(Bin::empty_at(max_rank));
        }
        if let Some(bin) = bins.last_mut() {
            bin.end = max_rank;
        }

        debug!(
            "binned {n} elements into {bin_count} {:?} bins over [{min_rank}, {max_rank}], {dropped} dropped",
            params.mode
        );

        Ok(Self {
            params: params.clone(),
            min_rank,
            max_rank,
            input_len: n,
            bins,
        })
    }
}

impl<T> RankedBinner<T> {
    fn get(&self, bin: usize) -> Result<&Bin<T>, BinningError> {
        self.bins.get(bin).ok_or(BinningError::OutOfRange {
            bin,
            bins: self.bins.len(),
        })
    }

    /// Number of bins.
    pub fn bin_count(&self) -> usize {
        self.bins.len()
    }

    /// Lower rank bound of `bin`.
    pub fn limit_begin(&self, bin: usize) -> Result<f32, BinningError> {
        Ok(self.get(bin)?.begin)
    }

    /// Upper rank bound of `bin`.
    pub fn limit_end(&self, bin: usize) -> Result<f32, BinningError> {
        Ok(self.get(bin)?.end)
    }

    /// Number of elements in `bin`.
    pub fn count(&self, bin: usize) -> Result<usize, BinningError> {
        Ok(self.get(bin)?.data.len())
    }

    /// Payload elements of `bin`, in rank order.
    pub fn data(&self, bin: usize) -> Result<&[T], BinningError> {
        Ok(&self.get(bin)?.data)
    }

    /// Ranks of the elements of `bin`, non-decreasing.
    pub fn rank(&self, bin: usize) -> Result<&[f32], BinningError> {
        Ok(&self.get(bin)?.rank)
    }

    pub fn bin(&self, bin: usize) -> Result<BinView<'_, T>, BinningError> {
        let b = self.get(bin)?;
        Ok(BinView {
            index: bin,
            begin: b.begin,
            end: b.end,
            data: &b.data,
            rank: &b.rank,
        })
    }

    /// All bins in rank order.
    pub fn iter(&self) -> impl Iterator<Item = BinView<'_, T>> + '_ {
        self.bins.iter().enumerate().map(|(index, b)| BinView {
            index,
            begin: b.begin,
            end: b.end,
            data: &b.data,
            rank: &b.rank,
        })
    }

    /// Sum of all bin counts.
    pub fn total_count(&self) -> usize {
        self.bins.iter().map(|b| b.data.len()).sum()
    }

    /// Length of the input the container was built from.
    pub fn input_len(&self) -> usize {
        self.input_len
    }

    pub fn min_rank(&self) -> f32 {
        self.min_rank
    }

    pub fn max_rank(&self) -> f32 {
        self.max_rank
    }

    pub fn params(&self) -> &BinningParams {
        &self.params
    }

    pub fn summary(&self) -> Vec<BinSummary> {
        self.iter()
            .map(|b| BinSummary {
                index: b.index,
                begin: b.begin,
                end: b.end,
                count: b.count(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sequential(n: usize) -> (Vec<u32>, Vec<f32>) {
        let data: Vec<u32> = (0..n as u32).collect();
        let rank: Vec<f32> = data.iter().map(|&v| v as f32).collect();
        (data, rank)
    }

    #[test]
    fn rejects_invalid_input() {
        let params = BinningParams::equal_width(2);
        assert_eq!(
            RankedBinner::new(&[1u8, 2], &[0.0], &params).unwrap_err(),
            BinningError::LengthMismatch { data: 2, rank: 1 }
        );
        assert_eq!(
            RankedBinner::<u8>::new(&[], &[], &params).unwrap_err(),
            BinningError::EmptyInput
        );
        assert_eq!(
            RankedBinner::new(&[1u8], &[0.0], &BinningParams::equal_width(0)).unwrap_err(),
            BinningError::ZeroBins
        );
        let err = RankedBinner::new(&[1u8, 2, 3], &[0.0, f32::NAN, 1.0], &params).unwrap_err();
        assert!(matches!(err, BinningError::NonFiniteRank { index: 1, .. }));
    }

    #[test]
    fn accessors_fail_out_of_range() {
        let (data, rank) = sequential(8);
        let binner = RankedBinner::new(&data, &rank, &BinningParams::adaptive(4)).unwrap();
        let expected = BinningError::OutOfRange { bin: 4, bins: 4 };
        assert_eq!(binner.limit_begin(4).unwrap_err(), expected);
        assert_eq!(binner.limit_end(4).unwrap_err(), expected);
        assert_eq!(binner.count(4).unwrap_err(), expected);
        assert_eq!(binner.data(4).unwrap_err(), expected);
        assert_eq!(binner.rank(4).unwrap_err(), expected);
        assert!(binner.bin(usize::MAX).is_err());
    }

    #[test]
    fn bins_hold_copies_in_rank_order() {
        let data = ['d', 'a', 'c', 'b'];
        let rank = [3.0, 0.0, 2.0, 1.0];
        let binner = RankedBinner::new(&data, &rank, &BinningParams::adaptive(2)).unwrap();
        assert_eq!(binner.data(0).unwrap(), &['a', 'b']);
        assert_eq!(binner.rank(0).unwrap(), &[0.0, 1.0]);
        assert_eq!(binner.data(1).unwrap(), &['c', 'd']);
        assert_eq!(binner.rank(1).unwrap(), &[2.0, 3.0]);
    }

    #[test]
    fn summary_matches_accessors() {
        let (data, rank) = sequential(30);
        let binner = RankedBinner::new(&data, &rank, &BinningParams::equal_width(3)).unwrap();
        let summary = binner.summary();
        assert_eq!(summary.len(), 3);
        for s in &summary {
            assert_eq!(s.count, binner.count(s.index).unwrap());
            assert_eq!(s.begin, binner.limit_begin(s.index).unwrap());
            assert_eq!(s.end, binner.limit_end(s.index).unwrap());
        }
        assert_eq!(binner.iter().count(), 3);
    }
}
