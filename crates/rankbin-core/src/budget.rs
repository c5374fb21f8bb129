//! Scratch buffer sizing.
//!
//! Bins are collected in a scratch buffer before being copied into their
//! exact-size storage. For very large inputs in adaptive mode the buffer is
//! seeded with the expected bin population instead of `n`. The buffer is a
//! `Vec`, so a skewed distribution only costs a reallocation.

use crate::params::BinningMode;

/// Inputs above this many elements (one 6000x6000 channel) get a reduced
/// scratch buffer.
pub const SAVE_MEMORY_THRESHOLD: usize = 6000 * 6000;

/// Initial scratch capacity for `n` elements split into `bins` bins.
pub fn scratch_capacity(n: usize, bins: usize, mode: BinningMode) -> usize {
    if n <= SAVE_MEMORY_THRESHOLD || !mode.is_adaptive() {
        return n;
    }
    if bins > 1 {
        n / (bins - 1)
    } else {
        n
    }
}
