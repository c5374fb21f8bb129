//! Fixed-range 256-bucket intensity histogram.

use log::info;

use crate::image::FloatImageView;

pub const NUM_BUCKETS: usize = 256;

/// Occurrence counts of integer intensities `0..=255`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IntensityHistogram {
    pub counts: [u32; NUM_BUCKETS],
}

impl Default for IntensityHistogram {
    fn default() -> Self {
        Self {
            counts: [0; NUM_BUCKETS],
        }
    }
}

impl IntensityHistogram {
    /// Count samples, truncating each toward zero and clamping to `0..=255`.
    pub fn from_samples(samples: &[f32]) -> Self {
        let mut hist = Self::default();
        for &v in samples {
            hist.counts[bucket_of(v)] += 1;
        }
        hist
    }

    /// Histogram of one image channel.
    pub fn from_view(view: &FloatImageView<'_>) -> Self {
        info!("total # of pixels: {}", view.len());
        Self::from_samples(view.data)
    }

    pub fn count(&self, bucket: u8) -> u32 {
        self.counts[bucket as usize]
    }

    /// Total number of samples.
    pub fn total(&self) -> u64 {
        self.counts.iter().map(|&c| c as u64).sum()
    }

    /// `sum(bucket * count)`.
    pub fn sum(&self) -> f64 {
        self.counts
            .iter()
            .enumerate()
            .map(|(i, &c)| i as f64 * c as f64)
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.iter().all(|&c| c == 0)
    }
}

#[inline]
fn bucket_of(value: f32) -> usize {
    // `as` saturates and maps NaN to 0.
    (value as i32).clamp(0, NUM_BUCKETS as i32 - 1) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncates_and_clamps() {
        let hist = IntensityHistogram::from_samples(&[0.9, 1.0, 1.99, -3.0, 300.0, 255.0, f32::NAN]);
        assert_eq!(hist.count(0), 3);
        assert_eq!(hist.count(1), 2);
        assert_eq!(hist.count(255), 2);
        assert_eq!(hist.total(), 7);
    }

    #[test]
    fn sum_weights_by_bucket() {
        let hist = IntensityHistogram::from_samples(&[2.0, 2.0, 10.0]);
        assert_eq!(hist.sum(), 14.0);
        assert!(!hist.is_empty());
        assert!(IntensityHistogram::default().is_empty());
    }
}
