//! Otsu thresholding and two-level segmentation.

use log::{debug, info};
use serde::{Deserialize, Serialize};

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::error::OtsuError;
use crate::histogram::IntensityHistogram;
use crate::image::{FloatImage, FloatImageView};

/// Result of the threshold search.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct OtsuThreshold {
    pub threshold: u8,
    /// `q1 * q2 * (m1 - m2)^2` at the chosen threshold.
    pub between_class_variance: f64,
}

/// Output levels of [`segment`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmentParams {
    /// Value written for samples above the threshold. Others become 0.
    pub max_intensity: f32,
}

impl Default for SegmentParams {
    fn default() -> Self {
        Self {
            max_intensity: 255.0,
        }
    }
}

/// Configuration for [`run_otsu`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OtsuParams {
    /// Use this threshold instead of searching for one.
    pub threshold_override: Option<u8>,
    pub segment: SegmentParams,
}

/// Outcome of [`run_otsu`].
#[derive(Clone, Debug)]
pub struct OtsuResult {
    pub threshold: u8,
    /// `None` when the threshold was overridden.
    pub between_class_variance: Option<f64>,
    pub overridden: bool,
    pub total_pixels: u64,
    pub segmented: FloatImage,
}

/// Threshold maximising the between-class variance of `hist`.
///
/// When the maximum holds over a run of consecutive thresholds (empty
/// buckets between two modes) the middle of the run is returned. A
/// histogram with a single occupied bucket yields that bucket with zero
/// variance.
#[cfg_attr(feature = "tracing", instrument(level = "debug", skip(hist)))]
pub fn otsu_threshold(hist: &IntensityHistogram) -> Result<OtsuThreshold, OtsuError> {
    let total = hist.total() as f64;
    if total == 0.0 {
        return Err(OtsuError::EmptyHistogram);
    }
    let sum_total = hist.sum();

    let mut q1 = 0f64;
    let mut sum_b = 0f64;
    // (variance, first threshold, last threshold) of the best run.
    let mut best: Option<(f64, usize, usize)> = None;

    for (t, &h) in hist.counts.iter().enumerate() {
        q1 += h as f64;
        if q1 == 0.0 {
            continue;
        }
        let q2 = total - q1;
        if q2 == 0.0 {
            break;
        }

        sum_b += t as f64 * h as f64;
        let m1 = sum_b / q1;
        let m2 = (sum_total - sum_b) / q2;
        let var = q1 * q2 * (m1 - m2) * (m1 - m2);

        best = match best {
            None => Some((var, t, t)),
            Some((best_var, _, _)) if var > best_var => Some((var, t, t)),
            Some((best_var, first, last)) if var == best_var && t == last + 1 => {
                Some((best_var, first, t))
            }
            keep => keep,
        };
    }

    let result = match best {
        Some((var, first, last)) => OtsuThreshold {
            threshold: ((first + last) / 2) as u8,
            between_class_variance: var,
        },
        None => {
            let bucket = hist.counts.iter().position(|&c| c > 0).unwrap_or(0);
            OtsuThreshold {
                threshold: bucket as u8,
                between_class_variance: 0.0,
            }
        }
    };
    debug!(
        "otsu threshold {} (variance {:.3})",
        result.threshold, result.between_class_variance
    );
    Ok(result)
}

/// Map samples `> threshold` to `params.max_intensity` and the rest to 0.
pub fn segment(view: &FloatImageView<'_>, threshold: u8, params: &SegmentParams) -> FloatImage {
    let t = threshold as f32;
    let hi = params.max_intensity;
    FloatImage::map_view(view, |v| if v > t { hi } else { 0.0 })
}

/// Histogram, threshold (searched or overridden) and segment one channel.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "info", skip(view, params), fields(width = view.width, height = view.height))
)]
pub fn run_otsu(view: &FloatImageView<'_>, params: &OtsuParams) -> Result<OtsuResult, OtsuError> {
    let hist = IntensityHistogram::from_view(view);
    let total_pixels = hist.total();

    let (threshold, between_class_variance, overridden) = match params.threshold_override {
        Some(t) => (t, None, true),
        None => {
            let found = otsu_threshold(&hist)?;
            (found.threshold, Some(found.between_class_variance), false)
        }
    };
    info!(
        "threshold {threshold}{}",
        if overridden { " (override)" } else { "" }
    );

    Ok(OtsuResult {
        threshold,
        between_class_variance,
        overridden,
        total_pixels,
        segmented: segment(view, threshold, &params.segment),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_clusters(lo: f32, hi: f32, per_cluster: usize) -> Vec<f32> {
        let mut samples = vec![lo; per_cluster];
        samples.extend(std::iter::repeat(hi).take(per_cluster));
        samples
    }

    #[test]
    fn separates_two_clusters_in_the_middle_of_the_gap() {
        let hist = IntensityHistogram::from_samples(&two_clusters(10.0, 200.0, 50));
        let found = otsu_threshold(&hist).unwrap();
        assert!(found.threshold > 10 && found.threshold < 200);
        assert_eq!(found.threshold, 104);
        assert!(found.between_class_variance > 0.0);
    }

    #[test]
    fn matches_textbook_three_level_example() {
        // Buckets 0, 1, 2 with counts 3, 2, 1. The best split is after bucket 0 or 1;
        // q1*q2*(m1-m2)^2: t=0 -> 3*3*(0-4/3)^2 = 16, t=1 -> 5*1*(0.4-2)^2 = 12.8.
        let hist = IntensityHistogram::from_samples(&[0.0, 0.0, 0.0, 1.0, 1.0, 2.0]);
        let found = otsu_threshold(&hist).unwrap();
        assert_eq!(found.threshold, 0);
        approx::assert_relative_eq!(found.between_class_variance, 16.0, epsilon = 1e-9);
    }

    #[test]
    fn single_value_yields_that_value() {
        let hist = IntensityHistogram::from_samples(&[42.0; 16]);
        let found = otsu_threshold(&hist).unwrap();
        assert_eq!(found.threshold, 42);
        assert_eq!(found.between_class_variance, 0.0);
    }

    #[test]
    fn empty_histogram_is_an_error() {
        assert_eq!(
            otsu_threshold(&IntensityHistogram::default()).unwrap_err(),
            OtsuError::EmptyHistogram
        );
    }

    #[test]
    fn override_skips_the_search() {
        let data = two_clusters(10.0, 200.0, 8);
        let view = FloatImageView {
            width: 4,
            height: 4,
            data: &data,
        };
        let params = OtsuParams {
            threshold_override: Some(250),
            ..OtsuParams::default()
        };
        let res = run_otsu(&view, &params).unwrap();
        assert!(res.overridden);
        assert_eq!(res.threshold, 250);
        assert_eq!(res.between_class_variance, None);
        assert!(res.segmented.channel(0).unwrap().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn segment_uses_configured_levels() {
        let data = [5.0, 100.0, 101.0, 250.0];
        let view = FloatImageView {
            width: 2,
            height: 2,
            data: &data,
        };
        let out = segment(&view, 100, &SegmentParams { max_intensity: 1.0 });
        assert_eq!(out.channel(0).unwrap(), &[0.0, 0.0, 1.0, 1.0]);
        assert_eq!((out.width, out.height), (2, 2));
    }
}
