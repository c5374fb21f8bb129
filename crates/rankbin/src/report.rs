//! JSON reports for the segmentation driver and for binning runs.

use std::{fs, path::Path};

use rankbin_core::{BinSummary, BinningParams, OtsuResult, RankedBinner};
use serde::{Deserialize, Serialize};

#[derive(thiserror::Error, Debug)]
pub enum ReportError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Summary of one Otsu segmentation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OtsuReport {
    pub input: String,
    pub output: String,
    pub width: usize,
    pub height: usize,
    pub total_pixels: u64,
    pub threshold: u8,
    pub overridden: bool,
    #[serde(default)]
    pub between_class_variance: Option<f64>,
}

impl OtsuReport {
    pub fn new(input: &Path, output: &Path, result: &OtsuResult) -> Self {
        Self {
            input: input.to_string_lossy().into_owned(),
            output: output.to_string_lossy().into_owned(),
            width: result.segmented.width,
            height: result.segmented.height,
            total_pixels: result.total_pixels,
            threshold: result.threshold,
            overridden: result.overridden,
            between_class_variance: result.between_class_variance,
        }
    }

    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, ReportError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Write this report to disk as pretty JSON, creating parent directories.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), ReportError> {
        write_pretty(path.as_ref(), self)
    }
}

/// Bounds and populations of a [`RankedBinner`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BinningReport {
    pub params: BinningParams,
    pub input_len: usize,
    pub total_count: usize,
    pub min_rank: f32,
    pub max_rank: f32,
    pub bins: Vec<BinSummary>,
}

impl BinningReport {
    pub fn from_binner<T>(binner: &RankedBinner<T>) -> Self {
        Self {
            params: binner.params().clone(),
            input_len: binner.input_len(),
            total_count: binner.total_count(),
            min_rank: binner.min_rank(),
            max_rank: binner.max_rank(),
            bins: binner.summary(),
        }
    }

    pub fn to_json(&self) -> Result<String, ReportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), ReportError> {
        write_pretty(path.as_ref(), self)
    }
}

fn write_pretty<S: Serialize>(path: &Path, value: &S) -> Result<(), ReportError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json)?;
    Ok(())
}
