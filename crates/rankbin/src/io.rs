//! Image file I/O on top of the `image` crate.
//!
//! Decoded images are converted to planar `f32` channels in `[0, 255]`
//! whatever their bit depth, which is the range the core algorithms expect.

use std::path::Path;

use image::{DynamicImage, ImageBuffer, ImageReader, Luma};
use log::debug;
use rankbin_core::{FloatImage, FloatImageView, ImageError};
use serde::{Deserialize, Serialize};

#[cfg(feature = "tracing")]
use tracing::instrument;

const U16_TO_U8: f32 = 255.0 / 65535.0;
const U8_TO_U16: f32 = 65535.0 / 255.0;

/// Errors produced while reading or writing image files.
#[derive(thiserror::Error, Debug)]
pub enum ImageIoError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Image(#[from] image::ImageError),

    #[error(transparent)]
    Layout(#[from] ImageError),

    #[error("unsupported color type {0:?}")]
    UnsupportedColor(image::ColorType),

    #[error("image dimensions do not fit the output format (width={width}, height={height})")]
    Dimensions { width: usize, height: usize },

    #[error("invalid grayscale buffer length (expected {expected} samples, got {got})")]
    Buffer { expected: usize, got: usize },
}

/// Sample depth of written images.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BitDepth {
    #[default]
    Eight,
    Sixteen,
}

impl BitDepth {
    pub fn from_bits(bits: u8) -> Option<Self> {
        match bits {
            8 => Some(BitDepth::Eight),
            16 => Some(BitDepth::Sixteen),
            _ => None,
        }
    }

    pub fn bits(self) -> u8 {
        match self {
            BitDepth::Eight => 8,
            BitDepth::Sixteen => 16,
        }
    }
}

/// Decode an image file into planar `[0, 255]` channels.
#[cfg_attr(feature = "tracing", instrument(level = "info", skip(path)))]
pub fn load_image(path: impl AsRef<Path>) -> Result<FloatImage, ImageIoError> {
    let path = path.as_ref();
    let img = ImageReader::open(path)?.decode()?;
    debug!(
        "decoded {} ({}x{}, {:?})",
        path.display(),
        img.width(),
        img.height(),
        img.color()
    );
    float_image_from_dynamic(&img)
}

/// Convert a decoded image into planar `[0, 255]` channels.
pub fn float_image_from_dynamic(img: &DynamicImage) -> Result<FloatImage, ImageIoError> {
    let width = img.width() as usize;
    let height = img.height() as usize;
    let channels = match img {
        DynamicImage::ImageLuma8(buf) => planes(buf.as_raw(), 1, 1.0),
        DynamicImage::ImageLumaA8(buf) => planes(buf.as_raw(), 2, 1.0),
        DynamicImage::ImageRgb8(buf) => planes(buf.as_raw(), 3, 1.0),
        DynamicImage::ImageRgba8(buf) => planes(buf.as_raw(), 4, 1.0),
        DynamicImage::ImageLuma16(buf) => planes(buf.as_raw(), 1, U16_TO_U8),
        DynamicImage::ImageLumaA16(buf) => planes(buf.as_raw(), 2, U16_TO_U8),
        DynamicImage::ImageRgb16(buf) => planes(buf.as_raw(), 3, U16_TO_U8),
        DynamicImage::ImageRgba16(buf) => planes(buf.as_raw(), 4, U16_TO_U8),
        DynamicImage::ImageRgb32F(buf) => planes(buf.as_raw(), 3, 255.0),
        DynamicImage::ImageRgba32F(buf) => planes(buf.as_raw(), 4, 255.0),
        other => return Err(ImageIoError::UnsupportedColor(other.color())),
    };
    Ok(FloatImage::new(width, height, channels)?)
}

fn planes<S: Copy + Into<f32>>(raw: &[S], channels: usize, scale: f32) -> Vec<Vec<f32>> {
    let n = raw.len() / channels;
    let mut out: Vec<Vec<f32>> = (0..channels).map(|_| Vec::with_capacity(n)).collect();
    for px in raw.chunks_exact(channels) {
        for (plane, &s) in out.iter_mut().zip(px) {
            plane.push(s.into() * scale);
        }
    }
    out
}

/// Write one channel as a grayscale image; the format follows the extension.
///
/// Samples are rounded and clamped to `[0, 255]`, then scaled to the full
/// 16-bit range for [`BitDepth::Sixteen`].
#[cfg_attr(
    feature = "tracing",
    instrument(level = "info", skip(path, view), fields(width = view.width, height = view.height))
)]
pub fn save_channel(
    path: impl AsRef<Path>,
    view: &FloatImageView<'_>,
    depth: BitDepth,
) -> Result<(), ImageIoError> {
    let dims = || ImageIoError::Dimensions {
        width: view.width,
        height: view.height,
    };
    let width = u32::try_from(view.width).map_err(|_| dims())?;
    let height = u32::try_from(view.height).map_err(|_| dims())?;
    let expected = view.width.checked_mul(view.height).ok_or_else(dims)?;
    let buffer_err = || ImageIoError::Buffer {
        expected,
        got: view.data.len(),
    };

    let path = path.as_ref();
    match depth {
        BitDepth::Eight => {
            let px: Vec<u8> = view
                .data
                .iter()
                .map(|&v| v.round().clamp(0.0, 255.0) as u8)
                .collect();
            let buf = image::GrayImage::from_raw(width, height, px).ok_or_else(buffer_err)?;
            buf.save(path)?;
        }
        BitDepth::Sixteen => {
            let px: Vec<u16> = view
                .data
                .iter()
                .map(|&v| (v.clamp(0.0, 255.0) * U8_TO_U16).round() as u16)
                .collect();
            let buf = ImageBuffer::<Luma<u16>, Vec<u16>>::from_raw(width, height, px)
                .ok_or_else(buffer_err)?;
            buf.save(path)?;
        }
    }
    debug!("wrote {} ({} bits)", path.display(), depth.bits());
    Ok(())
}
