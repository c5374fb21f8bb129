use crate::error::ImageError;

/// Borrowed single channel of intensity samples, row-major, `len = w*h`.
#[derive(Clone, Copy, Debug)]
pub struct FloatImageView<'a> {
    pub width: usize,
    pub height: usize,
    pub data: &'a [f32],
}

impl FloatImageView<'_> {
    /// Sample at `(x, y)`, `None` outside the image.
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> Option<f32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.data.get(y * self.width + x).copied()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Planar image with one `Vec<f32>` per channel. Samples are nominally in
/// `[0, 255]` regardless of the source bit depth.
#[derive(Clone, Debug, PartialEq)]
pub struct FloatImage {
    pub width: usize,
    pub height: usize,
    channels: Vec<Vec<f32>>,
}

impl FloatImage {
    /// Build an image from planar channels, each of length `width * height`.
    pub fn new(width: usize, height: usize, channels: Vec<Vec<f32>>) -> Result<Self, ImageError> {
        let Some(expected) = width.checked_mul(height) else {
            return Err(ImageError::InvalidDimensions { width, height });
        };
        for (channel, plane) in channels.iter().enumerate() {
            if plane.len() != expected {
                return Err(ImageError::ChannelLength {
                    channel,
                    expected,
                    got: plane.len(),
                });
            }
        }
        Ok(Self {
            width,
            height,
            channels,
        })
    }

    /// Single-channel image.
    pub fn single(width: usize, height: usize, data: Vec<f32>) -> Result<Self, ImageError> {
        Self::new(width, height, vec![data])
    }

    /// Single-channel image filled with `value`.
    pub fn filled(width: usize, height: usize, value: f32) -> Self {
        Self {
            width,
            height,
            channels: vec![vec![value; width * height]],
        }
    }

    /// Single-channel image with `f` applied to every sample of `view`.
    pub fn map_view(view: &FloatImageView<'_>, f: impl FnMut(f32) -> f32) -> Self {
        Self {
            width: view.width,
            height: view.height,
            channels: vec![view.data.iter().copied().map(f).collect()],
        }
    }

    pub fn num_channels(&self) -> usize {
        self.channels.len()
    }

    /// Number of samples per channel.
    pub fn len(&self) -> usize {
        self.width * self.height
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn channel(&self, index: usize) -> Option<&[f32]> {
        self.channels.get(index).map(Vec::as_slice)
    }

    pub fn channel_mut(&mut self, index: usize) -> Option<&mut [f32]> {
        self.channels.get_mut(index).map(Vec::as_mut_slice)
    }

    pub fn view(&self, index: usize) -> Option<FloatImageView<'_>> {
        self.channel(index).map(|data| FloatImageView {
            width: self.width,
            height: self.height,
            data,
        })
    }

    pub fn into_channels(self) -> Vec<Vec<f32>> {
        self.channels
    }
}
