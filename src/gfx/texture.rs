//! CPU-side texture images and the mipmap policy applied on upload

use std::path::Path;

use image::{imageops, imageops::FilterType, Rgba, RgbaImage};

/// Texture creation and decoding errors
#[derive(thiserror::Error, Debug)]
pub enum TextureError {
    #[error("texture must have non-zero size, got {width}x{height}")]
    ZeroSize { width: u32, height: u32 },

    #[error("expected {expected} bytes of pixel data for {width}x{height}, got {actual}")]
    SizeMismatch {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },

    #[error("texture is {width}x{height}, the device allows at most {max} per side")]
    TooLarge { width: u32, height: u32, max: u32 },

    #[error("failed to decode image: {0}")]
    Decode(#[from] image::ImageError),
}

/// RGBA8 pixels with their dimensions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureImage {
    image: RgbaImage,
}

impl TextureImage {
    /// Wraps RGBA8 pixel data (4 bytes per pixel, row-major)
    pub fn from_rgba(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, TextureError> {
        let actual = pixels.len();
        check_size(width, height, actual, 4)?;
        let image = RgbaImage::from_raw(width, height, pixels).ok_or(TextureError::SizeMismatch {
            width,
            height,
            expected: width as usize * height as usize * 4,
            actual,
        })?;
        Ok(Self { image })
    }

    /// Expands RGB8 pixel data to opaque RGBA8
    pub fn from_rgb(width: u32, height: u32, pixels: &[u8]) -> Result<Self, TextureError> {
        check_size(width, height, pixels.len(), 3)?;
        let rgba = pixels
            .chunks_exact(3)
            .flat_map(|rgb| [rgb[0], rgb[1], rgb[2], 255])
            .collect();
        Self::from_rgba(width, height, rgba)
    }

    /// A single opaque pixel, used before any texture has been set
    pub fn solid(color: [u8; 4]) -> Self {
        Self {
            image: RgbaImage::from_pixel(1, 1, Rgba(color)),
        }
    }

    /// Decodes an image file (PNG or JPEG)
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TextureError> {
        let image = image::open(path)?.to_rgba8();
        check_size(image.width(), image.height(), image.as_raw().len(), 4)?;
        Ok(Self { image })
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn pixels(&self) -> &[u8] {
        self.image.as_raw()
    }

    /// Fails when either dimension exceeds `max_dimension`
    ///
    /// `max_dimension` is the device's `max_texture_dimension_2d`.
    pub fn check_limits(&self, max_dimension: u32) -> Result<(), TextureError> {
        if self.width() > max_dimension || self.height() > max_dimension {
            return Err(TextureError::TooLarge {
                width: self.width(),
                height: self.height(),
                max: max_dimension,
            });
        }
        Ok(())
    }

    /// Both dimensions are powers of two
    pub fn is_power_of_two(&self) -> bool {
        self.width().is_power_of_two() && self.height().is_power_of_two()
    }

    /// Sampling setup for this image
    pub fn mip_policy(&self) -> MipPolicy {
        if self.is_power_of_two() {
            MipPolicy {
                level_count: mip_level_count(self.width(), self.height()),
                address_mode: wgpu::AddressMode::Repeat,
                mipmap_filter: wgpu::FilterMode::Linear,
            }
        } else {
            MipPolicy {
                level_count: 1,
                address_mode: wgpu::AddressMode::ClampToEdge,
                mipmap_filter: wgpu::FilterMode::Nearest,
            }
        }
    }

    /// Every mip level to upload, base level first
    ///
    /// Each level halves both dimensions (never below 1) with a triangle filter.
    pub fn mip_chain(&self) -> Vec<TextureImage> {
        let level_count = self.mip_policy().level_count;
        let mut chain = Vec::with_capacity(level_count as usize);
        chain.push(self.clone());
        for _ in 1..level_count {
            let previous = &chain[chain.len() - 1].image;
            let width = (previous.width() / 2).max(1);
            let height = (previous.height() / 2).max(1);
            let image = imageops::resize(previous, width, height, FilterType::Triangle);
            chain.push(TextureImage { image });
        }
        chain
    }
}

/// Filtering and mip setup derived from the image dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MipPolicy {
    pub level_count: u32,
    pub address_mode: wgpu::AddressMode,
    pub mipmap_filter: wgpu::FilterMode,
}

/// Number of levels in a full mip chain down to 1x1
pub fn mip_level_count(width: u32, height: u32) -> u32 {
    32 - width.max(height).max(1).leading_zeros()
}

fn check_size(width: u32, height: u32, len: usize, channels: usize) -> Result<(), TextureError> {
    if width == 0 || height == 0 {
        return Err(TextureError::ZeroSize { width, height });
    }
    let expected = width as usize * height as usize * channels;
    if len != expected {
        return Err(TextureError::SizeMismatch {
            width,
            height,
            expected,
            actual: len,
        });
    }
    Ok(())
}
