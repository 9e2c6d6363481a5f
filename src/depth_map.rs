//! Single-channel depth buffers
//!
//! Depth is stored as row-major `f32`. Integer images are normalized to
//! `[0, 1]` on load; float images keep their values.

use glam::Vec2;
use image::DynamicImage;
use std::path::Path;
use thiserror::Error;

/// Depth buffer loading/construction error
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DepthMapError {
    /// Image decoding or file error
    #[error("Failed to read depth image: {0}")]
    Image(#[from] image::ImageError),
    /// Buffer length does not match the dimensions
    #[error("Depth buffer has {actual} samples, expected {expected} for {width}x{height}")]
    SizeMismatch { width: u32, height: u32, expected: usize, actual: usize },
    /// Zero width or height
    #[error("Depth map must have non-zero dimensions, got {width}x{height}")]
    Empty { width: u32, height: u32 },
}

/// A depth buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct DepthMap {
    width: u32,
    height: u32,
    data: Vec<f32>,
}

impl DepthMap {
    /// Wrap a row-major buffer of `width * height` depths.
    pub fn new(width: u32, height: u32, data: Vec<f32>) -> Result<Self, DepthMapError> {
        if width == 0 || height == 0 {
            return Err(DepthMapError::Empty { width, height });
        }
        let expected = width as usize * height as usize;
        if data.len() != expected {
            return Err(DepthMapError::SizeMismatch { width, height, expected, actual: data.len() });
        }
        Ok(Self { width, height, data })
    }

    /// A map with every texel set to `depth`.
    ///
    /// # Panics
    ///
    /// Panics if either dimension is zero.
    pub fn filled(width: u32, height: u32, depth: f32) -> Self {
        Self::from_fn(width, height, |_, _| depth)
    }

    /// Build a map from a per-texel function.
    ///
    /// # Panics
    ///
    /// Panics if either dimension is zero.
    pub fn from_fn(width: u32, height: u32, mut f: impl FnMut(u32, u32) -> f32) -> Self {
        assert!(width > 0 && height > 0, "depth map dimensions must be non-zero");
        let mut data = Vec::with_capacity(width as usize * height as usize);
        for y in 0..height {
            for x in 0..width {
                data.push(f(x, y));
            }
        }
        Self { width, height, data }
    }

    /// Convert a decoded image to depth.
    ///
    /// | Source | Depth |
    /// |--------|-------|
    /// | 8-bit luma | `v / 255` |
    /// | 16-bit luma | `v / 65535` |
    /// | 32-bit float | first channel, unchanged |
    /// | anything else | converted to 16-bit luma first |
    pub fn from_image(image: &DynamicImage) -> Result<Self, DepthMapError> {
        let (width, height) = (image.width(), image.height());
        let data: Vec<f32> = match image {
            DynamicImage::ImageLuma8(buf) => {
                buf.as_raw().iter().map(|&v| v as f32 / u8::MAX as f32).collect()
            }
            DynamicImage::ImageLuma16(buf) => {
                buf.as_raw().iter().map(|&v| v as f32 / u16::MAX as f32).collect()
            }
            DynamicImage::ImageRgb32F(buf) => buf.pixels().map(|p| p.0[0]).collect(),
            DynamicImage::ImageRgba32F(buf) => buf.pixels().map(|p| p.0[0]).collect(),
            other => {
                other.to_luma16().as_raw().iter().map(|&v| v as f32 / u16::MAX as f32).collect()
            }
        };
        Self::new(width, height, data)
    }

    /// Load a depth map from an image file.
    pub fn load(path: &Path) -> Result<Self, DepthMapError> {
        let image = image::open(path)?;
        tracing::debug!(
            path = %path.display(),
            color = ?image.color(),
            width = image.width(),
            height = image.height(),
            "decoded depth image"
        );
        Self::from_image(&image)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Dimensions as the filter's resolution vector.
    pub fn resolution(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32)
    }

    /// Depth at texel `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if the coordinate is out of bounds.
    pub fn get(&self, x: u32, y: u32) -> f32 {
        self.data[y as usize * self.width as usize + x as usize]
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [f32] {
        &mut self.data
    }

    /// Normalized uv of the center of texel `(x, y)`.
    pub fn pixel_center_uv(&self, x: u32, y: u32) -> Vec2 {
        (Vec2::new(x as f32, y as f32) + Vec2::splat(0.5)) / self.resolution()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, ImageBuffer, Luma, Rgb32FImage, RgbImage};

    #[test]
    fn test_new_checks_length() {
        let err = DepthMap::new(2, 2, vec![0.5; 3]).unwrap_err();
        assert!(matches!(err, DepthMapError::SizeMismatch { expected: 4, actual: 3, .. }));
        assert!(DepthMap::new(2, 2, vec![0.5; 4]).is_ok());
    }

    #[test]
    fn test_new_rejects_empty() {
        let err = DepthMap::new(0, 4, Vec::new()).unwrap_err();
        assert!(matches!(err, DepthMapError::Empty { width: 0, height: 4 }));
    }

    #[test]
    fn test_from_fn_row_major() {
        let map = DepthMap::from_fn(3, 2, |x, y| (y * 3 + x) as f32);
        assert_eq!(map.as_slice(), &[0.0, 1.0, 2.0, 3.0, 4.0, 5.0]);
        assert_eq!(map.get(2, 1), 5.0);
        assert_eq!(map.dimensions(), (3, 2));
    }

    #[test]
    fn test_pixel_center_uv() {
        let map = DepthMap::filled(4, 2, 0.5);
        assert_eq!(map.pixel_center_uv(0, 0), Vec2::new(0.125, 0.25));
        assert_eq!(map.pixel_center_uv(3, 1), Vec2::new(0.875, 0.75));
        assert_eq!(map.resolution(), Vec2::new(4.0, 2.0));
    }

    #[test]
    fn test_from_luma8() {
        let img = GrayImage::from_raw(2, 1, vec![0, 255]).unwrap();
        let map = DepthMap::from_image(&DynamicImage::ImageLuma8(img)).unwrap();
        assert_eq!(map.as_slice(), &[0.0, 1.0]);
    }

    #[test]
    fn test_from_luma16() {
        let img: ImageBuffer<Luma<u16>, Vec<u16>> =
            ImageBuffer::from_raw(3, 1, vec![0, 32768, 65535]).unwrap();
        let map = DepthMap::from_image(&DynamicImage::ImageLuma16(img)).unwrap();
        assert_eq!(map.get(0, 0), 0.0);
        assert!((map.get(1, 0) - 0.5).abs() < 1e-4);
        assert_eq!(map.get(2, 0), 1.0);
    }

    #[test]
    fn test_from_float_keeps_values() {
        let img = Rgb32FImage::from_raw(2, 1, vec![0.25, 9.0, 9.0, 1.5, 9.0, 9.0]).unwrap();
        let map = DepthMap::from_image(&DynamicImage::ImageRgb32F(img)).unwrap();
        assert_eq!(map.as_slice(), &[0.25, 1.5]);
    }

    #[test]
    fn test_from_rgb_uses_luma() {
        let img = RgbImage::from_raw(1, 1, vec![255, 255, 255]).unwrap();
        let map = DepthMap::from_image(&DynamicImage::ImageRgb8(img)).unwrap();
        assert_eq!(map.get(0, 0), 1.0);
    }
}
