//! CPU canvas - RGBA8 storage matching the persisted dump format

mod stamp;

pub use stamp::{calculate_hardness_falloff, StampRect};

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Pixel buffer holds {actual} bytes, canvas needs {expected}")]
pub struct SurfaceSizeError {
    pub expected: usize,
    pub actual: usize,
}

/// An RGBA8 canvas
/// Stores pixels as [u8; 4], row-major, origin top-left
pub struct CpuSurface {
    /// Surface dimensions
    pub width: u32,
    pub height: u32,
    pixels: Vec<[u8; 4]>,
}

impl CpuSurface {
    /// Create a new surface with the given dimensions, initialized to transparent black
    pub fn new(width: u32, height: u32) -> Self {
        let pixel_count = (width as usize) * (height as usize);
        Self {
            width,
            height,
            pixels: vec![[0, 0, 0, 0]; pixel_count],
        }
    }

    /// Clear the surface to a solid color
    pub fn clear(&mut self, color: [u8; 4]) {
        self.pixels.fill(color);
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some((y as usize) * (self.width as usize) + (x as usize))
    }

    /// Returns None if coordinates are out of bounds
    #[inline]
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        self.index(x, y).map(|i| self.pixels[i])
    }

    /// Does nothing if coordinates are out of bounds
    #[inline]
    pub fn set_pixel(&mut self, x: u32, y: u32, color: [u8; 4]) {
        if let Some(i) = self.index(x, y) {
            self.pixels[i] = color;
        }
    }

    /// Source-over blend of `color` at `coverage` (0-1) onto a pixel
    #[inline]
    pub fn blend_pixel(&mut self, x: u32, y: u32, color: [u8; 4], coverage: f32) {
        let Some(index) = self.index(x, y) else {
            return;
        };
        let dst = self.pixels[index];

        let src_alpha = (color[3] as f32 / 255.0) * coverage.clamp(0.0, 1.0);
        let inv_src_alpha = 1.0 - src_alpha;
        let channel = |s: u8, d: u8| (s as f32 * src_alpha + d as f32 * inv_src_alpha).round() as u8;

        self.pixels[index] = [
            channel(color[0], dst[0]),
            channel(color[1], dst[1]),
            channel(color[2], dst[2]),
            (src_alpha * 255.0 + dst[3] as f32 * inv_src_alpha).round() as u8,
        ];
    }

    /// Raw pixel bytes, `width * height * 4` long
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    /// Replace the whole canvas from raw RGBA8 bytes
    pub fn copy_from_bytes(&mut self, bytes: &[u8]) -> Result<(), SurfaceSizeError> {
        let expected = self.byte_len();
        if bytes.len() != expected {
            return Err(SurfaceSizeError {
                expected,
                actual: bytes.len(),
            });
        }
        let dst: &mut [u8] = bytemuck::cast_slice_mut(&mut self.pixels);
        dst.copy_from_slice(bytes);
        Ok(())
    }

    /// Byte length of the full canvas
    #[inline]
    pub fn byte_len(&self) -> usize {
        self.pixels.len() * 4
    }

    #[inline]
    pub fn pixel_count(&self) -> usize {
        self.pixels.len()
    }

    #[inline]
    pub fn pixels(&self) -> &[[u8; 4]] {
        &self.pixels
    }
}
