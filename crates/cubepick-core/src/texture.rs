//! RGBA8 texture data for the textured pass.

use crate::error::{CubePickError, Result};

/// Checkerboard texels of the default texture, as packed little-endian RGBA.
pub const DEFAULT_CHECKER: [u32; 4] = [0xff44_aacc, 0xffff_ffff, 0xffff_ffff, 0xff44_aacc];

/// A `width * height` RGBA8 image, rows top to bottom.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureData {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl TextureData {
    /// Wraps `pixels`, which must hold exactly `width * height * 4` bytes.
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(CubePickError::EmptyTexture { width, height });
        }
        let expected = width as usize * height as usize * 4;
        if pixels.len() != expected {
            return Err(CubePickError::TextureSizeMismatch {
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// The 2x2 checkerboard used when no image is configured.
    pub fn checkerboard() -> Self {
        Self {
            width: 2,
            height: 2,
            pixels: DEFAULT_CHECKER.iter().flat_map(|t| t.to_le_bytes()).collect(),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Bytes in one unpadded row.
    pub fn bytes_per_row(&self) -> u32 {
        self.width * 4
    }
}

impl Default for TextureData {
    fn default() -> Self {
        Self::checkerboard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checkerboard_bytes() {
        let texture = TextureData::checkerboard();
        assert_eq!((texture.width(), texture.height()), (2, 2));
        assert_eq!(&texture.pixels()[0..4], &[0xcc, 0xaa, 0x44, 0xff]);
        assert_eq!(&texture.pixels()[4..8], &[0xff; 4]);
        assert_eq!(&texture.pixels()[8..12], &[0xff; 4]);
        assert_eq!(&texture.pixels()[12..16], &[0xcc, 0xaa, 0x44, 0xff]);
        assert_eq!(texture.bytes_per_row(), 8);
    }

    #[test]
    fn test_size_mismatch() {
        let err = TextureData::new(4, 4, vec![0; 63]).unwrap_err();
        assert!(matches!(
            err,
            CubePickError::TextureSizeMismatch {
                expected: 64,
                actual: 63
            }
        ));
    }

    #[test]
    fn test_zero_dimension() {
        assert!(matches!(
            TextureData::new(0, 4, Vec::new()),
            Err(CubePickError::EmptyTexture { .. })
        ));
    }
}
