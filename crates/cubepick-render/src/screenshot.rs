//! Saving captured frames to image files.

use std::path::Path;

use image::{ImageBuffer, Rgba};

/// A captured visible target, rows top to bottom.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Capture {
    pub width: u32,
    pub height: u32,
    /// Tightly packed RGBA8 pixels.
    pub pixels: Vec<u8>,
}

impl Capture {
    /// Builds a capture from raw target bytes, swapping channels for BGRA formats.
    pub fn from_target_bytes(
        mut pixels: Vec<u8>,
        width: u32,
        height: u32,
        format: wgpu::TextureFormat,
    ) -> Self {
        if matches!(
            format,
            wgpu::TextureFormat::Bgra8Unorm | wgpu::TextureFormat::Bgra8UnormSrgb
        ) {
            for chunk in pixels.chunks_exact_mut(4) {
                chunk.swap(0, 2);
            }
        }
        Self {
            width,
            height,
            pixels,
        }
    }

    /// RGBA of the pixel at window coordinates `(x, y)`, origin top-left.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let start = ((y * self.width + x) * 4) as usize;
        let texel = self.pixels.get(start..start + 4)?;
        Some([texel[0], texel[1], texel[2], texel[3]])
    }

    /// Saves the capture as PNG or JPEG, chosen by file extension.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ScreenshotError> {
        save_image(path, &self.pixels, self.width, self.height)
    }
}

/// Saves RGBA pixel data to an image file.
///
/// Supports `.png`, `.jpg` and `.jpeg`.
pub fn save_image(
    path: impl AsRef<Path>,
    data: &[u8],
    width: u32,
    height: u32,
) -> Result<(), ScreenshotError> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();

    // wgpu uses a top-left origin, so no vertical flip
    let img: ImageBuffer<Rgba<u8>, Vec<u8>> = ImageBuffer::from_raw(width, height, data.to_vec())
        .ok_or(ScreenshotError::InvalidImageData)?;

    match extension.as_str() {
        "png" => img.save_with_format(path, image::ImageFormat::Png)?,
        "jpg" | "jpeg" => {
            let rgb_img = image::DynamicImage::ImageRgba8(img).to_rgb8();
            rgb_img.save_with_format(path, image::ImageFormat::Jpeg)?;
        }
        _ => return Err(ScreenshotError::UnsupportedFormat(extension)),
    }

    log::info!("saved screenshot to {}", path.display());
    Ok(())
}

/// Encodes RGBA pixel data as PNG in memory.
pub fn save_to_buffer(data: &[u8], width: u32, height: u32) -> Result<Vec<u8>, ScreenshotError> {
    let img: ImageBuffer<Rgba<u8>, Vec<u8>> = ImageBuffer::from_raw(width, height, data.to_vec())
        .ok_or(ScreenshotError::InvalidImageData)?;

    let mut buffer = std::io::Cursor::new(Vec::new());
    img.write_to(&mut buffer, image::ImageFormat::Png)?;
    Ok(buffer.into_inner())
}

/// Error type for screenshot operations.
#[derive(Debug, thiserror::Error)]
pub enum ScreenshotError {
    #[error("Failed to save image: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Image encoding error: {0}")]
    ImageError(#[from] image::ImageError),

    #[error("Unsupported image format: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid image data")]
    InvalidImageData,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bgra_is_swapped() {
        let capture = Capture::from_target_bytes(
            vec![1, 2, 3, 4],
            1,
            1,
            wgpu::TextureFormat::Bgra8UnormSrgb,
        );
        assert_eq!(capture.pixel(0, 0), Some([3, 2, 1, 4]));

        let format = wgpu::TextureFormat::Rgba8UnormSrgb;
        let rgba = Capture::from_target_bytes(vec![1, 2, 3, 4], 1, 1, format);
        assert_eq!(rgba.pixel(0, 0), Some([1, 2, 3, 4]));
        assert_eq!(rgba.pixel(1, 0), None);
    }

    #[test]
    fn test_png_buffer_has_signature() {
        let png = save_to_buffer(&[0u8; 16], 2, 2).unwrap();
        assert_eq!(&png[1..4], b"PNG");
    }

    #[test]
    fn test_unsupported_extension() {
        let err = save_image("frame.bmp2", &[0u8; 4], 1, 1).unwrap_err();
        assert!(matches!(err, ScreenshotError::UnsupportedFormat(_)));
    }

    #[test]
    fn test_short_data_is_invalid() {
        let err = save_to_buffer(&[0u8; 3], 1, 1).unwrap_err();
        assert!(matches!(err, ScreenshotError::InvalidImageData));
    }
}
