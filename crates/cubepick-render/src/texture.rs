//! Cube texture upload and image loading.

use std::path::Path;

use cubepick_core::TextureData;

use crate::error::RenderResult;

/// Decodes an image file into RGBA8 texture data.
pub fn load_texture_data(path: impl AsRef<Path>) -> RenderResult<TextureData> {
    let path = path.as_ref();
    let image = image::open(path)?.to_rgba8();
    let (width, height) = image.dimensions();
    log::info!("loaded texture {} ({width}x{height})", path.display());
    Ok(TextureData::new(width, height, image.into_raw())?)
}

/// GPU copy of the cube texture with its repeat/nearest sampler.
pub struct CubeTexture {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub sampler: wgpu::Sampler,
}

impl CubeTexture {
    /// Uploads `data` as an sRGB texture.
    pub fn new(device: &wgpu::Device, queue: &wgpu::Queue, data: &TextureData) -> Self {
        let size = wgpu::Extent3d {
            width: data.width(),
            height: data.height(),
            depth_or_array_layers: 1,
        };
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("cube texture"),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            data.pixels(),
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(data.bytes_per_row()),
                rows_per_image: Some(data.height()),
            },
            size,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("cube sampler"),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            address_mode_w: wgpu::AddressMode::Repeat,
            mag_filter: wgpu::FilterMode::Nearest,
            min_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        Self {
            texture,
            view,
            sampler,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_png_texture() {
        let path = std::env::temp_dir().join("cubepick_texture_test.png");
        let img = image::RgbaImage::from_raw(2, 1, vec![255, 0, 0, 255, 0, 0, 255, 128]).unwrap();
        img.save(&path).unwrap();

        let data = load_texture_data(&path).unwrap();
        assert_eq!((data.width(), data.height()), (2, 1));
        assert_eq!(data.pixels(), &[255, 0, 0, 255, 0, 0, 255, 128]);

        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn test_missing_texture_file_is_error() {
        assert!(load_texture_data("/nonexistent/cubepick.png").is_err());
    }
}
