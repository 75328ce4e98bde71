//! Offscreen identity target and single-texel readback.

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

use cubepick_core::pick::IDENTITY_TEXEL_SIZE;
use cubepick_core::IdentityTriple;

use super::textures::DEPTH_FORMAT;
use crate::error::{RenderError, RenderResult};

/// Unsigned-integer format holding one identity triple per texel.
pub(crate) const IDENTITY_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba32Uint;

/// Minimum aligned size; only the first 16 bytes are read.
const STAGING_SIZE: wgpu::BufferAddress = 256;

const MAP_PENDING: u8 = 0;
const MAP_READY: u8 = 1;
const MAP_FAILED: u8 = 2;

/// Identity color and depth attachments plus the readback staging buffer.
pub(crate) struct IdentityTarget {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub depth_view: wgpu::TextureView,
    staging: wgpu::Buffer,
    width: u32,
    height: u32,
    readback_in_flight: bool,
    map_state: Arc<AtomicU8>,
    last_deferred: Option<IdentityTriple>,
}

impl IdentityTarget {
    pub fn new(device: &wgpu::Device, width: u32, height: u32) -> Self {
        let size = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("identity texture"),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: IDENTITY_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        let depth_texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("identity depth texture"),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let depth_view = depth_texture.create_view(&wgpu::TextureViewDescriptor::default());

        let staging = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("identity staging buffer"),
            size: STAGING_SIZE,
            usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
            mapped_at_creation: false,
        });

        log::debug!("identity target {width}x{height} ({IDENTITY_FORMAT:?})");

        Self {
            texture,
            view,
            depth_view,
            staging,
            width,
            height,
            readback_in_flight: false,
            map_state: Arc::new(AtomicU8::new(MAP_PENDING)),
            last_deferred: None,
        }
    }

    /// Copies the texel at column `x`, top-left row `row` into the staging buffer.
    fn submit_texel_copy(&self, device: &wgpu::Device, queue: &wgpu::Queue, x: u32, row: u32) {
        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("identity readback encoder"),
        });

        encoder.copy_texture_to_buffer(
            wgpu::TexelCopyTextureInfo {
                texture: &self.texture,
                mip_level: 0,
                origin: wgpu::Origin3d { x, y: row, z: 0 },
                aspect: wgpu::TextureAspect::All,
            },
            wgpu::TexelCopyBufferInfo {
                buffer: &self.staging,
                layout: wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(256),
                    rows_per_image: Some(1),
                },
            },
            wgpu::Extent3d {
                width: 1,
                height: 1,
                depth_or_array_layers: 1,
            },
        );

        queue.submit(std::iter::once(encoder.finish()));
    }

    fn decode_mapped(&self) -> RenderResult<IdentityTriple> {
        let slice = self.staging.slice(..IDENTITY_TEXEL_SIZE as wgpu::BufferAddress);
        let data = slice.get_mapped_range();
        let triple = IdentityTriple::from_texel_bytes(&data);
        drop(data);
        self.staging.unmap();
        triple.ok_or_else(|| RenderError::ReadbackFailed("short identity texel".into()))
    }

    fn check_bounds(&self, x: u32, row: u32) -> RenderResult<()> {
        if x >= self.width || row >= self.height {
            return Err(RenderError::ReadbackFailed(format!(
                "texel ({x}, {row}) outside {}x{} identity target",
                self.width, self.height
            )));
        }
        Ok(())
    }

    /// Reads the texel and waits for the GPU to finish everything submitted so far.
    pub fn read_blocking(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        x: u32,
        row: u32,
    ) -> RenderResult<IdentityTriple> {
        self.check_bounds(x, row)?;
        self.submit_texel_copy(device, queue, x, row);

        let slice = self.staging.slice(..IDENTITY_TEXEL_SIZE as wgpu::BufferAddress);
        let (tx, rx) = std::sync::mpsc::channel();
        slice.map_async(wgpu::MapMode::Read, move |result| {
            let _ = tx.send(result);
        });

        device
            .poll(wgpu::PollType::wait_indefinitely())
            .map_err(|e| RenderError::ReadbackFailed(e.to_string()))?;
        rx.recv()
            .map_err(|e| RenderError::ReadbackFailed(e.to_string()))?
            .map_err(|e| RenderError::ReadbackFailed(e.to_string()))?;

        self.decode_mapped()
    }

    /// Non-blocking read.
    ///
    /// Collects a finished earlier copy if there is one, then starts a copy of
    /// the current texel when the staging buffer is free. Returns the most
    /// recent completed result, which trails the current frame.
    pub fn read_deferred(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        x: u32,
        row: u32,
    ) -> RenderResult<Option<IdentityTriple>> {
        self.check_bounds(x, row)?;

        if self.readback_in_flight {
            device
                .poll(wgpu::PollType::Poll)
                .map_err(|e| RenderError::ReadbackFailed(e.to_string()))?;
            match self.map_state.load(Ordering::SeqCst) {
                MAP_READY => {
                    self.last_deferred = Some(self.decode_mapped()?);
                    self.readback_in_flight = false;
                }
                MAP_FAILED => {
                    return Err(RenderError::ReadbackFailed(
                        "identity staging buffer could not be mapped".into(),
                    ));
                }
                _ => {}
            }
        }

        if !self.readback_in_flight {
            self.submit_texel_copy(device, queue, x, row);
            self.readback_in_flight = true;
            self.map_state.store(MAP_PENDING, Ordering::SeqCst);
            let map_state = self.map_state.clone();
            let slice = self.staging.slice(..IDENTITY_TEXEL_SIZE as wgpu::BufferAddress);
            slice.map_async(wgpu::MapMode::Read, move |result| {
                let state = if result.is_ok() { MAP_READY } else { MAP_FAILED };
                map_state.store(state, Ordering::SeqCst);
            });
        }

        Ok(self.last_deferred)
    }
}
