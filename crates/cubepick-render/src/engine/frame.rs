//! Identity and visible passes behind [`FrameBackend`].

use cubepick_core::{
    DrawIdentity, Face, FrameBackend, IdentityTriple, ImageCoord, Mat4, OverlayPlan,
    ReadbackMode, Viewport, PICKING_VERTEX_COUNT,
};
use pollster::FutureExt;

use super::RenderEngine;
use crate::buffer::{aligned_bytes_per_row, strip_row_padding, update_uniform_buffer};
use crate::error::{RenderError, RenderResult};
use crate::screenshot::Capture;
use crate::uniforms::{AxisUniforms, IdentityUniforms, TransformUniforms};

impl RenderEngine {
    fn pop_validation_scope(&self, pass: &'static str) -> RenderResult<()> {
        match self.device.pop_error_scope().block_on() {
            Some(error) => {
                log::error!("{pass}: {error}");
                Err(RenderError::Validation {
                    pass,
                    message: error.to_string(),
                })
            }
            None => Ok(()),
        }
    }

    /// Acquires the view the visible pass draws into.
    fn acquire_visible_view(&mut self) -> RenderResult<wgpu::TextureView> {
        if let Some((_, ref view)) = self.offscreen_target {
            return Ok(view.clone());
        }
        let Some(ref surface) = self.surface else {
            return Err(RenderError::MissingCapability("visible target"));
        };

        let frame = match surface.get_current_texture() {
            Ok(frame) => frame,
            Err(error @ (wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated)) => {
                self.reconfigure_surface();
                return Err(error.into());
            }
            Err(error) => return Err(error.into()),
        };
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        self.pending_frame = Some(frame);
        Ok(view)
    }

    /// Reads the headless visible target back as RGBA rows, top row first.
    pub fn capture_visible(&self) -> RenderResult<Capture> {
        let Some((ref texture, _)) = self.offscreen_target else {
            return Err(RenderError::MissingCapability("offscreen visible target"));
        };

        let bytes_per_row = aligned_bytes_per_row(self.width, 4);
        let buffer = self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("capture buffer"),
            size: u64::from(bytes_per_row) * u64::from(self.height),
            usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
            mapped_at_creation: false,
        });

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("capture copy encoder"),
            });
        encoder.copy_texture_to_buffer(
            wgpu::TexelCopyTextureInfo {
                texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            wgpu::TexelCopyBufferInfo {
                buffer: &buffer,
                layout: wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(bytes_per_row),
                    rows_per_image: Some(self.height),
                },
            },
            wgpu::Extent3d {
                width: self.width,
                height: self.height,
                depth_or_array_layers: 1,
            },
        );
        self.queue.submit(std::iter::once(encoder.finish()));

        let slice = buffer.slice(..);
        let (tx, rx) = std::sync::mpsc::channel();
        slice.map_async(wgpu::MapMode::Read, move |result| {
            let _ = tx.send(result);
        });
        self.device
            .poll(wgpu::PollType::wait_indefinitely())
            .map_err(|e| RenderError::ReadbackFailed(e.to_string()))?;
        rx.recv()
            .map_err(|e| RenderError::ReadbackFailed(e.to_string()))?
            .map_err(|e| RenderError::ReadbackFailed(e.to_string()))?;

        let data = slice.get_mapped_range();
        let pixels = strip_row_padding(
            &data,
            (self.width * 4) as usize,
            bytes_per_row as usize,
            self.height as usize,
        );
        drop(data);
        buffer.unmap();

        Ok(Capture::from_target_bytes(
            pixels,
            self.width,
            self.height,
            self.surface_config.format,
        ))
    }
}

impl FrameBackend for RenderEngine {
    type Error = RenderError;

    fn viewport(&self) -> Viewport {
        self.current_viewport()
    }

    fn identity_pass(&mut self, transform: &Mat4, identity: DrawIdentity) -> RenderResult<()> {
        self.device.push_error_scope(wgpu::ErrorFilter::Validation);
        update_uniform_buffer(
            &self.queue,
            &self.transform_buffer,
            &TransformUniforms::new(transform),
        );
        update_uniform_buffer(
            &self.queue,
            &self.identity_buffer,
            &IdentityUniforms {
                object_id: identity.object_id,
                draw_id: identity.draw_id,
                _padding: [0; 2],
            },
        );

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("identity pass encoder"),
            });
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("identity pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &self.identity_target.view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        // Zero in every channel reads back as background.
                        load: wgpu::LoadOp::Clear(wgpu::Color::TRANSPARENT),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.identity_target.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                ..Default::default()
            });

            render_pass.set_pipeline(&self.pipelines.identity);
            render_pass.set_bind_group(0, &self.identity_bind_group, &[]);
            render_pass.set_vertex_buffer(0, self.picking_vertices.slice(..));
            render_pass.draw(0..PICKING_VERTEX_COUNT, 0..1);
        }
        self.queue.submit(std::iter::once(encoder.finish()));
        self.pop_validation_scope("identity pass")
    }

    fn read_identity(&mut self, at: ImageCoord) -> RenderResult<Option<IdentityTriple>> {
        let row = self.current_viewport().texel_row(at);
        match self.readback_mode() {
            ReadbackMode::Blocking => self
                .identity_target
                .read_blocking(&self.device, &self.queue, at.x, row)
                .map(Some),
            ReadbackMode::Deferred => {
                self.identity_target
                    .read_deferred(&self.device, &self.queue, at.x, row)
            }
        }
    }

    fn visible_pass(&mut self, transform: &Mat4, overlays: &OverlayPlan) -> RenderResult<()> {
        let view = self.acquire_visible_view()?;

        self.device.push_error_scope(wgpu::ErrorFilter::Validation);
        update_uniform_buffer(
            &self.queue,
            &self.transform_buffer,
            &TransformUniforms::new(transform),
        );
        if let Some(axis) = overlays.axis {
            update_uniform_buffer(
                &self.queue,
                &self.axis_buffer,
                &AxisUniforms {
                    cursor: axis.cursor,
                    viewport: [self.width, self.height],
                },
            );
        }

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("visible pass encoder"),
            });
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("visible pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.style.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                ..Default::default()
            });

            render_pass.set_pipeline(&self.pipelines.textured);
            render_pass.set_bind_group(0, &self.textured_bind_group, &[]);
            render_pass.set_vertex_buffer(0, self.strip_vertices.slice(..));
            for face in Face::ALL {
                render_pass.draw(face.strip_vertices(), 0..1);
            }

            if let Some(highlight) = overlays.highlight {
                render_pass.set_pipeline(&self.pipelines.highlight);
                render_pass.set_bind_group(0, &self.highlight_bind_group, &[]);
                render_pass.set_vertex_buffer(0, self.picking_vertices.slice(..));
                render_pass.draw(highlight.vertices(), 0..1);
            }

            if overlays.axis.is_some() {
                render_pass.set_pipeline(&self.pipelines.axis);
                render_pass.set_bind_group(0, &self.axis_bind_group, &[]);
                render_pass.draw(0..4, 0..1);
            }
        }
        self.queue.submit(std::iter::once(encoder.finish()));
        self.pop_validation_scope("visible pass")
    }

    fn present(&mut self) -> RenderResult<()> {
        if let Some(frame) = self.pending_frame.take() {
            frame.present();
        }
        Ok(())
    }
}
