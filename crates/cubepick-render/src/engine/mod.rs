//! The main rendering engine.

mod frame;
mod pick;
mod pipelines;
mod textures;

use std::sync::Arc;

use cubepick_core::{
    Options, PickingVertex, PrimitiveIndexSource, ReadbackMode, TextureData, TexturedVertex,
    Viewport, PICKING_VERTICES, STRIP_VERTICES,
};

use crate::buffer::{create_uniform_buffer, create_vertex_buffer};
use crate::error::{RenderError, RenderResult};
use crate::shader::ShaderKind;
use crate::texture::CubeTexture;
use crate::uniforms::{
    color_for_target, AxisUniforms, HighlightUniforms, IdentityUniforms, TexturedUniforms,
    TransformUniforms,
};

pub(crate) use pick::IdentityTarget;
pub(crate) use pipelines::Pipelines;

/// Per-run drawing parameters taken from [`Options`].
#[derive(Debug, Clone, Copy)]
struct FrameStyle {
    /// Already converted for the visible target format.
    clear_color: wgpu::Color,
    readback: ReadbackMode,
}

/// The wgpu engine running the identity and visible passes.
pub struct RenderEngine {
    /// The wgpu instance.
    pub instance: wgpu::Instance,
    /// The wgpu adapter.
    pub adapter: wgpu::Adapter,
    /// The wgpu device.
    pub device: wgpu::Device,
    /// The wgpu queue.
    pub queue: wgpu::Queue,
    /// The render surface (None for headless).
    pub surface: Option<wgpu::Surface<'static>>,
    /// Surface configuration. Headless engines keep it as the offscreen target description.
    pub surface_config: wgpu::SurfaceConfiguration,
    /// Current viewport width.
    pub width: u32,
    /// Current viewport height.
    pub height: u32,

    style: FrameStyle,
    pub(crate) pipelines: Pipelines,
    pub(crate) identity_target: IdentityTarget,
    /// Depth buffer of the visible pass.
    pub(crate) _depth_texture: wgpu::Texture,
    pub(crate) depth_view: wgpu::TextureView,
    /// Headless visible target.
    pub(crate) offscreen_target: Option<(wgpu::Texture, wgpu::TextureView)>,
    /// Surface texture acquired by the visible pass, presented by `present`.
    pub(crate) pending_frame: Option<wgpu::SurfaceTexture>,

    /// Held so the cube texture lives as long as the engine; only the bind group reads it.
    pub(crate) _cube_texture: CubeTexture,
    pub(crate) picking_vertices: wgpu::Buffer,
    pub(crate) strip_vertices: wgpu::Buffer,

    pub(crate) transform_buffer: wgpu::Buffer,
    pub(crate) identity_buffer: wgpu::Buffer,
    pub(crate) axis_buffer: wgpu::Buffer,

    pub(crate) identity_bind_group: wgpu::BindGroup,
    pub(crate) textured_bind_group: wgpu::BindGroup,
    pub(crate) highlight_bind_group: wgpu::BindGroup,
    pub(crate) axis_bind_group: wgpu::BindGroup,
}

impl RenderEngine {
    /// Creates a render engine presenting to `window`.
    pub async fn new_windowed(
        window: Arc<winit::window::Window>,
        options: &Options,
        texture: &TextureData,
    ) -> RenderResult<Self> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..wgpu::InstanceDescriptor::default()
        });

        let surface = instance.create_surface(window.clone())?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|_| RenderError::AdapterCreationFailed)?;

        let (device, queue) = Self::request_device(&adapter, options, "cubepick device").await?;

        let size = window.inner_size();
        let width = size.width.max(1);
        let height = size.height.max(1);

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .or_else(|| surface_caps.formats.first().copied())
            .ok_or(RenderError::MissingCapability("surface formats"))?;
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let surface_config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width,
            height,
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &surface_config);
        log::info!("surface format {surface_format:?}, {width}x{height}");

        Ok(Self::assemble(
            instance,
            adapter,
            device,
            queue,
            Some(surface),
            surface_config,
            options,
            texture,
        ))
    }

    /// Creates a render engine drawing into an offscreen RGBA target.
    pub async fn new_headless(
        width: u32,
        height: u32,
        options: &Options,
        texture: &TextureData,
    ) -> RenderResult<Self> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..wgpu::InstanceDescriptor::default()
        });

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: None,
                force_fallback_adapter: false,
            })
            .await
            .map_err(|_| RenderError::AdapterCreationFailed)?;

        let (device, queue) =
            Self::request_device(&adapter, options, "cubepick device (headless)").await?;

        let surface_config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            width: width.max(1),
            height: height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: wgpu::CompositeAlphaMode::Auto,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };

        let mut engine = Self::assemble(
            instance,
            adapter,
            device,
            queue,
            None,
            surface_config,
            options,
            texture,
        );
        engine.offscreen_target = Some(engine.create_offscreen_target());
        Ok(engine)
    }

    async fn request_device(
        adapter: &wgpu::Adapter,
        options: &Options,
        label: &str,
    ) -> RenderResult<(wgpu::Device, wgpu::Queue)> {
        let info = adapter.get_info();
        log::info!("using adapter {} ({:?})", info.name, info.backend);

        let required_features =
            ShaderKind::identity(options.primitive_index_source).required_features();
        if !adapter.features().contains(required_features) {
            return Err(RenderError::MissingCapability("shader primitive index"));
        }
        if options.primitive_index_source == PrimitiveIndexSource::Rasterizer {
            log::info!("identity pass uses the rasterizer primitive index");
        }

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some(label),
                required_features,
                required_limits: wgpu::Limits::default(),
                memory_hints: wgpu::MemoryHints::default(),
                trace: wgpu::Trace::default(),
                experimental_features: wgpu::ExperimentalFeatures::default(),
            })
            .await?;
        Ok((device, queue))
    }

    #[allow(clippy::too_many_arguments)]
    fn assemble(
        instance: wgpu::Instance,
        adapter: wgpu::Adapter,
        device: wgpu::Device,
        queue: wgpu::Queue,
        surface: Option<wgpu::Surface<'static>>,
        surface_config: wgpu::SurfaceConfiguration,
        options: &Options,
        texture: &TextureData,
    ) -> Self {
        let width = surface_config.width;
        let height = surface_config.height;
        let format = surface_config.format;

        let pipelines = Pipelines::new(&device, format, options.primitive_index_source);
        let identity_target = IdentityTarget::new(&device, width, height);
        let (depth_texture, depth_view) = Self::create_depth_texture(&device, width, height);
        let cube_texture = CubeTexture::new(&device, &queue, texture);

        let picking_vertices =
            create_vertex_buffer::<PickingVertex>(&device, &PICKING_VERTICES, "picking vertices");
        let strip_vertices =
            create_vertex_buffer::<TexturedVertex>(&device, &STRIP_VERTICES, "strip vertices");

        let transform_buffer =
            create_uniform_buffer(&device, &TransformUniforms::default(), "transform uniforms");
        let identity_buffer = create_uniform_buffer(
            &device,
            &IdentityUniforms {
                object_id: options.object_id,
                draw_id: options.draw_id,
                _padding: [0; 2],
            },
            "identity uniforms",
        );
        let textured_buffer = create_uniform_buffer(
            &device,
            &TexturedUniforms {
                uv_repeat: options.uv_repeat,
                _padding: [0.0; 3],
            },
            "textured uniforms",
        );
        let highlight_buffer = create_uniform_buffer(
            &device,
            &HighlightUniforms {
                color: color_for_target(options.highlight_color, format),
            },
            "highlight uniforms",
        );
        let axis_buffer =
            create_uniform_buffer(&device, &AxisUniforms::default(), "axis uniforms");

        let identity_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("identity bind group"),
            layout: &pipelines.identity_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: transform_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: identity_buffer.as_entire_binding(),
                },
            ],
        });
        let textured_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("textured bind group"),
            layout: &pipelines.textured_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: transform_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: textured_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::TextureView(&cube_texture.view),
                },
                wgpu::BindGroupEntry {
                    binding: 3,
                    resource: wgpu::BindingResource::Sampler(&cube_texture.sampler),
                },
            ],
        });
        let highlight_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("highlight bind group"),
            layout: &pipelines.highlight_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: transform_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: highlight_buffer.as_entire_binding(),
                },
            ],
        });
        let axis_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("axis bind group"),
            layout: &pipelines.axis_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: axis_buffer.as_entire_binding(),
            }],
        });

        let clear = color_for_target(options.clear_color, format);
        let style = FrameStyle {
            clear_color: wgpu::Color {
                r: f64::from(clear[0]),
                g: f64::from(clear[1]),
                b: f64::from(clear[2]),
                a: f64::from(clear[3]),
            },
            readback: options.readback,
        };

        Self {
            instance,
            adapter,
            device,
            queue,
            surface,
            surface_config,
            width,
            height,
            style,
            pipelines,
            identity_target,
            _depth_texture: depth_texture,
            depth_view,
            offscreen_target: None,
            pending_frame: None,
            _cube_texture: cube_texture,
            picking_vertices,
            strip_vertices,
            transform_buffer,
            identity_buffer,
            axis_buffer,
            identity_bind_group,
            textured_bind_group,
            highlight_bind_group,
            axis_bind_group,
        }
    }

    /// Resizes the visible target and recreates the identity target.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        if (width, height) == (self.width, self.height) {
            return;
        }

        self.width = width;
        self.height = height;
        self.surface_config.width = width;
        self.surface_config.height = height;

        if let Some(ref surface) = self.surface {
            surface.configure(&self.device, &self.surface_config);
        }

        let (depth_texture, depth_view) = Self::create_depth_texture(&self.device, width, height);
        self._depth_texture = depth_texture;
        self.depth_view = depth_view;
        self.identity_target = IdentityTarget::new(&self.device, width, height);

        if self.offscreen_target.is_some() {
            self.offscreen_target = Some(self.create_offscreen_target());
        }
        log::debug!("resized render targets to {width}x{height}");
    }

    /// Reconfigures the surface after it was lost or outdated.
    pub(crate) fn reconfigure_surface(&self) {
        if let Some(ref surface) = self.surface {
            surface.configure(&self.device, &self.surface_config);
        }
    }

    /// Returns the viewport dimensions.
    #[must_use]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Returns the current viewport.
    #[must_use]
    pub fn current_viewport(&self) -> Viewport {
        Viewport {
            width: self.width,
            height: self.height,
        }
    }

    /// Format of the visible target.
    #[must_use]
    pub fn color_format(&self) -> wgpu::TextureFormat {
        self.surface_config.format
    }

    /// Readback strategy for the identity texel.
    #[must_use]
    pub fn readback_mode(&self) -> ReadbackMode {
        self.style.readback
    }
}
