//! Render pipelines of the identity and visible passes.

use cubepick_core::{PickingVertex, PrimitiveIndexSource, TexturedVertex};

use super::pick::IDENTITY_FORMAT;
use super::textures::DEPTH_FORMAT;
use crate::shader::ShaderKind;

const PICKING_ATTRIBUTES: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x3];
const TEXTURED_ATTRIBUTES: [wgpu::VertexAttribute; 2] =
    wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x2];

/// Cube triangles and strips wind counter-clockwise seen from outside.
pub(crate) const CUBE_CULL_MODE: Option<wgpu::Face> = Some(wgpu::Face::Back);

/// All pipelines with their bind group layouts.
pub(crate) struct Pipelines {
    pub identity: wgpu::RenderPipeline,
    pub identity_layout: wgpu::BindGroupLayout,
    pub textured: wgpu::RenderPipeline,
    pub textured_layout: wgpu::BindGroupLayout,
    pub highlight: wgpu::RenderPipeline,
    pub highlight_layout: wgpu::BindGroupLayout,
    pub axis: wgpu::RenderPipeline,
    pub axis_layout: wgpu::BindGroupLayout,
}

fn uniform_entry(binding: u32, visibility: wgpu::ShaderStages) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    }
}

fn picking_vertex_layout() -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<PickingVertex>() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &PICKING_ATTRIBUTES,
    }
}

fn textured_vertex_layout() -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<TexturedVertex>() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &TEXTURED_ATTRIBUTES,
    }
}

fn depth_state(compare: wgpu::CompareFunction, write: bool) -> wgpu::DepthStencilState {
    wgpu::DepthStencilState {
        format: DEPTH_FORMAT,
        depth_write_enabled: write,
        depth_compare: compare,
        stencil: wgpu::StencilState::default(),
        bias: wgpu::DepthBiasState::default(),
    }
}

struct PipelineSpec<'a> {
    label: &'a str,
    shader: ShaderKind,
    layout: &'a wgpu::BindGroupLayout,
    buffers: &'a [wgpu::VertexBufferLayout<'a>],
    topology: wgpu::PrimitiveTopology,
    cull_mode: Option<wgpu::Face>,
    target: wgpu::TextureFormat,
    depth: wgpu::DepthStencilState,
}

fn create_pipeline(device: &wgpu::Device, spec: &PipelineSpec<'_>) -> wgpu::RenderPipeline {
    let module = spec.shader.create_module(device);
    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some(spec.label),
        bind_group_layouts: &[spec.layout],
        push_constant_ranges: &[],
    });

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(spec.label),
        layout: Some(&layout),
        vertex: wgpu::VertexState {
            module: &module,
            entry_point: Some("vs_main"),
            buffers: spec.buffers,
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: &module,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format: spec.target,
                blend: None,
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: spec.topology,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: spec.cull_mode,
            ..wgpu::PrimitiveState::default()
        },
        depth_stencil: Some(spec.depth.clone()),
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
        cache: None,
    })
}

impl Pipelines {
    pub fn new(
        device: &wgpu::Device,
        color_format: wgpu::TextureFormat,
        primitive_index_source: PrimitiveIndexSource,
    ) -> Self {
        let vertex_fragment = wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT;

        let identity_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("identity bind group layout"),
            entries: &[
                uniform_entry(0, wgpu::ShaderStages::VERTEX),
                uniform_entry(1, wgpu::ShaderStages::FRAGMENT),
            ],
        });
        let identity = create_pipeline(
            device,
            &PipelineSpec {
                label: "identity pipeline",
                shader: ShaderKind::identity(primitive_index_source),
                layout: &identity_layout,
                buffers: &[picking_vertex_layout()],
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: CUBE_CULL_MODE,
                target: IDENTITY_FORMAT,
                depth: depth_state(wgpu::CompareFunction::Less, true),
            },
        );

        let textured_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("textured bind group layout"),
            entries: &[
                uniform_entry(0, wgpu::ShaderStages::VERTEX),
                uniform_entry(1, vertex_fragment),
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 3,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });
        let textured = create_pipeline(
            device,
            &PipelineSpec {
                label: "textured pipeline",
                shader: ShaderKind::Textured,
                layout: &textured_layout,
                buffers: &[textured_vertex_layout()],
                topology: wgpu::PrimitiveTopology::TriangleStrip,
                cull_mode: CUBE_CULL_MODE,
                target: color_format,
                depth: depth_state(wgpu::CompareFunction::Less, true),
            },
        );

        let highlight_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("highlight bind group layout"),
            entries: &[
                uniform_entry(0, wgpu::ShaderStages::VERTEX),
                uniform_entry(1, wgpu::ShaderStages::FRAGMENT),
            ],
        });
        // Depth test off: the highlight always lands on top of the cube.
        let highlight = create_pipeline(
            device,
            &PipelineSpec {
                label: "highlight pipeline",
                shader: ShaderKind::Highlight,
                layout: &highlight_layout,
                buffers: &[picking_vertex_layout()],
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: CUBE_CULL_MODE,
                target: color_format,
                depth: depth_state(wgpu::CompareFunction::Always, false),
            },
        );

        let axis_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("axis bind group layout"),
            entries: &[uniform_entry(0, wgpu::ShaderStages::FRAGMENT)],
        });
        // The quad sits on the near plane, so LessEqual passes everywhere.
        let axis = create_pipeline(
            device,
            &PipelineSpec {
                label: "axis pipeline",
                shader: ShaderKind::Axis,
                layout: &axis_layout,
                buffers: &[],
                topology: wgpu::PrimitiveTopology::TriangleStrip,
                cull_mode: None,
                target: color_format,
                depth: depth_state(wgpu::CompareFunction::LessEqual, false),
            },
        );

        Self {
            identity,
            identity_layout,
            textured,
            textured_layout,
            highlight,
            highlight_layout,
            axis,
            axis_layout,
        }
    }
}
