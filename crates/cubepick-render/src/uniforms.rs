//! GPU uniform layouts shared with the WGSL shaders.

use glam::Mat4;

/// Model-view-projection shared by every pass of a frame.
///
/// `mvp` is the accumulated `data` array; WGSL reads `mvp[i]` as column `i`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct TransformUniforms {
    pub mvp: [[f32; 4]; 4],
}

impl TransformUniforms {
    pub fn new(transform: &Mat4) -> Self {
        Self {
            mvp: transform.to_cols_array_2d(),
        }
    }
}

impl Default for TransformUniforms {
    fn default() -> Self {
        Self::new(&Mat4::IDENTITY)
    }
}

/// Ids written into the first two channels of the identity target.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, bytemuck::Pod, bytemuck::Zeroable)]
#[allow(clippy::pub_underscore_fields)]
pub struct IdentityUniforms {
    pub object_id: u32,
    pub draw_id: u32,
    pub _padding: [u32; 2],
}

/// Texture coordinate scale of the textured pass.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, bytemuck::Pod, bytemuck::Zeroable)]
#[allow(clippy::pub_underscore_fields)]
pub struct TexturedUniforms {
    pub uv_repeat: f32,
    pub _padding: [f32; 3],
}

/// Fill color of the highlighted triangle.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, bytemuck::Pod, bytemuck::Zeroable)]
pub struct HighlightUniforms {
    pub color: [f32; 4],
}

/// Cursor and viewport height for the axis overlay.
///
/// `cursor` is in bottom-left image coordinates, `[-1, -1]` when absent.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct AxisUniforms {
    pub cursor: [i32; 2],
    pub viewport: [u32; 2],
}

impl Default for AxisUniforms {
    fn default() -> Self {
        Self {
            cursor: cubepick_core::pick::NO_CURSOR_UNIFORM,
            viewport: [1, 1],
        }
    }
}

/// Converts an sRGB-encoded color channel to linear.
pub fn srgb_to_linear(channel: f32) -> f32 {
    if channel <= 0.040_45 {
        channel / 12.92
    } else {
        ((channel + 0.055) / 1.055).powf(2.4)
    }
}

/// Prepares a configured color for a target of `format`.
///
/// Colors are given as stored framebuffer values. An sRGB target encodes on
/// write, so the color is decoded first to store the same bytes.
pub fn color_for_target(color: [f32; 4], format: wgpu::TextureFormat) -> [f32; 4] {
    if format.is_srgb() {
        [
            srgb_to_linear(color[0]),
            srgb_to_linear(color[1]),
            srgb_to_linear(color[2]),
            color[3],
        ]
    } else {
        color
    }
}
