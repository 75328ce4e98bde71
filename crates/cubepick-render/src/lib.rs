//! Rendering backend for cubepick.
//!
//! This crate provides the wgpu-based rendering engine, including:
//! - The offscreen identity pass and single-texel pick readback
//! - The visible textured pass with highlight and axis overlays
//! - GPU resource helpers (buffers, textures, uniforms)
//! - WGSL shader management and frame capture

pub mod buffer;
pub mod engine;
pub mod error;
pub mod screenshot;
pub mod shader;
pub mod texture;
pub mod uniforms;

pub use engine::RenderEngine;
pub use error::{RenderError, RenderResult};
pub use screenshot::{save_image, save_to_buffer, Capture, ScreenshotError};
pub use shader::ShaderKind;
pub use texture::{load_texture_data, CubeTexture};
pub use uniforms::color_for_target;
