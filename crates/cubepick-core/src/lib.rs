//! Core logic for cubepick.
//!
//! This crate holds everything that does not need a GPU:
//! - [`transform`]: model-view-projection construction
//! - [`geometry`]: the cube in picking and textured topologies
//! - [`pick`]: identity triples and cursor-to-texel mapping
//! - [`interaction`]: button/cursor state machine and overlay planning
//! - [`frame`]: the per-frame pass ordering over a [`FrameBackend`]
//! - Configuration options and texture data

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
// Builder patterns return Self which doesn't need must_use
#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod frame;
pub mod geometry;
pub mod interaction;
pub mod options;
pub mod pick;
pub mod texture;
pub mod transform;

pub use error::{CubePickError, Result};
pub use frame::{run_frame, DrawIdentity, FrameBackend, FrameClock, FrameReport};
pub use geometry::{
    Face, PickingVertex, TexturedVertex, PICKING_VERTICES, PICKING_VERTEX_COUNT, STRIP_VERTICES,
    TRIANGLE_COUNT,
};
pub use interaction::{
    AxisOverlay, ButtonAction, Diagnostic, HighlightDraw, InteractionMode, InteractionState,
    MouseButton, OverlayPlan,
};
pub use options::{ClockMode, Options, PrimitiveIndexSource, ReadbackMode};
pub use pick::{CursorPosition, IdentityTriple, ImageCoord, Viewport};
pub use texture::TextureData;
pub use transform::{compute_model_view_projection, Frustum, TransformOptions};

// Re-export glam types for convenience
pub use glam::{Mat4, Vec2, Vec3, Vec4};
