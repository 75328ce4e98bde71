//! cubepick: a rotating textured cube with single-triangle GPU picking.
//!
//! Every frame the cube is drawn twice with the same transform. The first
//! pass writes an (object, draw, primitive) identity triple per pixel into an
//! offscreen unsigned-integer target, and the texel under the cursor is read
//! back. The second pass draws the textured cube and, while a mouse button is
//! held, highlights the triangle under the cursor and draws an axis overlay
//! through the cursor pixel.
//!
//! # Quick Start
//!
//! ```no_run
//! fn main() -> cubepick::Result<()> {
//!     // Reads options from CUBEPICK_CONFIG if set
//!     cubepick::show()
//! }
//! ```
//!
//! # Headless
//!
//! ```no_run
//! use cubepick::*;
//!
//! let frames = render_frames(
//!     400,
//!     300,
//!     &Options::default(),
//!     &[ScriptedFrame::at(200, 150).with_button(ButtonAction::Pressed)],
//! )?;
//! println!("{:?}", frames[0].report.pick);
//! # Ok::<(), cubepick::Error>(())
//! ```
//!
//! # Crates
//!
//! - `cubepick-core`: transform, geometry, pick codec, interaction state
//! - `cubepick-render`: wgpu engine implementing the two passes

mod app;
mod error;
mod headless;
mod init;

pub use error::{Error, Result};
pub use headless::{
    render_frames, render_frames_with_texture, render_to_file, render_to_image, HeadlessFrame,
    ScriptedFrame,
};
pub use init::{load_options, load_texture, run, show, CONFIG_ENV};

// Re-export core types
pub use cubepick_core::{
    compute_model_view_projection, run_frame, ButtonAction, ClockMode, CursorPosition, Diagnostic,
    DrawIdentity, Face, FrameBackend, FrameClock, FrameReport, Frustum, HighlightDraw,
    IdentityTriple, ImageCoord, InteractionMode, InteractionState, MouseButton, OverlayPlan,
    Options, PrimitiveIndexSource, ReadbackMode, TextureData, TransformOptions, Viewport, Mat4,
    Vec2, Vec3, Vec4,
};

// Re-export render types
pub use cubepick_render::{Capture, RenderEngine, RenderError};
