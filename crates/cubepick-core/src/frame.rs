//! Per-frame scheduling of the two render passes and the pick readback.
//!
//! [`run_frame`] drives a [`FrameBackend`] through one frame:
//!
//! 1. sample the cursor
//! 2. compute the model-view-projection once
//! 3. identity pass
//! 4. read back the cursor texel (skipped without a cursor)
//! 5. plan overlays from the pick
//! 6. visible pass with overlays
//! 7. present
//!
//! Both passes receive the same [`Mat4`] value.

use std::time::Instant;

use glam::Mat4;

use crate::interaction::{Diagnostic, InteractionState, OverlayPlan};
use crate::options::{ClockMode, Options};
use crate::pick::{CursorPosition, IdentityTriple, ImageCoord, Viewport};
use crate::transform::compute_model_view_projection;

/// Identifiers written by the identity pass as uniforms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawIdentity {
    pub object_id: u32,
    pub draw_id: u32,
}

/// GPU side of a frame.
pub trait FrameBackend {
    /// Error type surfaced by the backend. Any error ends the frame.
    type Error;

    /// Size of the current render area.
    fn viewport(&self) -> Viewport;

    /// Clears the identity target and draws the picking triangles in one call.
    fn identity_pass(
        &mut self,
        transform: &Mat4,
        identity: DrawIdentity,
    ) -> Result<(), Self::Error>;

    /// Reads the identity texel at `at`.
    ///
    /// Returns `None` when no result is available yet, which only happens for
    /// non-blocking readback.
    fn read_identity(&mut self, at: ImageCoord) -> Result<Option<IdentityTriple>, Self::Error>;

    /// Clears the visible target, draws the six textured strips, then the overlays.
    fn visible_pass(
        &mut self,
        transform: &Mat4,
        overlays: &OverlayPlan,
    ) -> Result<(), Self::Error>;

    /// Shows the visible target.
    fn present(&mut self) -> Result<(), Self::Error>;
}

/// What happened during one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameReport {
    /// Transform shared by both passes.
    pub transform: Mat4,
    /// Cursor texel, if the cursor was inside the viewport.
    pub cursor: Option<ImageCoord>,
    /// Identity read at the cursor.
    pub pick: Option<IdentityTriple>,
    /// Overlays drawn after the textured strips.
    pub overlays: OverlayPlan,
    /// Change notifications raised this frame.
    pub diagnostics: Vec<Diagnostic>,
}

/// Runs one frame on `backend`.
///
/// Stops at the first backend error without touching later stages.
pub fn run_frame<B: FrameBackend + ?Sized>(
    backend: &mut B,
    state: &mut InteractionState,
    angle_degrees: f32,
    cursor: CursorPosition,
    options: &Options,
) -> Result<FrameReport, B::Error> {
    let viewport = backend.viewport();
    let mut diagnostics = Vec::new();

    let image_cursor = state.observe_cursor(cursor, viewport, &mut diagnostics);
    let transform =
        compute_model_view_projection(angle_degrees, viewport.aspect_ratio(), &options.transform);

    backend.identity_pass(
        &transform,
        DrawIdentity {
            object_id: options.object_id,
            draw_id: options.draw_id,
        },
    )?;

    let pick = match image_cursor {
        Some(at) => backend.read_identity(at)?,
        None => None,
    };

    let overlays = state.plan_overlays(image_cursor, pick, &mut diagnostics);
    backend.visible_pass(&transform, &overlays)?;
    backend.present()?;

    Ok(FrameReport {
        transform,
        cursor: image_cursor,
        pick,
        overlays,
        diagnostics,
    })
}

/// Time parameter source for the rotation angle.
#[derive(Debug, Clone)]
pub struct FrameClock {
    mode: ClockMode,
    frames: u64,
    started: Instant,
}

impl FrameClock {
    pub fn new(mode: ClockMode) -> Self {
        Self {
            mode,
            frames: 0,
            started: Instant::now(),
        }
    }

    /// Frames completed so far.
    pub fn frame_count(&self) -> u64 {
        self.frames
    }

    /// Rotation angle for the current frame, wrapped to `[0, 360)`.
    #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
    pub fn rotation_angle(&self) -> f32 {
        let degrees = match self.mode {
            ClockMode::FrameCounter { degrees_per_frame } => {
                f64::from(degrees_per_frame) * self.frames as f64
            }
            ClockMode::Elapsed { degrees_per_second } => {
                f64::from(degrees_per_second) * self.started.elapsed().as_secs_f64()
            }
        };
        degrees.rem_euclid(360.0) as f32
    }

    /// Marks the current frame as done.
    pub fn advance(&mut self) {
        self.frames += 1;
    }
}
